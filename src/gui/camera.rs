use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Point3};

use crate::camera::CameraRig;

// The rig is driven from `SimulationContext::step`, which sees the input
// snapshot and the focused body. The only event kiss3d needs to forward is
// the framebuffer size.
impl Camera for CameraRig {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.set_viewport(w, h);
        }
    }

    fn eye(&self) -> Point3<f32> {
        CameraRig::eye(self)
    }

    fn view_transform(&self) -> Isometry3<f32> {
        CameraRig::view_transform(self)
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        let projection = self.projection();
        (projection.znear(), projection.zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
