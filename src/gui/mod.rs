use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::input::{FpsCounter, FrameTimer, InputCollector};
use self::view::View;
use crate::simulation::SimulationContext;

mod camera;
pub mod input;
pub mod view;

// Longest frame we'll simulate in one go, in seconds
const MAX_FRAME_TIME: f64 = 0.25;

pub struct Simulation {
    context: SimulationContext,
    view: View,
    input: InputCollector,
    timer: FrameTimer,
    fps_counter: FpsCounter,
}

impl Simulation {
    pub fn new(mut context: SimulationContext, window: &mut Window) -> Self {
        context
            .camera_mut()
            .set_viewport(window.width(), window.height());
        Self {
            view: View::new(context.catalog(), window),
            context,
            input: InputCollector::new(),
            timer: FrameTimer::new(MAX_FRAME_TIME),
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(self.context.camera_mut()), None, None, None)
    }

    fn step(&mut self, window: &mut Window) {
        let input = self.input.collect(window.events());
        let dt = self.timer.tick();
        self.context.step(&input, dt);
        self.view
            .prerender_scene(window, &self.context, self.fps_counter.value());
        self.fps_counter.increment();
    }
}
