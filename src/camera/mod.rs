use std::f32::consts::FRAC_PI_2;

use nalgebra::{Isometry3, Matrix4, Perspective3, Point2, Point3, Rotation3, Unit, Vector3};
use tracing::{debug, info, warn};

use crate::config::CameraConfig;
use crate::math::geometry::{exponential_approach, lerp_point, rotate_about, smoothing_factor, Ray};
use crate::model::BodyID;

pub mod input;

use self::input::{InputSnapshot, PointerButton};

// Anything shorter than this is treated as a zero vector
const DEGENERATE_LENGTH: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl CameraPose {
    pub fn new(position: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        CameraPose {
            position,
            target,
            up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Free,
    /// Following a body; see `CameraRig::is_locked` for whether the camera
    /// has arrived yet.
    Focused,
}

/// Where the focused body is this frame, and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTarget {
    pub position: Point3<f32>,
    pub radius: f32,
}

/// The one camera of the simulation.
///
/// Free, it flies around: drag to look, middle-drag to pan, scroll to dolly.
/// Focused on a body, it first glides to a point beside the body, then locks
/// on and orbits it, creeping slowly around it while left alone.
///
/// The body is referred to by ID only. The caller resolves it every frame and
/// passes its position in; if it can't, the camera lets go.
#[derive(Debug, Clone)]
pub struct CameraRig {
    settings: CameraConfig,
    // -- pose --
    position: Point3<f32>,
    target: Point3<f32>,
    up: Vector3<f32>,
    /// Fixed reference axis. Yaw turns about it, and pitch stops short of it.
    world_up: Vector3<f32>,
    // -- perspective --
    fovy: f32,
    width: u32,
    height: u32,
    // -- look --
    yaw: f32,
    pitch: f32,
    yaw_rate: f32,
    pitch_rate: f32,
    // -- free zoom --
    goal_position: Point3<f32>,
    goal_target: Point3<f32>,
    // -- focus --
    state: CameraState,
    locked_to_target: bool,
    target_body: Option<BodyID>,
    target_index: usize,
    /// Unit vector from the body towards the camera's resting place.
    approach_direction: Vector3<f32>,
    approach_point: Point3<f32>,
    /// Body position seen last frame, so the camera can ride along with it.
    anchor: Point3<f32>,
    // -- locked orbit --
    orbit_distance: f32,
    goal_distance: f32,
    baseline_distance: f32,
    home: CameraPose,
}

impl CameraRig {
    pub fn new(settings: CameraConfig, home: CameraPose) -> Self {
        CameraRig {
            position: home.position,
            target: home.target,
            up: home.up,
            world_up: home.up,
            fovy: settings.fovy_degrees.to_radians(),
            width: 800,
            height: 600,
            yaw: 0.0,
            pitch: 0.0,
            yaw_rate: 0.0,
            pitch_rate: 0.0,
            goal_position: home.position,
            goal_target: home.target,
            state: CameraState::Free,
            locked_to_target: false,
            target_body: None,
            target_index: 0,
            approach_direction: Vector3::x(),
            approach_point: home.position,
            anchor: home.target,
            orbit_distance: 0.0,
            goal_distance: 0.0,
            baseline_distance: 1.0,
            home,
            settings,
        }
    }

    /// A rig whose home pose comes from the config, with y up.
    pub fn from_config(settings: &CameraConfig) -> Self {
        let home = CameraPose::new(
            Point3::from(settings.home_position),
            Point3::from(settings.home_target),
            Vector3::y(),
        );
        Self::new(settings.clone(), home)
    }

    // -- Accessors --

    pub fn settings(&self) -> &CameraConfig {
        &self.settings
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.locked_to_target
    }

    pub fn target_body(&self) -> Option<BodyID> {
        self.target_body
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target, self.up)
    }

    pub fn home(&self) -> CameraPose {
        self.home
    }

    pub fn world_up(&self) -> Vector3<f32> {
        self.world_up
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn look_rates(&self) -> (f32, f32) {
        (self.yaw_rate, self.pitch_rate)
    }

    pub fn approach_point(&self) -> Point3<f32> {
        self.approach_point
    }

    pub fn orbit_distance(&self) -> f32 {
        self.orbit_distance
    }

    pub fn goal_distance(&self) -> f32 {
        self.goal_distance
    }

    pub fn look_distance(&self) -> f32 {
        (self.target - self.position).norm()
    }

    pub fn view_direction(&self) -> Vector3<f32> {
        (self.target - self.position)
            .try_normalize(DEGENERATE_LENGTH)
            .unwrap_or_else(|| -Vector3::z())
    }

    pub fn right(&self) -> Vector3<f32> {
        self.view_direction()
            .cross(&self.up)
            .try_normalize(DEGENERATE_LENGTH)
            .unwrap_or_else(Vector3::x)
    }

    /// Up as the camera sees it, derived from the view and `right`. Matches
    /// `up` once any look rotation has run.
    pub fn camera_up(&self) -> Vector3<f32> {
        self.right().cross(&self.view_direction())
    }

    // -- Focus transitions --

    /// Starts gliding towards a body. Also restarts the approach when
    /// switching from one body to another.
    pub fn focus_on(&mut self, id: BodyID, index: usize, focus: FocusTarget) {
        self.state = CameraState::Focused;
        self.locked_to_target = false;
        self.target_body = Some(id);
        self.target_index = index;
        self.approach_direction = self.right();
        self.approach_point = self.approach_point_for(&focus);
        self.anchor = focus.position;
        self.yaw_rate = 0.0;
        self.pitch_rate = 0.0;
        info!(body = id.0, index, "focusing camera");
    }

    /// Drops the focus and jumps back to the home pose.
    pub fn cancel_focus(&mut self) {
        let home = self.home;
        self.position = home.position;
        self.target = home.target;
        self.up = home.up;
        self.goal_position = home.position;
        self.goal_target = home.target;
        self.state = CameraState::Free;
        self.locked_to_target = false;
        self.target_body = None;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.yaw_rate = 0.0;
        self.pitch_rate = 0.0;
        info!("camera focus cancelled");
    }

    /// Drops the focus but stays where we are. Used when the focused body
    /// disappears from under us.
    pub fn release_target(&mut self) {
        if let Some(id) = self.target_body {
            warn!(body = id.0, "focused body is gone, freeing camera");
        }
        self.state = CameraState::Free;
        self.locked_to_target = false;
        self.target_body = None;
        self.goal_position = self.position;
        self.goal_target = self.target;
        self.yaw_rate = 0.0;
        self.pitch_rate = 0.0;
    }

    // -- Per-frame update --

    /// Advances the camera by one frame. `focus` is the focused body as of
    /// this frame, or `None` if there isn't one (or it no longer exists).
    pub fn update(&mut self, input: &InputSnapshot, focus: Option<FocusTarget>, dt: f32) {
        self.update_look_rates(input, dt);

        match (self.state, focus) {
            (CameraState::Free, _) => self.update_free(input, dt),
            (CameraState::Focused, None) => {
                self.release_target();
                self.update_free(input, dt);
            }
            (CameraState::Focused, Some(focus)) => {
                self.ride_along(&focus);
                if self.locked_to_target {
                    self.update_locked(input, &focus, dt);
                } else {
                    self.update_approach(&focus, dt);
                }
            }
        }
    }

    fn update_look_rates(&mut self, input: &InputSnapshot, dt: f32) {
        let sensitivity = self.settings.look_sensitivity;
        let (target_yaw, target_pitch) = if input.is_held(PointerButton::Look) {
            (
                -input.pointer_delta.x * sensitivity,
                -input.pointer_delta.y * sensitivity,
            )
        } else {
            (0.0, 0.0)
        };

        let s = smoothing_factor(dt, self.settings.smooth_factor);
        self.yaw_rate += (target_yaw - self.yaw_rate) * s;
        self.pitch_rate += (target_pitch - self.pitch_rate) * s;
    }

    /// Whether pitching `v` by `pitch` keeps it clear of straight up and
    /// straight down. Positive pitch raises `v`.
    fn pitch_allowed(&self, v: &Vector3<f32>, pitch: f32) -> bool {
        let elevation = FRAC_PI_2 - v.angle(&self.world_up);
        (elevation + pitch).abs() < FRAC_PI_2 - self.settings.pitch_limit
    }

    /// Rotation of the view about the eye for this frame's look rates.
    fn look_rotation(&mut self, view: &Vector3<f32>) -> Rotation3<f32> {
        let up = Unit::new_normalize(self.world_up);
        let yaw_rotation = Rotation3::from_axis_angle(&up, self.yaw_rate);
        self.yaw += self.yaw_rate;

        let turned = yaw_rotation * view;
        let right = match Unit::try_new(turned.cross(&up), DEGENERATE_LENGTH) {
            Some(right) => right,
            None => return yaw_rotation,
        };
        if !self.pitch_allowed(&turned, self.pitch_rate) {
            return yaw_rotation;
        }
        self.pitch += self.pitch_rate;
        Rotation3::from_axis_angle(&right, self.pitch_rate) * yaw_rotation
    }

    fn update_free(&mut self, input: &InputSnapshot, dt: f32) {
        // Look around, pivoting on the eye
        if self.yaw_rate != 0.0 || self.pitch_rate != 0.0 {
            let eye = self.position;
            let view = self.target - eye;
            let rotation = self.look_rotation(&view);
            self.target = eye + rotation * (self.target - eye);
            self.goal_target = eye + rotation * (self.goal_target - eye);
            self.goal_position = eye + rotation * (self.goal_position - eye);
            self.rederive_up();
        }

        // Pan
        if input.is_held(PointerButton::Pan) {
            let delta = input.pointer_delta;
            let scale = self.settings.pan_sensitivity * self.look_distance();
            let offset = (self.right() * -delta.x + self.camera_up() * delta.y) * scale;
            self.position += offset;
            self.target += offset;
            self.goal_position += offset;
            self.goal_target += offset;
        }

        // Dolly along the view; the target trails behind the position
        if input.scroll != 0.0 {
            let step = self.view_direction()
                * (input.scroll * self.settings.zoom_step * self.look_distance());
            self.goal_position += step;
            self.goal_target += step;
        }
        self.position = lerp_point(
            &self.position,
            &self.goal_position,
            smoothing_factor(dt, self.settings.smooth_factor),
        );
        self.target = lerp_point(
            &self.target,
            &self.goal_target,
            smoothing_factor(dt, self.settings.target_smooth_factor),
        );
    }

    fn approach_point_for(&self, focus: &FocusTarget) -> Point3<f32> {
        focus.position
            + self.approach_direction * (focus.radius * self.settings.approach_distance_factor)
    }

    /// Carries the camera along with the body's motion since last frame.
    fn ride_along(&mut self, focus: &FocusTarget) {
        let shift = focus.position - self.anchor;
        self.position += shift;
        self.target += shift;
        self.anchor = focus.position;
    }

    fn update_approach(&mut self, focus: &FocusTarget, dt: f32) {
        self.approach_point = self.approach_point_for(focus);

        let distance = (self.approach_point - self.position).norm();
        let rate = distance
            .max(DEGENERATE_LENGTH)
            .recip()
            .max(self.settings.min_approach_rate)
            * self.settings.approach_speed;
        let t = exponential_approach(rate, dt);

        self.position = lerp_point(&self.position, &self.approach_point, t);
        self.target = lerp_point(&self.target, &focus.position, t);
        self.goal_position = self.position;
        self.goal_target = self.target;

        if (self.position - self.approach_point).norm() < self.settings.lock_epsilon {
            self.lock_on(focus);
        }
        self.rederive_up();
    }

    fn lock_on(&mut self, focus: &FocusTarget) {
        let offset = self.position - focus.position;
        if let Some(direction) = offset.try_normalize(DEGENERATE_LENGTH) {
            self.approach_direction = direction;
        }
        self.orbit_distance = offset.norm();
        self.goal_distance = self.orbit_distance;
        self.baseline_distance = self.orbit_distance.max(DEGENERATE_LENGTH);
        self.locked_to_target = true;
        self.target = focus.position;
        self.goal_target = focus.position;
        self.yaw_rate = 0.0;
        self.pitch_rate = 0.0;
        debug!(distance = self.orbit_distance, "camera locked on");
    }

    fn update_locked(&mut self, input: &InputSnapshot, focus: &FocusTarget, dt: f32) {
        let up = Unit::new_normalize(self.world_up);

        // Swing round the body, creeping along on our own when left alone
        let mut yaw = self.yaw_rate;
        if !input.held.any() {
            let zoomed_out = (self.orbit_distance / self.baseline_distance).max(1.0);
            yaw += self.settings.creep_rate / zoomed_out * dt;
        }
        let mut direction = rotate_about(&self.approach_direction, &up, yaw);
        self.yaw += yaw;

        if let Some(right) = Unit::try_new(direction.cross(&up), DEGENERATE_LENGTH) {
            if self.pitch_allowed(&direction, self.pitch_rate) {
                direction = rotate_about(&direction, &right, self.pitch_rate);
                self.pitch += self.pitch_rate;
            }
        }
        self.approach_direction = direction.normalize();

        // Zoom by scaling the distance to the body
        if input.scroll != 0.0 {
            let closest = focus.radius * self.settings.min_zoom_factor;
            let factor = (1.0 + self.settings.zoom_step).powf(-input.scroll);
            self.goal_distance = (self.goal_distance * factor).max(closest);
        }
        self.orbit_distance += (self.goal_distance - self.orbit_distance)
            * smoothing_factor(dt, self.settings.smooth_factor);

        self.position = focus.position + self.approach_direction * self.orbit_distance;
        self.target = focus.position;
        self.approach_point = self.position;
        self.goal_position = self.position;
        self.goal_target = self.target;
        self.rederive_up();
    }

    /// Sets `up` to `right × view`, square to the view and with no roll
    /// against the reference axis. Kept as is when looking straight along it.
    fn rederive_up(&mut self) {
        let view = self.view_direction();
        if let Some(right) = view.cross(&self.world_up).try_normalize(DEGENERATE_LENGTH) {
            self.up = right.cross(&view);
        }
    }

    // -- Rendering and picking --

    pub fn eye(&self) -> Point3<f32> {
        self.position
    }

    pub fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// The clipping planes scale with the look distance, so both a planet
    /// up close and the whole system from afar stay in range.
    pub fn projection(&self) -> Perspective3<f32> {
        let distance = self.look_distance().max(DEGENERATE_LENGTH);
        Perspective3::new(
            self.aspect(),
            self.fovy,
            distance * self.settings.z_near_multiplier,
            distance * self.settings.z_far_multiplier,
        )
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    /// The ray from the eye through a pixel of the viewport.
    pub fn pointer_ray(&self, pointer: &Point2<f32>) -> Ray {
        let (width, height) = (self.width.max(1) as f32, self.height.max(1) as f32);
        let ndc_x = 2.0 * pointer.x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * pointer.y / height;

        let half_height = (self.fovy / 2.0).tan();
        let camera_space = Vector3::new(
            ndc_x * half_height * self.aspect(),
            ndc_y * half_height,
            -1.0,
        );
        let direction = self.view_transform().inverse_transform_vector(&camera_space);
        Ray::new(self.position, direction)
    }
}
