use nalgebra::Matrix4;
use tracing::info;

use crate::camera::input::{InputAction, InputSnapshot, PointerButton};
use crate::camera::{CameraRig, FocusTarget};
use crate::config::Config;
use crate::model::propagation::propagate_all;
use crate::model::selection::resolve_hit;
use crate::model::{AstralBody, BodyID, OrbitPathCache, SimClock, SystemCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Bodies, orbit paths and the text overlay.
    Detailed,
    /// Bodies only.
    Minimal,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Detailed => DisplayMode::Minimal,
            DisplayMode::Minimal => DisplayMode::Detailed,
        }
    }
}

/// Owns everything that changes from frame to frame, and runs a frame in a
/// fixed order: clock, bodies, camera, picking, overlay.
pub struct SimulationContext {
    catalog: SystemCatalog,
    camera: CameraRig,
    clock: SimClock,
    paths: OrbitPathCache,
    display_mode: DisplayMode,
    config: Config,
    hovered: Option<BodyID>,
}

impl SimulationContext {
    pub fn new(catalog: SystemCatalog, config: Config) -> Self {
        let mut context = SimulationContext {
            camera: CameraRig::from_config(&config.camera),
            clock: SimClock::new(config.clock.time_scale, config.clock.start_paused),
            paths: OrbitPathCache::new(config.orbits.segments),
            display_mode: DisplayMode::Detailed,
            hovered: None,
            catalog,
            config,
        };
        context.refresh_bodies();
        context
    }

    // -- Accessors --

    pub fn catalog(&self) -> &SystemCatalog {
        &self.catalog
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn hovered(&self) -> Option<BodyID> {
        self.hovered
    }

    pub fn orbit_paths(&self) -> &OrbitPathCache {
        &self.paths
    }

    /// The body the camera is following, if it still exists.
    pub fn focused_body(&self) -> Option<&AstralBody> {
        self.camera.target_body().and_then(|id| self.catalog.get(id))
    }

    /// Model matrices for every body, in catalog order.
    pub fn body_transforms(&self) -> impl Iterator<Item = (BodyID, Matrix4<f32>)> + '_ {
        self.catalog.iter().map(|body| (body.id(), body.transform()))
    }

    // -- Frame --

    pub fn step(&mut self, input: &InputSnapshot, dt: f64) {
        // Clock
        for action in &input.actions {
            match action {
                InputAction::TogglePause => self.clock.toggle_pause(),
                InputAction::SpeedUp => self.clock.speed_up(),
                InputAction::SlowDown => self.clock.slow_down(),
                _ => {}
            }
        }
        self.clock.advance(dt);

        // Bodies
        self.refresh_bodies();

        // Camera, with the focused body's fresh position
        for action in &input.actions {
            match action {
                InputAction::NextTarget => {
                    self.focus_next();
                }
                InputAction::PreviousTarget => {
                    self.focus_previous();
                }
                InputAction::CancelFocus => self.cancel_focus(),
                _ => {}
            }
        }
        let focus = self.focus_target();
        self.camera.update(input, focus, dt as f32);

        // Picking
        let ray = self.camera.pointer_ray(&input.pointer);
        let hit = resolve_hit(&ray, &self.catalog);
        self.hovered = hit.and_then(|idx| self.catalog.get_by_index(idx as isize).map(|b| b.id()));
        if input.was_pressed(PointerButton::Select) {
            if let Some(idx) = hit {
                self.focus_index(idx as isize);
            }
        }

        // Overlay
        if input.has_action(InputAction::ToggleDisplayMode) {
            self.display_mode = self.display_mode.toggled();
            info!(mode = ?self.display_mode, "display mode changed");
        }
        self.update_overlay_flags();
    }

    fn refresh_bodies(&mut self) {
        propagate_all(&mut self.catalog, self.clock.elapsed());
        self.paths.refresh(&self.catalog);
    }

    fn focus_target(&self) -> Option<FocusTarget> {
        self.focused_body().map(|body| FocusTarget {
            position: body.render_position(),
            radius: body.radius(),
        })
    }

    fn update_overlay_flags(&mut self) {
        let active = match self.display_mode {
            DisplayMode::Detailed => self.camera.target_body(),
            DisplayMode::Minimal => None,
        };
        for body in self.catalog.iter_mut() {
            body.ui_active = Some(body.id()) == active;
        }
    }

    // -- Navigation --

    fn focused_index(&self) -> Option<usize> {
        self.camera
            .target_body()
            .and_then(|id| self.catalog.index_of(id))
    }

    /// Focuses the body at `index`, wrapping around the catalog.
    pub fn focus_index(&mut self, index: isize) -> Option<BodyID> {
        let body = self.catalog.get_by_index(index)?;
        let idx = self.catalog.index_of(body.id())?;
        let focus = FocusTarget {
            position: body.render_position(),
            radius: body.radius(),
        };
        let id = body.id();
        self.camera.focus_on(id, idx, focus);
        Some(id)
    }

    pub fn focus_next(&mut self) -> Option<BodyID> {
        let next = self.focused_index().map_or(0, |i| i as isize + 1);
        self.focus_index(next)
    }

    pub fn focus_previous(&mut self) -> Option<BodyID> {
        let previous = self.focused_index().map_or(-1, |i| i as isize - 1);
        self.focus_index(previous)
    }

    pub fn cancel_focus(&mut self) {
        self.camera.cancel_focus();
    }

    // -- Catalog changes --

    /// Swaps in a new system. Body IDs don't carry over between catalogs, so
    /// the camera lets go of whatever it was following.
    pub fn replace_catalog(&mut self, catalog: SystemCatalog) {
        info!(name = catalog.name(), bodies = catalog.len(), "replacing catalog");
        self.catalog = catalog;
        self.camera.release_target();
        self.hovered = None;
        self.paths.clear();
        self.refresh_bodies();
    }

    /// Removes a body. If the camera was following it, it notices on the
    /// next step.
    pub fn remove_body(&mut self, id: BodyID) -> Option<AstralBody> {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        let removed = self.catalog.remove(id)?;
        self.paths.refresh(&self.catalog);
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point2, Point3};

    use super::*;
    use crate::astro::orbit::Orbit;
    use crate::camera::CameraState;
    use crate::model::{BodyInfo, BodyKind};

    const DT: f64 = 1.0 / 60.0;

    fn info(name: &str, radius: f32) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            kind: BodyKind::Telluric,
            mass: 1.0,
            radius,
            color: Point3::new(1.0, 1.0, 1.0),
            rotation_period: 0.0,
        }
    }

    fn make_context() -> SimulationContext {
        let mut catalog = SystemCatalog::new("Test");
        catalog.add_body(info("Sun", 5.0), Orbit::stationary());
        catalog.add_body(
            info("Inner", 1.0),
            Orbit::from_degrees(30.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0),
        );
        catalog.add_body(
            info("Outer", 2.0),
            Orbit::from_degrees(60.0, 0.1, 0.0, 0.0, 0.0, 90.0, 400.0),
        );

        let mut config = Config::default();
        config.clock.time_scale = 1.0;
        SimulationContext::new(catalog, config)
    }

    fn center_pointer(context: &SimulationContext) -> Point2<f32> {
        let (w, h) = context.camera().viewport();
        Point2::new(w as f32 / 2.0, h as f32 / 2.0)
    }

    #[test]
    fn test_bodies_move_with_the_clock() {
        let mut context = make_context();
        let inner = context.catalog().get_by_name("Inner").unwrap().id();
        let start = context.catalog().get(inner).unwrap().position;

        for _ in 0..60 {
            context.step(&InputSnapshot::default(), DT);
        }
        let body = context.catalog().get(inner).unwrap();
        assert!((body.position - start).norm() > 0.1);
        assert_eq!(body.position, body.orbit.position_at_time(context.clock().elapsed()));
        assert_eq!(context.orbit_paths().len(), 3);
    }

    #[test]
    fn test_pause_freezes_bodies() {
        let mut context = make_context();
        let pause = InputSnapshot::default().with_action(InputAction::TogglePause);
        context.step(&pause, DT);
        let frozen: Vec<_> = context.catalog().iter().map(|b| b.position).collect();

        for _ in 0..10 {
            context.step(&InputSnapshot::default(), DT);
        }
        let now: Vec<_> = context.catalog().iter().map(|b| b.position).collect();
        assert_eq!(frozen, now);

        let faster = InputSnapshot::default().with_action(InputAction::SpeedUp);
        context.step(&faster, DT);
        assert_eq!(context.clock().time_scale(), 2.0);
    }

    #[test]
    fn test_navigation_wraps_around() {
        let mut context = make_context();
        let ids: Vec<_> = context.catalog().ids().collect();

        // From free, previous goes to the last body and next to the first
        assert_eq!(context.focus_previous(), Some(ids[2]));
        assert_eq!(context.focus_next(), Some(ids[0]));
        assert_eq!(context.focus_next(), Some(ids[1]));
        assert_eq!(context.focus_next(), Some(ids[2]));
        assert_eq!(context.focus_next(), Some(ids[0]));
        assert_eq!(context.focus_previous(), Some(ids[2]));
        assert_eq!(context.camera().target_index(), 2);

        let next = InputSnapshot::default().with_action(InputAction::NextTarget);
        context.step(&next, DT);
        assert_eq!(context.camera().target_body(), Some(ids[0]));
        assert_eq!(context.focused_body().map(|b| b.name()), Some("Sun"));
    }

    #[test]
    fn test_click_focuses_hovered_body() {
        let mut context = make_context();
        let sun = context.catalog().get_by_name("Sun").unwrap().id();

        // The home pose looks straight at the sun
        let pointer = center_pointer(&context);
        context.step(&InputSnapshot::idle(pointer), DT);
        assert_eq!(context.hovered(), Some(sun));
        assert_eq!(context.camera().state(), CameraState::Free);

        let click = InputSnapshot::idle(pointer).with_click(PointerButton::Select);
        context.step(&click, DT);
        assert_eq!(context.camera().state(), CameraState::Focused);
        assert_eq!(context.camera().target_body(), Some(sun));

        // Clicking empty space changes nothing
        let corner = InputSnapshot::idle(Point2::new(1.0, 1.0)).with_click(PointerButton::Select);
        context.step(&corner, DT);
        assert_eq!(context.camera().target_body(), Some(sun));
    }

    #[test]
    fn test_overlay_follows_focus_and_display_mode() {
        let mut context = make_context();
        let outer = context.focus_index(2).unwrap();
        context.step(&InputSnapshot::default(), DT);

        let active: Vec<_> = context
            .catalog()
            .iter()
            .filter(|b| b.ui_active)
            .map(|b| b.id())
            .collect();
        assert_eq!(active, vec![outer]);

        let toggle = InputSnapshot::default().with_action(InputAction::ToggleDisplayMode);
        context.step(&toggle, DT);
        assert_eq!(context.display_mode(), DisplayMode::Minimal);
        assert!(context.catalog().iter().all(|b| !b.ui_active));

        context.step(&toggle, DT);
        assert_eq!(context.display_mode(), DisplayMode::Detailed);
    }

    #[test]
    fn test_cancel_action_returns_home() {
        let mut context = make_context();
        context.focus_index(1);
        for _ in 0..20 {
            context.step(&InputSnapshot::default(), DT);
        }
        let cancel = InputSnapshot::default().with_action(InputAction::CancelFocus);
        context.step(&cancel, DT);
        assert_eq!(context.camera().state(), CameraState::Free);
        assert_eq!(context.camera().pose(), context.camera().home());
    }

    #[test]
    fn test_removing_focused_body_frees_camera() {
        let mut context = make_context();
        let inner = context.focus_index(1).unwrap();
        for _ in 0..5 {
            context.step(&InputSnapshot::default(), DT);
        }

        let removed = context.remove_body(inner).expect("body was present");
        assert_eq!(removed.name(), "Inner");
        let position = context.camera().position();

        context.step(&InputSnapshot::default(), DT);
        assert_eq!(context.camera().state(), CameraState::Free);
        assert_eq!(context.camera().target_body(), None);
        assert_eq!(context.camera().position(), position);
        assert!(context.orbit_paths().get(inner).is_none());
    }

    #[test]
    fn test_replace_catalog_releases_camera() {
        let mut context = make_context();
        context.focus_index(0);

        let mut other = SystemCatalog::new("Other");
        let orbit = Orbit::from_degrees(10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0);
        other.add_body(info("Lonely", 3.0), orbit);
        context.replace_catalog(other);

        assert_eq!(context.camera().target_body(), None);
        assert_eq!(context.catalog().name(), "Other");
        assert_eq!(context.orbit_paths().len(), 1);
        assert!(context.focused_body().is_none());
        assert_eq!(context.body_transforms().count(), 1);
    }
}
