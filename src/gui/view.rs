use std::collections::HashMap;

use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3};
use tracing::debug;

use crate::model::clock::format_seconds;
use crate::model::{AstralBody, BodyID, SimClock, SystemCatalog};
use crate::simulation::{DisplayMode, SimulationContext};

const TEXT_SIZE: f32 = 60.0;

/// Scene objects for the catalog. The view holds no simulation state of its
/// own, it just mirrors whatever the context says each frame.
pub struct View {
    body_spheres: HashMap<BodyID, SceneNode>,
}

impl View {
    pub fn new(catalog: &SystemCatalog, window: &mut Window) -> Self {
        let mut view = View {
            body_spheres: HashMap::new(),
        };
        view.sync_spheres(catalog, window);
        view
    }

    fn create_body_object(window: &mut Window, body: &AstralBody) -> SceneNode {
        let mut sphere = window.add_sphere(body.info.radius);
        let color = &body.info.color;
        sphere.set_color(color.x, color.y, color.z);
        sphere
    }

    /// Adds spheres for new bodies and drops the ones whose body is gone.
    fn sync_spheres(&mut self, catalog: &SystemCatalog, window: &mut Window) {
        self.body_spheres.retain(|id, sphere| {
            let keep = catalog.get(*id).is_some();
            if !keep {
                window.remove_node(sphere);
                debug!(id = id.0, "removed sphere");
            }
            keep
        });

        for body in catalog.iter() {
            if !self.body_spheres.contains_key(&body.id()) {
                let sphere = Self::create_body_object(window, body);
                self.body_spheres.insert(body.id(), sphere);
            }
        }
    }

    pub fn prerender_scene(&mut self, window: &mut Window, context: &SimulationContext, fps: f64) {
        let catalog = context.catalog();
        self.sync_spheres(catalog, window);

        for body in catalog.iter() {
            if let Some(sphere) = self.body_spheres.get_mut(&body.id()) {
                sphere.set_local_translation(Translation3::from(body.render_position().coords));
                sphere.set_local_rotation(body.orientation());
            }
        }

        if context.display_mode() == DisplayMode::Minimal {
            return;
        }

        self.draw_orbits(window, context);
        self.draw_text(window, context, fps);
    }

    fn draw_orbits(&self, window: &mut Window, context: &SimulationContext) {
        let brightness = context.config().orbits.path_brightness;
        for body in context.catalog().iter() {
            let points = match context.orbit_paths().get(body.id()) {
                Some(points) if points.len() > 1 => points,
                _ => continue,
            };

            let color = path_color(&body.info.color, brightness, body.ui_active);
            for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
                window.draw_line(a, b, &color);
            }
        }
    }

    fn draw_text(&self, window: &mut Window, context: &SimulationContext, fps: f64) {
        let font = Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);

        let mut left = match context.focused_body() {
            Some(body) => body_summary_text(body),
            None => String::from("Free camera"),
        };
        if let Some(body) = context.hovered().and_then(|id| context.catalog().get(id)) {
            left.push('\n');
            left.push_str(&hover_text(body));
        }
        window.draw_text(&left, &Point2::origin(), TEXT_SIZE, &font, &text_color);

        window.draw_text(
            &time_summary_text(context.clock(), fps),
            // text coordinates are in framebuffer pixels, which are doubled on hidpi
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            TEXT_SIZE,
            &font,
            &text_color,
        );
    }
}

/// Orbit line color: the body's color dimmed by `brightness`, or at full
/// strength when the body is the one being described.
pub fn path_color(color: &Point3<f32>, brightness: f32, active: bool) -> Point3<f32> {
    if active {
        *color
    } else {
        Point3::from(color.coords * brightness.clamp(0.0, 1.0))
    }
}

pub fn body_summary_text(body: &AstralBody) -> String {
    let orbit = &body.orbit;
    // Indentation is intentional
    format!(
        "Focused on: {} ({})
    Mass: {:.3e} kg
    Distance: {:.1}
Orbit:
    SMA: {:.1}
    Eccentricity: {:.3}
    Inclination: {:.2}
    LAN: {:.1}
    Arg PE: {:.1}
    Period: {}",
        body.name(),
        body.info.kind,
        body.info.mass,
        body.position.coords.norm(),
        orbit.semimajor_axis(),
        orbit.eccentricity(),
        orbit.inclination_degrees(),
        orbit.long_asc_node_degrees(),
        orbit.arg_periapse_degrees(),
        format_seconds(orbit.period()),
    )
}

pub fn hover_text(body: &AstralBody) -> String {
    format!("Pointing at: {}", body.name())
}

pub fn time_summary_text(clock: &SimClock, fps: f64) -> String {
    format!(
        "Time: {}
Time scale: {} s/s{}
FPS: {:.0}",
        format_seconds(clock.elapsed()),
        clock.time_scale(),
        if clock.is_paused() { " (paused)" } else { "" },
        fps,
    )
}
