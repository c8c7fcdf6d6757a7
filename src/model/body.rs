use std::fmt;

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::astro::orbit::Orbit;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    Telluric,
    Gaseous,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Star => "star",
            BodyKind::Telluric => "telluric",
            BodyKind::Gaseous => "gaseous",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// All the immutable info about a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    pub kind: BodyKind,
    pub mass: f64,
    /// Display radius, in scene units.
    pub radius: f32,
    pub color: Point3<f32>,
    /// Seconds of simulation time per full turn about the body's own axis.
    /// Zero means the body doesn't spin.
    pub rotation_period: f64,
}

#[derive(Debug, Clone)]
pub struct AstralBody {
    id: BodyID,
    pub info: BodyInfo,
    pub orbit: Orbit,
    /// World position, recomputed from the orbit every frame.
    pub position: Point3<f64>,
    /// Euler angles in degrees.
    pub rotation: Vector3<f32>,
    /// Set while the overlay is describing this body.
    pub ui_active: bool,
}

impl AstralBody {
    pub fn new(id: BodyID, info: BodyInfo, orbit: Orbit) -> Self {
        let position = orbit.position_at_time(0.0);
        AstralBody {
            id,
            info,
            orbit,
            position,
            rotation: Vector3::zeros(),
            ui_active: false,
        }
    }

    /// Fixed at creation. The catalog keeps bodies sorted by it.
    pub fn id(&self) -> BodyID {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn radius(&self) -> f32 {
        self.info.radius
    }

    /// Scene-precision position, for the camera and the renderer.
    pub fn render_position(&self) -> Point3<f32> {
        nalgebra::convert(self.position)
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        let r = self.rotation.map(f32::to_radians);
        UnitQuaternion::from_euler_angles(r.x, r.y, r.z)
    }

    /// Model matrix: translate to the body's position, apply its spin, and
    /// scale the unit sphere up to the display radius.
    pub fn transform(&self) -> Matrix4<f32> {
        let isometry = Isometry3::from_parts(
            Translation3::from(self.render_position().coords),
            self.orientation(),
        );
        isometry.to_homogeneous() * Matrix4::new_scaling(self.info.radius)
    }
}
