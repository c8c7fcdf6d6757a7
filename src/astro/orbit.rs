use std::f64::consts::{PI, TAU};

use nalgebra::{Point3, Rotation3, Unit, Vector3};

use crate::math::anomaly::{eccentric_to_true, mean_to_eccentric};
use crate::math::geometry::directed_angle;
use crate::math::sampling::uniform_steps;

/// Default number of points used to trace an orbit.
pub const DEFAULT_PATH_SEGMENTS: usize = 360;

/// An elliptic Keplerian orbit around a fixed focus at the origin.
///
/// Angles are stored in radians; use [`Orbit::from_degrees`] and the
/// `*_degrees` accessors at the boundary. Bodies do not perturb each other,
/// so the orbit fully determines a body's position at any time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    semimajor_axis: f64,
    eccentricity: f64,
    inclination: f64,
    long_asc_node: f64,
    arg_periapse: f64,
    mean_anomaly_at_epoch: f64,
    period: f64,
    /// Encodes the orientation of the orbit: it moves the xy plane to the
    /// orbital plane, and x to point towards periapsis.
    rotation: Rotation3<f64>,
}

impl Orbit {
    /// Builds an orbit from elements in radians. `ecc` must lie in `[0, 1)`
    /// and `period` must be positive; neither is checked here.
    pub fn from_kepler(
        a: f64,
        ecc: f64,
        incl: f64,
        lan: f64,
        argp: f64,
        mean_anomaly_at_epoch: f64,
        period: f64,
    ) -> Self {
        Orbit {
            semimajor_axis: a,
            eccentricity: ecc,
            inclination: incl,
            long_asc_node: lan,
            arg_periapse: argp,
            mean_anomaly_at_epoch,
            period,
            rotation: rotation_from_angles(incl, lan, argp),
        }
    }

    pub fn from_degrees(
        a: f64,
        ecc: f64,
        incl: f64,
        lan: f64,
        argp: f64,
        mean_anomaly_at_epoch: f64,
        period: f64,
    ) -> Self {
        Self::from_kepler(
            a,
            ecc,
            incl.to_radians(),
            lan.to_radians(),
            argp.to_radians(),
            mean_anomaly_at_epoch.to_radians(),
            period,
        )
    }

    /// A body that sits at the focus forever, like a system's star.
    pub fn stationary() -> Self {
        Self::from_kepler(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }

    // -- Orbital elements --

    pub fn semimajor_axis(&self) -> f64 {
        self.semimajor_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn long_asc_node(&self) -> f64 {
        self.long_asc_node
    }

    pub fn arg_periapse(&self) -> f64 {
        self.arg_periapse
    }

    pub fn mean_anomaly_at_epoch(&self) -> f64 {
        self.mean_anomaly_at_epoch
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn inclination_degrees(&self) -> f64 {
        self.inclination.to_degrees()
    }

    pub fn long_asc_node_degrees(&self) -> f64 {
        self.long_asc_node.to_degrees()
    }

    pub fn arg_periapse_degrees(&self) -> f64 {
        self.arg_periapse.to_degrees()
    }

    pub fn mean_anomaly_at_epoch_degrees(&self) -> f64 {
        self.mean_anomaly_at_epoch.to_degrees()
    }

    // -- Axes and vectors --

    pub fn rotation(&self) -> Rotation3<f64> {
        self.rotation
    }

    pub fn periapse_vector(&self) -> Unit<Vector3<f64>> {
        self.rotation() * Vector3::x_axis()
    }

    pub fn normal_vector(&self) -> Unit<Vector3<f64>> {
        self.rotation() * Vector3::z_axis()
    }

    pub fn asc_node_vector(&self) -> Unit<Vector3<f64>> {
        let v = Vector3::z().cross(&self.normal_vector());
        Unit::try_new(v, 1e-20).unwrap_or_else(|| self.periapse_vector())
    }

    /// Inclination as read back from the orientation, in `[0, pi]`.
    pub fn measured_inclination(&self) -> f64 {
        self.normal_vector().angle(&Vector3::z())
    }

    /// Longitude of the ascending node as read back from the orientation,
    /// in `[0, 2pi)`.
    pub fn measured_long_asc_node(&self) -> f64 {
        directed_angle(&Vector3::x(), &self.asc_node_vector(), &Vector3::z())
    }

    /// Argument of periapsis as read back from the orientation, in
    /// `[0, 2pi)`.
    pub fn measured_arg_periapse(&self) -> f64 {
        directed_angle(
            &self.asc_node_vector(),
            &self.periapse_vector(),
            &self.normal_vector(),
        )
    }

    // -- Other geometric characteristics --

    pub fn semiminor_axis(&self) -> f64 {
        self.semimajor_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    pub fn periapsis(&self) -> f64 {
        self.semimajor_axis * (1.0 - self.eccentricity)
    }

    pub fn apoapsis(&self) -> f64 {
        self.semimajor_axis * (1.0 + self.eccentricity)
    }

    /// Perimeter of the ellipse, by Ramanujan's second approximation.
    pub fn circumference(&self) -> f64 {
        let a = self.semimajor_axis;
        let b = self.semiminor_axis();
        if a + b == 0.0 {
            return 0.0;
        }
        let h = ((a - b) / (a + b)).powi(2);
        PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
    }

    // -- Motion --

    /// Mean motion, in radians per simulation second.
    pub fn mean_motion(&self) -> f64 {
        TAU / self.period
    }

    /// Mean anomaly after `time` simulation seconds, in `[0, 2pi)`. Always
    /// computed from the total elapsed time, never stepped frame by frame.
    pub fn mean_anomaly_at(&self, time: f64) -> f64 {
        (self.mean_anomaly_at_epoch + self.mean_motion() * time).rem_euclid(TAU)
    }

    pub fn radius_at_eccentric(&self, eccentric_anomaly: f64) -> f64 {
        self.semimajor_axis * (1.0 - self.eccentricity * eccentric_anomaly.cos())
    }

    /// Position in the orbit's native frame: periapsis along x, normal along z.
    pub fn native_position_at_mean(&self, mean_anomaly: f64) -> Point3<f64> {
        let e = self.eccentricity;
        let ecc_anomaly = mean_to_eccentric(mean_anomaly, e);
        let true_anomaly = eccentric_to_true(ecc_anomaly, e);
        let r = self.radius_at_eccentric(ecc_anomaly);

        Point3::new(r * true_anomaly.cos(), r * true_anomaly.sin(), 0.0)
    }

    /// World-space position at the given mean anomaly.
    pub fn position_at_mean(&self, mean_anomaly: f64) -> Point3<f64> {
        ecliptic_to_world() * (self.rotation * self.native_position_at_mean(mean_anomaly))
    }

    /// World-space position after `time` simulation seconds.
    pub fn position_at_time(&self, time: f64) -> Point3<f64> {
        self.position_at_mean(self.mean_anomaly_at(time))
    }

    /// Traces the orbit as `segments` world-space points, evenly spaced in
    /// mean anomaly over one revolution starting at periapsis. The last point
    /// is not repeated; callers close the loop themselves.
    ///
    /// The shape does not depend on where the body currently is, so the
    /// result can be cached until the elements change.
    pub fn sample_path(&self, segments: usize) -> impl Iterator<Item = Point3<f64>> + Clone + '_ {
        uniform_steps(0.0, TAU, segments).map(move |m| self.position_at_mean(m))
    }
}

fn rotation_from_angles(incl: f64, lan: f64, argp: f64) -> Rotation3<f64> {
    // We have an orbit in the xy plane where the periapsis is pointed along the
    // x-axis. So first, we rotate it around z until the periapsis is at argp
    // away from the x-axis (which will now be the ascending node). We then
    // rotate around x to get the inclination, and then one final turn around z
    // to get the correct longitude of the AN.
    Rotation3::from_axis_angle(&Vector3::z_axis(), lan)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), incl)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), argp)
}

/// The ecliptic frame has its normal along z; the world is y-up. This maps
/// ecliptic (x, y, z) to world (x, z, -y).
pub fn ecliptic_to_world() -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), -PI / 2.0)
}
