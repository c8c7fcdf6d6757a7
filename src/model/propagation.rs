use nalgebra::Point3;

use super::body::AstralBody;
use super::catalog::SystemCatalog;

/// Moves a body to where its orbit puts it after `time` simulation seconds,
/// and spins it accordingly. Both are functions of the total elapsed time
/// only, so calling this twice with the same time is a no-op.
pub fn compute_position(body: &mut AstralBody, time: f64) -> Point3<f64> {
    body.position = body.orbit.position_at_time(time);
    body.rotation.y = spin_angle(body.info.rotation_period, time);
    body.position
}

/// Spin about the body's own y axis, in degrees within `[0, 360)`.
pub fn spin_angle(rotation_period: f64, time: f64) -> f32 {
    if rotation_period <= 0.0 {
        return 0.0;
    }
    let turns = (time / rotation_period).rem_euclid(1.0);
    (turns * 360.0) as f32
}

/// Bodies don't influence each other, so each is propagated on its own.
pub fn propagate_all(catalog: &mut SystemCatalog, time: f64) {
    for body in catalog.iter_mut() {
        compute_position(body, time);
    }
}
