use nalgebra::{Point3, Rotation3, Unit, Vector3};

use std::f64::consts::PI;

pub fn directed_angle(u: &Vector3<f64>, v: &Vector3<f64>, up: &Vector3<f64>) -> f64 {
    // Returns the angle between u and v, measured as a positive angle around 'up'.
    let theta = u.angle(v);
    if u.cross(v).dot(up) >= 0.0 {
        theta
    } else {
        2.0 * PI - theta
    }
}

/// A half-line in scene space. The direction is always unit length, so the
/// ray parameter `t` measures distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Ray {
            origin,
            direction: Unit::new_normalize(direction),
        }
    }

    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }
}

/// Intersects a ray with a sphere, returning the distance along the ray to
/// the first surface point in front of the origin.
///
/// Solves `|O + tD - C|^2 = r^2`. A ray starting inside the sphere always
/// hits, with `t = 0`. A ray starting outside hits only when the sphere is in
/// front of it and the closest approach is within the radius.
pub fn intersect_sphere(ray: &Ray, center: &Point3<f32>, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(&ray.direction.into_inner());
    let c = oc.norm_squared() - radius * radius;

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let origin_outside = c > 0.0;
    if origin_outside && b > 0.0 {
        // Sphere is behind us
        return None;
    }

    let t = -b - discriminant.sqrt();
    Some(t.max(0.0))
}

pub fn lerp_point(from: &Point3<f32>, to: &Point3<f32>, t: f32) -> Point3<f32> {
    from + (to - from) * t
}

/// Blend factor for frame-rate independent exponential approach: after `dt`
/// seconds at `rate`, this fraction of the remaining gap has been closed.
pub fn exponential_approach(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Blend factor for the cheaper "lerp by dt times a speed" smoothing, capped
/// so a long frame never overshoots the goal.
pub fn smoothing_factor(dt: f32, speed: f32) -> f32 {
    nalgebra::clamp(dt * speed, 0.0, 1.0)
}

pub fn rotate_about(v: &Vector3<f32>, axis: &Unit<Vector3<f32>>, angle: f32) -> Vector3<f32> {
    Rotation3::from_axis_angle(axis, angle) * v
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn test_directed_angle() {
        let x = Vector3::x();
        let y = Vector3::y();
        let z = Vector3::z();

        assert_relative_eq!(directed_angle(&x, &y, &z), PI / 2.0);
        assert_relative_eq!(directed_angle(&y, &x, &z), 3.0 * PI / 2.0);
        assert_relative_eq!(directed_angle(&x, &-x, &z), PI);
    }

    #[test]
    fn test_ray_through_center_hits() {
        let center = Point3::origin();
        let ray = Ray::new(Point3::new(0.0, 0.0, 100.0), -Vector3::z());
        let t = intersect_sphere(&ray, &center, 5.0).expect("ray should hit");
        assert_relative_eq!(t, 95.0);
        assert_relative_eq!(ray.point_at(t), Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_ray_outside_radius_misses() {
        let center = Point3::origin();
        let ray = Ray::new(Point3::new(10.0, 0.0, 100.0), -Vector3::z());
        assert_eq!(intersect_sphere(&ray, &center, 5.0), None);

        // Grazing just outside
        let ray = Ray::new(Point3::new(5.01, 0.0, 100.0), -Vector3::z());
        assert_eq!(intersect_sphere(&ray, &center, 5.0), None);
    }

    #[test]
    fn test_sphere_behind_origin_misses() {
        let center = Point3::origin();
        let ray = Ray::new(Point3::new(0.0, 0.0, 100.0), Vector3::z());
        assert_eq!(intersect_sphere(&ray, &center, 5.0), None);
    }

    #[test]
    fn test_origin_inside_sphere_hits() {
        let center = Point3::origin();
        for direction in [Vector3::x(), -Vector3::y(), Vector3::new(1.0, 1.0, 1.0)] {
            let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), direction);
            assert_eq!(intersect_sphere(&ray, &center, 5.0), Some(0.0));
        }
    }

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(ray.direction.norm(), 1.0);
        assert_relative_eq!(ray.point_at(5.0), Point3::new(0.0, 3.0, 4.0));
    }

    #[test]
    fn test_blend_factors() {
        assert_eq!(smoothing_factor(0.5, 10.0), 1.0);
        assert_relative_eq!(smoothing_factor(0.01, 10.0), 0.1);
        assert_eq!(exponential_approach(3.0, 0.0), 0.0);
        assert_abs_diff_eq!(exponential_approach(1.0, 1.0), 1.0 - (-1.0f32).exp());
        assert!(exponential_approach(1000.0, 1.0) <= 1.0);
    }

    #[test]
    fn test_lerp_and_rotate() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 4.0, -6.0);
        assert_relative_eq!(lerp_point(&a, &b, 0.5), Point3::new(1.0, 2.0, -3.0));

        let rotated = rotate_about(&Vector3::x(), &Vector3::y_axis(), std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(rotated, -Vector3::z(), epsilon = 1e-6);
    }
}
