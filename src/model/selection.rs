use crate::math::geometry::{intersect_sphere, Ray};

use super::catalog::SystemCatalog;

/// Finds the body under a picking ray, as an index into the catalog.
///
/// Bodies are tested in catalog order and the first one hit wins, even if a
/// later body is closer to the camera. With bodies far apart relative to
/// their sizes this rarely matters.
pub fn resolve_hit(ray: &Ray, catalog: &SystemCatalog) -> Option<usize> {
    catalog
        .iter()
        .position(|body| intersect_sphere(ray, &body.render_position(), body.radius()).is_some())
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Vector3};

    use super::*;
    use crate::astro::orbit::Orbit;
    use crate::model::body::{BodyInfo, BodyKind};

    fn sphere_catalog(spheres: &[(Point3<f64>, f32)]) -> SystemCatalog {
        let mut catalog = SystemCatalog::new("Spheres");
        for (i, (center, radius)) in spheres.iter().enumerate() {
            let info = BodyInfo {
                name: format!("Body {}", i),
                kind: BodyKind::Telluric,
                mass: 1.0,
                radius: *radius,
                color: Point3::new(1.0, 1.0, 1.0),
                rotation_period: 0.0,
            };
            let id = catalog.add_body(info, Orbit::stationary());
            catalog.get_mut(id).unwrap().position = *center;
        }
        catalog
    }

    #[test]
    fn test_hit_and_miss() {
        let catalog = sphere_catalog(&[(Point3::origin(), 5.0)]);

        let ray = Ray::new(Point3::new(0.0, 0.0, 100.0), -Vector3::z());
        assert_eq!(resolve_hit(&ray, &catalog), Some(0));

        let ray = Ray::new(Point3::new(10.0, 0.0, 100.0), -Vector3::z());
        assert_eq!(resolve_hit(&ray, &catalog), None);
    }

    #[test]
    fn test_first_hit_wins_over_nearest() {
        // The far sphere comes first in the catalog, so it is selected even
        // though the ray reaches the near one earlier.
        let catalog = sphere_catalog(&[
            (Point3::new(0.0, 0.0, -50.0), 5.0),
            (Point3::new(0.0, 0.0, 50.0), 5.0),
        ]);
        let ray = Ray::new(Point3::new(0.0, 0.0, 100.0), -Vector3::z());
        assert_eq!(resolve_hit(&ray, &catalog), Some(0));

        // Skips bodies that are missed
        let catalog = sphere_catalog(&[
            (Point3::new(30.0, 0.0, 0.0), 5.0),
            (Point3::new(0.0, 0.0, 0.0), 5.0),
        ]);
        assert_eq!(resolve_hit(&ray, &catalog), Some(1));
    }

    #[test]
    fn test_bodies_behind_camera_are_ignored() {
        let catalog = sphere_catalog(&[(Point3::new(0.0, 0.0, 200.0), 5.0)]);
        let ray = Ray::new(Point3::new(0.0, 0.0, 100.0), -Vector3::z());
        assert_eq!(resolve_hit(&ray, &catalog), None);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = SystemCatalog::new("Empty");
        let ray = Ray::new(Point3::origin(), Vector3::x());
        assert_eq!(resolve_hit(&ray, &catalog), None);
    }
}
