use std::collections::HashMap;

use nalgebra::Point3;
use tracing::debug;

use crate::astro::orbit::Orbit;

use super::body::BodyID;
use super::catalog::SystemCatalog;

#[derive(Debug, Clone)]
struct CachedPath {
    orbit: Orbit,
    points: Vec<Point3<f32>>,
}

/// Traced orbit polylines, one per body. An orbit's shape doesn't change as
/// the body moves along it, so paths are only retraced when the elements do.
#[derive(Debug, Clone)]
pub struct OrbitPathCache {
    segments: usize,
    paths: HashMap<BodyID, CachedPath>,
}

impl OrbitPathCache {
    pub fn new(segments: usize) -> Self {
        OrbitPathCache {
            segments,
            paths: HashMap::new(),
        }
    }

    /// Brings the cache in line with the catalog: retraces paths whose orbit
    /// changed, traces new bodies, and forgets removed ones. Returns how many
    /// paths were traced.
    pub fn refresh(&mut self, catalog: &SystemCatalog) -> usize {
        self.paths.retain(|id, _| catalog.get(*id).is_some());

        let mut traced = 0;
        for body in catalog.iter() {
            let stale = match self.paths.get(&body.id()) {
                Some(cached) => cached.orbit != body.orbit,
                None => true,
            };
            if stale {
                let points = body
                    .orbit
                    .sample_path(self.segments)
                    .map(nalgebra::convert)
                    .collect();
                self.paths.insert(
                    body.id(),
                    CachedPath {
                        orbit: body.orbit,
                        points,
                    },
                );
                traced += 1;
            }
        }

        if traced > 0 {
            debug!(traced, "retraced orbit paths");
        }
        traced
    }

    pub fn get(&self, id: BodyID) -> Option<&[Point3<f32>]> {
        self.paths.get(&id).map(|p| p.points.as_slice())
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
