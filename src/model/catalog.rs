use tracing::debug;

use crate::astro::orbit::Orbit;

use super::body::{AstralBody, BodyID, BodyInfo};

/// An ordered collection of bodies. Insertion order is both iteration order
/// and index order, which is what next/previous navigation and picking walk.
#[derive(Debug, Clone)]
pub struct SystemCatalog {
    name: String,
    bodies: Vec<AstralBody>,
    next_body_id: usize,
}

impl SystemCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        SystemCatalog {
            name: name.into(),
            bodies: Vec::new(),
            next_body_id: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_body(&mut self, info: BodyInfo, orbit: Orbit) -> BodyID {
        let id = BodyID(self.next_body_id);
        self.next_body_id += 1;

        debug!(id = id.0, name = %info.name, "adding body");
        self.bodies.push(AstralBody::new(id, info, orbit));
        id
    }

    /// Removes a body. Its ID is never handed out again by this catalog, so
    /// stale handles keep resolving to `None`.
    pub fn remove(&mut self, id: BodyID) -> Option<AstralBody> {
        let idx = self.index_of(id)?;
        Some(self.bodies.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AstralBody> + '_ {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AstralBody> + '_ {
        self.bodies.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyID> + '_ {
        self.bodies.iter().map(|b| b.id())
    }

    pub fn index_of(&self, id: BodyID) -> Option<usize> {
        // IDs are assigned in increasing order and removal preserves order,
        // so the list stays sorted by ID.
        self.bodies.binary_search_by_key(&id, |b| b.id()).ok()
    }

    pub fn get(&self, id: BodyID) -> Option<&AstralBody> {
        self.index_of(id).map(|idx| &self.bodies[idx])
    }

    pub fn get_mut(&mut self, id: BodyID) -> Option<&mut AstralBody> {
        let idx = self.index_of(id)?;
        Some(&mut self.bodies[idx])
    }

    /// First body with this name, in catalog order.
    pub fn get_by_name(&self, name: &str) -> Option<&AstralBody> {
        self.bodies.iter().find(|b| b.info.name == name)
    }

    /// Looks up a body by position, wrapping around in both directions.
    pub fn get_by_index(&self, index: isize) -> Option<&AstralBody> {
        self.wrap_index(index).map(|idx| &self.bodies[idx])
    }

    /// Maps any integer onto `[0, len)`, so that -1 is the last body and
    /// `len` is the first. `None` if the catalog is empty.
    pub fn wrap_index(&self, index: isize) -> Option<usize> {
        if self.bodies.is_empty() {
            return None;
        }
        Some(index.rem_euclid(self.bodies.len() as isize) as usize)
    }
}
