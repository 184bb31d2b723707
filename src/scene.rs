//! Scene: the set of bodies being simulated, in insertion order.

use crate::error::PhysicsError;
use crate::physics::body::{Body, BodyHandle};

/// Owns every body in the simulation behind stable [`BodyHandle`]s.
///
/// Bodies are stored in a [`hecs::World`]; `order` keeps insertion order so pair
/// enumeration and the solver stay deterministic.
#[derive(Default)]
pub struct Scene {
    world: hecs::World,
    order: Vec<BodyHandle>,
    pending_removal: Vec<BodyHandle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body at the end of the scene order.
    pub fn add(&mut self, body: Body) -> BodyHandle {
        let shape = body.shape_type().name();
        let handle = self.world.spawn((body,));
        self.order.push(handle);
        tracing::debug!(?handle, shape, "body added");
        handle
    }

    /// Remove a body immediately and return it.
    pub fn remove(&mut self, handle: BodyHandle) -> Result<Body, PhysicsError> {
        let body = *self.get(handle)?;
        self.world
            .despawn(handle)
            .map_err(|_| PhysicsError::NoSuchBody(handle))?;
        self.order.retain(|h| *h != handle);
        self.pending_removal.retain(|h| *h != handle);
        tracing::debug!(?handle, "body removed");
        Ok(body)
    }

    /// Queue a body for removal at the start of the next tick.
    pub fn mark_for_removal(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        if !self.contains(handle) {
            return Err(PhysicsError::NoSuchBody(handle));
        }
        if !self.pending_removal.contains(&handle) {
            self.pending_removal.push(handle);
        }
        Ok(())
    }

    /// Remove every queued body. Returns how many were removed.
    pub fn flush_removals(&mut self) -> usize {
        let mut removed = 0;
        for handle in std::mem::take(&mut self.pending_removal) {
            if self.remove(handle).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Remove all bodies.
    pub fn clear(&mut self) {
        let count = self.order.len();
        self.world.clear();
        self.order.clear();
        self.pending_removal.clear();
        tracing::debug!(count, "scene cleared");
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.world.get::<&Body>(handle).is_ok()
    }

    pub fn get(&self, handle: BodyHandle) -> Result<hecs::Ref<'_, Body>, PhysicsError> {
        self.world
            .get::<&Body>(handle)
            .map_err(|_| PhysicsError::NoSuchBody(handle))
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Result<hecs::RefMut<'_, Body>, PhysicsError> {
        self.world
            .get::<&mut Body>(handle)
            .map_err(|_| PhysicsError::NoSuchBody(handle))
    }

    /// Handles in scene order.
    #[inline]
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Copies of every body, in scene order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, Body)> + '_ {
        self.order
            .iter()
            .filter_map(|handle| self.world.get::<&Body>(*handle).ok().map(|body| (*handle, *body)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Move every body back to the origin.
    pub fn reset_positions(&mut self) {
        for (_, body) in self.world.query_mut::<&mut Body>() {
            body.reset_position();
        }
    }

    pub(crate) fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn circle(x: f32) -> Body {
        Body::new_circle(Vec2::new(x, 0.0), Vec2::ZERO, 1.0, 0.5).unwrap()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut scene = Scene::new();
        let a = scene.add(circle(0.0));
        let b = scene.add(circle(1.0));
        let c = scene.add(circle(2.0));
        assert_eq!(scene.handles(), &[a, b, c]);

        scene.remove(b).unwrap();
        assert_eq!(scene.handles(), &[a, c]);
        assert_eq!(scene.len(), 2);
        let xs: Vec<f32> = scene.iter().map(|(_, body)| body.position().x).collect();
        assert_eq!(xs, vec![0.0, 2.0]);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut scene = Scene::new();
        let a = scene.add(circle(0.0));
        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.position(), Vec2::ZERO);

        assert_eq!(scene.remove(a), Err(PhysicsError::NoSuchBody(a)));
        assert!(scene.get(a).is_err());
        assert!(scene.mark_for_removal(a).is_err());
        assert!(!scene.contains(a));
    }

    #[test]
    fn test_deferred_removal() {
        let mut scene = Scene::new();
        let a = scene.add(circle(0.0));
        let b = scene.add(circle(1.0));
        scene.mark_for_removal(a).unwrap();
        scene.mark_for_removal(a).unwrap();
        assert_eq!(scene.len(), 2);

        assert_eq!(scene.flush_removals(), 1);
        assert_eq!(scene.handles(), &[b]);
        assert_eq!(scene.flush_removals(), 0);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut scene = Scene::new();
        let a = scene.add(circle(0.0));
        scene.get_mut(a).unwrap().set_velocity(Vec2::X);
        assert_eq!(scene.get(a).unwrap().velocity(), Vec2::X);
    }

    #[test]
    fn test_clear_and_reset() {
        let mut scene = Scene::new();
        let a = scene.add(circle(3.0));
        scene.reset_positions();
        assert_eq!(scene.get(a).unwrap().position(), Vec2::ZERO);

        scene.clear();
        assert!(scene.is_empty());
        assert!(!scene.contains(a));
    }
}
