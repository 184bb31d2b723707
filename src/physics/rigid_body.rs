//! Body integration systems over every body in the world.

use glam::Vec2;

use super::body::Body;

/// Add gravity and resolve accumulated forces into velocities: `v += (F/m) * dt`.
///
/// Force and torque accumulators are cleared afterwards. Static bodies are skipped.
pub fn integrate_forces(world: &mut hecs::World, gravity: Vec2, dt: f32) {
    for (_, body) in world.query_mut::<&mut Body>() {
        body.integrate_forces(gravity, dt);
    }
}

/// Integrate positions from the solved velocities: `p += v * dt`, `θ += ω * dt`.
pub fn integrate_velocities(world: &mut hecs::World, dt: f32) {
    for (_, body) in world.query_mut::<&mut Body>() {
        body.integrate_velocity(dt);
    }
}
