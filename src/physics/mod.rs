//! 2D rigid body simulation with contact resolution.
//!
//! # Architecture
//!
//! The physics pipeline runs in a fixed timestep loop:
//!
//! 1. Flush bodies queued for removal
//! 2. Integrate forces (gravity, accumulated force and torque) into velocities
//! 3. Narrowphase collision detection over every body pair (dispatch table)
//! 4. Build one contact constraint per colliding pair
//! 5. Solve contact constraints (sequential impulse with friction)
//! 6. Integrate velocities into positions

pub mod body;
pub mod contact;
pub mod narrowphase;
pub mod rigid_body;
pub mod solver;

use glam::Vec2;

use crate::debug_draw::{DebugDraw, BODY_COLOR, CONTACT_COLOR};
use crate::scene::Scene;

use self::body::{Body, BodyHandle};
use self::contact::{ContactConstraint, ContactSettings};
use self::narrowphase::collide;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81).
    pub gravity: Vec2,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
    /// Number of constraint solver iterations. Default: 10.
    pub solver_iterations: u32,
    /// Contact response parameters.
    pub contact: ContactSettings,
    /// Whether [`PhysicsWorld::draw`] also draws last tick's contact points. Default: true.
    pub draw_contacts: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 10,
            contact: ContactSettings::default(),
            draw_contacts: true,
        }
    }
}

impl PhysicsConfig {
    pub fn gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn fixed_timestep(mut self, fixed_timestep: f64) -> Self {
        self.fixed_timestep = fixed_timestep;
        self
    }

    pub fn max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn solver_iterations(mut self, solver_iterations: u32) -> Self {
        self.solver_iterations = solver_iterations;
        self
    }

    pub fn contact(mut self, contact: ContactSettings) -> Self {
        self.contact = contact;
        self
    }

    pub fn draw_contacts(mut self, draw_contacts: bool) -> Self {
        self.draw_contacts = draw_contacts;
        self
    }
}

/// Counters from the most recent tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub bodies: usize,
    pub pairs_tested: usize,
    pub contacts: usize,
}

/// The simulation driver: owns the fixed-timestep accumulator and the
/// simulating switch, and runs ticks against a [`Scene`].
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    simulating: bool,
    contacts: Vec<ContactConstraint>,
    stats: StepStats,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration. Simulation starts enabled.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            simulating: true,
            contacts: Vec::new(),
            stats: StepStats::default(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn set_simulating(&mut self, simulating: bool) {
        if self.simulating != simulating {
            tracing::debug!(simulating, "simulation switched");
        }
        self.simulating = simulating;
    }

    pub fn toggle_simulating(&mut self) {
        self.set_simulating(!self.simulating);
    }

    /// Contact constraints solved in the most recent tick.
    pub fn contacts(&self) -> &[ContactConstraint] {
        &self.contacts
    }

    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Step the physics simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator to ensure deterministic simulation.
    /// Returns the number of ticks run. Does nothing while not simulating or
    /// when `fixed_timestep` is not positive.
    pub fn step(&mut self, scene: &mut Scene, delta_time: f64) -> u32 {
        if !self.simulating || !self.has_valid_timestep() {
            return 0;
        }
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.tick(scene, self.config.fixed_timestep as f32);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            tracing::warn!(
                backlog = self.accumulator,
                "physics falling behind, dropping accumulated time"
            );
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Run exactly one tick of `fixed_timestep`, if simulating.
    pub fn fixed_step(&mut self, scene: &mut Scene) {
        if self.simulating && self.has_valid_timestep() {
            self.tick(scene, self.config.fixed_timestep as f32);
        }
    }

    fn has_valid_timestep(&self) -> bool {
        let valid = self.config.fixed_timestep > 0.0;
        if !valid {
            tracing::warn!(
                fixed_timestep = self.config.fixed_timestep,
                "fixed timestep must be positive, skipping step"
            );
        }
        valid
    }

    fn tick(&mut self, scene: &mut Scene, dt: f32) {
        // 1. Compact removals requested since the last tick
        scene.flush_removals();

        // 2. Forces into velocities
        rigid_body::integrate_forces(scene.world_mut(), self.config.gravity, dt);

        // 3-4. All pairs through the dispatch table, one constraint per hit
        let bodies: Vec<(BodyHandle, Body)> = scene.iter().collect();
        self.contacts.clear();
        let mut pairs_tested = 0;
        for (i, (handle_a, a)) in bodies.iter().enumerate() {
            for (handle_b, b) in &bodies[i + 1..] {
                pairs_tested += 1;
                let info = collide(a, b);
                if info.colliding {
                    self.contacts.push(ContactConstraint::new(
                        *handle_a,
                        *handle_b,
                        a,
                        b,
                        &info,
                        dt,
                        &self.config.contact,
                    ));
                }
            }
        }

        // 5. Sequential impulses
        solver::solve_contacts(
            &mut self.contacts,
            scene.world_mut(),
            self.config.solver_iterations,
        );

        // 6. Velocities into positions
        rigid_body::integrate_velocities(scene.world_mut(), dt);

        self.stats = StepStats {
            bodies: bodies.len(),
            pairs_tested,
            contacts: self.contacts.len(),
        };
        tracing::trace!(
            bodies = self.stats.bodies,
            pairs = pairs_tested,
            contacts = self.stats.contacts,
            "physics tick"
        );
    }

    /// Draw every body and, if enabled, the contact points of the last tick.
    pub fn draw(&self, scene: &Scene, sink: &mut impl DebugDraw) {
        for (_, body) in scene.iter() {
            body.draw(sink, BODY_COLOR);
        }
        if self.config.draw_contacts {
            for contact in &self.contacts {
                sink.point(contact.point, CONTACT_COLOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_draw::{DrawCommand, DrawList};

    fn ground_and_ball(scene: &mut Scene) -> (BodyHandle, BodyHandle) {
        let plane = scene.add(Body::new_plane(Vec2::Y, 0.0).unwrap());
        let ball = scene.add(Body::new_circle(Vec2::new(0.0, 5.0), Vec2::ZERO, 1.0, 1.0).unwrap());
        (plane, ball)
    }

    #[test]
    fn test_default_config() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, Vec2::new(0.0, -9.81));
        assert_eq!(config.solver_iterations, 10);
        assert_eq!(config.contact, ContactSettings::default());

        let config = config.solver_iterations(4).gravity(Vec2::ZERO);
        assert_eq!(config.solver_iterations, 4);
        assert_eq!(config.gravity, Vec2::ZERO);
    }

    #[test]
    fn test_step_accumulates_fixed_ticks() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::default();
        ground_and_ball(&mut scene);

        // Half a tick: nothing runs yet
        assert_eq!(physics.step(&mut scene, 1.0 / 120.0), 0);
        assert_eq!(physics.step(&mut scene, 1.0 / 120.0 + 1e-6), 1);
        assert_eq!(physics.step(&mut scene, 2.0 / 60.0 + 1e-6), 2);
    }

    #[test]
    fn test_step_drops_backlog() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::default();
        ground_and_ball(&mut scene);

        assert_eq!(physics.step(&mut scene, 1.0), 4);
        // The remaining backlog was discarded
        assert_eq!(physics.step(&mut scene, 0.0), 0);
    }

    #[test]
    fn test_non_positive_timestep_runs_no_ticks() {
        let mut scene = Scene::new();
        let (_, ball) = ground_and_ball(&mut scene);

        for timestep in [0.0, -1.0 / 60.0] {
            let mut physics = PhysicsWorld::new(PhysicsConfig::default().fixed_timestep(timestep));
            assert_eq!(physics.step(&mut scene, 0.016), 0);
            physics.fixed_step(&mut scene);
            assert_eq!(physics.stats(), StepStats::default());
        }
        assert_eq!(scene.get(ball).unwrap().position(), Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_paused_world_does_not_move() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::default();
        let (_, ball) = ground_and_ball(&mut scene);

        physics.toggle_simulating();
        assert!(!physics.is_simulating());
        physics.fixed_step(&mut scene);
        assert_eq!(physics.step(&mut scene, 1.0), 0);
        assert_eq!(scene.get(ball).unwrap().position(), Vec2::new(0.0, 5.0));

        physics.set_simulating(true);
        physics.fixed_step(&mut scene);
        assert!(scene.get(ball).unwrap().position().y < 5.0);
    }

    #[test]
    fn test_every_pair_tested_once() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::default();
        for i in 0..5 {
            let at = Vec2::new(i as f32 * 10.0, 0.0);
            scene.add(Body::new_circle(at, Vec2::ZERO, 1.0, 1.0).unwrap());
        }
        physics.fixed_step(&mut scene);
        let stats = physics.stats();
        assert_eq!(stats.bodies, 5);
        assert_eq!(stats.pairs_tested, 10);
        assert_eq!(stats.contacts, 0);
    }

    #[test]
    fn test_removal_flushed_before_tick() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::default();
        let (_, ball) = ground_and_ball(&mut scene);
        scene.mark_for_removal(ball).unwrap();
        physics.fixed_step(&mut scene);
        assert_eq!(scene.len(), 1);
        assert_eq!(physics.stats().pairs_tested, 0);
    }

    #[test]
    fn test_draw_includes_contacts() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::default();
        scene.add(Body::new_plane(Vec2::Y, 0.0).unwrap());
        scene.add(Body::new_circle(Vec2::new(0.0, 0.9), Vec2::ZERO, 1.0, 1.0).unwrap());
        physics.fixed_step(&mut scene);
        assert_eq!(physics.contacts().len(), 1);

        let mut list = DrawList::new();
        physics.draw(&scene, &mut list);
        let points = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Point { .. }))
            .count();
        assert_eq!(points, 1);
        // Plane (2 lines) + circle (outline and marker) + contact point
        assert_eq!(list.len(), 5);
    }
}
