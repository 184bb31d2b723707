//! Scene builders shared by the physics benchmarks.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rein2d::physics::contact::{ContactConstraint, ContactSettings};
use rein2d::{collide, Body, PhysicsConfig, PhysicsWorld, Scene};

/// `n` bodies (alternating circles and boxes) packed into a column above a ground plane.
pub fn setup_scene(n: usize) -> anyhow::Result<(Scene, PhysicsWorld)> {
    let mut scene = Scene::new();
    scene.add(Body::new_plane(Vec2::Y, 0.0)?);

    let mut rng = StdRng::seed_from_u64(7);
    let columns = (n as f32).sqrt().ceil().max(1.0) as usize;
    for i in 0..n {
        let jitter: f32 = rng.gen_range(-0.05..0.05);
        let x = (i % columns) as f32 * 1.1 - columns as f32 * 0.55 + jitter;
        let y = 1.0 + (i / columns) as f32 * 1.1;
        let body = if i % 2 == 0 {
            Body::new_circle(Vec2::new(x, y), Vec2::ZERO, 10.0, 0.5)?
        } else {
            let angle: f32 = rng.gen_range(-0.3..0.3);
            Body::new_box(Vec2::new(x, y), Vec2::ZERO, 4.0, 0.5, 0.5, angle)?
        };
        scene.add(body);
    }

    Ok((scene, PhysicsWorld::new(PhysicsConfig::default())))
}

/// `n` bodies scattered far apart, so every pair is tested but none collide.
pub fn setup_sparse_scene(n: usize) -> anyhow::Result<(Scene, PhysicsWorld)> {
    let mut scene = Scene::new();
    for i in 0..n {
        let x = i as f32 * 5.0;
        scene.add(Body::new_circle(Vec2::new(x, 100.0), Vec2::ZERO, 1.0, 1.0)?);
    }
    Ok((scene, PhysicsWorld::new(PhysicsConfig::default())))
}

/// `n` overlapping circle pairs and the constraints between them.
pub fn setup_contacts(n: usize) -> anyhow::Result<(hecs::World, Vec<ContactConstraint>)> {
    let mut world = hecs::World::new();
    let settings = ContactSettings::default();
    let mut constraints = Vec::with_capacity(n);

    for i in 0..n {
        let x = i as f32 * 5.0;
        let a = Body::new_circle(Vec2::new(x, 0.0), Vec2::new(1.0, 0.0), 1.0, 1.0)?;
        let b = Body::new_circle(Vec2::new(x + 1.5, 0.2), Vec2::new(-1.0, 0.0), 1.0, 1.0)?;
        let info = collide(&a, &b);
        let handle_a = world.spawn((a,));
        let handle_b = world.spawn((b,));
        constraints.push(ContactConstraint::new(
            handle_a,
            handle_b,
            &a,
            &b,
            &info,
            1.0 / 60.0,
            &settings,
        ));
    }

    Ok((world, constraints))
}
