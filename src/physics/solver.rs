//! Sequential impulse constraint solver.

use super::body::{Body, BodyHandle};
use super::contact::ContactConstraint;

/// Solve contact constraints using sequential impulse iteration.
///
/// Each pass walks the constraints in order and applies the normal correction
/// followed by the friction correction of every constraint.
pub fn solve_contacts(
    constraints: &mut [ContactConstraint],
    world: &mut hecs::World,
    solver_iterations: u32,
) {
    for _ in 0..solver_iterations {
        for constraint in constraints.iter_mut() {
            let (a, b) = (constraint.body_a, constraint.body_b);
            with_pair(world, a, b, |body_a, body_b| {
                constraint.solve_velocity(body_a, body_b);
                constraint.solve_friction(body_a, body_b);
            });
        }
    }
}

/// Run `f` on mutable copies of two distinct bodies and write the results back.
///
/// Returns `None` without touching the world if either handle is gone.
pub fn with_pair<R>(
    world: &mut hecs::World,
    a: BodyHandle,
    b: BodyHandle,
    f: impl FnOnce(&mut Body, &mut Body) -> R,
) -> Option<R> {
    let mut body_a = *world.get::<&Body>(a).ok()?;
    let mut body_b = *world.get::<&Body>(b).ok()?;

    let result = f(&mut body_a, &mut body_b);

    *world.get::<&mut Body>(a).ok()? = body_a;
    *world.get::<&mut Body>(b).ok()? = body_b;
    Some(result)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::physics::contact::{CollisionInfo, ContactSettings};
    use crate::physics::narrowphase::collide;

    fn constraint_for(world: &hecs::World, a: BodyHandle, b: BodyHandle) -> ContactConstraint {
        let body_a = *world.get::<&Body>(a).unwrap();
        let body_b = *world.get::<&Body>(b).unwrap();
        let info: CollisionInfo = collide(&body_a, &body_b);
        assert!(info.colliding);
        ContactConstraint::new(
            a,
            b,
            &body_a,
            &body_b,
            &info,
            1.0 / 60.0,
            &ContactSettings::default(),
        )
    }

    #[test]
    fn test_resting_contact_stops_fall() {
        let mut world = hecs::World::new();
        let plane = world.spawn((Body::new_plane(Vec2::Y, 0.0).unwrap(),));
        let body = Body::new_circle(Vec2::new(0.0, 0.99), Vec2::new(0.0, -2.0), 1.0, 1.0)
            .unwrap()
            .with_elasticity(0.0)
            .unwrap();
        let circle = world.spawn((body,));

        let mut constraints = vec![constraint_for(&world, plane, circle)];
        solve_contacts(&mut constraints, &mut world, 10);

        assert!(constraints[0].normal_impulse > 0.0);
        let body = world.get::<&Body>(circle).unwrap();
        assert!(body.velocity().y >= 0.0, "still approaching: {}", body.velocity().y);
        assert_eq!(world.get::<&Body>(plane).unwrap().velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_normal_impulse_never_negative() {
        let mut world = hecs::World::new();
        let falling =
            Body::new_box(Vec2::new(0.0, 0.95), Vec2::new(1.0, -3.0), 1.0, 0.5, 0.5, 0.1).unwrap();
        let rising = Body::new_box(Vec2::ZERO, Vec2::new(0.0, 2.0), 2.0, 0.5, 0.5, 0.0).unwrap();
        let a = world.spawn((falling,));
        let b = world.spawn((rising,));

        let mut constraints = vec![constraint_for(&world, a, b)];
        for _ in 0..10 {
            solve_contacts(&mut constraints, &mut world, 1);
            assert!(constraints[0].normal_impulse >= 0.0);
            let c = &constraints[0];
            assert!(c.tangent_impulse.abs() <= c.friction * c.normal_impulse + 1e-5);
        }
    }

    #[test]
    fn test_missing_body_is_skipped() {
        let mut world = hecs::World::new();
        let a = world.spawn((Body::new_circle(Vec2::ZERO, Vec2::X, 1.0, 1.0).unwrap(),));
        let b = world.spawn((Body::new_circle(Vec2::new(1.5, 0.0), -Vec2::X, 1.0, 1.0).unwrap(),));
        let mut constraints = vec![constraint_for(&world, a, b)];
        world.despawn(b).unwrap();

        solve_contacts(&mut constraints, &mut world, 10);
        assert_eq!(world.get::<&Body>(a).unwrap().velocity(), Vec2::X);
        assert!(with_pair(&mut world, a, b, |_, _| ()).is_none());
    }
}
