//! Contact data structures and the per-pair contact constraint.

use glam::Vec2;

use crate::math;

use super::body::{Body, BodyHandle};

/// Result of a single narrow-phase test.
///
/// The normal points **from body B toward body A**: applying `+normal` to A and
/// `-normal` to B pushes the pair apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub colliding: bool,
    /// Penetration depth, `>= 0`. Only meaningful when `colliding`.
    pub penetration: f32,
    /// Unit contact normal (B -> A), or zero for coincident circle centres.
    pub normal: Vec2,
    /// Contact point in world space.
    pub point: Vec2,
}

impl Default for CollisionInfo {
    fn default() -> Self {
        Self::NONE
    }
}

impl CollisionInfo {
    /// Non-colliding result.
    pub const NONE: Self = Self {
        colliding: false,
        penetration: 0.0,
        normal: Vec2::ZERO,
        point: Vec2::ZERO,
    };

    #[inline]
    pub fn hit(penetration: f32, normal: Vec2, point: Vec2) -> Self {
        Self {
            colliding: true,
            penetration,
            normal,
            point,
        }
    }

    /// The same contact seen with the bodies swapped.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Tunable contact response parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSettings {
    /// Coulomb friction coefficient.
    pub friction: f32,
    /// Baumgarte stabilization factor.
    pub baumgarte: f32,
    /// Penetration allowed before position correction kicks in.
    pub slop: f32,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            friction: 0.5,
            baumgarte: 0.3,
            slop: 0.005,
        }
    }
}

impl ContactSettings {
    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn baumgarte(mut self, baumgarte: f32) -> Self {
        self.baumgarte = baumgarte;
        self
    }

    pub fn slop(mut self, slop: f32) -> Self {
        self.slop = slop;
        self
    }
}

/// A one-frame contact constraint between two bodies.
#[derive(Debug, Clone, Copy)]
pub struct ContactConstraint {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub point: Vec2,
    /// Contact normal (B -> A).
    pub normal: Vec2,
    /// `perp(normal)`.
    pub tangent: Vec2,
    /// Lever arms from each centre of mass to the contact point.
    pub r_a: Vec2,
    pub r_b: Vec2,
    pub r_a_cross_n: f32,
    pub r_b_cross_n: f32,
    pub r_a_cross_t: f32,
    pub r_b_cross_t: f32,
    normal_mass: f32,
    tangent_mass: f32,
    /// Accumulated normal impulse, never negative.
    pub normal_impulse: f32,
    /// Accumulated friction impulse, within `±friction * normal_impulse`.
    pub tangent_impulse: f32,
    pub bias: f32,
    /// Target separating normal velocity from restitution.
    pub restitution: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub penetration: f32,
}

fn effective_mass(a: &Body, b: &Body, r_a_cross: f32, r_b_cross: f32) -> f32 {
    let k = a.inverse_mass()
        + b.inverse_mass()
        + r_a_cross * r_a_cross * a.inverse_moment()
        + r_b_cross * r_b_cross * b.inverse_moment();
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

#[inline]
fn relative_velocity(a: &Body, b: &Body, point: Vec2) -> Vec2 {
    a.velocity_at(point) - b.velocity_at(point)
}

impl ContactConstraint {
    /// Snapshot the contact geometry and precompute the constraint terms.
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        a: &Body,
        b: &Body,
        info: &CollisionInfo,
        dt: f32,
        settings: &ContactSettings,
    ) -> Self {
        let point = info.point;
        let normal = info.normal;
        let tangent = normal.perp();

        let r_a = point - a.position();
        let r_b = point - b.position();
        let r_a_cross_n = math::cross(r_a, normal);
        let r_b_cross_n = math::cross(r_b, normal);
        let r_a_cross_t = math::cross(r_a, tangent);
        let r_b_cross_t = math::cross(r_b, tangent);

        let bias = if dt > 0.0 {
            -(settings.baumgarte / dt) * (info.penetration - settings.slop).max(0.0)
        } else {
            0.0
        };

        let elasticity = 0.5 * (a.elasticity() + b.elasticity());
        let approach = relative_velocity(a, b, point).dot(normal);
        let restitution = if approach < 0.0 {
            -elasticity * approach
        } else {
            0.0
        };

        Self {
            body_a,
            body_b,
            point,
            normal,
            tangent,
            r_a,
            r_b,
            r_a_cross_n,
            r_b_cross_n,
            r_a_cross_t,
            r_b_cross_t,
            normal_mass: effective_mass(a, b, r_a_cross_n, r_b_cross_n),
            tangent_mass: effective_mass(a, b, r_a_cross_t, r_b_cross_t),
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            bias,
            restitution,
            elasticity,
            friction: settings.friction,
            penetration: info.penetration,
        }
    }

    #[inline]
    pub fn normal_mass(&self) -> f32 {
        self.normal_mass
    }

    #[inline]
    pub fn tangent_mass(&self) -> f32 {
        self.tangent_mass
    }

    /// One normal-impulse correction. Returns the impulse delta applied.
    pub fn solve_velocity(&mut self, a: &mut Body, b: &mut Body) -> f32 {
        let vn = relative_velocity(a, b, self.point).dot(self.normal);
        let lambda = self.normal_mass * (-vn + self.restitution - self.bias);

        // Clamp accumulated normal impulse
        let old = self.normal_impulse;
        self.normal_impulse = (old + lambda).max(0.0);
        let delta = self.normal_impulse - old;

        let impulse = self.normal * delta;
        a.apply_impulse_at(impulse, self.point);
        b.apply_impulse_at(-impulse, self.point);
        delta
    }

    /// One Coulomb friction correction. Returns the impulse delta applied.
    pub fn solve_friction(&mut self, a: &mut Body, b: &mut Body) -> f32 {
        let vt = relative_velocity(a, b, self.point).dot(self.tangent);
        let lambda = -self.tangent_mass * vt;

        let max_friction = (self.friction * self.normal_impulse).max(0.0);
        let old = self.tangent_impulse;
        self.tangent_impulse = (old + lambda).clamp(-max_friction, max_friction);
        let delta = self.tangent_impulse - old;

        let impulse = self.tangent * delta;
        a.apply_impulse_at(impulse, self.point);
        b.apply_impulse_at(-impulse, self.point);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn handles() -> (BodyHandle, BodyHandle) {
        let mut world = hecs::World::new();
        (world.spawn(()), world.spawn(()))
    }

    fn head_on(elasticity: f32) -> (Body, Body, CollisionInfo) {
        let a = Body::new_circle(Vec2::new(-0.4995, 0.0), Vec2::X, 1.0, 0.5)
            .unwrap()
            .with_elasticity(elasticity)
            .unwrap();
        let b = Body::new_circle(Vec2::new(0.4995, 0.0), -Vec2::X, 1.0, 0.5)
            .unwrap()
            .with_elasticity(elasticity)
            .unwrap();
        let info = CollisionInfo::hit(0.001, -Vec2::X, Vec2::new(-0.0005, 0.0));
        (a, b, info)
    }

    #[test]
    fn test_flipped_negates_normal_only() {
        let info = CollisionInfo::hit(0.2, Vec2::Y, Vec2::new(1.0, 2.0));
        let flipped = info.flipped();
        assert!(flipped.colliding);
        assert_eq!(flipped.penetration, 0.2);
        assert_eq!(flipped.normal, -Vec2::Y);
        assert_eq!(flipped.point, info.point);
        assert!(!CollisionInfo::default().colliding);
    }

    #[test]
    fn test_setup_terms() {
        let (ha, hb) = handles();
        let (a, b, info) = head_on(1.0);
        let c = ContactConstraint::new(
            ha,
            hb,
            &a,
            &b,
            &info,
            1.0 / 60.0,
            &ContactSettings::default(),
        );
        assert!((c.normal_mass() - 0.5).abs() < EPS);
        assert!((c.tangent - Vec2::new(0.0, -1.0)).length() < EPS);
        // Below slop: no positional bias
        assert_eq!(c.bias, 0.0);
        // Approaching at 2 with e = 1
        assert!((c.restitution - 2.0).abs() < EPS);
        assert_eq!(c.normal_impulse, 0.0);
        assert_eq!(c.tangent_impulse, 0.0);
    }

    #[test]
    fn test_bias_beyond_slop() {
        let (ha, hb) = handles();
        let (a, b, mut info) = head_on(0.5);
        info.penetration = 0.105;
        let settings = ContactSettings::default();
        let c = ContactConstraint::new(ha, hb, &a, &b, &info, 0.1, &settings);
        // -(0.3 / 0.1) * (0.105 - 0.005)
        assert!((c.bias + 0.3).abs() < EPS, "bias = {}", c.bias);
    }

    #[test]
    fn test_elastic_exchange() {
        let (ha, hb) = handles();
        let (mut a, mut b, info) = head_on(1.0);
        let mut c = ContactConstraint::new(
            ha,
            hb,
            &a,
            &b,
            &info,
            1.0 / 60.0,
            &ContactSettings::default(),
        );
        for _ in 0..10 {
            c.solve_velocity(&mut a, &mut b);
            c.solve_friction(&mut a, &mut b);
            assert!(c.normal_impulse >= 0.0);
        }
        assert!((a.velocity() + Vec2::X).length() < 1e-4, "vA = {}", a.velocity());
        assert!((b.velocity() - Vec2::X).length() < 1e-4, "vB = {}", b.velocity());
    }

    #[test]
    fn test_separating_contact_gets_no_impulse() {
        let (ha, hb) = handles();
        let (mut a, mut b, info) = head_on(0.5);
        a.set_velocity(-Vec2::X);
        b.set_velocity(Vec2::X);
        let mut c = ContactConstraint::new(
            ha,
            hb,
            &a,
            &b,
            &info,
            1.0 / 60.0,
            &ContactSettings::default(),
        );
        assert_eq!(c.restitution, 0.0);
        let applied = c.solve_velocity(&mut a, &mut b);
        assert_eq!(applied, 0.0);
        assert_eq!(c.normal_impulse, 0.0);
        assert!((a.velocity() + Vec2::X).length() < EPS);
    }

    #[test]
    fn test_friction_clamped_by_normal_impulse() {
        let (ha, hb) = handles();
        let mut ground = Body::new_plane(Vec2::Y, 0.0).unwrap();
        let mut circle = Body::new_circle(Vec2::new(0.0, 0.99), Vec2::new(10.0, -1.0), 1.0, 1.0)
            .unwrap()
            .with_elasticity(0.0)
            .unwrap();
        let info = CollisionInfo::hit(0.01, Vec2::Y, Vec2::new(0.0, -0.01));
        let settings = ContactSettings::default();
        let mut c = ContactConstraint::new(ha, hb, &circle, &ground, &info, 1.0 / 60.0, &settings);
        for _ in 0..10 {
            c.solve_velocity(&mut circle, &mut ground);
            c.solve_friction(&mut circle, &mut ground);
            assert!(
                c.tangent_impulse.abs() <= settings.friction * c.normal_impulse + EPS,
                "friction {} exceeds cone {}",
                c.tangent_impulse,
                settings.friction * c.normal_impulse
            );
        }
        // Friction slows the slide but cannot stop it with this little normal load
        assert!(circle.velocity().x < 10.0);
        assert!(circle.velocity().x > 0.0);
        assert_eq!(ground.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_impulses_are_equal_and_opposite() {
        let (ha, hb) = handles();
        let mut a =
            Body::new_box(Vec2::new(0.0, 0.9), Vec2::new(0.3, -2.0), 2.0, 0.5, 0.5, 0.2).unwrap();
        let mut b = Body::new_box(Vec2::ZERO, Vec2::new(-0.1, 1.0), 3.0, 0.5, 0.5, -0.1).unwrap();
        let momentum = a.velocity() * a.mass() + b.velocity() * b.mass();
        let info = CollisionInfo::hit(0.1, Vec2::Y, Vec2::new(0.1, 0.45));
        let mut c = ContactConstraint::new(
            ha,
            hb,
            &a,
            &b,
            &info,
            1.0 / 60.0,
            &ContactSettings::default(),
        );
        for _ in 0..10 {
            c.solve_velocity(&mut a, &mut b);
            c.solve_friction(&mut a, &mut b);
        }
        let after = a.velocity() * a.mass() + b.velocity() * b.mass();
        let drift = (after - momentum).length();
        assert!(drift < 1e-4, "momentum drift {}", drift);
    }
}
