//! 2D vector helpers on top of [`glam::Vec2`].
//!
//! glam already provides dot products, lengths and `perp`; the functions here
//! name the planar operations the collision and solver code is written in.

use glam::Vec2;

/// 2D pseudo-cross product `a.x * b.y - a.y * b.x`.
///
/// The z component of the 3D cross product of two vectors lying in the XY plane.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Cross product of a scalar (z axis) with a vector: `w × r = (-w * r.y, w * r.x)`.
///
/// Used for the tangential velocity `ω × r` of a point on a rotating body.
#[inline]
pub fn cross_scalar(w: f32, r: Vec2) -> Vec2 {
    Vec2::new(-w * r.y, w * r.x)
}

/// Rotate `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Normalize `v`, returning the zero vector for zero-length (or non-finite) input.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Unit axes `(x, y)` of a frame rotated by `angle`.
#[inline]
pub fn local_axes(angle: f32) -> (Vec2, Vec2) {
    let (sin, cos) = angle.sin_cos();
    (Vec2::new(cos, sin), Vec2::new(-sin, cos))
}
