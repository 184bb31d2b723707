//! Narrowphase collision detection: one pure test per ordered pair of shape types.
//!
//! Every test takes `(a, b)` and returns a [`CollisionInfo`] whose normal points
//! from `b` toward `a`. Tests are total: when handed shapes they do not expect
//! they return the non-colliding result.

use glam::Vec2;

use super::body::{Body, Shape, ShapeType};
use super::contact::CollisionInfo;

/// Signature shared by every entry of [`COLLISION_TABLE`].
pub type CollisionFn = fn(&Body, &Body) -> CollisionInfo;

/// Corners whose depth differs by less than this are treated as one contact edge.
pub const TIE_TOLERANCE: f32 = 1e-4;

/// Dispatch table indexed by `shape_type(a) * ShapeType::COUNT + shape_type(b)`.
pub const COLLISION_TABLE: [CollisionFn; ShapeType::COUNT * ShapeType::COUNT] = [
    plane_plane,
    plane_circle,
    plane_box,
    circle_plane,
    circle_circle,
    circle_box,
    box_plane,
    box_circle,
    box_box,
];

/// Test a pair of bodies through the dispatch table.
#[inline]
pub fn collide(a: &Body, b: &Body) -> CollisionInfo {
    let index = a.shape_type().index() * ShapeType::COUNT + b.shape_type().index();
    COLLISION_TABLE[index](a, b)
}

/// Average of the corners that reach furthest against `direction`
/// (minimum `dot(corner, direction)`), merging near ties.
fn deepest_point(corners: &[Vec2; 4], direction: Vec2) -> Vec2 {
    let min = corners
        .iter()
        .map(|c| c.dot(direction))
        .fold(f32::INFINITY, f32::min);

    let mut sum = Vec2::ZERO;
    let mut count = 0.0;
    for corner in corners {
        if corner.dot(direction) - min <= TIE_TOLERANCE {
            sum += *corner;
            count += 1.0;
        }
    }
    if count > 0.0 {
        sum / count
    } else {
        corners[0]
    }
}

/// Half-length of a box's shadow on `axis`.
#[inline]
fn projected_radius(
    half_width: f32,
    half_height: f32,
    local_x: Vec2,
    local_y: Vec2,
    axis: Vec2,
) -> f32 {
    half_width * local_x.dot(axis).abs() + half_height * local_y.dot(axis).abs()
}

/// Planes are static and never collide with each other.
pub fn plane_plane(_a: &Body, _b: &Body) -> CollisionInfo {
    CollisionInfo::NONE
}

pub fn plane_circle(a: &Body, b: &Body) -> CollisionInfo {
    circle_plane(b, a).flipped()
}

pub fn plane_box(a: &Body, b: &Body) -> CollisionInfo {
    box_plane(b, a).flipped()
}

pub fn circle_plane(a: &Body, b: &Body) -> CollisionInfo {
    let (Shape::Circle { radius }, Shape::Plane { normal, distance }) = (*a.shape(), *b.shape())
    else {
        return CollisionInfo::NONE;
    };

    let centre = a.position();
    let d = centre.dot(normal) - distance;
    if d.abs() > radius {
        return CollisionInfo::NONE;
    }

    let normal = if d >= 0.0 { normal } else { -normal };
    CollisionInfo::hit(radius - d.abs(), normal, centre - normal * radius)
}

pub fn circle_circle(a: &Body, b: &Body) -> CollisionInfo {
    let (Shape::Circle { radius: radius_a }, Shape::Circle { radius: radius_b }) =
        (*a.shape(), *b.shape())
    else {
        return CollisionInfo::NONE;
    };

    let delta = a.position() - b.position();
    let radii = radius_a + radius_b;
    let distance_sq = delta.length_squared();
    if distance_sq >= radii * radii {
        return CollisionInfo::NONE;
    }

    // Coincident centres yield a zero normal
    let normal = delta.normalize_or_zero();
    let point = b.position() + normal * radius_b;
    CollisionInfo::hit(radii - distance_sq.sqrt(), normal, point)
}

pub fn circle_box(a: &Body, b: &Body) -> CollisionInfo {
    box_circle(b, a).flipped()
}

pub fn box_plane(a: &Body, b: &Body) -> CollisionInfo {
    let (
        Shape::Box {
            half_width,
            half_height,
            local_x,
            local_y,
        },
        Shape::Plane { normal, distance },
    ) = (*a.shape(), *b.shape())
    else {
        return CollisionInfo::NONE;
    };

    let d = a.position().dot(normal) - distance;
    let extent = projected_radius(half_width, half_height, local_x, local_y, normal);
    if d.abs() > extent {
        return CollisionInfo::NONE;
    }

    let normal = if d >= 0.0 { normal } else { -normal };
    let Some(corners) = a.corners() else {
        return CollisionInfo::NONE;
    };
    CollisionInfo::hit(extent - d.abs(), normal, deepest_point(&corners, normal))
}

pub fn box_circle(a: &Body, b: &Body) -> CollisionInfo {
    let (
        Shape::Box {
            half_width,
            half_height,
            local_x,
            local_y,
        },
        Shape::Circle { radius },
    ) = (*a.shape(), *b.shape())
    else {
        return CollisionInfo::NONE;
    };

    // Circle centre in the box frame
    let offset = b.position() - a.position();
    let local = Vec2::new(offset.dot(local_x), offset.dot(local_y));
    let clamped = local.clamp(
        Vec2::new(-half_width, -half_height),
        Vec2::new(half_width, half_height),
    );
    let to_world = |v: Vec2| local_x * v.x + local_y * v.y;

    if local == clamped {
        // Centre inside the box: push out through the nearest face
        let depth_x = half_width - local.x.abs();
        let depth_y = half_height - local.y.abs();
        let (outward, depth, surface) = if depth_x < depth_y {
            let sign = if local.x >= 0.0 { 1.0 } else { -1.0 };
            (Vec2::new(sign, 0.0), depth_x, Vec2::new(sign * half_width, local.y))
        } else {
            let sign = if local.y >= 0.0 { 1.0 } else { -1.0 };
            (Vec2::new(0.0, sign), depth_y, Vec2::new(local.x, sign * half_height))
        };
        return CollisionInfo::hit(
            radius + depth,
            -to_world(outward),
            a.position() + to_world(surface),
        );
    }

    let diff = local - clamped;
    let distance = diff.length();
    if distance > radius {
        return CollisionInfo::NONE;
    }

    let normal = -to_world(diff / distance);
    CollisionInfo::hit(radius - distance, normal, a.position() + to_world(clamped))
}

pub fn box_box(a: &Body, b: &Body) -> CollisionInfo {
    let (
        Shape::Box {
            half_width: hw_a,
            half_height: hh_a,
            local_x: x_a,
            local_y: y_a,
        },
        Shape::Box {
            half_width: hw_b,
            half_height: hh_b,
            local_x: x_b,
            local_y: y_b,
        },
    ) = (*a.shape(), *b.shape())
    else {
        return CollisionInfo::NONE;
    };

    let delta = a.position() - b.position();
    // Axes 0 and 1 belong to A, 2 and 3 to B
    let axes = [x_a, y_a, x_b, y_b];

    let mut best_overlap = f32::INFINITY;
    let mut best_axis = 0;
    let mut best_normal = Vec2::ZERO;
    for (i, axis) in axes.iter().enumerate() {
        let dist = delta.dot(*axis);
        let overlap = projected_radius(hw_a, hh_a, x_a, y_a, *axis)
            + projected_radius(hw_b, hh_b, x_b, y_b, *axis)
            - dist.abs();
        if overlap <= 0.0 {
            // Separating axis found
            return CollisionInfo::NONE;
        }
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = i;
            best_normal = if dist >= 0.0 { *axis } else { -*axis };
        }
    }

    let (Some(corners_a), Some(corners_b)) = (a.corners(), b.corners()) else {
        return CollisionInfo::NONE;
    };
    let point = if best_axis < 2 {
        // B's corner reaching furthest toward A
        deepest_point(&corners_b, -best_normal)
    } else {
        deepest_point(&corners_a, best_normal)
    };

    CollisionInfo::hit(best_overlap, best_normal, point)
}
