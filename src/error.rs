//! Error type for body construction, scene lookups and property edits.

use thiserror::Error;

use crate::physics::body::BodyHandle;

/// Errors returned by fallible body and scene operations.
///
/// The collision and solver paths never fail; everything that could corrupt
/// them (a zero mass, a degenerate plane normal) is rejected up front here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("invalid mass {0}: must be finite and greater than zero")]
    InvalidMass(f32),

    #[error("invalid {name} {value}: must be finite and non-negative")]
    InvalidExtent { name: &'static str, value: f32 },

    #[error("invalid elasticity {0}: must be finite and non-negative")]
    InvalidElasticity(f32),

    #[error("plane normal must have non-zero length")]
    DegenerateNormal,

    #[error("no body for handle {0:?}")]
    NoSuchBody(BodyHandle),

    #[error("property `{0}` is read-only")]
    ReadOnlyProperty(&'static str),

    #[error("property `{name}` expects a {expected} value")]
    PropertyType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("property `{name}` does not apply to {shape} bodies")]
    PropertyShape {
        name: &'static str,
        shape: &'static str,
    },
}
