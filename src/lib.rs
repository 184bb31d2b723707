//! Rein 2D Physics
//!
//! A 2D rigid body simulator for planes, circles and oriented boxes with
//! sequential-impulse contact resolution.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Planar vector helpers on glam
//! 2. **physics** - Bodies, narrowphase dispatch, contact constraints, solver and step driver
//! 3. **scene** - Body storage with stable handles (hecs)
//! 4. **scene_io** - Persisted scene layout (feature = "serde")
//! 5. **inspect** - Named property descriptors for editors
//! 6. **debug_draw** - Debug primitives for any renderer
//!
//! # Example
//!
//! ```
//! use rein2d::{glam::Vec2, Body, PhysicsWorld, Scene};
//!
//! let mut scene = Scene::new();
//! scene.add(Body::new_plane(Vec2::Y, 0.0)?);
//! let ball = scene.add(Body::new_circle(Vec2::new(0.0, 5.0), Vec2::ZERO, 1.0, 1.0)?);
//!
//! let mut physics = PhysicsWorld::default();
//! for _ in 0..60 {
//!     physics.fixed_step(&mut scene);
//! }
//! assert!(scene.get(ball)?.position().y < 5.0);
//! # Ok::<(), rein2d::PhysicsError>(())
//! ```

pub mod debug_draw;
pub mod error;
pub mod inspect;
pub mod math;
pub mod physics;
pub mod scene;

#[cfg(feature = "serde")]
pub mod scene_io;

// Re-export commonly used types
pub use debug_draw::{DebugDraw, DrawCommand, DrawList};
pub use error::PhysicsError;
pub use inspect::{Property, PropertyValue};
pub use physics::body::{Body, BodyHandle, MassProperties, Shape, ShapeType};
pub use physics::contact::{CollisionInfo, ContactConstraint, ContactSettings};
pub use physics::narrowphase::collide;
pub use physics::{PhysicsConfig, PhysicsWorld, StepStats};
pub use scene::Scene;

#[cfg(feature = "serde")]
pub use scene_io::SceneRecord;

// Re-export glam for convenience
pub use glam;
