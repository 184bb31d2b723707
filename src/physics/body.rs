//! Rigid bodies: shape, kinematic state and mass properties.

use glam::Vec2;

use crate::error::PhysicsError;
use crate::math;

/// Stable handle to a body owned by a [`Scene`](crate::scene::Scene).
pub type BodyHandle = hecs::Entity;

/// Default coefficient of restitution for new bodies.
pub const DEFAULT_ELASTICITY: f32 = 0.5;

/// Shape tag used as the narrow-phase dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ShapeType {
    Plane = 0,
    Circle = 1,
    Box = 2,
}

impl ShapeType {
    /// Number of shape types, i.e. the side length of the dispatch table.
    pub const COUNT: usize = 3;

    pub const ALL: [ShapeType; Self::COUNT] = [ShapeType::Plane, ShapeType::Circle, ShapeType::Box];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShapeType::Plane => "Plane",
            ShapeType::Circle => "Circle",
            ShapeType::Box => "Box",
        }
    }
}

/// Collision geometry of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Infinite line `dot(normal, p) = distance`. Always static.
    Plane { normal: Vec2, distance: f32 },
    Circle { radius: f32 },
    /// Oriented box. `local_x`/`local_y` are derived from the body orientation.
    Box {
        half_width: f32,
        half_height: f32,
        local_x: Vec2,
        local_y: Vec2,
    },
}

impl Shape {
    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Plane { .. } => ShapeType::Plane,
            Shape::Circle { .. } => ShapeType::Circle,
            Shape::Box { .. } => ShapeType::Box,
        }
    }
}

/// Mass and rotational inertia together with their cached inverses.
///
/// Inverses are either the exact reciprocal or zero; they are only produced by
/// the constructors below so they cannot drift from the mass they belong to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    mass: f32,
    inv_mass: f32,
    moment: f32,
    inv_moment: f32,
}

impl MassProperties {
    /// Immovable body: infinite mass and moment, zero inverses.
    pub const INFINITE: Self = Self {
        mass: f32::INFINITY,
        inv_mass: 0.0,
        moment: f32::INFINITY,
        inv_moment: 0.0,
    };

    fn new(mass: f32, moment: f32) -> Self {
        Self {
            mass,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            moment,
            inv_moment: if moment > 0.0 { 1.0 / moment } else { 0.0 },
        }
    }

    /// Mass properties of `shape` for the given mass.
    pub fn for_shape(shape: &Shape, mass: f32) -> Self {
        match *shape {
            Shape::Plane { .. } => Self::INFINITE,
            Shape::Circle { radius } => Self::new(mass, 0.5 * mass * radius * radius),
            Shape::Box {
                half_width,
                half_height,
                ..
            } => {
                // m * (w^2 + h^2) / 12 with w = 2 * half_width, h = 2 * half_height
                let moment = mass * (half_width * half_width + half_height * half_height) / 3.0;
                Self::new(mass, moment)
            }
        }
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    #[inline]
    pub fn moment(&self) -> f32 {
        self.moment
    }

    #[inline]
    pub fn inverse_moment(&self) -> f32 {
        self.inv_moment
    }
}

fn validate_mass(mass: f32) -> Result<f32, PhysicsError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        tracing::warn!(mass, "rejecting degenerate body mass");
        Err(PhysicsError::InvalidMass(mass))
    }
}

fn validate_extent(name: &'static str, value: f32) -> Result<f32, PhysicsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        tracing::warn!(name, value, "rejecting body extent");
        Err(PhysicsError::InvalidExtent { name, value })
    }
}

fn validate_elasticity(elasticity: f32) -> Result<f32, PhysicsError> {
    if elasticity.is_finite() && elasticity >= 0.0 {
        Ok(elasticity)
    } else {
        Err(PhysicsError::InvalidElasticity(elasticity))
    }
}

/// A rigid body in the simulation.
///
/// Fields are private so that mass properties and box axes are always refreshed
/// together with the values they are derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    shape: Shape,
    position: Vec2,
    orientation: f32,
    velocity: Vec2,
    angular_velocity: f32,
    mass: MassProperties,
    force: Vec2,
    torque: f32,
    elasticity: f32,
}

impl Body {
    /// Create a static plane. The normal is normalized; a zero normal is rejected.
    pub fn new_plane(normal: Vec2, distance: f32) -> Result<Self, PhysicsError> {
        let normal = math::normalize_or_zero(normal);
        if normal == Vec2::ZERO {
            return Err(PhysicsError::DegenerateNormal);
        }
        Ok(Self {
            shape: Shape::Plane { normal, distance },
            position: normal * distance,
            orientation: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: MassProperties::INFINITE,
            force: Vec2::ZERO,
            torque: 0.0,
            elasticity: DEFAULT_ELASTICITY,
        })
    }

    /// Create a dynamic circle.
    pub fn new_circle(
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        radius: f32,
    ) -> Result<Self, PhysicsError> {
        let mass = validate_mass(mass)?;
        let shape = Shape::Circle {
            radius: validate_extent("radius", radius)?,
        };
        Ok(Self::dynamic(shape, position, velocity, 0.0, mass))
    }

    /// Create a dynamic oriented box.
    pub fn new_box(
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        half_width: f32,
        half_height: f32,
        orientation: f32,
    ) -> Result<Self, PhysicsError> {
        let mass = validate_mass(mass)?;
        let (local_x, local_y) = math::local_axes(orientation);
        let shape = Shape::Box {
            half_width: validate_extent("half_width", half_width)?,
            half_height: validate_extent("half_height", half_height)?,
            local_x,
            local_y,
        };
        Ok(Self::dynamic(shape, position, velocity, orientation, mass))
    }

    fn dynamic(shape: Shape, position: Vec2, velocity: Vec2, orientation: f32, mass: f32) -> Self {
        Self {
            mass: MassProperties::for_shape(&shape, mass),
            shape,
            position,
            orientation,
            velocity,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            elasticity: DEFAULT_ELASTICITY,
        }
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Result<Self, PhysicsError> {
        self.set_elasticity(elasticity)?;
        Ok(self)
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.set_angular_velocity(angular_velocity);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    /// Centre of mass. For planes, the point `normal * distance`.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    #[inline]
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass.mass()
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.mass.inverse_mass()
    }

    #[inline]
    pub fn moment(&self) -> f32 {
        self.mass.moment()
    }

    #[inline]
    pub fn inverse_moment(&self) -> f32 {
        self.mass.inverse_moment()
    }

    #[inline]
    pub fn elasticity(&self) -> f32 {
        self.elasticity
    }

    /// Accumulated force since the last integration.
    #[inline]
    pub fn force(&self) -> Vec2 {
        self.force
    }

    #[inline]
    pub fn torque(&self) -> f32 {
        self.torque
    }

    /// True for bodies with zero inverse mass (planes).
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass.inverse_mass() == 0.0
    }

    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            _ => None,
        }
    }

    /// `(half_width, half_height)` of a box.
    pub fn half_extents(&self) -> Option<Vec2> {
        match self.shape {
            Shape::Box {
                half_width,
                half_height,
                ..
            } => Some(Vec2::new(half_width, half_height)),
            _ => None,
        }
    }

    /// World-space unit axes of a box.
    pub fn local_axes(&self) -> Option<(Vec2, Vec2)> {
        match self.shape {
            Shape::Box {
                local_x, local_y, ..
            } => Some((local_x, local_y)),
            _ => None,
        }
    }

    /// `(normal, distance)` of a plane.
    pub fn plane(&self) -> Option<(Vec2, f32)> {
        match self.shape {
            Shape::Plane { normal, distance } => Some((normal, distance)),
            _ => None,
        }
    }

    /// World-space corners of a box, in the order
    /// `(+x +y), (+x -y), (-x +y), (-x -y)` of the local frame.
    pub fn corners(&self) -> Option<[Vec2; 4]> {
        match self.shape {
            Shape::Box {
                half_width,
                half_height,
                local_x,
                local_y,
            } => {
                let x = local_x * half_width;
                let y = local_y * half_height;
                let p = self.position;
                Some([p + x + y, p + x - y, p - x + y, p - x - y])
            }
            _ => None,
        }
    }

    /// Velocity of the material point at `point` (world space): `v + ω × r`.
    #[inline]
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        self.velocity + math::cross_scalar(self.angular_velocity, point - self.position)
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Move the body. A plane is moved along its normal so that it passes through `position`.
    pub fn set_position(&mut self, position: Vec2) {
        match &mut self.shape {
            Shape::Plane { normal, distance } => {
                *distance = position.dot(*normal);
                self.position = *normal * *distance;
            }
            _ => self.position = position,
        }
    }

    /// Set the orientation and refresh box axes. Ignored for planes.
    pub fn set_orientation(&mut self, orientation: f32) {
        if self.shape_type() == ShapeType::Plane {
            return;
        }
        self.orientation = orientation;
        self.update_local_axes();
    }

    /// Ignored for static bodies.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        if !self.is_static() {
            self.velocity = velocity;
        }
    }

    /// Ignored for static bodies.
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if !self.is_static() {
            self.angular_velocity = angular_velocity;
        }
    }

    /// Change the mass and refresh the derived inverse mass and moment.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        if self.shape_type() == ShapeType::Plane {
            return Err(PhysicsError::PropertyShape {
                name: "mass",
                shape: ShapeType::Plane.name(),
            });
        }
        let mass = validate_mass(mass)?;
        self.mass = MassProperties::for_shape(&self.shape, mass);
        Ok(())
    }

    pub fn set_radius(&mut self, value: f32) -> Result<(), PhysicsError> {
        let value = validate_extent("radius", value)?;
        let shape = self.shape_type().name();
        match &mut self.shape {
            Shape::Circle { radius } => *radius = value,
            _ => return Err(PhysicsError::PropertyShape { name: "radius", shape }),
        }
        self.refresh_mass_properties();
        Ok(())
    }

    pub fn set_half_extents(&mut self, width: f32, height: f32) -> Result<(), PhysicsError> {
        let width = validate_extent("half_width", width)?;
        let height = validate_extent("half_height", height)?;
        let shape = self.shape_type().name();
        match &mut self.shape {
            Shape::Box {
                half_width,
                half_height,
                ..
            } => {
                *half_width = width;
                *half_height = height;
            }
            _ => {
                return Err(PhysicsError::PropertyShape {
                    name: "half_extents",
                    shape,
                })
            }
        }
        self.refresh_mass_properties();
        Ok(())
    }

    /// Replace a plane's normal and distance.
    pub fn set_plane(&mut self, normal: Vec2, distance: f32) -> Result<(), PhysicsError> {
        let unit = math::normalize_or_zero(normal);
        if unit == Vec2::ZERO {
            return Err(PhysicsError::DegenerateNormal);
        }
        let shape = self.shape_type().name();
        match &mut self.shape {
            Shape::Plane {
                normal: n,
                distance: d,
            } => {
                *n = unit;
                *d = distance;
            }
            _ => return Err(PhysicsError::PropertyShape { name: "plane", shape }),
        }
        self.position = unit * distance;
        Ok(())
    }

    pub fn set_elasticity(&mut self, elasticity: f32) -> Result<(), PhysicsError> {
        self.elasticity = validate_elasticity(elasticity)?;
        Ok(())
    }

    /// Recompute mass properties after a geometry change, keeping the mass.
    fn refresh_mass_properties(&mut self) {
        if !self.is_static() {
            self.mass = MassProperties::for_shape(&self.shape, self.mass.mass());
        }
    }

    fn update_local_axes(&mut self) {
        if let Shape::Box {
            local_x, local_y, ..
        } = &mut self.shape
        {
            let (x, y) = math::local_axes(self.orientation);
            *local_x = x;
            *local_y = y;
        }
    }

    /// Move the body back to the origin. Planes reset their distance to zero.
    pub fn reset_position(&mut self) {
        self.set_position(Vec2::ZERO);
    }

    // ------------------------------------------------------------------
    // Forces and impulses
    // ------------------------------------------------------------------

    /// Accumulate a force through the centre of mass.
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Accumulate a force applied at a world-space point.
    pub fn apply_force_at_point(&mut self, force: Vec2, point: Vec2) {
        self.force += force;
        self.torque += math::cross(point - self.position, force);
    }

    #[inline]
    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Instantaneous impulse through the centre of mass.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.mass.inverse_mass();
    }

    /// Instantaneous impulse at a world-space contact point.
    pub fn apply_impulse_at(&mut self, impulse: Vec2, contact_point: Vec2) {
        self.velocity += impulse * self.mass.inverse_mass();
        self.angular_velocity +=
            self.mass.inverse_moment() * math::cross(contact_point - self.position, impulse);
    }

    // ------------------------------------------------------------------
    // Integration
    // ------------------------------------------------------------------

    /// Add gravity, resolve accumulated force and torque into velocities and
    /// clear the accumulators.
    pub fn integrate_forces(&mut self, gravity: Vec2, dt: f32) {
        if !self.is_static() {
            self.force += gravity * self.mass.mass();
            self.velocity += self.force * self.mass.inverse_mass() * dt;
            self.angular_velocity += self.torque * self.mass.inverse_moment() * dt;
        }
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Advance position and orientation from the current velocities.
    pub fn integrate_velocity(&mut self, dt: f32) {
        if self.is_static() {
            return;
        }
        self.position += self.velocity * dt;
        if self.angular_velocity != 0.0 {
            self.orientation += self.angular_velocity * dt;
            self.update_local_axes();
        }
    }

    /// Semi-implicit Euler step without collisions: forces, then velocity.
    pub fn fixed_update(&mut self, gravity: Vec2, dt: f32) {
        self.integrate_forces(gravity, dt);
        self.integrate_velocity(dt);
    }
}
