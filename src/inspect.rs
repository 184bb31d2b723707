//! Property descriptors for editing bodies from an inspector.
//!
//! Each shape exposes a fixed list of named properties. Writes go through the
//! validating body mutators, so an edit can never leave stale mass properties.

use glam::Vec2;

use crate::error::PhysicsError;
use crate::physics::body::{Body, ShapeType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Vec2(Vec2),
    Text(&'static str),
}

impl PropertyValue {
    fn float(self, name: &'static str) -> Result<f32, PhysicsError> {
        match self {
            PropertyValue::Float(v) => Ok(v),
            _ => Err(PhysicsError::PropertyType {
                name,
                expected: "float",
            }),
        }
    }

    fn vec2(self, name: &'static str) -> Result<Vec2, PhysicsError> {
        match self {
            PropertyValue::Vec2(v) => Ok(v),
            _ => Err(PhysicsError::PropertyType {
                name,
                expected: "vec2",
            }),
        }
    }
}

type Getter = fn(&Body) -> PropertyValue;
type Setter = fn(&mut Body, PropertyValue) -> Result<(), PhysicsError>;

/// A named, typed view of one body field.
#[derive(Clone, Copy)]
pub struct Property {
    pub name: &'static str,
    getter: Getter,
    setter: Option<Setter>,
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

impl Property {
    const fn read_only(name: &'static str, getter: Getter) -> Self {
        Self {
            name,
            getter,
            setter: None,
        }
    }

    const fn editable(name: &'static str, getter: Getter, setter: Setter) -> Self {
        Self {
            name,
            getter,
            setter: Some(setter),
        }
    }

    pub fn get(&self, body: &Body) -> PropertyValue {
        (self.getter)(body)
    }

    pub fn set(&self, body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
        match self.setter {
            Some(setter) => setter(body, value),
            None => Err(PhysicsError::ReadOnlyProperty(self.name)),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

fn shape_name(body: &Body) -> PropertyValue {
    PropertyValue::Text(body.shape_type().name())
}

fn position(body: &Body) -> PropertyValue {
    PropertyValue::Vec2(body.position())
}

fn set_position(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_position(value.vec2("position")?);
    Ok(())
}

fn orientation(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.orientation())
}

fn set_orientation(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_orientation(value.float("orientation")?);
    Ok(())
}

fn velocity(body: &Body) -> PropertyValue {
    PropertyValue::Vec2(body.velocity())
}

fn set_velocity(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_velocity(value.vec2("velocity")?);
    Ok(())
}

fn angular_velocity(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.angular_velocity())
}

fn set_angular_velocity(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_angular_velocity(value.float("angular_velocity")?);
    Ok(())
}

fn mass(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.mass())
}

fn set_mass(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_mass(value.float("mass")?)
}

fn elasticity(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.elasticity())
}

fn set_elasticity(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_elasticity(value.float("elasticity")?)
}

fn radius(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.radius().unwrap_or_default())
}

fn set_radius(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    body.set_radius(value.float("radius")?)
}

fn half_width(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.half_extents().unwrap_or_default().x)
}

fn set_half_width(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    let height = body.half_extents().unwrap_or_default().y;
    body.set_half_extents(value.float("half_width")?, height)
}

fn half_height(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.half_extents().unwrap_or_default().y)
}

fn set_half_height(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    let width = body.half_extents().unwrap_or_default().x;
    body.set_half_extents(width, value.float("half_height")?)
}

fn normal(body: &Body) -> PropertyValue {
    PropertyValue::Vec2(body.plane().map(|(n, _)| n).unwrap_or_default())
}

fn set_normal(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    let distance = body.plane().map(|(_, d)| d).unwrap_or_default();
    body.set_plane(value.vec2("normal")?, distance)
}

fn distance(body: &Body) -> PropertyValue {
    PropertyValue::Float(body.plane().map(|(_, d)| d).unwrap_or_default())
}

fn set_distance(body: &mut Body, value: PropertyValue) -> Result<(), PhysicsError> {
    let normal = body.plane().map(|(n, _)| n).unwrap_or_default();
    body.set_plane(normal, value.float("distance")?)
}

static PLANE_PROPERTIES: [Property; 4] = [
    Property::read_only("shape", shape_name),
    Property::editable("normal", normal, set_normal),
    Property::editable("distance", distance, set_distance),
    Property::editable("elasticity", elasticity, set_elasticity),
];

static CIRCLE_PROPERTIES: [Property; 8] = [
    Property::read_only("shape", shape_name),
    Property::editable("position", position, set_position),
    Property::editable("orientation", orientation, set_orientation),
    Property::editable("velocity", velocity, set_velocity),
    Property::editable("angular_velocity", angular_velocity, set_angular_velocity),
    Property::editable("mass", mass, set_mass),
    Property::editable("elasticity", elasticity, set_elasticity),
    Property::editable("radius", radius, set_radius),
];

static BOX_PROPERTIES: [Property; 9] = [
    Property::read_only("shape", shape_name),
    Property::editable("position", position, set_position),
    Property::editable("orientation", orientation, set_orientation),
    Property::editable("velocity", velocity, set_velocity),
    Property::editable("angular_velocity", angular_velocity, set_angular_velocity),
    Property::editable("mass", mass, set_mass),
    Property::editable("elasticity", elasticity, set_elasticity),
    Property::editable("half_width", half_width, set_half_width),
    Property::editable("half_height", half_height, set_half_height),
];

/// Every property exposed for bodies of `shape`.
pub fn properties(shape: ShapeType) -> &'static [Property] {
    match shape {
        ShapeType::Plane => &PLANE_PROPERTIES,
        ShapeType::Circle => &CIRCLE_PROPERTIES,
        ShapeType::Box => &BOX_PROPERTIES,
    }
}

/// Look up a property of `shape` by name.
pub fn find(shape: ShapeType, name: &str) -> Option<&'static Property> {
    properties(shape).iter().find(|p| p.name == name)
}
