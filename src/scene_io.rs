//! Persisted scene layout.
//!
//! Records mirror the on-disk JSON format:
//!
//! ```json
//! { "Actors": { "Planes": [...], "Circle": [...], "Box": [...] } }
//! ```
//!
//! Bodies are rebuilt only from these fields, so mass properties and box axes
//! are always derived fresh. Reading and writing the text is left to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::physics::body::{Body, Shape};
use crate::scene::Scene;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    #[serde(rename = "Actors", default)]
    pub actors: ActorsRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorsRecord {
    #[serde(rename = "Planes", default, skip_serializing_if = "Vec::is_empty")]
    pub planes: Vec<PlaneRecord>,
    #[serde(rename = "Circle", default, skip_serializing_if = "Vec::is_empty")]
    pub circles: Vec<CircleRecord>,
    #[serde(rename = "Box", default, skip_serializing_if = "Vec::is_empty")]
    pub boxes: Vec<BoxRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneRecord {
    #[serde(rename = "normalx")]
    pub normal_x: f32,
    #[serde(rename = "normaly")]
    pub normal_y: f32,
    #[serde(rename = "origindistance")]
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleRecord {
    #[serde(rename = "positionx")]
    pub position_x: f32,
    #[serde(rename = "positiony")]
    pub position_y: f32,
    #[serde(rename = "velocityx")]
    pub velocity_x: f32,
    #[serde(rename = "velocityy")]
    pub velocity_y: f32,
    pub mass: f32,
    /// Radians.
    pub orientation: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    #[serde(rename = "positionx")]
    pub position_x: f32,
    #[serde(rename = "positiony")]
    pub position_y: f32,
    #[serde(rename = "velocityx")]
    pub velocity_x: f32,
    #[serde(rename = "velocityy")]
    pub velocity_y: f32,
    pub mass: f32,
    /// Radians.
    pub orientation: f32,
    #[serde(rename = "halfwidth")]
    pub half_width: f32,
    #[serde(rename = "halfheight")]
    pub half_height: f32,
}

impl PlaneRecord {
    pub fn to_body(&self) -> Result<Body, PhysicsError> {
        Body::new_plane(Vec2::new(self.normal_x, self.normal_y), self.distance)
    }
}

impl CircleRecord {
    pub fn to_body(&self) -> Result<Body, PhysicsError> {
        let mut body = Body::new_circle(
            Vec2::new(self.position_x, self.position_y),
            Vec2::new(self.velocity_x, self.velocity_y),
            self.mass,
            self.radius,
        )?;
        body.set_orientation(self.orientation);
        Ok(body)
    }
}

impl BoxRecord {
    pub fn to_body(&self) -> Result<Body, PhysicsError> {
        Body::new_box(
            Vec2::new(self.position_x, self.position_y),
            Vec2::new(self.velocity_x, self.velocity_y),
            self.mass,
            self.half_width,
            self.half_height,
            self.orientation,
        )
    }
}

impl ActorsRecord {
    /// Append the record for `body` to the matching list.
    pub fn push(&mut self, body: &Body) {
        let position = body.position();
        let velocity = body.velocity();
        match *body.shape() {
            Shape::Plane { normal, distance } => self.planes.push(PlaneRecord {
                normal_x: normal.x,
                normal_y: normal.y,
                distance,
            }),
            Shape::Circle { radius } => self.circles.push(CircleRecord {
                position_x: position.x,
                position_y: position.y,
                velocity_x: velocity.x,
                velocity_y: velocity.y,
                mass: body.mass(),
                orientation: body.orientation(),
                radius,
            }),
            Shape::Box {
                half_width,
                half_height,
                ..
            } => self.boxes.push(BoxRecord {
                position_x: position.x,
                position_y: position.y,
                velocity_x: velocity.x,
                velocity_y: velocity.y,
                mass: body.mass(),
                orientation: body.orientation(),
                half_width,
                half_height,
            }),
        }
    }
}

impl Scene {
    /// Snapshot every body into the persisted layout.
    pub fn to_record(&self) -> SceneRecord {
        let mut record = SceneRecord::default();
        for (_, body) in self.iter() {
            record.actors.push(&body);
        }
        record
    }

    /// Build a scene from a record: planes first, then circles, then boxes.
    ///
    /// Fails on the first invalid body without returning a partial scene.
    pub fn from_record(record: &SceneRecord) -> Result<Scene, PhysicsError> {
        let actors = &record.actors;
        let bodies = actors
            .planes
            .iter()
            .map(PlaneRecord::to_body)
            .chain(actors.circles.iter().map(CircleRecord::to_body))
            .chain(actors.boxes.iter().map(BoxRecord::to_body))
            .collect::<Result<Vec<_>, _>>()?;

        let mut scene = Scene::new();
        for body in bodies {
            scene.add(body);
        }
        tracing::debug!(bodies = scene.len(), "scene loaded from record");
        Ok(scene)
    }
}
