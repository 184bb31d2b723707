//! Debug drawing of bodies and contacts into a caller-supplied sink.

use glam::{Vec2, Vec4};

use crate::math;
use crate::physics::body::{Body, Shape};

/// Half-length of the segment drawn for an infinite plane.
pub const PLANE_DRAW_EXTENT: f32 = 25.0;

pub const BODY_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const CONTACT_COLOR: Vec4 = Vec4::new(1.0, 0.2, 0.2, 1.0);

/// Receives debug primitives in world space.
pub trait DebugDraw {
    fn line(&mut self, from: Vec2, to: Vec2, color: Vec4);
    fn circle(&mut self, centre: Vec2, radius: f32, color: Vec4);
    fn point(&mut self, position: Vec2, color: Vec4);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line { from: Vec2, to: Vec2, color: Vec4 },
    Circle { centre: Vec2, radius: f32, color: Vec4 },
    Point { position: Vec2, color: Vec4 },
}

/// A [`DebugDraw`] sink that records every primitive.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DebugDraw for DrawList {
    fn line(&mut self, from: Vec2, to: Vec2, color: Vec4) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn circle(&mut self, centre: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Circle {
            centre,
            radius,
            color,
        });
    }

    fn point(&mut self, position: Vec2, color: Vec4) {
        self.commands.push(DrawCommand::Point { position, color });
    }
}

impl Body {
    /// Emit the outline of this body.
    pub fn draw(&self, sink: &mut impl DebugDraw, color: Vec4) {
        match *self.shape() {
            Shape::Plane { normal, distance } => {
                let centre = normal * distance;
                let along = normal.perp() * PLANE_DRAW_EXTENT;
                sink.line(centre, centre + along, color);
                sink.line(centre, centre - along, color);
            }
            Shape::Circle { radius } => {
                let position = self.position();
                sink.circle(position, radius, color);
                // Radius marker showing the orientation
                let marker = math::rotate(Vec2::X, self.orientation()) * radius;
                sink.line(position, position + marker, color);
            }
            Shape::Box { .. } => {
                if let Some([a, b, c, d]) = self.corners() {
                    // Corners are (+x+y), (+x-y), (-x+y), (-x-y)
                    sink.line(a, b, color);
                    sink.line(b, d, color);
                    sink.line(d, c, color);
                    sink.line(c, a, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_draws_two_segments() {
        let plane = Body::new_plane(Vec2::Y, 2.0).unwrap();
        let mut list = DrawList::new();
        plane.draw(&mut list, BODY_COLOR);
        assert_eq!(list.len(), 2);
        let DrawCommand::Line { from, to, .. } = list.commands[0] else {
            panic!("expected a line");
        };
        assert_eq!(from, Vec2::new(0.0, 2.0));
        assert!((to - Vec2::new(-25.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_draws_outline_and_marker() {
        let circle = Body::new_circle(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0, 0.5).unwrap();
        let mut list = DrawList::new();
        circle.draw(&mut list, BODY_COLOR);
        assert_eq!(list.len(), 2);
        assert!(matches!(
            list.commands[0],
            DrawCommand::Circle { radius, .. } if radius == 0.5
        ));
    }

    #[test]
    fn test_box_draws_closed_outline() {
        let body = Body::new_box(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0, 0.5, 0.4).unwrap();
        let mut list = DrawList::new();
        body.draw(&mut list, BODY_COLOR);
        assert_eq!(list.len(), 4);

        let lines: Vec<(Vec2, Vec2)> = list
            .commands
            .iter()
            .filter_map(|c| match *c {
                DrawCommand::Line { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect();
        for window in lines.windows(2) {
            assert_eq!(window[0].1, window[1].0);
        }
        assert_eq!(lines[3].1, lines[0].0);
    }
}
