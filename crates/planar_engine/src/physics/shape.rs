//! Collision shape primitives
//!
//! Shapes are authored in an entity's local space and carried through
//! the collision pipeline in world space. World-space conversion applies
//! the entity's position and scale only: circles are rotation-invariant,
//! and rectangles deliberately stay axis-aligned even when their entity
//! rotates (an engine limitation, not a bug).

use serde::{Deserialize, Serialize};

use crate::ecs::components::Transform;
use crate::foundation::math::Vec2;

/// A circle with center and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center point
    pub center: Vec2,
    /// Radius, non-negative
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned rectangle spanned by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle centered at a point with given half-extents
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the rectangle
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this rectangle intersects another rectangle
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Closed set of collision shape kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A circular collision shape
    Circle(Circle),
    /// An axis-aligned rectangle collision shape. Never rotated with
    /// its entity's orientation.
    AARect(Rect),
}

impl Shape {
    /// Creates a circular shape
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::Circle(Circle::new(center, radius))
    }

    /// Creates an axis-aligned rectangle shape
    pub fn aa_rect(min: Vec2, max: Vec2) -> Self {
        Self::AARect(Rect::new(min, max))
    }

    /// World-space bounding rectangle of this shape
    pub fn aabb(&self) -> Rect {
        match self {
            Self::Circle(circle) => Rect::from_center_extents(
                circle.center,
                Vec2::new(circle.radius, circle.radius),
            ),
            Self::AARect(rect) => *rect,
        }
    }

    /// Convert a local-space shape to world space
    ///
    /// Circles scale uniformly by the larger scale axis, applied to both
    /// the center offset and the radius. Rectangles scale componentwise
    /// and translate. Orientation is never applied.
    pub fn to_world(&self, transform: &Transform) -> Shape {
        match self {
            Self::Circle(circle) => {
                let max_scale = transform.scale.x.max(transform.scale.y);
                Self::Circle(Circle::new(
                    transform.position + circle.center * max_scale,
                    circle.radius * max_scale,
                ))
            }
            Self::AARect(rect) => Self::AARect(Rect::new(
                Vec2::new(
                    rect.min.x * transform.scale.x,
                    rect.min.y * transform.scale.y,
                ) + transform.position,
                Vec2::new(
                    rect.max.x * transform.scale.x,
                    rect.max.y * transform.scale.y,
                ) + transform.position,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_center_and_extents() {
        let rect = Rect::new(Vec2::new(-2.0, -1.0), Vec2::new(4.0, 3.0));
        assert_eq!(rect.center(), Vec2::new(1.0, 1.0));
        assert_eq!(rect.extents(), Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_rect_intersects_touching_edges() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Rect::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let c = Rect::new(Vec2::new(1.1, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_circle_world_transform_uses_max_scale() {
        let transform = Transform {
            position: Vec2::new(10.0, 0.0),
            orientation: 1.3,
            scale: Vec2::new(2.0, 3.0),
        };
        let local = Shape::circle(Vec2::new(1.0, 0.0), 0.5);
        let Shape::Circle(world) = local.to_world(&transform) else {
            panic!("circle stayed a circle");
        };
        assert_relative_eq!(world.center, Vec2::new(13.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(world.radius, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_rect_world_transform_ignores_orientation() {
        let transform = Transform {
            position: Vec2::new(1.0, 2.0),
            orientation: std::f32::consts::PI, // must have no effect
            scale: Vec2::new(2.0, 1.0),
        };
        let local = Shape::aa_rect(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let Shape::AARect(world) = local.to_world(&transform) else {
            panic!("rect stayed a rect");
        };
        assert_relative_eq!(world.min, Vec2::new(-1.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(world.max, Vec2::new(3.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_shape_aabb() {
        let circle = Shape::circle(Vec2::new(1.0, 1.0), 2.0);
        let aabb = circle.aabb();
        assert_eq!(aabb.min, Vec2::new(-1.0, -1.0));
        assert_eq!(aabb.max, Vec2::new(3.0, 3.0));
    }
}
