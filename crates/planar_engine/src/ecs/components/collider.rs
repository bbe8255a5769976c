//! Collider component
//!
//! Stores a collision shape in the entity's local space plus a cached
//! world-space copy. The cache is scratch data: it is recomputed from
//! the entity's Transform at the start of each collision pass and must
//! never be read across frames.

use crate::ecs::components::{Sprite, Transform};
use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::physics::shape::{Circle, Rect, Shape};

/// Collision shape attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Shape in the entity's local space
    pub shape: Shape,

    world_shape: Option<Shape>,
}

impl Component for Collider {}

impl Default for Collider {
    fn default() -> Self {
        Self::new(Shape::Circle(Circle::new(Vec2::zeros(), 0.0)))
    }
}

impl Collider {
    /// Create a collider from a local-space shape
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            world_shape: None,
        }
    }

    /// Create a circular collider
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::new(Shape::circle(center, radius))
    }

    /// Create an axis-aligned rectangle collider
    pub fn aa_rect(min: Vec2, max: Vec2) -> Self {
        Self::new(Shape::aa_rect(min, max))
    }

    /// Size a circular collider so it covers a sprite
    ///
    /// Uses the sprite's larger dimension as the diameter. Has no effect
    /// on rectangle colliders.
    pub fn fit_circle_to_sprite(&mut self, sprite: &Sprite) {
        if let Shape::Circle(ref mut circle) = self.shape {
            circle.radius = sprite.size.x.max(sprite.size.y) / 2.0;
        }
    }

    /// Recompute the world-space shape cache from the entity's transform
    pub(crate) fn refresh_world_shape(&mut self, transform: &Transform) {
        self.world_shape = Some(self.shape.to_world(transform));
    }

    /// The cached world-space shape, if a collision pass has computed it
    pub fn world_shape(&self) -> Option<&Shape> {
        self.world_shape.as_ref()
    }

    /// World-space bounding rectangle of the cached shape
    pub fn world_aabb(&self) -> Option<Rect> {
        self.world_shape.as_ref().map(Shape::aabb)
    }
}
