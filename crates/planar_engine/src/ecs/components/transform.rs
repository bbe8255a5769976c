//! Transform component
//!
//! Pure data component representing an entity's placement in the 2D
//! world. Mutated by movement and gameplay code; read by every other
//! system.

use crate::ecs::Component;
use crate::foundation::math::{rotate_vec2, Vec2};

/// Position, orientation and scale of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World space position
    pub position: Vec2,

    /// Orientation angle in radians. Accumulates unbounded; it is not
    /// normalized into [0, 2π).
    pub orientation: f32,

    /// Componentwise scale factors
    pub scale: Vec2,
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            orientation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Move by a translation vector
    pub fn translate(&mut self, translation: Vec2) {
        self.position += translation;
    }

    /// Rotate in place by an angle in radians
    pub fn rotate(&mut self, rotation: f32) {
        self.orientation += rotation;
    }

    /// Rotate around a world-space pivot point
    pub fn rotate_around(&mut self, point: Vec2, rotation: f32) {
        self.orientation += rotation;
        self.position = rotate_vec2(self.position - point, rotation) + point;
    }

    /// Set the world-space position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Set the orientation angle in radians
    pub fn set_orientation(&mut self, orientation: f32) {
        self.orientation = orientation;
    }

    /// Set the scale factors
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }
}
