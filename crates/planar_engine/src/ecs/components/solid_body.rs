//! SolidBody component
//!
//! Velocity state for entities that respond physically to contacts.
//! The integration step lives in `physics::dynamics`.

use crate::ecs::Component;
use crate::foundation::math::Vec2;

/// A body that bounces off the surfaces it collides with
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolidBody {
    /// Current velocity in units per second
    pub velocity: Vec2,
}

impl Component for SolidBody {}

impl SolidBody {
    /// Create a body at rest
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body with an initial velocity
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self { velocity }
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}
