//! Physics module for collision detection and response
//!
//! Narrow-phase shape tests, the per-frame collision resolver, and the
//! SolidBody bounce response.

pub mod dynamics;
pub mod narrow;
pub mod resolver;
pub mod shape;

pub use dynamics::PhysicsError;
pub use narrow::Contact;
pub use resolver::{Collision, CollisionResolver, ResolveStats};
pub use shape::{Circle, Rect, Shape};
