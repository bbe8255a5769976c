//! Built-in component types

pub mod collider;
pub mod solid_body;
pub mod sprite;
pub mod transform;

pub use collider::Collider;
pub use solid_body::SolidBody;
pub use sprite::{Sprite, TextureId};
pub use transform::Transform;
