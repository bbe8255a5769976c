//! Sprite component
//!
//! Pure render metadata. The texture handle is opaque to the core; the
//! simulation never interprets pixel data. An external renderer consumes
//! sprites through `Simulation::render_snapshot`.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::physics::shape::Rect;

/// Opaque handle to a texture owned by an external asset provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    /// Wrap a raw texture identifier
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw identifier back for the asset provider
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// A textured quad attached to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Texture to sample
    pub texture: TextureId,

    /// UV sub-rectangle within the texture
    pub tex_coords: Rect,

    /// World-space size of the quad before the entity's scale applies
    pub size: Vec2,
}

impl Component for Sprite {}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            texture: TextureId::new(0),
            tex_coords: Rect::new(Vec2::zeros(), Vec2::new(1.0, 1.0)),
            size: Vec2::new(1.0, 1.0),
        }
    }
}

impl Sprite {
    /// Create a sprite covering the full texture
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            size,
            ..Default::default()
        }
    }
}
