//! Debug visualization side channel
//!
//! A sink trait the simulation pushes overlay primitives into: quadtree
//! leaf boundaries and the shapes involved in collisions. Purely
//! observational; the default sink discards everything and the
//! simulation behaves identically with or without one attached.

use crate::physics::shape::{Rect, Shape};

/// RGBA color, components in 0.0..=1.0
pub type Color = [f32; 4];

/// Overlay color for spatial partition boundaries
pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
/// Overlay color for colliding shapes
pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
/// Overlay color for passive outlines
pub const WHITE_TRANSLUCENT: Color = [1.0, 1.0, 1.0, 0.3];

/// Receiver for debug overlay primitives
pub trait DebugDraw {
    /// Draw a world-space rectangle outline
    fn draw_rect(&mut self, rect: &Rect, color: Color);

    /// Draw a world-space shape outline
    fn draw_shape(&mut self, shape: &Shape, color: Color);
}

/// Sink that discards every primitive
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDebugDraw;

impl DebugDraw for NullDebugDraw {
    fn draw_rect(&mut self, _rect: &Rect, _color: Color) {}
    fn draw_shape(&mut self, _shape: &Shape, _color: Color) {}
}

/// Sink that buffers primitives for later inspection
///
/// Used by tests and by renderers that batch overlay geometry.
#[derive(Debug, Default)]
pub struct DebugDrawBuffer {
    /// Buffered rectangle outlines
    pub rects: Vec<(Rect, Color)>,
    /// Buffered shape outlines
    pub shapes: Vec<(Shape, Color)>,
}

impl DebugDrawBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all buffered primitives
    pub fn clear(&mut self) {
        self.rects.clear();
        self.shapes.clear();
    }
}

impl DebugDraw for DebugDrawBuffer {
    fn draw_rect(&mut self, rect: &Rect, color: Color) {
        self.rects.push((*rect, color));
    }

    fn draw_shape(&mut self, shape: &Shape, color: Color) {
        self.shapes.push((*shape, color));
    }
}
