//! Math utilities and types
//!
//! Provides fundamental math types for 2D simulation and game development.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Rotate a 2D vector counter-clockwise by an angle in radians
pub fn rotate_vec2(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalize a vector, falling back to the given unit vector when the
/// input has zero length. Geometric degeneracies are handled locally
/// with defined fallbacks rather than propagated as errors.
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let mag_sq = v.magnitude_squared();
    if mag_sq > 0.0 {
        v / mag_sq.sqrt()
    } else {
        fallback
    }
}
