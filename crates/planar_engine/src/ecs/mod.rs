//! Entity-Component-System implementation
//!
//! Provides the entity registry and densely packed per-component storage
//! that back the simulation core.

pub mod components;
pub mod entity;
pub mod store;

pub use entity::{Entity, EntityRegistry};
pub use store::ComponentStore;

/// Marker trait for components
pub trait Component: 'static + Send + Sync {}

/// Errors raised by entity and component-store operations
///
/// These are recoverable contract violations: a caller may log and skip
/// rather than abort the frame.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// Operation referenced a destroyed or unknown entity
    #[error("entity {0:?} is not alive")]
    InvalidHandle(Entity),

    /// The entity already has a component of this kind
    #[error("entity {0:?} already has a component of this kind")]
    DuplicateComponent(Entity),

    /// The entity has no component of this kind
    #[error("entity {0:?} has no component of this kind")]
    NotFound(Entity),
}
