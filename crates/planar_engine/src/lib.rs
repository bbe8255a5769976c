//! # Planar Engine
//!
//! The simulation core of a 2D real-time engine: a component-oriented
//! entity store and a quadtree-based collision pipeline, presentation
//! free by design. Rendering, input and audio live in host applications
//! that read the per-frame snapshot.
//!
//! ## Features
//!
//! - **Generational entities**: handles stay detectably stale after a
//!   destroy, even when the storage slot is recycled
//! - **Dense component storage**: contiguous per-kind arrays with O(1)
//!   attach, lookup and swap-remove
//! - **Quadtree broad phase**: rebuilt each frame, bounded depth,
//!   shapes never dropped
//! - **Collision response**: solid bodies reflect off accumulated
//!   contact normals and integrate forward
//!
//! ## Quick Start
//!
//! ```rust
//! use planar_engine::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut sim = Simulation::new(&SimConfig::default());
//!
//!     let ball = sim.spawn();
//!     sim.add_transform(ball, Transform::from_position(Vec2::new(0.0, 10.0)))?;
//!     sim.add_collider(ball, Collider::circle(Vec2::zeros(), 1.0))?;
//!     sim.add_solid_body(ball, SolidBody::with_velocity(Vec2::new(0.0, -5.0)))?;
//!
//!     sim.step(1.0 / 60.0)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod debug_draw;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod simulation;
pub mod spatial;

pub use simulation::{RenderInstance, SimStats, Simulation, SimulationError};

/// Common imports for simulation users
pub mod prelude {
    pub use crate::{
        config::{Config, SimConfig},
        debug_draw::{DebugDraw, DebugDrawBuffer, NullDebugDraw},
        ecs::components::{Collider, SolidBody, Sprite, TextureId, Transform},
        ecs::{ComponentStore, EcsError, Entity, EntityRegistry},
        foundation::{math::Vec2, time::Timer},
        physics::{Circle, Rect, Shape},
        simulation::{RenderInstance, SimStats, Simulation, SimulationError},
        spatial::{QuadTree, QuadTreeConfig},
    };
}
