//! Spatial partitioning data structures
//!
//! Provides the per-frame quadtree used as the collision broad phase.

mod quadtree;

pub use quadtree::{QuadEntry, QuadNode, QuadTree, QuadTreeConfig};
