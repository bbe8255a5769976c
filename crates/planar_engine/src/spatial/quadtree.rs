//! Quadtree spatial partitioning structure
//!
//! Divides the play area into hierarchical quadrants so the collision
//! resolver only has to test shape pairs that share a leaf. The tree is
//! rebuilt from scratch every frame; nodes never persist across frames.
//!
//! Nodes live in an arena and address each other by index, never by
//! reference, so growth of the backing storage cannot invalidate an
//! in-flight traversal.

use serde::{Deserialize, Serialize};

use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use crate::physics::shape::{Rect, Shape};

/// Configuration for quadtree behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadTreeConfig {
    /// Maximum entries per leaf before subdivision
    pub capacity: usize,

    /// Maximum subdivision depth. At this depth a leaf accepts entries
    /// beyond capacity instead of subdividing, so clusters of coincident
    /// shapes cannot recurse forever.
    pub max_depth: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            max_depth: 8,
        }
    }
}

/// Entity-shape reference stored in the tree
#[derive(Debug, Clone, Copy)]
pub struct QuadEntry {
    /// Owning entity
    pub entity: Entity,
    /// Shape in world space
    pub shape: Shape,
    /// Cached world-space bounding rectangle of the shape
    pub aabb: Rect,
}

/// Single node in the quadtree
///
/// Either a leaf holding a bucket of entries, or an internal node with
/// exactly four children and an empty bucket.
#[derive(Debug)]
pub struct QuadNode {
    /// World-space boundary of this node
    pub bounds: Rect,

    /// Entries contained in this node (empty once subdivided)
    pub entries: Vec<QuadEntry>,

    /// Arena indices of the four quadrant children, None for a leaf
    children: Option<[usize; 4]>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl QuadNode {
    fn new(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Quadtree over the current frame's world-space shapes
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    config: QuadTreeConfig,
}

impl QuadTree {
    /// Build a tree over a set of world-space shapes
    ///
    /// Shapes are inserted in slice order. A shape overlapping several
    /// quadrants is stored in every overlapping leaf; the duplication is
    /// intentional over-approximation for the broad phase.
    pub fn build(boundary: Rect, config: &QuadTreeConfig, shapes: &[(Entity, Shape)]) -> Self {
        let mut tree = Self {
            nodes: vec![QuadNode::new(boundary, 0)],
            config: config.clone(),
        };
        for &(entity, shape) in shapes {
            tree.insert(QuadEntry {
                entity,
                shape,
                aabb: shape.aabb(),
            });
        }
        tree
    }

    fn insert(&mut self, entry: QuadEntry) {
        let mut pending = Vec::new();
        if entry.aabb.intersects(&self.nodes[0].bounds) {
            pending.push(0);
        }
        let mut inserted = false;
        while let Some(index) = pending.pop() {
            if self.nodes[index].is_leaf() {
                let has_room = self.nodes[index].entries.len() < self.config.capacity;
                let at_depth_cap = self.nodes[index].depth >= self.config.max_depth;
                if has_room || at_depth_cap {
                    self.nodes[index].entries.push(entry);
                    inserted = true;
                    continue;
                }
                self.subdivide(index);
            }
            if let Some(children) = self.nodes[index].children {
                for child in children {
                    if entry.aabb.intersects(&self.nodes[child].bounds) {
                        pending.push(child);
                    }
                }
            }
        }
        if !inserted {
            // Shapes must never be dropped, even outside the boundary.
            log::warn!(
                "shape of entity {:?} is outside the quadtree boundary; stashing it in the nearest leaf",
                entry.entity
            );
            let leaf = self.nearest_leaf(entry.aabb.center());
            self.nodes[leaf].entries.push(entry);
        }
    }

    /// Subdivide a leaf into four equal quadrants and redistribute its
    /// entries into every overlapping child
    fn subdivide(&mut self, index: usize) {
        let bounds = self.nodes[index].bounds;
        let center = bounds.center();
        let depth = self.nodes[index].depth + 1;
        let quadrants = [
            // top-right
            Rect::new(center, bounds.max),
            // bottom-right
            Rect::new(
                Vec2::new(center.x, bounds.min.y),
                Vec2::new(bounds.max.x, center.y),
            ),
            // bottom-left
            Rect::new(bounds.min, center),
            // top-left
            Rect::new(
                Vec2::new(bounds.min.x, center.y),
                Vec2::new(center.x, bounds.max.y),
            ),
        ];

        let first = self.nodes.len();
        for quadrant in quadrants {
            self.nodes.push(QuadNode::new(quadrant, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];

        let entries = std::mem::take(&mut self.nodes[index].entries);
        self.nodes[index].children = Some(children);
        for entry in entries {
            for child in children {
                if entry.aabb.intersects(&self.nodes[child].bounds) {
                    self.nodes[child].entries.push(entry);
                }
            }
        }
    }

    /// Descend from the root toward a point and return the closest leaf
    fn nearest_leaf(&self, point: Vec2) -> usize {
        let mut index = 0;
        while let Some(children) = self.nodes[index].children {
            index = children
                .into_iter()
                .min_by(|&a, &b| {
                    let da = (self.nodes[a].bounds.center() - point).magnitude_squared();
                    let db = (self.nodes[b].bounds.center() - point).magnitude_squared();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(index);
        }
        index
    }

    /// Iterate over all leaf nodes
    pub fn leaves(&self) -> impl Iterator<Item = &QuadNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &QuadNode> {
        self.nodes.iter()
    }

    /// Check whether an entity's shape landed in at least one leaf
    pub fn contains(&self, entity: Entity) -> bool {
        self.leaves()
            .any(|leaf| leaf.entries.iter().any(|entry| entry.entity == entity))
    }

    /// Total entry count across all leaves (duplicates included)
    pub fn entry_count(&self) -> usize {
        self.leaves().map(|leaf| leaf.entries.len()).sum()
    }

    /// Deepest leaf depth currently in the tree
    pub fn max_leaf_depth(&self) -> u32 {
        self.leaves().map(|leaf| leaf.depth).max().unwrap_or(0)
    }
}
