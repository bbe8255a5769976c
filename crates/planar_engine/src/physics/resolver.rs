//! Per-frame collision resolution
//!
//! Rebuilds the broad-phase quadtree from the colliders' cached
//! world-space shapes, narrow-phase tests every same-leaf pair once,
//! and publishes the results as per-entity collision records. Records
//! are valid for the frame they were produced in and are discarded by
//! the next `resolve` call.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::ecs::components::Collider;
use crate::ecs::{ComponentStore, Entity};
use crate::foundation::math::Vec2;
use crate::physics::narrow;
use crate::physics::shape::Rect;
use crate::spatial::{QuadTree, QuadTreeConfig};

/// One collision involving an entity, seen from that entity's side
///
/// Each overlapping pair produces two records, one per participant,
/// with the roles swapped. `normal_a` belongs to the owning entity's
/// shape; `normal_b` to the other entity's shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// The other entity in the pair
    pub other: Entity,
    /// Unit normal pointing away from this entity's shape
    pub normal_a: Vec2,
    /// Unit normal pointing away from the other entity's shape
    pub normal_b: Vec2,
}

/// Timing and workload counters for one resolve pass
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveStats {
    /// Shapes fed into the broad phase
    pub shape_count: usize,
    /// Leaves in the rebuilt quadtree
    pub leaf_count: usize,
    /// Narrow-phase tests performed after deduplication
    pub pair_tests: usize,
    /// Overlapping pairs found
    pub collision_count: usize,
    /// Wall-clock time of the pass
    pub duration: Duration,
}

/// Broad- and narrow-phase collision pipeline
pub struct CollisionResolver {
    boundary: Rect,
    config: QuadTreeConfig,
    records: HashMap<Entity, Vec<Collision>>,
    tree: Option<QuadTree>,
    stats: ResolveStats,
}

impl CollisionResolver {
    /// Create a resolver over a fixed world boundary
    pub fn new(boundary: Rect, config: QuadTreeConfig) -> Self {
        Self {
            boundary,
            config,
            records: HashMap::new(),
            tree: None,
            stats: ResolveStats::default(),
        }
    }

    /// Run one collision pass over the colliders' world-space shapes
    ///
    /// Every entity in the store gets a record list for this frame, an
    /// empty one when nothing touched it. A pair sharing several leaves
    /// is tested once. Colliders whose world-space cache has not been
    /// refreshed this frame are skipped.
    pub fn resolve(&mut self, colliders: &ComponentStore<Collider>) {
        let start = Instant::now();
        self.records.clear();

        let mut shapes = Vec::with_capacity(colliders.len());
        for (entity, collider) in colliders.iter() {
            self.records.insert(entity, Vec::new());
            match collider.world_shape() {
                Some(shape) => shapes.push((entity, *shape)),
                None => log::debug!("collider of {entity:?} has no world shape; skipping"),
            }
        }

        let tree = QuadTree::build(self.boundary, &self.config, &shapes);

        let mut tested: HashSet<(Entity, Entity)> = HashSet::new();
        let mut pair_tests = 0;
        let mut collision_count = 0;
        for leaf in tree.leaves() {
            for i in 0..leaf.entries.len() {
                for j in (i + 1)..leaf.entries.len() {
                    let a = &leaf.entries[i];
                    let b = &leaf.entries[j];
                    if a.entity == b.entity {
                        // The same shape duplicated into this leaf twice.
                        continue;
                    }
                    let key = if a.entity < b.entity {
                        (a.entity, b.entity)
                    } else {
                        (b.entity, a.entity)
                    };
                    if !tested.insert(key) {
                        continue;
                    }
                    pair_tests += 1;
                    if let Some(contact) = narrow::collide(&a.shape, &b.shape) {
                        collision_count += 1;
                        self.record(a.entity, b.entity, contact.normal_a, contact.normal_b);
                        self.record(b.entity, a.entity, contact.normal_b, contact.normal_a);
                    }
                }
            }
        }

        self.stats = ResolveStats {
            shape_count: shapes.len(),
            leaf_count: tree.leaves().count(),
            pair_tests,
            collision_count,
            duration: start.elapsed(),
        };
        self.tree = Some(tree);
    }

    fn record(&mut self, owner: Entity, other: Entity, normal_a: Vec2, normal_b: Vec2) {
        self.records.entry(owner).or_default().push(Collision {
            other,
            normal_a,
            normal_b,
        });
    }

    /// Collision records for an entity from the latest pass
    ///
    /// Empty for entities that collided with nothing or were not part of
    /// the pass.
    pub fn collisions(&self, entity: Entity) -> &[Collision] {
        self.records.get(&entity).map_or(&[], Vec::as_slice)
    }

    /// Counters from the latest pass
    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    /// The quadtree built by the latest pass, for debug visualization
    pub fn last_tree(&self) -> Option<&QuadTree> {
        self.tree.as_ref()
    }

    /// World boundary the broad phase partitions
    pub fn boundary(&self) -> Rect {
        self.boundary
    }
}
