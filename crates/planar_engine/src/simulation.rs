//! Owned simulation context
//!
//! Bundles the entity registry, the component stores and the collision
//! resolver behind one `step(dt)` entry point, so a host application
//! drives the whole core through a single value. Frame order: refresh
//! world-space collider caches, resolve collisions, integrate solid
//! bodies.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::SimConfig;
use crate::debug_draw::{DebugDraw, NullDebugDraw, BLUE, GREEN, WHITE_TRANSLUCENT};
use crate::ecs::components::{Collider, SolidBody, Sprite, Transform};
use crate::ecs::{ComponentStore, EcsError, Entity, EntityRegistry};
use crate::foundation::math::Vec2;
use crate::physics::dynamics;
use crate::physics::resolver::{Collision, CollisionResolver, ResolveStats};
use crate::physics::PhysicsError;

/// Errors surfaced by simulation operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// Entity or component contract violation
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Dynamics step failure
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Timing breakdown of the latest frame
#[derive(Debug, Clone, Copy, Default)]
pub struct SimStats {
    /// Frames stepped since creation
    pub frame: u64,
    /// Time spent refreshing world-space collider caches
    pub sync_duration: Duration,
    /// Broad- and narrow-phase counters
    pub resolve: ResolveStats,
    /// Time spent in the dynamics step
    pub integrate_duration: Duration,
}

/// One renderable row of the frame snapshot
///
/// Internally consistent: every field was read from the same frame's
/// component data.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstance {
    /// Entity the row belongs to
    pub entity: Entity,
    /// World-space position
    pub position: Vec2,
    /// Orientation in radians
    pub orientation: f32,
    /// Componentwise scale
    pub scale: Vec2,
    /// Sprite metadata, when the entity has one
    pub sprite: Option<Sprite>,
}

/// The simulation core: registry, stores, resolver and frame stepping
pub struct Simulation {
    registry: EntityRegistry,
    transforms: ComponentStore<Transform>,
    colliders: ComponentStore<Collider>,
    bodies: ComponentStore<SolidBody>,
    sprites: ComponentStore<Sprite>,
    resolver: CollisionResolver,
    stats: SimStats,
}

impl Simulation {
    /// Create a simulation over the configured play area
    pub fn new(config: &SimConfig) -> Self {
        Self {
            registry: EntityRegistry::new(),
            transforms: ComponentStore::new(),
            colliders: ComponentStore::new(),
            bodies: ComponentStore::new(),
            sprites: ComponentStore::new(),
            resolver: CollisionResolver::new(config.boundary, config.quadtree.clone()),
            stats: SimStats::default(),
        }
    }

    /// Create a new entity
    pub fn spawn(&mut self) -> Entity {
        self.registry.create()
    }

    /// Destroy an entity and detach all of its components
    pub fn despawn(&mut self, entity: Entity) -> Result<(), SimulationError> {
        self.registry.destroy(entity)?;
        // Components are optional; absence is not an error here.
        let _ = self.transforms.remove(entity);
        let _ = self.colliders.remove(entity);
        let _ = self.bodies.remove(entity);
        let _ = self.sprites.remove(entity);
        Ok(())
    }

    /// Check whether a handle refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity)
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.registry.live_count()
    }

    fn check_alive(&self, entity: Entity) -> Result<(), SimulationError> {
        if self.registry.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidHandle(entity).into())
        }
    }

    /// Attach a transform to a live entity
    pub fn add_transform(
        &mut self,
        entity: Entity,
        transform: Transform,
    ) -> Result<(), SimulationError> {
        self.check_alive(entity)?;
        self.transforms.add(entity, transform)?;
        Ok(())
    }

    /// Attach a collider to a live entity
    pub fn add_collider(
        &mut self,
        entity: Entity,
        collider: Collider,
    ) -> Result<(), SimulationError> {
        self.check_alive(entity)?;
        self.colliders.add(entity, collider)?;
        Ok(())
    }

    /// Attach a solid body to a live entity
    pub fn add_solid_body(
        &mut self,
        entity: Entity,
        body: SolidBody,
    ) -> Result<(), SimulationError> {
        self.check_alive(entity)?;
        self.bodies.add(entity, body)?;
        Ok(())
    }

    /// Attach a sprite to a live entity
    pub fn add_sprite(&mut self, entity: Entity, sprite: Sprite) -> Result<(), SimulationError> {
        self.check_alive(entity)?;
        self.sprites.add(entity, sprite)?;
        Ok(())
    }

    /// Transform store, read-only
    pub fn transforms(&self) -> &ComponentStore<Transform> {
        &self.transforms
    }

    /// Transform store for mutation
    ///
    /// Mutations are tracked; the next `step` refreshes the world-space
    /// collider cache of every entity touched here.
    pub fn transforms_mut(&mut self) -> &mut ComponentStore<Transform> {
        &mut self.transforms
    }

    /// Collider store, read-only
    pub fn colliders(&self) -> &ComponentStore<Collider> {
        &self.colliders
    }

    /// Collider store for mutation
    pub fn colliders_mut(&mut self) -> &mut ComponentStore<Collider> {
        &mut self.colliders
    }

    /// Solid-body store, read-only
    pub fn bodies(&self) -> &ComponentStore<SolidBody> {
        &self.bodies
    }

    /// Solid-body store for mutation
    pub fn bodies_mut(&mut self) -> &mut ComponentStore<SolidBody> {
        &mut self.bodies
    }

    /// Sprite store, read-only
    pub fn sprites(&self) -> &ComponentStore<Sprite> {
        &self.sprites
    }

    /// Collision records of the latest frame for an entity
    pub fn collisions(&self, entity: Entity) -> &[Collision] {
        self.resolver.collisions(entity)
    }

    /// Timing breakdown of the latest frame
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Advance the simulation by one frame
    pub fn step(&mut self, dt: f32) -> Result<(), SimulationError> {
        self.step_with_debug(dt, &mut NullDebugDraw)
    }

    /// Advance one frame, pushing overlay primitives into a debug sink
    ///
    /// The sink receives the quadtree leaf boundaries, the world shape
    /// of every entity that collided this frame, and a translucent
    /// bounding box for every collider that did not. Stepping with the
    /// null sink is behaviorally identical.
    pub fn step_with_debug(
        &mut self,
        dt: f32,
        debug: &mut dyn DebugDraw,
    ) -> Result<(), SimulationError> {
        let sync_start = Instant::now();
        self.sync_collider_caches();
        let sync_duration = sync_start.elapsed();

        self.resolver.resolve(&self.colliders);
        self.emit_debug(debug);

        let integrate_start = Instant::now();
        dynamics::integrate(
            dt,
            &mut self.bodies,
            &mut self.transforms,
            &self.colliders,
            &self.resolver,
        )?;
        let integrate_duration = integrate_start.elapsed();

        self.stats = SimStats {
            frame: self.stats.frame + 1,
            sync_duration,
            resolve: *self.resolver.stats(),
            integrate_duration,
        };
        log::debug!(
            "frame {}: sync {:?}, resolve {:?} ({} shapes, {} pairs, {} collisions), integrate {:?}",
            self.stats.frame,
            self.stats.sync_duration,
            self.stats.resolve.duration,
            self.stats.resolve.shape_count,
            self.stats.resolve.pair_tests,
            self.stats.resolve.collision_count,
            self.stats.integrate_duration,
        );
        Ok(())
    }

    /// Refresh the world-space shape of colliders whose transform or
    /// local shape changed since the last frame, or that have never
    /// been refreshed
    fn sync_collider_caches(&mut self) {
        let entities: Vec<Entity> = self.colliders.entities().collect();
        for entity in entities {
            let stale = self
                .colliders
                .get(entity)
                .is_some_and(|c| c.world_shape().is_none())
                || self.transforms.was_changed(entity)
                || self.colliders.was_changed(entity);
            if !stale {
                continue;
            }
            let Some(transform) = self.transforms.get(entity) else {
                log::warn!("collider of {entity:?} has no transform; leaving its cache stale");
                continue;
            };
            let transform = transform.clone();
            if let Some(collider) = self.colliders.get_mut(entity) {
                collider.refresh_world_shape(&transform);
            }
        }
        self.transforms.clear_changed();
        // The refresh itself goes through get_mut and re-marks entities,
        // so the collider change list is cleared after the loop.
        self.colliders.clear_changed();
    }

    fn emit_debug(&self, debug: &mut dyn DebugDraw) {
        if let Some(tree) = self.resolver.last_tree() {
            for leaf in tree.leaves() {
                debug.draw_rect(&leaf.bounds, GREEN);
            }
        }
        for (entity, collider) in self.colliders.iter() {
            if self.resolver.collisions(entity).is_empty() {
                if let Some(aabb) = collider.world_aabb() {
                    debug.draw_rect(&aabb, WHITE_TRANSLUCENT);
                }
            } else if let Some(shape) = collider.world_shape() {
                debug.draw_shape(shape, BLUE);
            }
        }
    }

    /// Read-only snapshot of everything an external renderer needs
    ///
    /// One row per entity with a transform, in storage order, carrying
    /// that entity's sprite when it has one.
    pub fn render_snapshot(&self) -> Vec<RenderInstance> {
        self.transforms
            .iter()
            .map(|(entity, transform)| RenderInstance {
                entity,
                position: transform.position,
                orientation: transform.orientation,
                scale: transform.scale,
                sprite: self.sprites.get(entity).copied(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_draw::DebugDrawBuffer;
    use crate::physics::Shape;
    use approx::assert_relative_eq;

    fn sim() -> Simulation {
        Simulation::new(&SimConfig::default())
    }

    fn spawn_ball(sim: &mut Simulation, position: Vec2, radius: f32, velocity: Vec2) -> Entity {
        let entity = sim.spawn();
        sim.add_transform(entity, Transform::from_position(position))
            .unwrap();
        sim.add_collider(entity, Collider::circle(Vec2::zeros(), radius))
            .unwrap();
        sim.add_solid_body(entity, SolidBody::with_velocity(velocity))
            .unwrap();
        entity
    }

    #[test]
    fn test_components_on_dead_entity_are_rejected() {
        let mut sim = sim();
        let entity = sim.spawn();
        sim.despawn(entity).unwrap();

        let result = sim.add_transform(entity, Transform::identity());
        assert_eq!(
            result,
            Err(SimulationError::Ecs(EcsError::InvalidHandle(entity)))
        );
    }

    #[test]
    fn test_despawn_detaches_components() {
        let mut sim = sim();
        let entity = spawn_ball(&mut sim, Vec2::zeros(), 1.0, Vec2::zeros());
        assert!(sim.transforms().contains(entity));

        sim.despawn(entity).unwrap();
        assert!(!sim.transforms().contains(entity));
        assert!(!sim.colliders().contains(entity));
        assert!(!sim.bodies().contains(entity));
        assert_eq!(sim.live_count(), 0);
    }

    #[test]
    fn test_step_detects_collisions_between_moved_entities() {
        let mut sim = sim();
        let a = spawn_ball(&mut sim, Vec2::zeros(), 1.0, Vec2::zeros());
        let b = spawn_ball(&mut sim, Vec2::new(10.0, 0.0), 1.0, Vec2::zeros());

        sim.step(0.016).unwrap();
        assert!(sim.collisions(a).is_empty());

        // Teleport b next to a; the cache refresh must pick it up.
        sim.transforms_mut()
            .get_mut(b)
            .unwrap()
            .set_position(Vec2::new(1.5, 0.0));
        sim.step(0.016).unwrap();
        assert_eq!(sim.collisions(a).len(), 1);
        assert_eq!(sim.collisions(a)[0].other, b);
    }

    #[test]
    fn test_step_detects_collisions_after_local_shape_change() {
        let mut sim = sim();
        let a = spawn_ball(&mut sim, Vec2::zeros(), 0.1, Vec2::zeros());
        let b = spawn_ball(&mut sim, Vec2::new(1.5, 0.0), 0.1, Vec2::zeros());

        sim.step(0.016).unwrap();
        assert!(sim.collisions(a).is_empty());

        // Grow a's local circle until it reaches b; the transform is
        // untouched, so only the collider mutation can trigger the
        // cache refresh.
        if let Shape::Circle(ref mut circle) =
            sim.colliders_mut().get_mut(a).unwrap().shape
        {
            circle.radius = 2.0;
        }
        sim.step(0.016).unwrap();
        assert_eq!(sim.collisions(a).len(), 1);
        assert_eq!(sim.collisions(a)[0].other, b);
    }

    #[test]
    fn test_bounce_through_full_frame() {
        let mut sim = sim();
        let wall = sim.spawn();
        sim.add_transform(wall, Transform::identity()).unwrap();
        sim.add_collider(
            wall,
            Collider::aa_rect(Vec2::new(-10.0, -2.0), Vec2::new(10.0, 0.0)),
        )
        .unwrap();
        let ball = spawn_ball(&mut sim, Vec2::new(0.0, 0.5), 0.75, Vec2::new(0.0, -5.0));

        sim.step(0.1).unwrap();

        assert_relative_eq!(
            sim.bodies().get(ball).unwrap().velocity,
            Vec2::new(0.0, 5.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_render_snapshot_reflects_current_transforms() {
        let mut sim = sim();
        let entity = sim.spawn();
        sim.add_transform(entity, Transform::from_position(Vec2::new(3.0, -2.0)))
            .unwrap();
        sim.add_sprite(entity, Sprite::default()).unwrap();

        let snapshot = sim.render_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].entity, entity);
        assert_eq!(snapshot[0].position, Vec2::new(3.0, -2.0));
        assert!(snapshot[0].sprite.is_some());
    }

    #[test]
    fn test_debug_sink_receives_leaves_and_colliding_shapes() {
        use crate::debug_draw::{GREEN, WHITE_TRANSLUCENT};

        let mut sim = sim();
        spawn_ball(&mut sim, Vec2::zeros(), 1.0, Vec2::zeros());
        spawn_ball(&mut sim, Vec2::new(1.5, 0.0), 1.0, Vec2::zeros());
        spawn_ball(&mut sim, Vec2::new(40.0, 20.0), 1.0, Vec2::zeros());

        let mut buffer = DebugDrawBuffer::new();
        sim.step_with_debug(0.016, &mut buffer).unwrap();

        let leaves = buffer.rects.iter().filter(|(_, c)| *c == GREEN).count();
        let passive = buffer
            .rects
            .iter()
            .filter(|(_, c)| *c == WHITE_TRANSLUCENT)
            .count();
        assert!(leaves > 0, "leaf bounds should be drawn");
        assert_eq!(passive, 1, "the lone ball gets a translucent box");
        assert_eq!(buffer.shapes.len(), 2, "both colliding shapes drawn");
    }

    #[test]
    fn test_stats_advance_with_frames() {
        let mut sim = sim();
        spawn_ball(&mut sim, Vec2::zeros(), 1.0, Vec2::new(1.0, 0.0));

        sim.step(0.016).unwrap();
        sim.step(0.016).unwrap();
        assert_eq!(sim.stats().frame, 2);
        assert_eq!(sim.stats().resolve.shape_count, 1);
    }
}
