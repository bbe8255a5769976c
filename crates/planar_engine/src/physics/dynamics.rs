//! Solid-body collision response and integration
//!
//! Applies the latest frame's collision records to every SolidBody:
//! velocities reflect off the combined contact surface, then positions
//! advance by the post-response velocity.

use thiserror::Error;

use crate::ecs::components::{Collider, SolidBody, Transform};
use crate::ecs::{ComponentStore, Entity};
use crate::foundation::math::{normalize_or, Vec2};
use crate::physics::resolver::CollisionResolver;

/// Errors from the dynamics step
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhysicsError {
    /// A SolidBody entity has no Collider, so it never receives the
    /// collision records the response depends on
    #[error("solid body entity {0:?} has no collider")]
    MissingCollider(Entity),

    /// A SolidBody entity has no Transform to integrate
    #[error("solid body entity {0:?} has no transform")]
    MissingTransform(Entity),
}

/// Advance all solid bodies by one time step
///
/// For each body the contact normals of the other shape in every
/// collision are summed, keeping only those the body is moving into
/// (non-positive velocity dot). A non-zero sum is normalized and the
/// velocity is mirror-reflected across it; contacts the body is already
/// leaving produce no response. The transform then translates by the
/// updated velocity over `dt`.
pub fn integrate(
    dt: f32,
    bodies: &mut ComponentStore<SolidBody>,
    transforms: &mut ComponentStore<Transform>,
    colliders: &ComponentStore<Collider>,
    resolver: &CollisionResolver,
) -> Result<(), PhysicsError> {
    let entities: Vec<Entity> = bodies.entities().collect();
    for entity in entities {
        if !colliders.contains(entity) {
            return Err(PhysicsError::MissingCollider(entity));
        }
        let Some(body) = bodies.get_mut(entity) else {
            continue;
        };

        let mut surface = Vec2::zeros();
        for collision in resolver.collisions(entity) {
            if body.velocity.dot(&collision.normal_b) <= 0.0 {
                surface += collision.normal_b;
            }
        }
        if surface != Vec2::zeros() {
            let normal = normalize_or(surface, Vec2::zeros());
            body.velocity -= 2.0 * body.velocity.dot(&normal) * normal;
        }

        let step = body.velocity * dt;
        transforms
            .get_mut(entity)
            .ok_or(PhysicsError::MissingTransform(entity))?
            .translate(step);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityRegistry;
    use crate::physics::shape::Rect;
    use crate::spatial::QuadTreeConfig;
    use approx::assert_relative_eq;

    fn boundary() -> Rect {
        Rect::new(Vec2::new(-70.0, -40.0), Vec2::new(70.0, 40.0))
    }

    struct Fixture {
        registry: EntityRegistry,
        transforms: ComponentStore<Transform>,
        colliders: ComponentStore<Collider>,
        bodies: ComponentStore<SolidBody>,
        resolver: CollisionResolver,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: EntityRegistry::new(),
                transforms: ComponentStore::new(),
                colliders: ComponentStore::new(),
                bodies: ComponentStore::new(),
                resolver: CollisionResolver::new(boundary(), QuadTreeConfig::default()),
            }
        }

        fn spawn_ball(&mut self, position: Vec2, radius: f32, velocity: Vec2) -> Entity {
            let entity = self.registry.create();
            self.transforms
                .add(entity, Transform::from_position(position))
                .unwrap();
            let mut collider = Collider::circle(Vec2::zeros(), radius);
            collider.refresh_world_shape(self.transforms.get(entity).unwrap());
            self.colliders.add(entity, collider).unwrap();
            self.bodies
                .add(entity, SolidBody::with_velocity(velocity))
                .unwrap();
            entity
        }

        fn spawn_wall(&mut self, min: Vec2, max: Vec2) -> Entity {
            let entity = self.registry.create();
            self.transforms.add(entity, Transform::identity()).unwrap();
            let mut collider = Collider::aa_rect(min, max);
            collider.refresh_world_shape(&Transform::identity());
            self.colliders.add(entity, collider).unwrap();
            entity
        }

        fn step(&mut self, dt: f32) -> Result<(), PhysicsError> {
            self.resolver.resolve(&self.colliders);
            integrate(
                dt,
                &mut self.bodies,
                &mut self.transforms,
                &self.colliders,
                &self.resolver,
            )
        }
    }

    #[test]
    fn test_ball_bounces_off_floor() {
        let mut fx = Fixture::new();
        fx.spawn_wall(Vec2::new(-10.0, -2.0), Vec2::new(10.0, 0.0));
        let ball = fx.spawn_ball(Vec2::new(0.0, 0.5), 0.75, Vec2::new(0.0, -5.0));

        fx.step(0.1).unwrap();

        // Falling onto the floor's upward face reverses the velocity.
        let body = fx.bodies.get(ball).unwrap();
        assert_relative_eq!(body.velocity, Vec2::new(0.0, 5.0), epsilon = 1e-5);
        assert_relative_eq!(
            fx.transforms.get(ball).unwrap().position,
            Vec2::new(0.0, 1.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_departing_body_is_not_re_reflected() {
        let mut fx = Fixture::new();
        fx.spawn_wall(Vec2::new(-10.0, -2.0), Vec2::new(10.0, 0.0));
        // Still overlapping the floor but already moving away from it.
        let ball = fx.spawn_ball(Vec2::new(0.0, 0.5), 0.75, Vec2::new(0.0, 5.0));

        fx.step(0.1).unwrap();

        assert_relative_eq!(
            fx.bodies.get(ball).unwrap().velocity,
            Vec2::new(0.0, 5.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_free_body_integrates_linearly() {
        let mut fx = Fixture::new();
        let ball = fx.spawn_ball(Vec2::new(-5.0, 3.0), 0.5, Vec2::new(2.0, -1.0));

        fx.step(0.5).unwrap();

        assert_relative_eq!(
            fx.transforms.get(ball).unwrap().position,
            Vec2::new(-4.0, 2.5),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_corner_hit_combines_normals() {
        let mut fx = Fixture::new();
        // Floor and right wall meeting near the origin.
        fx.spawn_wall(Vec2::new(-10.0, -2.0), Vec2::new(0.5, 0.0));
        fx.spawn_wall(Vec2::new(0.5, 0.0), Vec2::new(2.5, 10.0));
        let ball = fx.spawn_ball(Vec2::new(0.0, 0.5), 0.8, Vec2::new(3.0, -3.0));

        fx.step(0.1).unwrap();

        // Both the floor's up normal and the wall's left normal oppose
        // the motion; their normalized sum reflects the velocity fully.
        let velocity = fx.bodies.get(ball).unwrap().velocity;
        assert_relative_eq!(velocity, Vec2::new(-3.0, 3.0), epsilon = 1e-4);
    }

    #[test]
    fn test_body_without_collider_is_an_error() {
        let mut fx = Fixture::new();
        let entity = fx.registry.create();
        fx.transforms.add(entity, Transform::identity()).unwrap();
        fx.bodies.add(entity, SolidBody::new()).unwrap();

        let result = fx.step(0.1);
        assert_eq!(result, Err(PhysicsError::MissingCollider(entity)));
    }

    #[test]
    fn test_body_without_transform_is_an_error() {
        let mut fx = Fixture::new();
        let entity = fx.registry.create();
        fx.colliders
            .add(entity, Collider::circle(Vec2::zeros(), 1.0))
            .unwrap();
        fx.bodies.add(entity, SolidBody::new()).unwrap();

        let result = fx.step(0.1);
        assert_eq!(result, Err(PhysicsError::MissingTransform(entity)));
    }
}
