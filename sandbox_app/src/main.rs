//! Bouncing-bodies sandbox
//!
//! Headless demo driving the simulation core: solid bodies bounce
//! around a walled play area while a churn loop keeps creating and
//! destroying short-lived entities, exercising slot recycling under a
//! realistic frame loop.

use planar_engine::prelude::*;
use rand::Rng;

const FRAME_COUNT: u64 = 600;
const FIXED_DT: f32 = 1.0 / 60.0;
const BALL_COUNT: usize = 24;
const CHURN_LIFETIME: u64 = 30;

fn spawn_wall(sim: &mut Simulation, min: Vec2, max: Vec2) -> Result<Entity, SimulationError> {
    let wall = sim.spawn();
    sim.add_transform(wall, Transform::identity())?;
    sim.add_collider(wall, Collider::aa_rect(min, max))?;
    Ok(wall)
}

fn spawn_ball(sim: &mut Simulation, rng: &mut impl Rng) -> Result<Entity, SimulationError> {
    let position = Vec2::new(rng.gen_range(-60.0..60.0), rng.gen_range(-30.0..30.0));
    let velocity = Vec2::new(rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..15.0));
    let radius = rng.gen_range(0.5..2.0);

    let ball = sim.spawn();
    sim.add_transform(ball, Transform::from_position(position))?;
    sim.add_collider(ball, Collider::circle(Vec2::zeros(), radius))?;
    sim.add_solid_body(ball, SolidBody::with_velocity(velocity))?;
    sim.add_sprite(ball, Sprite::new(TextureId::new(1), Vec2::new(radius * 2.0, radius * 2.0)))?;
    Ok(ball)
}

/// Short-lived entities created and destroyed on a fixed cadence
fn churn(
    sim: &mut Simulation,
    pending: &mut Vec<(Entity, u64)>,
    frame: u64,
) -> Result<(), SimulationError> {
    let probe = sim.spawn();
    sim.add_transform(probe, Transform::from_position(Vec2::zeros()))?;
    pending.push((probe, frame + CHURN_LIFETIME));

    while pending.first().is_some_and(|&(_, deadline)| deadline <= frame) {
        let (expired, _) = pending.remove(0);
        sim.despawn(expired)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    planar_engine::foundation::logging::init();
    log::info!("Starting bounce demo: {BALL_COUNT} balls, {FRAME_COUNT} frames");

    let config = SimConfig::default();
    let mut sim = Simulation::new(&config);
    let mut rng = rand::thread_rng();

    // Walls just inside the play-area boundary.
    let b = config.boundary;
    spawn_wall(&mut sim, Vec2::new(b.min.x, b.min.y), Vec2::new(b.max.x, b.min.y + 1.0))?;
    spawn_wall(&mut sim, Vec2::new(b.min.x, b.max.y - 1.0), Vec2::new(b.max.x, b.max.y))?;
    spawn_wall(&mut sim, Vec2::new(b.min.x, b.min.y), Vec2::new(b.min.x + 1.0, b.max.y))?;
    spawn_wall(&mut sim, Vec2::new(b.max.x - 1.0, b.min.y), Vec2::new(b.max.x, b.max.y))?;

    for _ in 0..BALL_COUNT {
        spawn_ball(&mut sim, &mut rng)?;
    }

    let mut timer = Timer::new();
    let mut pending = Vec::new();
    let mut overlay = DebugDrawBuffer::new();
    for frame in 0..FRAME_COUNT {
        timer.update();
        churn(&mut sim, &mut pending, frame)?;

        overlay.clear();
        sim.step_with_debug(FIXED_DT, &mut overlay)?;

        if frame % 60 == 0 {
            let stats = sim.stats();
            log::info!(
                "frame {frame}: {} live entities, {} shapes, {} collisions, {} overlay leaves, wall dt {:.4}s",
                sim.live_count(),
                stats.resolve.shape_count,
                stats.resolve.collision_count,
                overlay.rects.len(),
                timer.delta_time(),
            );
        }
    }

    let snapshot = sim.render_snapshot();
    log::info!(
        "Done after {FRAME_COUNT} frames: {} live entities, {} renderable rows, {:.1}s simulated",
        sim.live_count(),
        snapshot.len(),
        FRAME_COUNT as f32 * FIXED_DT,
    );
    Ok(())
}
