//! Procedural generation for the climber
//!
//! Platforms are placed upward from the frontier. Each platform rolls
//! independently for an obstacle and a power-up hovering above it.

use glam::Vec2;
use rand::Rng;

use super::state::{
    ClimbState, Cloud, INDESTRUCTIBLE, OBSTACLE_SIZE, Obstacle, ObstacleKind, POWER_UP_SIZE,
    PLATFORM_HEIGHT, Platform, PlatformKind, PowerUp, PowerUpKind, STARTING_PLATFORM_WIDTH,
};
use crate::sim::geom::Rect;

/// Obstacles hover this far above their platform
pub const OBSTACLE_OFFSET: f32 = 60.0;
/// Power-ups hover this far above their platform
pub const POWER_UP_OFFSET: f32 = 40.0;
pub const MOVING_PLATFORM_SPEED: f32 = 2.0;
pub const BREAKABLE_HEALTH: i32 = 2;
pub const BOUNCE_FORCE: f32 = 18.0;
pub const ROCK_FALL_SPEED: f32 = 2.0;
/// Birds start with |vx| below this
pub const BIRD_START_SPEED: f32 = 2.0;

/// Starting platform under the player plus the first stretch of the climb
pub fn generate_initial_level(state: &mut ClimbState) {
    let vp = state.tuning.viewport;
    let start_y = vp.height - 80.0;

    let id = state.next_entity_id();
    state.platforms.push(Platform {
        id,
        rect: Rect::new(
            vp.width / 2.0 - STARTING_PLATFORM_WIDTH / 2.0,
            start_y,
            STARTING_PLATFORM_WIDTH,
            PLATFORM_HEIGHT,
        ),
        kind: PlatformKind::Normal,
        direction: 1.0,
        speed: 0.0,
        health: INDESTRUCTIBLE,
        bounce_force: 0.0,
        broken: false,
    });
    state.frontier_y = start_y;

    for i in 1..=state.tuning.initial_platforms {
        generate_platform(state, start_y - i as f32 * state.tuning.platform_spacing);
    }
}

/// Place one platform at height `y` and roll for its companions
pub fn generate_platform(state: &mut ClimbState, y: f32) {
    let vp = state.tuning.viewport;
    let kind = state.platform_table.sample(&mut state.rng);
    let width = kind.width();
    let x = state.rng.random::<f32>() * (vp.width - width);
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };

    let id = state.next_entity_id();
    state.platforms.push(Platform {
        id,
        rect: Rect::new(x, y, width, PLATFORM_HEIGHT),
        kind,
        direction,
        speed: if kind == PlatformKind::Moving {
            MOVING_PLATFORM_SPEED
        } else {
            0.0
        },
        health: if kind == PlatformKind::Breakable {
            BREAKABLE_HEALTH
        } else {
            INDESTRUCTIBLE
        },
        bounce_force: if kind == PlatformKind::Bouncy {
            BOUNCE_FORCE
        } else {
            0.0
        },
        broken: false,
    });
    state.frontier_y = state.frontier_y.min(y);

    if state.rng.random_bool(state.tuning.obstacle_chance) {
        spawn_obstacle(state, y - OBSTACLE_OFFSET);
    }
    if state.rng.random_bool(state.tuning.power_up_chance) {
        spawn_power_up(state, y - POWER_UP_OFFSET);
    }
}

pub fn spawn_obstacle(state: &mut ClimbState, y: f32) {
    let vp = state.tuning.viewport;
    let kind = if state.rng.random_bool(0.5) {
        ObstacleKind::Rock
    } else {
        ObstacleKind::Bird
    };
    let x = state.rng.random::<f32>() * (vp.width - OBSTACLE_SIZE).max(0.0);
    let vel = match kind {
        ObstacleKind::Bird => Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 2.0 * BIRD_START_SPEED,
            0.0,
        ),
        ObstacleKind::Rock => Vec2::new(0.0, ROCK_FALL_SPEED),
    };

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        rect: Rect::new(x, y, OBSTACLE_SIZE, OBSTACLE_SIZE),
        kind,
        vel,
    });
}

pub fn spawn_power_up(state: &mut ClimbState, y: f32) {
    use std::f32::consts::TAU;

    let vp = state.tuning.viewport;
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let x = state.rng.random::<f32>() * (vp.width - POWER_UP_SIZE).max(0.0);
    let bob_phase = state.rng.random::<f32>() * TAU;
    let pulse_phase = state.rng.random::<f32>() * TAU;

    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        rect: Rect::new(x, y, POWER_UP_SIZE, POWER_UP_SIZE),
        kind,
        collected: false,
        bob_phase,
        pulse_phase,
    });
}

/// Generate a batch above the frontier once it gets within the margin of
/// the camera's top edge. Returns true if platforms were added.
pub fn extend_frontier(state: &mut ClimbState) -> bool {
    if state.frontier_y <= state.camera_y - state.tuning.frontier_margin {
        return false;
    }
    for _ in 0..state.tuning.frontier_batch {
        let y = state.frontier_y - state.tuning.platform_spacing;
        generate_platform(state, y);
    }
    log::debug!(
        "Frontier extended to y={} ({} platforms live)",
        state.frontier_y,
        state.platforms.len()
    );
    true
}

/// Scatter the decorative background clouds
pub fn scatter_clouds(state: &mut ClimbState) {
    let vp = state.tuning.viewport;
    state.clouds.clear();
    for _ in 0..state.tuning.cloud_count {
        let cloud = Cloud {
            pos: Vec2::new(
                state.fx_rng.random::<f32>() * vp.width,
                state.fx_rng.random::<f32>() * vp.height * 3.0,
            ),
            size: 20.0 + state.fx_rng.random::<f32>() * 30.0,
            speed: 0.2 + state.fx_rng.random::<f32>() * 0.5,
        };
        state.clouds.push(cloud);
    }
}
