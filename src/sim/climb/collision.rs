//! Collision resolution for the climber
//!
//! Runs once per tick after movement. Lists are never resized while being
//! scanned: broken platforms are flagged and dropped in a post-pass.

use std::cmp::Ordering;

use glam::Vec2;

use super::state::{ClimbEvent, ClimbState, EntityId, Platform, PlatformKind, PowerUpKind};
use crate::sim::GamePhase;
use crate::sim::particles::Burst;

/// Slack when deciding whether the player was above a platform last tick
const LANDING_TOLERANCE: f32 = 0.01;

const BOUNCE_BURST: Burst = Burst {
    count: 15,
    life: 50,
    color: 0xFF69B4,
    spread: Vec2::ZERO, // widened to the platform at spawn time
    vel_x: 4.0,
    vel_y: (-8.0, -2.0),
    size: (2.0, 6.0),
};

const BREAK_BURST: Burst = Burst {
    count: 20,
    life: 80,
    color: 0x8B4513,
    spread: Vec2::ZERO,
    vel_x: 5.0,
    vel_y: (-10.0, -2.0),
    size: (2.0, 8.0),
};

const DAMAGE_BURST: Burst = Burst {
    count: 15,
    life: 80,
    color: 0xFF6B6B,
    spread: Vec2::ZERO,
    vel_x: 4.0,
    vel_y: (-4.0, 4.0),
    size: (3.0, 9.0),
};

const COLLECT_BURST: Burst = Burst {
    count: 12,
    life: 60,
    color: 0xFFFFFF,
    spread: Vec2::ZERO,
    vel_x: 3.0,
    vel_y: (-3.0, 3.0),
    size: (2.0, 7.0),
};

/// Resolve platform landings, hazards, pickups and falls for this tick
pub fn resolve_collisions(state: &mut ClimbState) {
    // Platform the player was resting on at the end of the last tick
    let resting_on = state
        .player
        .last_platform
        .filter(|_| state.player.on_ground);
    state.player.on_ground = false;
    state.player.on_moving_platform = None;

    for idx in 0..state.platforms.len() {
        land_on_platform(state, idx, resting_on);
    }
    state.platforms.retain(|p| !p.broken);

    if state.player.on_ground && state.player.air_time == 0 {
        state.combo = (state.combo - state.tuning.combo_decay).max(0.0);
    }

    for idx in 0..state.obstacles.len() {
        if !state.player.invulnerable && state.player.rect.overlaps(&state.obstacles[idx].rect) {
            take_damage(state);
            if state.phase == GamePhase::GameOver {
                return;
            }
        }
    }

    for idx in 0..state.power_ups.len() {
        let power_up = &state.power_ups[idx];
        if !power_up.collected && state.player.rect.overlaps(&power_up.rect) {
            collect_power_up(state, idx);
        }
    }

    if state.player.rect.top() > state.camera_bottom() + state.tuning.fall_margin {
        take_damage(state);
    }
}

fn land_on_platform(state: &mut ClimbState, idx: usize, resting_on: Option<EntityId>) {
    let prev_bottom = state.player.prev_pos.y + state.player.rect.size.y;
    let platform = &state.platforms[idx];
    if state.player.vel.y <= 0.0
        || !state.player.rect.overlaps(&platform.rect)
        || prev_bottom > platform.rect.top() + LANDING_TOLERANCE
    {
        return;
    }

    let id = platform.id;
    // Staying on the same platform is not a new landing
    let touchdown = resting_on != Some(id);

    // Gravity sinks a standing player every tick, so each tick of contact wears it
    if platform.kind == PlatformKind::Breakable && platform.health > 0 {
        let platform = &mut state.platforms[idx];
        platform.health -= 1;
        let health = platform.health;
        if health <= 0 {
            platform.broken = true;
        }
        let (origin, spread) = (platform.rect.pos, platform.rect.size);
        let burst = Burst {
            spread,
            ..BREAK_BURST
        };
        state.particles.burst(&mut state.fx_rng, origin, &burst);
        state.events.push(ClimbEvent::PlatformCracked {
            platform: id,
            health,
        });
        if health <= 0 {
            state.events.push(ClimbEvent::PlatformBroken { platform: id });
            return;
        }
    }

    let platform = &state.platforms[idx];
    let (kind, top, bounce_force) = (platform.kind, platform.rect.top(), platform.bounce_force);
    let player = &mut state.player;
    player.rect.pos.y = top - player.rect.size.y;
    player.on_ground = true;
    if kind == PlatformKind::Moving {
        player.on_moving_platform = Some(id);
    }
    let new_platform = player.last_platform != Some(id);
    player.last_platform = Some(id);

    if kind == PlatformKind::Bouncy {
        player.vel.y = -bounce_force;
        let platform = &state.platforms[idx];
        let burst = Burst {
            spread: Vec2::new(platform.rect.size.x, 0.0),
            ..BOUNCE_BURST
        };
        let origin = platform.rect.pos;
        state.particles.burst(&mut state.fx_rng, origin, &burst);
        state.events.push(ClimbEvent::Bounced { platform: id });
        state.add_combo(1.0);
    } else {
        player.vel.y = 0.0;
        if touchdown {
            state.events.push(ClimbEvent::Landed { platform: id });
        }
    }

    if new_platform {
        state.add_combo(1.0);
    }
}

/// Lose a life; end the run or respawn
pub fn take_damage(state: &mut ClimbState) {
    state.lives = state.lives.saturating_sub(1);
    state
        .player
        .grant_invulnerability(state.tuning.damage_invulnerability_ticks);
    let origin = state.player.rect.center();
    state.particles.burst(&mut state.fx_rng, origin, &DAMAGE_BURST);
    state.events.push(ClimbEvent::Damaged { lives: state.lives });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(ClimbEvent::GameOver {
            score: state.score,
            height: state.height,
        });
        log::info!(
            "Climb over: score {}, height {}, best combo {:.1}",
            state.score.ceil(),
            state.height,
            state.max_combo
        );
    } else {
        respawn_player(state);
    }
}

/// Put the player on the platform closest (vertically) to where they were,
/// preferring platforms inside the view
pub fn respawn_player(state: &mut ClimbState) {
    let (top, bottom) = (state.camera_y, state.camera_bottom());
    let player_y = state.player.rect.top();
    let by_distance = |a: &&Platform, b: &&Platform| {
        let da = (a.rect.top() - player_y).abs();
        let db = (b.rect.top() - player_y).abs();
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    };

    let nearest = state
        .platforms
        .iter()
        .filter(|p| p.rect.top() > top && p.rect.top() < bottom)
        .min_by(by_distance)
        .or_else(|| state.platforms.iter().min_by(by_distance));

    let Some(platform) = nearest else {
        log::warn!("No platform to respawn on");
        return;
    };
    let (id, center_x, platform_top) = (
        platform.id,
        platform.rect.center().x,
        platform.rect.top(),
    );

    let player = &mut state.player;
    player.rect.pos = Vec2::new(
        center_x - player.rect.size.x / 2.0,
        platform_top - player.rect.size.y,
    );
    player.prev_pos = player.rect.pos;
    player.vel = Vec2::ZERO;
    state.events.push(ClimbEvent::Respawned { platform: id });
    log::debug!("Respawned on platform {id} ({} lives left)", state.lives);
}

/// Apply a pickup's effect and score it with the current combo bonus
pub fn collect_power_up(state: &mut ClimbState, idx: usize) {
    let power_up = &mut state.power_ups[idx];
    power_up.collected = true;
    let kind = power_up.kind;
    let origin = power_up.rect.center();
    let burst = Burst {
        color: kind.color(),
        ..COLLECT_BURST
    };
    state.particles.burst(&mut state.fx_rng, origin, &burst);

    match kind {
        PowerUpKind::Life => {
            state.lives = (state.lives + 1).min(state.tuning.max_lives);
        }
        PowerUpKind::Speed => {
            state.speed_boost_ticks = state.tuning.speed_boost_ticks;
        }
        PowerUpKind::Shield => {
            state.player.grant_invulnerability(state.tuning.shield_ticks);
        }
        PowerUpKind::Score | PowerUpKind::Magnet => {}
    }

    let base = kind.base_points();
    let points = base + base / 10.0 * state.combo.floor();
    state.score += points;
    state.add_combo(0.5);
    state
        .events
        .push(ClimbEvent::PowerUpCollected { kind, points });
}

/// Drop entities that have scrolled well below the view
pub fn prune_offscreen(state: &mut ClimbState) {
    let cutoff = state.camera_bottom() + state.tuning.prune_margin;
    state.platforms.retain(|p| p.rect.top() <= cutoff);
    state.obstacles.retain(|o| o.rect.top() <= cutoff);
    state.power_ups.retain(|p| p.rect.top() <= cutoff);
}
