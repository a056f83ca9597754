//! Fixed timestep simulation tick for the climber
//!
//! One call advances the run by 1/60 s: input → player step → frontier
//! generation → world update → collisions → pruning.

use glam::Vec2;
use rand::Rng;

use super::collision::{prune_offscreen, resolve_collisions};
use super::spawn::extend_frontier;
use super::state::{ClimbEvent, ClimbState, PlatformKind};
use crate::input::{ClimbInput, Direction};
use crate::sim::GamePhase;
use crate::sim::particles::Burst;

/// Maximum difficulty scalar
pub const MAX_GAME_SPEED: f32 = 2.5;
/// Height units per +1.0 of game speed
pub const GAME_SPEED_HEIGHT_SCALE: f32 = 800.0;
/// Birds' horizontal random walk: per-tick nudge and speed bound
const BIRD_JITTER: f32 = 0.2;
const BIRD_MAX_SPEED: f32 = 3.0;
const POWER_UP_ANIM_STEP: f32 = 0.1;

const JUMP_BURST: Burst = Burst {
    count: 8,
    life: 40,
    color: 0xDEB887,
    spread: Vec2::new(20.0, 0.0),
    vel_x: 3.0,
    vel_y: (1.0, 4.0),
    size: (2.0, 6.0),
};

const DOUBLE_JUMP_BURST: Burst = Burst {
    count: 12,
    life: 60,
    color: 0x4CAF50,
    spread: Vec2::ZERO,
    vel_x: 4.0,
    vel_y: (-4.0, 4.0),
    size: (3.0, 8.0),
};

/// Advance the climber by one fixed timestep
pub fn tick(state: &mut ClimbState, input: &ClimbInput) {
    state.events.clear();

    if input.restart {
        restart(state);
        return;
    }

    match state.phase {
        GamePhase::Ready => {
            if input.start {
                state.phase = GamePhase::Playing;
                state.events.push(ClimbEvent::Started);
                log::info!("Climb started (seed {})", state.seed);
            }
            return;
        }
        GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    apply_input(state, input);
    step_player(state);
    extend_frontier(state);
    state.game_speed = (1.0 + state.height as f32 / GAME_SPEED_HEIGHT_SCALE).min(MAX_GAME_SPEED);
    update_world(state);
    resolve_collisions(state);
    prune_offscreen(state);
}

/// Start a new run on the same tuning; the RNG stream continues
pub fn restart(state: &mut ClimbState) {
    state.reset_run();
    state.phase = GamePhase::Playing;
    state.events.push(ClimbEvent::Restarted);
    log::info!("Climb restarted");
}

/// Horizontal acceleration/friction, jumps and fast fall
fn apply_input(state: &mut ClimbState, input: &ClimbInput) {
    let t = &state.tuning;
    let (max_speed, jump_power) = if state.speed_boost_ticks > 0 {
        (t.boosted_max_speed, t.boosted_jump_impulse)
    } else {
        (t.max_speed, t.jump_impulse)
    };
    let (accel, friction, double_jump_factor, fast_fall) =
        (t.move_accel, t.friction, t.double_jump_factor, t.fast_fall);

    let player = &mut state.player;
    match input.direction {
        Some(Direction::Left) => player.vel.x = (player.vel.x - accel).max(-max_speed),
        Some(Direction::Right) => player.vel.x = (player.vel.x + accel).min(max_speed),
        None => player.vel.x *= friction,
    }

    if input.jump {
        if player.on_ground {
            player.vel.y = -jump_power;
            player.on_ground = false;
            player.double_jump_available = true;
            let origin = Vec2::new(
                player.rect.center().x - JUMP_BURST.spread.x / 2.0,
                player.rect.bottom(),
            );
            state.particles.burst(&mut state.fx_rng, origin, &JUMP_BURST);
            state.events.push(ClimbEvent::Jumped);
        } else if player.double_jump_available {
            player.vel.y = -jump_power * double_jump_factor;
            player.double_jump_available = false;
            let origin = player.rect.center();
            state.particles.burst(&mut state.fx_rng, origin, &DOUBLE_JUMP_BURST);
            state.events.push(ClimbEvent::DoubleJumped);
            state.add_combo(1.0);
        }
    }

    if input.fast_fall {
        state.player.vel.y += fast_fall;
    }
}

/// Gravity, integration, wrap, timers and camera
fn step_player(state: &mut ClimbState) {
    let t = &state.tuning;
    let vp = t.viewport;
    let (gravity, terminal) = (t.gravity, t.terminal_velocity);
    let (lead, ease, unit) = (t.camera_lead, t.camera_ease, t.height_unit);

    let carry = state
        .player
        .on_moving_platform
        .filter(|_| state.player.on_ground)
        .and_then(|id| state.platform(id))
        .map(|p| p.direction * p.speed)
        .unwrap_or(0.0);

    let player = &mut state.player;
    player.prev_pos = player.rect.pos;
    player.vel.y = (player.vel.y + gravity).min(terminal);
    player.rect.pos.x += carry;
    player.rect.pos += player.vel;

    if player.on_ground {
        player.air_time = 0;
        player.double_jump_available = true;
    } else {
        player.air_time += 1;
    }
    player.climbing = !player.on_ground && player.vel.y < 0.0;

    // Screen wrap
    if player.rect.pos.x < -player.rect.size.x {
        player.rect.pos.x = vp.width;
    }
    if player.rect.pos.x > vp.width {
        player.rect.pos.x = -player.rect.size.x;
    }

    if player.invulnerable {
        player.invulnerability_ticks = player.invulnerability_ticks.saturating_sub(1);
        if player.invulnerability_ticks == 0 {
            player.invulnerable = false;
        }
    }
    state.speed_boost_ticks = state.speed_boost_ticks.saturating_sub(1);

    // Camera only moves up
    let target = state.player.rect.top() - vp.height * lead;
    if target < state.camera_y {
        state.camera_y += (target - state.camera_y) * ease;
        let new_height = (-state.camera_y / unit).floor().max(0.0) as u32;
        if new_height > state.height {
            let gained = new_height - state.height;
            state.height = new_height;
            state.score += gained as f64 * (state.combo + 1.0);
            state
                .events
                .push(ClimbEvent::HeightGained { height: new_height });
        }
    }
}

/// Moving platforms, obstacles, pickup animation, particles and clouds
fn update_world(state: &mut ClimbState) {
    let vp = state.tuning.viewport;

    for platform in &mut state.platforms {
        if platform.kind == PlatformKind::Moving {
            platform.rect.pos.x += platform.direction * platform.speed;
            if platform.rect.left() <= 0.0 || platform.rect.right() >= vp.width {
                platform.direction = -platform.direction;
            }
        }
    }

    for obstacle in &mut state.obstacles {
        obstacle.rect.pos += obstacle.vel;
        if obstacle.kind == super::state::ObstacleKind::Bird {
            obstacle.vel.x += (state.rng.random::<f32>() - 0.5) * BIRD_JITTER;
            obstacle.vel.x = obstacle.vel.x.clamp(-BIRD_MAX_SPEED, BIRD_MAX_SPEED);
        }
    }

    for power_up in &mut state.power_ups {
        power_up.bob_phase += POWER_UP_ANIM_STEP;
        power_up.pulse_phase += POWER_UP_ANIM_STEP;
    }

    state.particles.update();

    for cloud in &mut state.clouds {
        cloud.pos.x += cloud.speed;
        if cloud.pos.x > vp.width + cloud.size {
            cloud.pos.x = -cloud.size;
            cloud.pos.y = state.fx_rng.random::<f32>() * vp.height * 3.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ClimbSampler, Control, InputEvent, InputSampler};
    use crate::sim::climb::state::{
        Cloud, INDESTRUCTIBLE, Obstacle, ObstacleKind, PLATFORM_HEIGHT, PLAYER_HEIGHT, Platform,
    };
    use crate::sim::geom::Rect;
    use crate::tuning::ClimbTuning;
    use proptest::prelude::*;

    fn playing(seed: u64) -> ClimbState {
        let mut state = ClimbState::new(seed, ClimbTuning::default(), 500).unwrap();
        tick(
            &mut state,
            &ClimbInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    /// A run with only a wide floor under the player and nothing else around
    fn sandbox() -> ClimbState {
        let mut state = playing(5);
        state.platforms.clear();
        state.obstacles.clear();
        state.power_ups.clear();
        state.frontier_y = -100_000.0;
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            rect: Rect::new(0.0, 500.0, 800.0, PLATFORM_HEIGHT),
            kind: PlatformKind::Normal,
            direction: 1.0,
            speed: 0.0,
            health: INDESTRUCTIBLE,
            bounce_force: 0.0,
            broken: false,
        });
        state.player.rect.pos = Vec2::new(385.0, 500.0 - PLAYER_HEIGHT);
        state.player.vel = Vec2::ZERO;
        state
    }

    fn settle(state: &mut ClimbState) {
        for _ in 0..3 {
            tick(state, &ClimbInput::default());
        }
        assert!(state.player.on_ground);
    }

    #[test]
    fn test_ready_waits_for_start() {
        let mut state = ClimbState::new(1, ClimbTuning::default(), 500).unwrap();
        let before = state.player.rect.pos;
        tick(&mut state, &ClimbInput::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.rect.pos, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_player_lands_on_starting_platform() {
        let mut state = playing(1);
        // Falling rocks would make this seed-dependent
        state.obstacles.clear();
        for _ in 0..60 {
            tick(&mut state, &ClimbInput::default());
        }
        let start = &state.platforms[0];
        assert!(state.player.on_ground);
        assert_eq!(state.player.rect.bottom(), start.rect.top());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_acceleration_and_friction() {
        let mut state = sandbox();
        settle(&mut state);
        let right = ClimbInput {
            direction: Some(Direction::Right),
            ..Default::default()
        };
        tick(&mut state, &right);
        assert!((state.player.vel.x - 0.8).abs() < 1e-5);
        for _ in 0..20 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.vel.x, 4.0);

        tick(&mut state, &ClimbInput::default());
        assert!((state.player.vel.x - 3.4).abs() < 1e-5);
    }

    #[test]
    fn test_speed_boost_raises_caps() {
        let mut state = sandbox();
        settle(&mut state);
        state.speed_boost_ticks = 100;
        let left = ClimbInput {
            direction: Some(Direction::Left),
            ..Default::default()
        };
        for _ in 0..20 {
            tick(&mut state, &left);
        }
        assert_eq!(state.player.vel.x, -5.0);

        tick(
            &mut state,
            &ClimbInput {
                jump: true,
                ..Default::default()
            },
        );
        // -16 impulse, then one tick of gravity
        assert!((state.player.vel.y - (-15.5)).abs() < 1e-5);
    }

    #[test]
    fn test_jump_then_double_jump() {
        let mut state = sandbox();
        settle(&mut state);
        let jump = ClimbInput {
            jump: true,
            ..Default::default()
        };

        tick(&mut state, &jump);
        assert!((state.player.vel.y - (-13.5)).abs() < 1e-5);
        assert!(!state.player.on_ground);
        assert!(state.events.contains(&ClimbEvent::Jumped));

        tick(&mut state, &ClimbInput::default());
        let combo = state.combo;
        tick(&mut state, &jump);
        // 0.8 * -14, then gravity
        assert!((state.player.vel.y - (-10.7)).abs() < 1e-4);
        assert!(!state.player.double_jump_available);
        assert_eq!(state.combo, combo + 1.0);

        // No third jump in the air
        let vy = state.player.vel.y;
        tick(&mut state, &jump);
        assert!((state.player.vel.y - (vy + 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_held_jump_fires_once() {
        let mut state = sandbox();
        settle(&mut state);
        let mut sampler = ClimbSampler::new();
        sampler.handle(InputEvent::Press(Control::Jump));

        let mut jumps = 0;
        let mut double_jumps = 0;
        for _ in 0..120 {
            // Keyboard auto-repeat
            sampler.handle(InputEvent::Press(Control::Jump));
            let input = sampler.sample();
            tick(&mut state, &input);
            jumps += state
                .events
                .iter()
                .filter(|e| **e == ClimbEvent::Jumped)
                .count();
            double_jumps += state
                .events
                .iter()
                .filter(|e| **e == ClimbEvent::DoubleJumped)
                .count();
        }
        assert_eq!(jumps, 1);
        assert_eq!(double_jumps, 0);
        // Landed again and stays put while the key is held
        assert!(state.player.on_ground);
    }

    #[test]
    fn test_fast_fall() {
        let mut state = sandbox();
        state.player.rect.pos.y = 100.0;
        tick(
            &mut state,
            &ClimbInput {
                fast_fall: true,
                ..Default::default()
            },
        );
        assert!((state.player.vel.y - 1.7).abs() < 1e-5);
    }

    #[test]
    fn test_screen_wrap() {
        let mut state = sandbox();
        state.player.rect.pos.x = -29.0;
        state.player.vel.x = -4.0;
        tick(
            &mut state,
            &ClimbInput {
                direction: Some(Direction::Left),
                ..Default::default()
            },
        );
        assert_eq!(state.player.rect.pos.x, 800.0);

        state.player.rect.pos.x = 799.0;
        state.player.vel.x = 4.0;
        tick(
            &mut state,
            &ClimbInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
        );
        assert_eq!(state.player.rect.pos.x, -30.0);
    }

    #[test]
    fn test_camera_never_moves_down() {
        let mut state = sandbox();
        state.camera_y = -200.0;
        state.player.rect.pos.y = 400.0;
        tick(&mut state, &ClimbInput::default());
        assert_eq!(state.camera_y, -200.0);
    }

    #[test]
    fn test_climbing_scores_height_with_combo() {
        let mut state = sandbox();
        state.combo = 1.0;
        state.max_combo = 1.0;
        // Target camera = player.y - 240; well above the current camera
        state.player.rect.pos.y = -400.0;
        state.player.vel.y = -10.0;
        tick(&mut state, &ClimbInput::default());

        // camera: 0 + (-409.5 - 240 - 0) * 0.1 = -64.95 -> height 8
        assert_eq!(state.height, 8);
        assert!((state.score - 16.0).abs() < 1e-9);
        assert!(
            state
                .events
                .contains(&ClimbEvent::HeightGained { height: 8 })
        );
    }

    #[test]
    fn test_moving_platform_carries_player() {
        let mut state = sandbox();
        state.platforms[0].kind = PlatformKind::Moving;
        state.platforms[0].rect = Rect::new(300.0, 500.0, 120.0, PLATFORM_HEIGHT);
        state.platforms[0].speed = 2.0;
        state.platforms[0].direction = 1.0;
        state.player.rect.pos.x = 340.0;
        settle(&mut state);
        assert_eq!(state.player.on_moving_platform, Some(state.platforms[0].id));

        let x = state.player.rect.pos.x;
        let vx = state.player.vel.x;
        tick(&mut state, &ClimbInput::default());
        let expected = x + 2.0 + vx * 0.85;
        assert!((state.player.rect.pos.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_moving_platform_reverses_at_edges() {
        let mut state = sandbox();
        state.platforms[0].kind = PlatformKind::Moving;
        state.platforms[0].rect = Rect::new(679.0, 0.0, 120.0, PLATFORM_HEIGHT);
        state.platforms[0].speed = 2.0;
        state.platforms[0].direction = 1.0;
        state.player.rect.pos.y = 450.0;
        tick(&mut state, &ClimbInput::default());
        assert_eq!(state.platforms[0].direction, -1.0);
    }

    #[test]
    fn test_bird_speed_stays_bounded() {
        let mut state = sandbox();
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            rect: Rect::new(0.0, -3000.0, 30.0, 30.0),
            kind: ObstacleKind::Bird,
            vel: Vec2::new(2.9, 0.0),
        });
        for _ in 0..500 {
            tick(&mut state, &ClimbInput::default());
            assert!(state.obstacles[0].vel.x.abs() <= BIRD_MAX_SPEED);
        }
    }

    #[test]
    fn test_game_speed_hook() {
        let mut state = sandbox();
        state.height = 400;
        tick(&mut state, &ClimbInput::default());
        assert!((state.game_speed - 1.5).abs() < 1e-6);
        state.height = 10_000;
        tick(&mut state, &ClimbInput::default());
        assert_eq!(state.game_speed, MAX_GAME_SPEED);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = sandbox();
        state.score = 999.0;
        state.lives = 1;
        state.phase = GamePhase::GameOver;
        tick(
            &mut state,
            &ClimbInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.camera_y, 0.0);
        assert_eq!(state.platforms.len(), 25);
        assert!(state.events.contains(&ClimbEvent::Restarted));
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            ClimbInput {
                start: true,
                ..Default::default()
            },
            ClimbInput {
                direction: Some(Direction::Right),
                ..Default::default()
            },
            ClimbInput {
                jump: true,
                ..Default::default()
            },
            ClimbInput::default(),
        ];
        let mut a = ClimbState::new(99, ClimbTuning::default(), 500).unwrap();
        let mut b = ClimbState::new(99, ClimbTuning::default(), 500).unwrap();
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.player.rect.pos, b.player.rect.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.platforms.len(), b.platforms.len());
        assert_eq!(a.particles.len(), b.particles.len());
    }

    #[test]
    fn test_particle_cap_does_not_change_gameplay() {
        let mut a = ClimbState::new(8, ClimbTuning::default(), 0).unwrap();
        let mut b = ClimbState::new(8, ClimbTuning::default(), 2000).unwrap();
        let start = ClimbInput {
            start: true,
            ..Default::default()
        };
        tick(&mut a, &start);
        tick(&mut b, &start);
        for i in 0..400 {
            let input = ClimbInput {
                direction: Some(if i % 200 < 100 {
                    Direction::Right
                } else {
                    Direction::Left
                }),
                jump: i % 30 == 0,
                ..Default::default()
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert!(a.particles.is_empty());
        assert_eq!(a.player.rect.pos, b.player.rect.pos);
        let layout = |s: &ClimbState| s.platforms.iter().map(|p| p.rect).collect::<Vec<_>>();
        assert_eq!(layout(&a), layout(&b));
    }

    #[test]
    fn test_jump_bursts() {
        let mut state = sandbox();
        settle(&mut state);
        let jump = ClimbInput {
            jump: true,
            ..Default::default()
        };

        state.particles.clear();
        tick(&mut state, &jump);
        assert_eq!(state.particles.len(), 8);
        assert!(state.particles.iter().all(|p| p.color == 0xDEB887));

        tick(&mut state, &ClimbInput::default());
        state.particles.clear();
        tick(&mut state, &jump);
        assert_eq!(state.particles.len(), 12);
        assert!(state.particles.iter().all(|p| p.color == 0x4CAF50));
    }

    #[test]
    fn test_cloud_wraps_to_random_height() {
        let mut state = sandbox();
        state.clouds = vec![
            Cloud {
                pos: Vec2::new(849.0, 120.0),
                size: 50.0,
                speed: 2.0,
            },
            Cloud {
                pos: Vec2::new(100.0, 120.0),
                size: 50.0,
                speed: 2.0,
            },
        ];
        tick(&mut state, &ClimbInput::default());

        let wrapped = &state.clouds[0];
        assert_eq!(wrapped.pos.x, -50.0);
        assert!((0.0..1800.0).contains(&wrapped.pos.y));
        assert_eq!(state.clouds[1].pos, Vec2::new(102.0, 120.0));
    }

    fn arb_input() -> impl Strategy<Value = ClimbInput> {
        (0u8..3, any::<bool>(), any::<bool>()).prop_map(|(dir, jump, fast_fall)| ClimbInput {
            direction: match dir {
                0 => None,
                1 => Some(Direction::Left),
                _ => Some(Direction::Right),
            },
            jump,
            fast_fall,
            ..Default::default()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_terminal_velocity_and_combo_floor(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_input(), 1..300),
        ) {
            let mut state = playing(seed);
            for input in &inputs {
                let combo_before = state.combo;
                tick(&mut state, input);
                if state.phase != GamePhase::Playing {
                    break;
                }
                prop_assert!(state.player.vel.y <= 15.0);
                prop_assert!(state.combo >= 0.0);
                prop_assert!(state.max_combo >= state.combo);
                // Combo only ever drops by the decay step
                prop_assert!(state.combo >= combo_before - 0.1 - 1e-9);
                prop_assert!(state.particles.len() <= 500);
            }
        }
    }
}
