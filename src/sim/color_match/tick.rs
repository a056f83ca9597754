//! Fixed timestep simulation tick for the color matcher
//!
//! Order per tick: lane moves → spawn → fall → catch/miss judging → level.

use glam::Vec2;
use rand::Rng;

use super::state::{
    BallColor, BallId, ColorMatchEvent, ColorMatchState, FallingBall, ZONE_COUNT, level_for_score,
};
use crate::input::{ColorMatchInput, Direction};
use crate::sim::GamePhase;

/// What happened to a ball this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Caught,
    Mismatched,
    Missed,
}

/// Advance the color matcher by one fixed timestep
pub fn tick(state: &mut ColorMatchState, input: &ColorMatchInput) {
    state.events.clear();

    if input.restart {
        restart(state);
        return;
    }

    match state.phase {
        GamePhase::Ready => {
            if input.start {
                state.phase = GamePhase::Playing;
                state.events.push(ColorMatchEvent::Started);
                log::info!("Color match started (seed {})", state.seed);
            }
            return;
        }
        GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    for dir in &input.moves {
        state.player_zone = match dir {
            Direction::Left => state.player_zone.saturating_sub(1),
            Direction::Right => (state.player_zone + 1).min(ZONE_COUNT - 1),
        };
    }

    state.spawn_timer += 1;
    if state.spawn_timer >= state.spawn_interval() {
        state.spawn_timer = 0;
        spawn_ball(state);
    }

    for ball in &mut state.balls {
        ball.pos.y += ball.speed;
    }

    resolve_balls(state);
    update_level(state);
}

/// Reset score, level and lives and clear the field
pub fn restart(state: &mut ColorMatchState) {
    state.reset_run();
    state.phase = GamePhase::Playing;
    state.events.push(ColorMatchEvent::Restarted);
    log::info!("Color match restarted");
}

/// Drop a new ball at a random lane position just above the view
pub fn spawn_ball(state: &mut ColorMatchState) {
    let radius = state.tuning.ball_radius;
    let width = state.tuning.viewport.width;
    let x = state.rng.random_range(radius..=width - radius);
    let color = BallColor::ALL[state.rng.random_range(0..BallColor::ALL.len())];

    let id = state.next_ball_id();
    let ball = FallingBall {
        id,
        pos: Vec2::new(x, -radius),
        zone: state.zone_of(x),
        color,
        speed: state.ball_speed(),
    };
    state.balls.push(ball);
    state.events.push(ColorMatchEvent::Spawned { ball: id, color });
}

fn judge(ball: &FallingBall, player_zone: usize, catch_line: f32, bottom: f32) -> Option<Outcome> {
    // Lane first: a fast ball can cross the whole band in one step
    if ball.pos.y >= catch_line && ball.zone == player_zone {
        return Some(if ball.color == BallColor::for_zone(player_zone) {
            Outcome::Caught
        } else {
            Outcome::Mismatched
        });
    }
    if ball.pos.y >= bottom {
        return Some(Outcome::Missed);
    }
    None
}

/// Judge every ball, then remove the judged ones and apply consequences
fn resolve_balls(state: &mut ColorMatchState) {
    let (zone, catch_line, bottom) = (
        state.player_zone,
        state.catch_line(),
        state.tuning.viewport.height,
    );
    let outcomes: Vec<(BallId, Outcome)> = state
        .balls
        .iter()
        .filter_map(|b| judge(b, zone, catch_line, bottom).map(|o| (b.id, o)))
        .collect();
    if outcomes.is_empty() {
        return;
    }
    state
        .balls
        .retain(|b| !outcomes.iter().any(|(id, _)| *id == b.id));

    for (ball, outcome) in outcomes {
        match outcome {
            Outcome::Caught => {
                let points = state.tuning.points_per_level * state.level as u64;
                state.score += points;
                state.events.push(ColorMatchEvent::Caught { ball, points });
            }
            Outcome::Mismatched | Outcome::Missed => {
                state.lives = state.lives.saturating_sub(1);
                let lives = state.lives;
                state.events.push(if outcome == Outcome::Missed {
                    ColorMatchEvent::Missed { ball, lives }
                } else {
                    ColorMatchEvent::Mismatched { ball, lives }
                });
                if lives == 0 {
                    state.phase = GamePhase::GameOver;
                    state.events.push(ColorMatchEvent::GameOver {
                        score: state.score,
                        level: state.level,
                    });
                    log::info!(
                        "Color match over: score {}, level {}",
                        state.score,
                        state.level
                    );
                    return;
                }
            }
        }
    }
}

fn update_level(state: &mut ColorMatchState) {
    let level = level_for_score(state.score);
    if level > state.level {
        state.events.push(ColorMatchEvent::LevelUp { level });
        log::info!("Color match level {level}");
    }
    state.level = level;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ColorMatchSampler, Control, InputEvent, InputSampler};
    use crate::tuning::ColorMatchTuning;
    use proptest::prelude::*;

    fn playing(seed: u64) -> ColorMatchState {
        let mut state = ColorMatchState::new(seed, ColorMatchTuning::default()).unwrap();
        tick(
            &mut state,
            &ColorMatchInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn idle(state: &mut ColorMatchState) {
        tick(state, &ColorMatchInput::default());
    }

    /// Put a ball of `color` in lane `zone`, `y` px from the top
    fn drop_ball(state: &mut ColorMatchState, zone: usize, y: f32, color: BallColor) -> BallId {
        let id = state.next_ball_id();
        let x = (zone as f32 + 0.5) * state.zone_width();
        state.balls.push(FallingBall {
            id,
            pos: Vec2::new(x, y),
            zone,
            color,
            speed: 2.0,
        });
        id
    }

    #[test]
    fn test_ready_waits_for_start() {
        let mut state = ColorMatchState::new(1, ColorMatchTuning::default()).unwrap();
        for _ in 0..100 {
            idle(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_moves_clamp_to_lanes() {
        let mut state = playing(1);
        let mut sampler = ColorMatchSampler::new();
        for _ in 0..5 {
            sampler.handle(InputEvent::Press(Control::Left));
        }
        tick(&mut state, &sampler.sample());
        assert_eq!(state.player_zone, 0);

        for _ in 0..2 {
            sampler.handle(InputEvent::Press(Control::Right));
        }
        tick(&mut state, &sampler.sample());
        assert_eq!(state.player_zone, 2);

        for _ in 0..9 {
            sampler.handle(InputEvent::Press(Control::Right));
        }
        tick(&mut state, &sampler.sample());
        assert_eq!(state.player_zone, ZONE_COUNT - 1);
    }

    #[test]
    fn test_first_spawn_at_base_cadence() {
        let mut state = playing(3);
        for _ in 0..59 {
            idle(&mut state);
        }
        assert!(state.balls.is_empty());
        idle(&mut state);
        assert_eq!(state.balls.len(), 1);

        let ball = &state.balls[0];
        let r = state.tuning.ball_radius;
        assert!(ball.pos.x >= r && ball.pos.x <= state.tuning.viewport.width - r);
        assert_eq!(ball.zone, state.zone_of(ball.pos.x));
        assert_eq!(ball.speed, 2.0);
    }

    #[test]
    fn test_match_awards_points_per_level() {
        let mut state = playing(1);
        state.score = 150;
        state.level = 2;
        let zone = state.player_zone;
        let id = drop_ball(&mut state, zone, 560.0, BallColor::for_zone(zone));
        idle(&mut state);

        assert_eq!(state.score, 170);
        assert_eq!(state.lives, 3);
        assert!(state.balls.is_empty());
        assert!(
            state
                .events
                .contains(&ColorMatchEvent::Caught { ball: id, points: 20 })
        );
    }

    #[test]
    fn test_mismatch_costs_one_life_and_no_points() {
        let mut state = playing(1);
        state.player_zone = 0;
        state.score = 40;
        drop_ball(&mut state, 0, 560.0, BallColor::Yellow);
        idle(&mut state);
        assert_eq!(state.score, 40);
        assert_eq!(state.lives, 2);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_ball_outside_player_lane_passes_band() {
        let mut state = playing(1);
        state.player_zone = 0;
        let id = drop_ball(&mut state, 3, 560.0, BallColor::Yellow);
        idle(&mut state);
        // In the band but not in the catcher's lane: keeps falling
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.lives, 3);

        for _ in 0..20 {
            idle(&mut state);
        }
        assert!(state.balls.iter().all(|b| b.id != id));
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_fast_ball_crossing_band_is_judged() {
        let mut state = playing(1);
        let zone = state.player_zone;
        // Above the band, then past the bottom edge in a single step
        let caught = drop_ball(&mut state, zone, 500.0, BallColor::for_zone(zone));
        let missed = drop_ball(&mut state, (zone + 1) % ZONE_COUNT, 500.0, BallColor::Red);
        for ball in &mut state.balls {
            ball.speed = 200.0;
        }
        idle(&mut state);

        assert!(state.balls.is_empty());
        assert!(
            state
                .events
                .contains(&ColorMatchEvent::Caught { ball: caught, points: 10 })
        );
        assert!(
            state
                .events
                .contains(&ColorMatchEvent::Missed { ball: missed, lives: 2 })
        );
    }

    #[test]
    fn test_level_up_event() {
        let mut state = playing(1);
        state.score = 95;
        let zone = state.player_zone;
        drop_ball(&mut state, zone, 560.0, BallColor::for_zone(zone));
        idle(&mut state);
        assert_eq!(state.score, 105);
        assert_eq!(state.level, 2);
        assert!(state.events.contains(&ColorMatchEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = playing(1);
        state.lives = 1;
        state.player_zone = 0;
        drop_ball(&mut state, 0, 560.0, BallColor::Blue);
        drop_ball(&mut state, 0, 560.0, BallColor::Red);
        idle(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Judging stopped at the fatal ball
        assert_eq!(state.score, 0);

        let ticks = state.time_ticks;
        for _ in 0..100 {
            idle(&mut state);
        }
        assert_eq!(state.time_ticks, ticks);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = playing(1);
        for _ in 0..200 {
            idle(&mut state);
        }
        state.score = 730;
        state.level = 8;
        state.lives = 1;
        state.phase = GamePhase::GameOver;
        tick(
            &mut state,
            &ColorMatchInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert!(state.balls.is_empty());
        assert_eq!(state.spawn_interval(), 60);
        assert_eq!(state.spawn_timer, 0);
    }

    #[test]
    fn test_same_seed_same_balls() {
        let mut a = playing(77);
        let mut b = playing(77);
        for _ in 0..300 {
            idle(&mut a);
            idle(&mut b);
        }
        let colors = |s: &ColorMatchState| {
            s.balls
                .iter()
                .map(|b| (b.pos, b.color))
                .collect::<Vec<_>>()
        };
        assert_eq!(colors(&a), colors(&b));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_level_tracks_score(
            seed in any::<u64>(),
            moves in prop::collection::vec(prop::option::of(any::<bool>()), 1..600),
        ) {
            let mut state = playing(seed);
            for m in moves {
                let input = ColorMatchInput {
                    moves: match m {
                        Some(true) => vec![Direction::Right],
                        Some(false) => vec![Direction::Left],
                        None => Vec::new(),
                    },
                    ..Default::default()
                };
                tick(&mut state, &input);
                prop_assert_eq!(state.level, level_for_score(state.score));
                prop_assert!(state.player_zone < ZONE_COUNT);
                prop_assert!(state.spawn_interval() >= state.tuning.min_spawn_interval);
                if state.phase == GamePhase::GameOver {
                    break;
                }
            }
        }
    }
}
