//! Color-match state and entity types
//!
//! The viewport is split into `ZONE_COUNT` equal vertical lanes, each bound
//! to one color. The catcher sits in one lane at the bottom of the screen.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::presenter::ColorMatchHud;
use crate::sim::GamePhase;
use crate::tuning::ColorMatchTuning;

pub const ZONE_COUNT: usize = 4;
/// Lane the catcher starts in
pub const START_ZONE: usize = 1;
/// Score needed per level
pub const LEVEL_SCORE: u64 = 100;

pub type BallId = u32;

/// Ball palette; also the lane colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl BallColor {
    pub const ALL: [BallColor; ZONE_COUNT] = [
        BallColor::Red,
        BallColor::Blue,
        BallColor::Green,
        BallColor::Yellow,
    ];

    /// 0xRRGGBB
    pub fn rgb(self) -> u32 {
        match self {
            BallColor::Red => 0xF44336,
            BallColor::Blue => 0x2196F3,
            BallColor::Green => 0x4CAF50,
            BallColor::Yellow => 0xFFEB3B,
        }
    }

    /// Color bound to lane `zone`
    pub fn for_zone(zone: usize) -> BallColor {
        Self::ALL[zone.min(ZONE_COUNT - 1)]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingBall {
    pub id: BallId,
    /// Center
    pub pos: Vec2,
    /// Lane containing `pos.x`
    pub zone: usize,
    pub color: BallColor,
    /// Fall speed per tick, fixed at spawn
    pub speed: f32,
}

/// Feedback emitted during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMatchEvent {
    Started,
    Restarted,
    Spawned { ball: BallId, color: BallColor },
    Caught { ball: BallId, points: u64 },
    Mismatched { ball: BallId, lives: u8 },
    Missed { ball: BallId, lives: u8 },
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
}

/// `⌊score / 100⌋ + 1`
pub fn level_for_score(score: u64) -> u32 {
    u32::try_from(score / LEVEL_SCORE)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Complete color-match state
#[derive(Debug, Clone)]
pub struct ColorMatchState {
    pub tuning: ColorMatchTuning,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player_zone: usize,
    /// Falling balls in spawn order
    pub balls: Vec<FallingBall>,
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<ColorMatchEvent>,
    next_id: BallId,
}

impl ColorMatchState {
    pub fn new(seed: u64, tuning: ColorMatchTuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            player_zone: START_ZONE,
            balls: Vec::new(),
            score: 0,
            level: 1,
            lives: tuning.starting_lives,
            spawn_timer: 0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.reset_run();
        Ok(state)
    }

    pub fn next_ball_id(&mut self) -> BallId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn reset_run(&mut self) {
        self.player_zone = START_ZONE;
        self.balls.clear();
        self.score = 0;
        self.level = 1;
        self.lives = self.tuning.starting_lives;
        self.spawn_timer = 0;
        self.time_ticks = 0;
    }

    pub fn zone_width(&self) -> f32 {
        self.tuning.viewport.width / ZONE_COUNT as f32
    }

    /// Lane containing horizontal position `x`
    pub fn zone_of(&self, x: f32) -> usize {
        let zone = (x / self.zone_width()).floor().max(0.0) as usize;
        zone.min(ZONE_COUNT - 1)
    }

    /// Ticks between spawns at the current level
    pub fn spawn_interval(&self) -> u32 {
        let t = &self.tuning;
        let step = t.spawn_interval_step.saturating_mul(self.level - 1);
        t.base_spawn_interval
            .saturating_sub(step)
            .max(t.min_spawn_interval)
    }

    /// Fall speed for balls spawned at the current level
    pub fn ball_speed(&self) -> f32 {
        self.tuning.base_ball_speed + self.tuning.speed_per_level * (self.level - 1) as f32
    }

    /// Top edge of the catch band
    pub fn catch_line(&self) -> f32 {
        self.tuning.viewport.height - self.tuning.catch_band_height
    }

    pub fn hud(&self) -> ColorMatchHud {
        ColorMatchHud {
            phase: self.phase,
            score: self.score,
            level: self.level,
            lives: self.lives,
            zone: self.player_zone,
            zone_color: BallColor::for_zone(self.player_zone),
        }
    }
}
