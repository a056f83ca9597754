//! Climber state and entity types
//!
//! Screen-space coordinates: y grows downward, so climbing makes y (and the
//! camera offset) more negative.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn;
use crate::error::ConfigError;
use crate::presenter::ClimbHud;
use crate::sim::geom::Rect;
use crate::sim::particles::ParticleSystem;
use crate::sim::weighted::WeightedTable;
use crate::sim::GamePhase;
use crate::tuning::ClimbTuning;

pub const PLAYER_WIDTH: f32 = 30.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const PLATFORM_HEIGHT: f32 = 20.0;
pub const STARTING_PLATFORM_WIDTH: f32 = 200.0;
/// Widest platform the generator places; the viewport must fit it
pub const MAX_PLATFORM_WIDTH: f32 = STARTING_PLATFORM_WIDTH;
pub const OBSTACLE_SIZE: f32 = 30.0;
pub const POWER_UP_SIZE: f32 = 25.0;

/// Health of platforms that cannot break
pub const INDESTRUCTIBLE: i32 = -1;

pub type EntityId = u32;

/// Mixed into the run seed for the cosmetic stream
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    Small,
    Moving,
    Breakable,
    Bouncy,
}

impl PlatformKind {
    pub fn width(self) -> f32 {
        match self {
            PlatformKind::Small => 60.0,
            PlatformKind::Bouncy => 100.0,
            _ => 120.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PlatformKind,
    /// -1 or +1
    pub direction: f32,
    /// Horizontal speed per tick (moving platforms only)
    pub speed: f32,
    /// Landings left before breaking, or `INDESTRUCTIBLE`
    pub health: i32,
    /// Upward speed on landing (bouncy platforms only)
    pub bounce_force: f32,
    /// Marked during the collision pass, removed after it
    pub broken: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Bird,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: ObstacleKind,
    pub vel: Vec2,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Life,
    Score,
    Speed,
    Shield,
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Life,
        PowerUpKind::Score,
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
    ];

    /// Points before the combo bonus; each whole combo point adds a tenth of this
    pub fn base_points(self) -> f64 {
        match self {
            PowerUpKind::Life => 100.0,
            PowerUpKind::Score => 200.0,
            PowerUpKind::Speed => 150.0,
            PowerUpKind::Shield => 250.0,
            PowerUpKind::Magnet => 300.0,
        }
    }

    /// 0xRRGGBB used for the pickup and its particles
    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Life => 0x4CAF50,
            PowerUpKind::Score => 0xFFD700,
            PowerUpKind::Speed => 0x2196F3,
            PowerUpKind::Shield => 0x9C27B0,
            PowerUpKind::Magnet => 0xFF9800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub collected: bool,
    /// Animation phases (radians), presentation only
    pub bob_phase: f32,
    pub pulse_phase: f32,
}

/// Background cloud (decorative)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// The climber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
    pub on_ground: bool,
    /// Airborne and moving up
    pub climbing: bool,
    pub invulnerable: bool,
    pub invulnerability_ticks: u32,
    pub double_jump_available: bool,
    /// Ticks since last grounded
    pub air_time: u32,
    /// Last platform landed on (non-owning)
    pub last_platform: Option<EntityId>,
    /// Moving platform carrying the player, reset every collision pass
    pub on_moving_platform: Option<EntityId>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            rect: Rect {
                pos,
                size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            },
            vel: Vec2::ZERO,
            prev_pos: pos,
            on_ground: false,
            climbing: false,
            invulnerable: false,
            invulnerability_ticks: 0,
            double_jump_available: true,
            air_time: 0,
            last_platform: None,
            on_moving_platform: None,
        }
    }

    /// Make the player invulnerable for at least `ticks`
    pub fn grant_invulnerability(&mut self, ticks: u32) {
        self.invulnerable = true;
        self.invulnerability_ticks = ticks;
    }
}

/// Feedback emitted during a tick for the host's fire-and-forget effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClimbEvent {
    Started,
    Restarted,
    Jumped,
    DoubleJumped,
    Landed { platform: EntityId },
    Bounced { platform: EntityId },
    PlatformCracked { platform: EntityId, health: i32 },
    PlatformBroken { platform: EntityId },
    HeightGained { height: u32 },
    PowerUpCollected { kind: PowerUpKind, points: f64 },
    Damaged { lives: u8 },
    Respawned { platform: EntityId },
    GameOver { score: f64, height: u32 },
}

/// Complete climber state
#[derive(Debug, Clone)]
pub struct ClimbState {
    pub tuning: ClimbTuning,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay randomness: level generation and obstacle motion
    pub rng: Pcg32,
    /// Cosmetic randomness (particles, clouds), so the particle cap never
    /// shifts the gameplay stream
    pub fx_rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub clouds: Vec<Cloud>,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    /// Fractional: height gains are multiplied by the combo
    pub score: f64,
    pub height: u32,
    pub lives: u8,
    pub combo: f64,
    pub max_combo: f64,
    /// Top edge of the view in world space; only ever decreases
    pub camera_y: f32,
    /// Difficulty scalar in [1, 2.5]
    pub game_speed: f32,
    pub speed_boost_ticks: u32,
    /// y of the highest platform generated so far
    pub frontier_y: f32,
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<ClimbEvent>,
    pub(crate) platform_table: WeightedTable<PlatformKind>,
    next_id: EntityId,
}

impl ClimbState {
    /// Build a fresh run waiting for the start directive
    pub fn new(seed: u64, tuning: ClimbTuning, max_particles: usize) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let w = &tuning.platform_weights;
        let platform_table = WeightedTable::new(vec![
            (w.normal, PlatformKind::Normal),
            (w.small, PlatformKind::Small),
            (w.moving, PlatformKind::Moving),
            (w.breakable, PlatformKind::Breakable),
            (w.bouncy, PlatformKind::Bouncy),
        ])?;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            phase: GamePhase::Ready,
            player: Player::new(Vec2::ZERO),
            platforms: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            clouds: Vec::new(),
            particles: ParticleSystem::new(max_particles),
            score: 0.0,
            height: 0,
            lives: tuning.starting_lives,
            combo: 0.0,
            max_combo: 0.0,
            camera_y: 0.0,
            game_speed: 1.0,
            speed_boost_ticks: 0,
            frontier_y: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            platform_table,
            next_id: 1,
            tuning,
        };
        state.reset_run();
        spawn::scatter_clouds(&mut state);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset scalars, player and level; clouds and the RNG stream carry over
    pub(crate) fn reset_run(&mut self) {
        let vp = self.tuning.viewport;
        self.score = 0.0;
        self.height = 0;
        self.lives = self.tuning.starting_lives;
        self.combo = 0.0;
        self.max_combo = 0.0;
        self.camera_y = 0.0;
        self.game_speed = 1.0;
        self.speed_boost_ticks = 0;
        self.time_ticks = 0;
        self.player = Player::new(Vec2::new(
            vp.width / 2.0 - PLAYER_WIDTH / 2.0,
            vp.height - 140.0,
        ));
        self.platforms.clear();
        self.obstacles.clear();
        self.power_ups.clear();
        self.particles.clear();
        spawn::generate_initial_level(self);
    }

    /// Add to the combo, tracking the best this run
    pub fn add_combo(&mut self, amount: f64) {
        self.combo += amount;
        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn speed_boost_active(&self) -> bool {
        self.speed_boost_ticks > 0
    }

    pub fn platform(&self, id: EntityId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Bottom edge of the view in world space
    pub fn camera_bottom(&self) -> f32 {
        self.camera_y + self.tuning.viewport.height
    }

    /// Read-only scalars for UI text sinks
    pub fn hud(&self) -> ClimbHud {
        ClimbHud {
            phase: self.phase,
            score: self.score.ceil() as u64,
            height: self.height,
            lives: self.lives,
            combo: self.combo.floor() as u32,
            max_combo: self.max_combo.floor() as u32,
            speed_boost: self.speed_boost_active(),
            invulnerable: self.player.invulnerable,
        }
    }
}
