//! Data-driven game balance
//!
//! Every gameplay constant lives here so a host can override it from the
//! settings JSON. Defaults reproduce the shipped balance. Values are checked
//! once by `validate()` before a run is built.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Continuous-space viewport reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Fail unless an entity of `needed` width fits horizontally
    pub fn require_width(&self, entity: &'static str, needed: f32) -> Result<(), ConfigError> {
        if self.width < needed {
            return Err(ConfigError::ViewportTooNarrow {
                width: self.width,
                entity,
                needed,
            });
        }
        Ok(())
    }
}

fn check(field: &'static str, value: f64, valid: bool) -> Result<(), ConfigError> {
    if valid && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning { field, value })
    }
}

/// Relative weights for platform variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformWeights {
    pub normal: u32,
    pub small: u32,
    pub moving: u32,
    pub breakable: u32,
    pub bouncy: u32,
}

impl Default for PlatformWeights {
    fn default() -> Self {
        Self {
            normal: 50,
            small: 25,
            moving: 15,
            breakable: 5,
            bouncy: 5,
        }
    }
}

/// Climber balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbTuning {
    pub viewport: Viewport,

    // === Movement ===
    pub move_accel: f32,
    pub max_speed: f32,
    pub boosted_max_speed: f32,
    /// Horizontal velocity multiplier when no direction is held
    pub friction: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub fast_fall: f32,
    pub jump_impulse: f32,
    pub boosted_jump_impulse: f32,
    /// Double jump impulse as a fraction of the ground jump
    pub double_jump_factor: f32,

    // === Camera / progression ===
    /// Camera target sits this fraction of the viewport above the player
    pub camera_lead: f32,
    pub camera_ease: f32,
    /// World units per height point
    pub height_unit: f32,

    // === Generation ===
    pub initial_platforms: u32,
    pub platform_spacing: f32,
    pub frontier_margin: f32,
    pub frontier_batch: u32,
    pub platform_weights: PlatformWeights,
    pub obstacle_chance: f64,
    pub power_up_chance: f64,
    pub cloud_count: u32,
    /// Entities further than this below the viewport are dropped
    pub prune_margin: f32,

    // === Lives / effects ===
    pub starting_lives: u8,
    pub max_lives: u8,
    /// Distance below the viewport at which a fall costs a life
    pub fall_margin: f32,
    pub damage_invulnerability_ticks: u32,
    pub shield_ticks: u32,
    pub speed_boost_ticks: u32,
    pub combo_decay: f64,
}

impl Default for ClimbTuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800.0, 600.0),

            move_accel: 0.8,
            max_speed: 4.0,
            boosted_max_speed: 5.0,
            friction: 0.85,
            gravity: 0.5,
            terminal_velocity: 15.0,
            fast_fall: 1.2,
            jump_impulse: 14.0,
            boosted_jump_impulse: 16.0,
            double_jump_factor: 0.8,

            camera_lead: 0.4,
            camera_ease: 0.1,
            height_unit: 8.0,

            initial_platforms: 24,
            platform_spacing: 120.0,
            frontier_margin: 200.0,
            frontier_batch: 6,
            platform_weights: PlatformWeights::default(),
            obstacle_chance: 0.25,
            power_up_chance: 0.3,
            cloud_count: 15,
            prune_margin: 600.0,

            starting_lives: 3,
            max_lives: 5,
            fall_margin: 200.0,
            damage_invulnerability_ticks: 120,
            shield_ticks: 600,
            speed_boost_ticks: 300,
            combo_decay: 0.1,
        }
    }
}

impl ClimbTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.viewport
            .require_width("platform", crate::sim::climb::MAX_PLATFORM_WIDTH)?;

        check("gravity", self.gravity as f64, self.gravity > 0.0)?;
        check(
            "terminal_velocity",
            self.terminal_velocity as f64,
            self.terminal_velocity > 0.0,
        )?;
        check(
            "friction",
            self.friction as f64,
            (0.0..=1.0).contains(&self.friction),
        )?;
        check("max_speed", self.max_speed as f64, self.max_speed > 0.0)?;
        check(
            "boosted_max_speed",
            self.boosted_max_speed as f64,
            self.boosted_max_speed > 0.0,
        )?;
        check(
            "camera_ease",
            self.camera_ease as f64,
            self.camera_ease > 0.0 && self.camera_ease <= 1.0,
        )?;
        check("height_unit", self.height_unit as f64, self.height_unit > 0.0)?;
        check(
            "platform_spacing",
            self.platform_spacing as f64,
            self.platform_spacing > 0.0,
        )?;
        check(
            "frontier_batch",
            self.frontier_batch as f64,
            self.frontier_batch > 0,
        )?;
        check(
            "obstacle_chance",
            self.obstacle_chance,
            (0.0..=1.0).contains(&self.obstacle_chance),
        )?;
        check(
            "power_up_chance",
            self.power_up_chance,
            (0.0..=1.0).contains(&self.power_up_chance),
        )?;
        check(
            "prune_margin",
            self.prune_margin as f64,
            self.prune_margin >= self.fall_margin,
        )?;
        check(
            "starting_lives",
            self.starting_lives as f64,
            self.starting_lives > 0 && self.starting_lives <= self.max_lives,
        )?;
        check("combo_decay", self.combo_decay, self.combo_decay >= 0.0)?;
        Ok(())
    }
}

/// Color-matching catcher balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMatchTuning {
    pub viewport: Viewport,
    pub starting_lives: u8,
    /// Ticks between spawns at level 1
    pub base_spawn_interval: u32,
    pub min_spawn_interval: u32,
    /// Spawn interval reduction per level
    pub spawn_interval_step: u32,
    pub base_ball_speed: f32,
    pub speed_per_level: f32,
    pub ball_radius: f32,
    /// Height of the band above the bottom edge where catches are judged
    pub catch_band_height: f32,
    pub points_per_level: u64,
}

impl Default for ColorMatchTuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(400.0, 600.0),
            starting_lives: 3,
            base_spawn_interval: 60,
            min_spawn_interval: 30,
            spawn_interval_step: 5,
            base_ball_speed: 2.0,
            speed_per_level: 0.5,
            ball_radius: 15.0,
            catch_band_height: 80.0,
            points_per_level: 10,
        }
    }
}

impl ColorMatchTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.viewport
            .require_width("falling ball", self.ball_radius * 2.0)?;

        check(
            "starting_lives",
            self.starting_lives as f64,
            self.starting_lives > 0,
        )?;
        check(
            "min_spawn_interval",
            self.min_spawn_interval as f64,
            self.min_spawn_interval > 0,
        )?;
        check(
            "base_spawn_interval",
            self.base_spawn_interval as f64,
            self.base_spawn_interval >= self.min_spawn_interval,
        )?;
        check(
            "base_ball_speed",
            self.base_ball_speed as f64,
            self.base_ball_speed > 0.0,
        )?;
        check("ball_radius", self.ball_radius as f64, self.ball_radius > 0.0)?;
        check(
            "catch_band_height",
            self.catch_band_height as f64,
            self.catch_band_height > 0.0 && self.catch_band_height < self.viewport.height,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ClimbTuning::default().validate().is_ok());
        assert!(ColorMatchTuning::default().validate().is_ok());
    }

    #[test]
    fn test_negative_viewport_rejected() {
        let tuning = ClimbTuning {
            viewport: Viewport::new(-800.0, 600.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidViewport { .. })
        ));

        let tuning = ColorMatchTuning {
            viewport: Viewport::new(400.0, f32::NAN),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn test_narrow_viewport_rejected() {
        let tuning = ClimbTuning {
            viewport: Viewport::new(100.0, 600.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::ViewportTooNarrow { .. })
        ));
    }

    #[test]
    fn test_bad_chance_rejected() {
        let tuning = ClimbTuning {
            obstacle_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidTuning {
                field: "obstacle_chance",
                ..
            })
        ));
    }

    #[test]
    fn test_spawn_interval_floor_respected() {
        let tuning = ColorMatchTuning {
            base_spawn_interval: 10,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: ClimbTuning = serde_json::from_str(r#"{"gravity": 0.6}"#).unwrap();
        assert_eq!(tuning.gravity, 0.6);
        assert_eq!(tuning.frontier_batch, 6);
    }
}
