//! Player settings and preferences
//!
//! Read from LocalStorage on the web. Native builds read an optional
//! JSON file named by `MINI_ARCADE_SETTINGS`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tuning::{ClimbTuning, ColorMatchTuning};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Whether to draw the climber's background clouds
    pub fn clouds_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (jump dust, bursts)
    pub particles: bool,
    /// Reduced motion (no flashes or pulsing)
    pub reduced_motion: bool,

    // === Balance ===
    pub climb: ClimbTuning,
    pub color_match: ColorMatchTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            reduced_motion: false,
            climb: ClimbTuning::default(),
            color_match: ColorMatchTuning::default(),
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective pulse/flash animation (respects reduced_motion)
    pub fn effective_animations(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse and validate settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.climb.validate()?;
        self.color_match.validate()
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "mini_arcade_settings";

    /// Environment variable naming a native settings file
    pub const PATH_ENV: &'static str = "MINI_ARCADE_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `MINI_ARCADE_SETTINGS`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            return Self::default();
        };
        match Self::load_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {path}");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {path}: {e}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_caps() {
        let low = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        assert_eq!(low.max_particles(), 100);
        assert_eq!(Settings::default().max_particles(), 500);
        let high = Settings {
            quality: QualityPreset::High,
            ..Settings::default()
        };
        assert_eq!(high.max_particles(), 2000);

        let settings = Settings {
            particles: false,
            ..high
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{"quality":"Low","climb":{"gravity":0.6}}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);
        assert_eq!(settings.climb.gravity, 0.6);
        assert_eq!(settings.climb.jump_impulse, 14.0);
        assert_eq!(settings.color_match, ColorMatchTuning::default());
    }

    #[test]
    fn test_invalid_json_and_tuning() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"climb":{"viewport":{"width":100,"height":600}}}"#),
            Err(ConfigError::ViewportTooNarrow { .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{"color_match":{"catch_band_height":-3}}"#),
            Err(ConfigError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            quality: QualityPreset::High,
            reduced_motion: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load_file(std::path::Path::new("/nonexistent/mini-arcade.json"));
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }
}
