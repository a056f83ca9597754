//! Configuration errors
//!
//! Gameplay never fails: damage, misses and game over are state transitions.
//! The only fallible surface is building a run from settings and tuning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("viewport width {width} cannot fit a {entity} of width {needed}")]
    ViewportTooNarrow {
        width: f32,
        entity: &'static str,
        needed: f32,
    },

    #[error("tuning value `{field}` is out of range: {value}")]
    InvalidTuning { field: &'static str, value: f64 },

    #[error("weighted table needs at least one positive weight")]
    EmptyWeights,

    #[error("weighted table weights overflow a 32-bit total")]
    WeightOverflow,

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
