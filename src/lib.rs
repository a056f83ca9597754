//! Mini Arcade - two browser mini-games on a shared simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (climber and color matcher)
//! - `input`: Per-tick input sampling
//! - `frame`: Fixed-timestep frame clock
//! - `presenter`: One-way presentation boundary and HUD snapshots
//! - `platform`: Browser key mapping
//! - `settings` / `tuning`: Preferences and data-driven game balance

pub mod error;
pub mod frame;
pub mod input;
pub mod platform;
pub mod presenter;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use frame::FrameClock;
pub use presenter::{ClimbHud, ColorMatchHud, Presenter};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame gap fed to the accumulator, in seconds
    pub const MAX_FRAME_DT: f32 = 0.1;
}
