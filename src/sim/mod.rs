//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod climb;
pub mod color_match;
pub mod geom;
pub mod particles;
pub mod weighted;

use serde::{Deserialize, Serialize};

pub use climb::{ClimbEvent, ClimbState};
pub use color_match::{ColorMatchEvent, ColorMatchState};
pub use geom::Rect;
pub use particles::{Burst, Particle, ParticleSystem};
pub use weighted::WeightedTable;

/// Run lifecycle shared by both games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start directive
    #[default]
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended; only restart leaves this phase
    GameOver,
}
