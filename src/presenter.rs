//! Presentation boundary
//!
//! The simulation never draws. Hosts implement `Presenter` for whatever
//! surface they own and receive a read-only view of the state after each
//! frame's ticks.

use serde::{Deserialize, Serialize};

use crate::sim::GamePhase;
use crate::sim::color_match::BallColor;

/// One-way consumer of simulation state
pub trait Presenter<S: ?Sized> {
    fn present(&mut self, state: &S);
}

/// Scalars for the climber's UI text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimbHud {
    pub phase: GamePhase,
    /// Rounded up for display
    pub score: u64,
    pub height: u32,
    pub lives: u8,
    /// Whole combo points
    pub combo: u32,
    pub max_combo: u32,
    pub speed_boost: bool,
    pub invulnerable: bool,
}

/// Scalars for the color matcher's UI text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMatchHud {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub zone: usize,
    pub zone_color: BallColor,
}
