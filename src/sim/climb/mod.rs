//! Vertical platform climber
//!
//! The player jumps between procedurally generated platforms while the
//! camera follows upward. Score accrues from height gained (scaled by the
//! combo) and from power-ups.

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{
    ClimbEvent, ClimbState, Cloud, EntityId, MAX_PLATFORM_WIDTH, Obstacle, ObstacleKind,
    Platform, PlatformKind, Player, PowerUp, PowerUpKind,
};
pub use tick::{restart, tick};
