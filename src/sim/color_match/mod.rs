//! Falling-ball color matcher
//!
//! Colored balls fall through four lanes; the catcher must be in the ball's
//! lane and the ball must match that lane's color.

pub mod state;
pub mod tick;

pub use state::{
    BallColor, BallId, ColorMatchEvent, ColorMatchState, FallingBall, LEVEL_SCORE, ZONE_COUNT,
    level_for_score,
};
pub use tick::{restart, spawn_ball, tick};
