//! Input sampling
//!
//! Host event callbacks feed `InputEvent`s into a sampler at any time; the
//! frame loop calls `sample()` exactly once per tick. Edge-triggered flags
//! (jump, start, restart, discrete moves) are cleared by the read so each
//! physical press is seen by at most one tick.

use serde::{Deserialize, Serialize};

/// Logical controls the games understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Jump,
    Down,
}

/// Raw, host-delivered input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Press(Control),
    Release(Control),
    /// Start button / start key
    Start,
    /// Restart button / restart key
    Restart,
}

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Converts host events into per-tick directives
pub trait InputSampler {
    type Directives;

    fn handle(&mut self, event: InputEvent);

    /// Read the directives for one tick, clearing edge-triggered state
    fn sample(&mut self) -> Self::Directives;
}

/// Directives for one climber tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimbInput {
    /// Held direction (left wins when both are held)
    pub direction: Option<Direction>,
    /// Jump key went down since the last tick
    pub jump: bool,
    /// Down is held
    pub fast_fall: bool,
    pub start: bool,
    pub restart: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ClimbSampler {
    left: bool,
    right: bool,
    down: bool,
    jump_held: bool,
    jump_edge: bool,
    start: bool,
    restart: bool,
}

impl ClimbSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget held keys (e.g. after the window loses focus)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl InputSampler for ClimbSampler {
    type Directives = ClimbInput;

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(Control::Left) => self.left = true,
            InputEvent::Press(Control::Right) => self.right = true,
            InputEvent::Press(Control::Down) => self.down = true,
            InputEvent::Press(Control::Jump) => {
                // Key auto-repeat delivers presses while held; only a fresh press counts
                if !self.jump_held {
                    self.jump_edge = true;
                }
                self.jump_held = true;
            }
            InputEvent::Release(Control::Left) => self.left = false,
            InputEvent::Release(Control::Right) => self.right = false,
            InputEvent::Release(Control::Down) => self.down = false,
            InputEvent::Release(Control::Jump) => self.jump_held = false,
            InputEvent::Start => self.start = true,
            InputEvent::Restart => self.restart = true,
        }
    }

    fn sample(&mut self) -> ClimbInput {
        let direction = if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        };
        ClimbInput {
            direction,
            jump: std::mem::take(&mut self.jump_edge),
            fast_fall: self.down,
            start: std::mem::take(&mut self.start),
            restart: std::mem::take(&mut self.restart),
        }
    }
}

/// Directives for one color-match tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMatchInput {
    /// Discrete lane moves in arrival order
    pub moves: Vec<Direction>,
    pub start: bool,
    pub restart: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ColorMatchSampler {
    moves: Vec<Direction>,
    start: bool,
    restart: bool,
}

impl ColorMatchSampler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSampler for ColorMatchSampler {
    type Directives = ColorMatchInput;

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(Control::Left) => self.moves.push(Direction::Left),
            InputEvent::Press(Control::Right) => self.moves.push(Direction::Right),
            InputEvent::Start => self.start = true,
            InputEvent::Restart => self.restart = true,
            _ => {}
        }
    }

    fn sample(&mut self) -> ColorMatchInput {
        ColorMatchInput {
            moves: std::mem::take(&mut self.moves),
            start: std::mem::take(&mut self.start),
            restart: std::mem::take(&mut self.restart),
        }
    }
}
