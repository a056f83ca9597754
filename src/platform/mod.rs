//! Platform abstraction layer
//!
//! Maps browser keyboard codes (`KeyboardEvent.code`) to game input so the
//! host's listeners stay thin.

use crate::input::{Control, InputEvent};

/// Control bound to a key, if any
pub fn control_for_key(code: &str) -> Option<Control> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Control::Left),
        "ArrowRight" | "KeyD" => Some(Control::Right),
        "ArrowUp" | "KeyW" | "Space" => Some(Control::Jump),
        "ArrowDown" | "KeyS" => Some(Control::Down),
        _ => None,
    }
}

/// Input event for a keydown
pub fn event_for_keydown(code: &str) -> Option<InputEvent> {
    match code {
        "Enter" => Some(InputEvent::Start),
        "KeyR" => Some(InputEvent::Restart),
        _ => control_for_key(code).map(InputEvent::Press),
    }
}

/// Input event for a keyup
pub fn event_for_keyup(code: &str) -> Option<InputEvent> {
    control_for_key(code).map(InputEvent::Release)
}

/// Keys whose default browser action (scrolling) must be suppressed
pub fn is_game_key(code: &str) -> bool {
    matches!(
        code,
        "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" | "Space"
    )
}
