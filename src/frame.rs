//! Fixed-timestep frame clock
//!
//! Converts variable animation-frame deltas into a whole number of
//! simulation ticks. Leftover time carries to the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Timestamp of the previous frame in ms, if any
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks to run for a frame `dt` seconds after the previous one
    pub fn advance(&mut self, dt: f32) -> u32 {
        // Tab switches can deliver huge gaps; never try to catch up on those
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiraling
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Like `advance`, from a `requestAnimationFrame` timestamp in ms
    pub fn advance_to(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.advance(dt)
    }

    /// Forget the previous timestamp (e.g. after the page was hidden)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_ms = None;
    }
}
