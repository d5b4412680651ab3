//! Fixed-step frame pacing
//!
//! The runner physics is tuned per frame at 60 Hz. Hosts with other refresh
//! rates feed elapsed seconds here and step the sim as many times as returned.

use crate::consts::{FRAME_DT, MAX_SUBSTEPS};

/// Longest host frame honoured; anything above is a stall (tab switch, debugger)
const MAX_FRAME_SECONDS: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt` seconds of host time; returns how many sim frames to run
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_SECONDS);

        let mut steps = 0;
        while self.accumulator >= FRAME_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(FRAME_DT);
        }
        steps
    }

    /// Fraction of a frame left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / FRAME_DT
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
