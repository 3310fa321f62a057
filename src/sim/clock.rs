//! Fixed-timestep accumulator
//!
//! Converts variable frame durations into a whole number of simulation ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame we account for; anything beyond (tab switch, debugger) is dropped
const MAX_FRAME_DT: f32 = 0.1;

/// Whether the frame loop should keep scheduling frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    /// Paused, idle or game over: the clock stops
    Halted,
}

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_substeps,
        }
    }

    /// Add a frame's duration and return how many ticks to run.
    ///
    /// Capped at `max_substeps`; leftover time past the cap is discarded so a
    /// slow frame never snowballs.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        steps
    }

    /// Drop accumulated time (after resume, so a paused gap is not replayed)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
