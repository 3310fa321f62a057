//! Slice Rush - a pointer-driven slicing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (objects, difficulty, clock, hit-testing, game state)
//! - `renderer`: WebGPU rendering of the live objects
//! - `platform`: Browser/native platform helpers (input coordinates, storage)
//! - `persistence`: High-score store seam
//! - `tuning`: Data-driven game balance
//! - `session`: Glue that drives the simulation from frame callbacks

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::{FrameReport, Session};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per animation frame at 60 Hz)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Highest reachable level
    pub const MAX_LEVEL: u32 = 6;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded up, at least 1)
#[inline]
pub fn ms_to_ticks(ms: f32) -> u64 {
    let ticks = (ms.max(0.0) * consts::TICKS_PER_SECOND as f32 / 1000.0).ceil() as u64;
    ticks.max(1)
}
