//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame of motion.

use super::clock::TickStatus;
use super::hit::PointerDown;
use super::state::{GamePhase, GameState};
use rand::Rng;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start / restart button
    pub start: bool,
    /// Pause button
    pub toggle_pause: bool,
    /// Pointer-downs since the previous tick, in arrival order
    pub slices: Vec<PointerDown>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickStatus {
    if input.start {
        state.start();
    }
    if input.toggle_pause {
        state.toggle_pause();
    }

    // Clock only runs while playing
    if state.phase() != GamePhase::Running {
        return TickStatus::Halted;
    }

    state.time_ticks += 1;
    state.difficulty.advance_elapsed();

    // Deferred effects due this tick
    while let Some(event) = state.scheduler.pop_due(state.time_ticks) {
        state.fire_timer(event);
    }

    let chance = state.difficulty.spawn_chance(&state.tuning);
    if chance > 0.0 && state.rng.random_bool(f64::from(chance.clamp(0.0, 1.0))) {
        state.spawn_random();
    }

    // Speeds are pixels per frame, so one tick moves by one unit of time
    let multiplier = state.speed_multiplier();
    let escaped = state.registry.advance(1.0, multiplier);

    // Slices land before the escape check so a last-moment hit still counts
    for slice in &input.slices {
        state.slice_at(slice.pos, slice.source);
    }

    for id in escaped {
        if state.registry.remove(id).is_some() {
            state.on_escape(id);
            break;
        }
    }

    if state.phase() == GamePhase::Running {
        TickStatus::Continue
    } else {
        TickStatus::Halted
    }
}
