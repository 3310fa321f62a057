//! Frame-driven game session
//!
//! Owns the game state, the fixed-timestep clock and the high-score store.
//! The host calls `frame()` from its animation callback and forwards pointer
//! and button input in between.

use glam::Vec2;
use serde::Serialize;

use crate::persistence::HighScoreStore;
use crate::sim::{
    FixedTimestep, GameEvent, GamePhase, GameState, PlayField, PointerDown, PointerSource,
    TickInput, TickStatus, tick,
};
use crate::tuning::Tuning;

/// What happened during one animation frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// Ticks simulated this frame
    pub ticks: u32,
    pub events: Vec<GameEvent>,
    /// False once the game is paused, idle or over; the host may stop its loop
    pub wants_next_frame: bool,
}

pub struct Session<S: HighScoreStore> {
    state: GameState,
    store: S,
    clock: FixedTimestep,
    pending: TickInput,
}

impl<S: HighScoreStore> Session<S> {
    /// Create an idle session, seeding the best score from `store`
    pub fn new(seed: u64, tuning: Tuning, field: PlayField, store: S) -> Self {
        let best = match store.load_high_score() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not load high score: {}", e);
                0
            }
        };
        Self {
            state: GameState::new(seed, tuning, field, best),
            store,
            clock: FixedTimestep::default(),
            pending: TickInput::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn is_running(&self) -> bool {
        self.state.phase() == GamePhase::Running
    }

    /// Start (or restart after game over)
    pub fn start(&mut self) -> bool {
        self.clock.reset();
        self.pending = TickInput::default();
        self.state.start()
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.clock.reset();
        self.state.resume()
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase() {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Canvas resized
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_field(PlayField::new(width, height));
    }

    /// Queue a pointer-down (canvas-local pixels) for the next tick
    pub fn pointer_down(&mut self, pos: Vec2, source: PointerSource) {
        if !self.is_running() {
            return;
        }
        self.pending.slices.push(PointerDown { pos, source });
    }

    /// Advance by one animation frame of `frame_dt` seconds
    pub fn frame(&mut self, frame_dt: f32) -> FrameReport {
        let steps = if self.is_running() {
            self.clock.accumulate(frame_dt)
        } else {
            0
        };

        let mut ticks = 0;
        for _ in 0..steps {
            let input = std::mem::take(&mut self.pending);
            ticks += 1;
            if tick(&mut self.state, &input) == TickStatus::Halted {
                break;
            }
        }
        if !self.is_running() {
            self.pending = TickInput::default();
        }

        let events = self.state.drain_events();
        self.persist(&events);

        FrameReport {
            ticks,
            events,
            wants_next_frame: self.is_running(),
        }
    }

    /// Save the newest best score seen in `events`
    fn persist(&self, events: &[GameEvent]) {
        let best = events.iter().rev().find_map(|e| match e {
            GameEvent::HighScore { value } => Some(*value),
            _ => None,
        });
        if let Some(best) = best {
            if let Err(e) = self.store.save_high_score(best) {
                log::warn!("Could not save high score: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_SUBSTEPS, SIM_DT};
    use crate::persistence::{MemoryStore, PersistenceError};

    fn session(store: MemoryStore) -> Session<MemoryStore> {
        Session::new(7, Tuning::steady(), PlayField::new(800.0, 4000.0), store)
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load_high_score(&self) -> Result<u64, PersistenceError> {
            Err(PersistenceError::Unavailable)
        }

        fn save_high_score(&self, _best: u64) -> Result<(), PersistenceError> {
            Err(PersistenceError::Write("quota".into()))
        }
    }

    /// Slice the first live object where it will be after the next tick
    fn slice_first<S: HighScoreStore>(s: &mut Session<S>) {
        let obj = s.state().objects()[0].clone();
        s.pointer_down(obj.pos - Vec2::new(0.0, obj.speed), PointerSource::Mouse);
    }

    #[test]
    fn test_loads_best_from_store() {
        let s = session(MemoryStore::with_raw("75"));
        assert_eq!(s.state().high_score(), 75);
        assert_eq!(s.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_idle_frames_do_nothing() {
        let mut s = session(MemoryStore::new());
        let report = s.frame(SIM_DT);
        assert_eq!(report.ticks, 0);
        assert!(!report.wants_next_frame);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_start_then_frame_spawns() {
        let mut s = session(MemoryStore::new());
        assert!(s.start());
        let report = s.frame(SIM_DT);
        assert_eq!(report.ticks, 1);
        assert!(report.wants_next_frame);
        assert_eq!(report.events, vec![GameEvent::Started]);
        assert_eq!(s.state().objects().len(), 1);
    }

    #[test]
    fn test_slice_saves_high_score() {
        let mut s = session(MemoryStore::new());
        s.start();
        s.frame(SIM_DT);
        slice_first(&mut s);
        let report = s.frame(SIM_DT);

        let score = s.state().score();
        assert!(score > 0);
        assert!(report.events.contains(&GameEvent::HighScore { value: score }));
        assert_eq!(s.store().saves(), 1);
        assert_eq!(s.store().load_high_score(), Ok(score));
    }

    #[test]
    fn test_pause_stops_loop_and_drops_input() {
        let mut s = session(MemoryStore::new());
        s.start();
        s.frame(SIM_DT);
        assert!(s.toggle_pause());
        slice_first(&mut s);
        let report = s.frame(0.1);
        assert_eq!(report.ticks, 0);
        assert!(!report.wants_next_frame);
        assert_eq!(report.events, vec![GameEvent::Paused]);

        // Time spent paused is not replayed
        assert!(s.toggle_pause());
        let report = s.frame(SIM_DT);
        assert_eq!(report.ticks, 1);
        assert_eq!(s.state().time_ticks(), 2);
        assert_eq!(s.state().score(), 0);
    }

    #[test]
    fn test_store_failures_leave_game_alone() {
        let mut s = Session::new(7, Tuning::steady(), PlayField::new(800.0, 4000.0), BrokenStore);
        assert_eq!(s.state().high_score(), 0);
        s.start();
        s.frame(SIM_DT);
        slice_first(&mut s);
        s.frame(SIM_DT);
        assert!(s.state().score() > 0);
        assert_eq!(s.state().high_score(), s.state().score());
        assert!(s.is_running());
    }

    #[test]
    fn test_slow_frame_is_capped() {
        let mut s = session(MemoryStore::new());
        s.start();
        // A one-second stall is clamped, never a burst of 60 ticks
        let report = s.frame(1.0);
        assert!(report.ticks > 0 && report.ticks <= MAX_SUBSTEPS);
    }
}
