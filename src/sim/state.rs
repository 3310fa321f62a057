//! Game state machine
//!
//! Single authority for score, level and lifecycle. Every mutating call is
//! guarded by the current phase so timers and input that arrive late are
//! harmless no-ops.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, LevelChange};
use super::hit::{PointerSource, Strike, resolve_hit};
use super::object::{ObjectId, ObjectKind, SliceObject};
use super::registry::{ObjectRegistry, SpawnSpec};
use super::timers::{Scheduler, TimerEvent};
use crate::highscores::HighScore;
use crate::ms_to_ticks;
use crate::tuning::{LevelUpPolicy, SpawnPolicy, Tuning};

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Positive, finite area
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start (or after a reset)
    Idle,
    /// Clock active, input live
    Running,
    /// Clock suspended, input ignored
    Paused,
    /// Run ended
    GameOver,
}

/// Notifications for the render/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Sliced {
        id: ObjectId,
        kind: ObjectKind,
        points: u64,
    },
    LevelUp {
        level: u32,
    },
    /// Top level reached (every portfolio section unlocked)
    MaxLevelReached,
    LevelBannerHidden,
    PowerupStart {
        expires_at: u64,
    },
    PowerupEnd,
    HighScore {
        value: u64,
    },
    Escaped {
        id: ObjectId,
    },
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    field: PlayField,
    phase: GamePhase,
    score: u64,
    /// Objects sliced this run
    sliced: u64,
    /// Running ticks this run (frozen while paused)
    pub(crate) time_ticks: u64,
    pub(crate) registry: ObjectRegistry,
    pub(crate) difficulty: Difficulty,
    pub(crate) scheduler: Scheduler,
    high_score: HighScore,
    /// Best score when the current run started
    run_start_best: u64,
    /// Progress value that triggers the next level-up
    next_level_at: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game
    pub fn new(seed: u64, tuning: Tuning, field: PlayField, high_score: u64) -> Self {
        let difficulty = Difficulty::new(&tuning);
        let next_level_at = tuning.level_up.step();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            field,
            phase: GamePhase::Idle,
            score: 0,
            sliced: 0,
            time_ticks: 0,
            registry: ObjectRegistry::new(),
            difficulty,
            scheduler: Scheduler::new(),
            high_score: HighScore::new(high_score),
            run_start_best: high_score,
            next_level_at,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.difficulty.level()
    }

    pub fn sliced(&self) -> u64 {
        self.sliced
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn field(&self) -> PlayField {
        self.field
    }

    /// Canvas resized; affects future spawns only
    pub fn set_field(&mut self, field: PlayField) {
        self.field = field;
    }

    /// Effective speed multiplier (level, time ramp and power-up)
    pub fn speed_multiplier(&self) -> f32 {
        self.difficulty.speed_multiplier(&self.tuning)
    }

    pub fn powerup_active(&self) -> bool {
        self.difficulty.powerup_active()
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Live objects for rendering
    pub fn objects(&self) -> &[SliceObject] {
        self.registry.all()
    }

    /// Events not yet drained
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// `Idle | GameOver -> Running` with a fresh run
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            return false;
        }
        self.reset_run();
        self.phase = GamePhase::Running;
        if self.tuning.spawn_policy == SpawnPolicy::Interval {
            // First object enters on the first tick
            self.scheduler.schedule(self.time_ticks + 1, TimerEvent::Spawn);
        }
        self.emit(GameEvent::Started);
        log::info!("Run started (seed {}, best {})", self.seed, self.high_score());
        true
    }

    /// Back to `Idle`, discarding the current run (high score is kept)
    pub fn reset(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Idle;
        log::info!("Game reset");
    }

    fn reset_run(&mut self) {
        self.score = 0;
        self.sliced = 0;
        self.time_ticks = 0;
        self.registry.clear();
        self.difficulty = Difficulty::new(&self.tuning);
        self.scheduler.clear();
        self.next_level_at = self.tuning.level_up.step();
        self.run_start_best = self.high_score.best();
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.emit(GameEvent::Paused);
        log::info!("Paused at tick {}", self.time_ticks);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Running;
        self.emit(GameEvent::Resumed);
        log::info!("Resumed at tick {}", self.time_ticks);
        true
    }

    /// Pause button behaviour
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Slice whatever is under the pointer (only while running)
    pub fn slice_at(&mut self, point: Vec2, source: PointerSource) -> Option<Strike> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let slack = source.slack(&self.tuning);
        let strike = resolve_hit(&mut self.registry, point, slack)?;
        let points = self.on_hit(strike.kind);
        self.emit(GameEvent::Sliced {
            id: strike.id,
            kind: strike.kind,
            points,
        });
        Some(strike)
    }

    /// Score a sliced object; returns the points awarded
    pub fn on_hit(&mut self, kind: ObjectKind) -> u64 {
        if self.phase != GamePhase::Running {
            return 0;
        }

        let points = kind.points(&self.tuning);
        self.score += points;
        self.sliced += 1;

        if kind.grants_powerup() {
            self.activate_powerup();
        }
        self.record_high_score();
        self.check_level_up();
        points
    }

    fn activate_powerup(&mut self) {
        match self.difficulty.activate_powerup(self.time_ticks, &self.tuning) {
            Some(expires_at) => {
                self.scheduler.schedule(expires_at, TimerEvent::PowerupExpired);
                self.emit(GameEvent::PowerupStart { expires_at });
                log::info!("Slow motion until tick {}", expires_at);
            }
            None => log::debug!("Slow motion already active, ignoring re-trigger"),
        }
    }

    fn record_high_score(&mut self) {
        if self.high_score.submit(self.score) {
            let value = self.high_score.best();
            self.emit(GameEvent::HighScore { value });
        }
    }

    /// At most one level-up per call, however far past the threshold we are
    fn check_level_up(&mut self) {
        let (progress, step) = match self.tuning.level_up {
            LevelUpPolicy::Score { every } => (self.score, every),
            LevelUpPolicy::Slices { every } => (self.sliced, every),
        };
        if step == 0 || progress < self.next_level_at {
            return;
        }
        self.next_level_at = (progress / step + 1) * step;

        match self.difficulty.on_score_threshold_reached(&self.tuning) {
            LevelChange::Advanced { level, reached_max } => {
                self.emit(GameEvent::LevelUp { level });
                self.scheduler.cancel(TimerEvent::HideLevelBanner);
                self.scheduler.schedule(
                    self.time_ticks
                        .saturating_add(ms_to_ticks(self.tuning.level_banner_ms)),
                    TimerEvent::HideLevelBanner,
                );
                log::info!("Level up: {} (score {})", level, self.score);
                if reached_max {
                    self.emit(GameEvent::MaxLevelReached);
                    log::info!("All levels completed");
                }
            }
            LevelChange::Capped => log::debug!("Level threshold reached at max level"),
        }
    }

    /// An object left the field unstruck: the run is over
    pub fn on_escape(&mut self, id: ObjectId) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.emit(GameEvent::Escaped { id });
        self.game_over();
    }

    fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.record_high_score();

        let high_score = self.high_score.best();
        let new_record = self.score > self.run_start_best;
        self.emit(GameEvent::GameOver {
            score: self.score,
            high_score,
            new_record,
        });
        log::info!(
            "Game over: score {}, level {}, best {}",
            self.score,
            self.level(),
            high_score
        );
    }

    /// Apply a due timer
    pub(crate) fn fire_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Spawn => {
                self.spawn_random();
                let interval = ms_to_ticks(self.difficulty.spawn_interval_ms());
                self.scheduler
                    .schedule(self.time_ticks.saturating_add(interval), TimerEvent::Spawn);
            }
            TimerEvent::PowerupExpired => {
                if self.difficulty.expire_powerup() {
                    self.emit(GameEvent::PowerupEnd);
                    log::info!("Slow motion ended at tick {}", self.time_ticks);
                }
            }
            TimerEvent::HideLevelBanner => self.emit(GameEvent::LevelBannerHidden),
        }
    }

    /// Spawn one random object on the entry edge
    pub(crate) fn spawn_random(&mut self) -> Option<ObjectId> {
        let spawned = SpawnSpec::random(self.field, &self.tuning, &mut self.rng)
            .and_then(|spec| self.registry.spawn(spec));
        match spawned {
            Ok(id) => {
                log::debug!("Spawned {:?} at tick {}", id, self.time_ticks);
                Some(id)
            }
            Err(e) => {
                log::debug!("Spawn rejected: {}", e);
                None
            }
        }
    }
}
