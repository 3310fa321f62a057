//! Data-driven game balance
//!
//! Every gameplay constant lives here so the embedding page can override it.
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_LEVEL;

/// How new objects enter the play field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// One object every `spawn_interval_ms` (shrinks with level)
    #[default]
    Interval,
    /// Independent roll every tick
    Chance { per_tick: f32 },
}

/// What counts as progress toward the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpPolicy {
    /// Level up every `every` points
    Score { every: u64 },
    /// Level up every `every` sliced objects
    Slices { every: u64 },
}

impl LevelUpPolicy {
    pub fn step(&self) -> u64 {
        match self {
            LevelUpPolicy::Score { every } | LevelUpPolicy::Slices { every } => *every,
        }
    }
}

impl Default for LevelUpPolicy {
    fn default() -> Self {
        LevelUpPolicy::Score { every: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("radius range [{min}, {max}) is invalid")]
    RadiusRange { min: f32, max: f32 },
    #[error("{name} must be a probability in [0, 1], got {value}")]
    Probability { name: &'static str, value: f32 },
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("power-up factor must be in (0, 1], got {0}")]
    PowerupFactor(f32),
    #[error("level-up step must be at least 1")]
    LevelStep,
    #[error("max level must be at least 1")]
    MaxLevel,
    #[error("failed to parse tuning: {0}")]
    Parse(String),
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    pub spawn_policy: SpawnPolicy,
    /// Interval between spawns at level 1
    pub spawn_interval_ms: f32,
    /// Interval multiplier applied on each level-up
    pub spawn_interval_factor: f32,
    /// Interval floor
    pub min_spawn_interval_ms: f32,
    /// Chance that a spawned object is Special
    pub special_chance: f32,
    pub radius_min: f32,
    pub radius_max: f32,

    // === Motion (pixels per frame) ===
    pub base_speed: f32,
    /// Extra random speed in [0, jitter)
    pub speed_jitter: f32,
    /// Speed multiplier applied on each level-up
    pub level_speed_factor: f32,
    /// Compounding speed growth per second of play (0 disables)
    pub speed_ramp_per_second: f32,
    pub max_speed_multiplier: f32,

    // === Power-up ===
    pub powerup_duration_ms: f32,
    /// Multiplier applied while slow motion is active
    pub powerup_factor: f32,

    // === Scoring ===
    pub normal_points: u64,
    pub special_points: u64,
    pub level_up: LevelUpPolicy,
    pub max_level: u32,
    pub level_banner_ms: f32,

    // === Input ===
    /// Extra hit radius for mouse input
    pub hit_slack: f32,
    /// Extra hit radius for touch input
    pub touch_hit_slack: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_policy: SpawnPolicy::Interval,
            spawn_interval_ms: 900.0,
            spawn_interval_factor: 0.85,
            min_spawn_interval_ms: 250.0,
            special_chance: 0.1,
            radius_min: 20.0,
            radius_max: 40.0,

            base_speed: 2.0,
            speed_jitter: 0.5,
            level_speed_factor: 1.15,
            speed_ramp_per_second: 0.01,
            max_speed_multiplier: 4.0,

            powerup_duration_ms: 10_000.0,
            powerup_factor: 0.5,

            normal_points: 10,
            special_points: 15,
            level_up: LevelUpPolicy::Score { every: 50 },
            max_level: MAX_LEVEL,
            level_banner_ms: 1500.0,

            hit_slack: 0.0,
            touch_hit_slack: 8.0,
        }
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { name, value })
    }
}

fn check_probability(name: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::Probability { name, value })
    }
}

impl Tuning {
    /// Tuning with no randomness in motion and no time ramp (useful for replays)
    pub fn steady() -> Self {
        Self {
            speed_jitter: 0.0,
            speed_ramp_per_second: 0.0,
            ..Self::default()
        }
    }

    /// Reject values that would produce invalid geometry or stuck progression
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.radius_min.is_finite() && self.radius_min > 0.0 && self.radius_max >= self.radius_min)
        {
            return Err(TuningError::RadiusRange {
                min: self.radius_min,
                max: self.radius_max,
            });
        }
        check_probability("special_chance", self.special_chance)?;
        if let SpawnPolicy::Chance { per_tick } = self.spawn_policy {
            check_probability("spawn chance", per_tick)?;
        }
        check_positive("spawn_interval_ms", self.spawn_interval_ms)?;
        check_positive("spawn_interval_factor", self.spawn_interval_factor)?;
        check_positive("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        check_positive("base_speed", self.base_speed)?;
        check_positive("level_speed_factor", self.level_speed_factor)?;
        check_positive("max_speed_multiplier", self.max_speed_multiplier)?;
        check_positive("powerup_duration_ms", self.powerup_duration_ms)?;
        if !(self.speed_jitter.is_finite() && self.speed_jitter >= 0.0) {
            return Err(TuningError::NotPositive {
                name: "speed_jitter",
                value: self.speed_jitter,
            });
        }
        if !(self.speed_ramp_per_second.is_finite() && self.speed_ramp_per_second >= 0.0) {
            return Err(TuningError::NotPositive {
                name: "speed_ramp_per_second",
                value: self.speed_ramp_per_second,
            });
        }
        if !(self.powerup_factor > 0.0 && self.powerup_factor <= 1.0) {
            return Err(TuningError::PowerupFactor(self.powerup_factor));
        }
        if self.level_up.step() == 0 {
            return Err(TuningError::LevelStep);
        }
        if self.max_level == 0 {
            return Err(TuningError::MaxLevel);
        }
        Ok(())
    }

    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "slice_rush_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
