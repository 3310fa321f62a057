//! Difficulty progression and the slow-motion power-up window
//!
//! All changes are multiplicative: each level scales speed up and the spawn
//! interval down, and the power-up scales the effective multiplier without
//! touching the stored base.

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;
use crate::ms_to_ticks;
use crate::tuning::{SpawnPolicy, Tuning};

/// Active slow-motion window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerupWindow {
    pub started_at: u64,
    pub expires_at: u64,
    pub factor: f32,
}

/// Outcome of a level-up request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Advanced { level: u32, reached_max: bool },
    /// Already at the top level; nothing changed
    Capped,
}

#[derive(Debug, Clone)]
pub struct Difficulty {
    level: u32,
    level_multiplier: f32,
    spawn_interval_ms: f32,
    /// Running ticks, drives the time ramp
    elapsed_ticks: u64,
    powerup: Option<PowerupWindow>,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            level_multiplier: 1.0,
            spawn_interval_ms: tuning.spawn_interval_ms,
            elapsed_ticks: 0,
            powerup: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn powerup(&self) -> Option<PowerupWindow> {
        self.powerup
    }

    pub fn powerup_active(&self) -> bool {
        self.powerup.is_some()
    }

    /// Count one running tick. The ramp is frozen while slow motion is
    /// active, so expiry restores the exact pre-power-up multiplier.
    pub fn advance_elapsed(&mut self) {
        if self.powerup.is_none() {
            self.elapsed_ticks += 1;
        }
    }

    /// Raise the level by one, clamped at `max_level`
    pub fn on_score_threshold_reached(&mut self, tuning: &Tuning) -> LevelChange {
        if self.level >= tuning.max_level {
            return LevelChange::Capped;
        }

        self.level += 1;
        self.level_multiplier *= tuning.level_speed_factor;
        self.spawn_interval_ms =
            (self.spawn_interval_ms * tuning.spawn_interval_factor).max(tuning.min_spawn_interval_ms);

        LevelChange::Advanced {
            level: self.level,
            reached_max: self.level == tuning.max_level,
        }
    }

    /// Open the slow-motion window.
    ///
    /// Returns the expiry tick, or `None` when a window is already open: a
    /// re-trigger neither stacks nor extends the current one.
    pub fn activate_powerup(&mut self, now: u64, tuning: &Tuning) -> Option<u64> {
        if self.powerup.is_some() {
            return None;
        }
        let expires_at = now.saturating_add(ms_to_ticks(tuning.powerup_duration_ms));
        self.powerup = Some(PowerupWindow {
            started_at: now,
            expires_at,
            factor: tuning.powerup_factor,
        });
        Some(expires_at)
    }

    /// Close the slow-motion window; returns whether one was open
    pub fn expire_powerup(&mut self) -> bool {
        self.powerup.take().is_some()
    }

    /// Multiplier from level and elapsed play time, ignoring the power-up
    pub fn base_multiplier(&self, tuning: &Tuning) -> f32 {
        let seconds = self.elapsed_ticks as f32 / TICKS_PER_SECOND as f32;
        let ramp = (1.0 + tuning.speed_ramp_per_second).powf(seconds);
        (self.level_multiplier * ramp).min(tuning.max_speed_multiplier)
    }

    /// Multiplier applied to every object's speed this tick
    pub fn speed_multiplier(&self, tuning: &Tuning) -> f32 {
        let slow = self.powerup.map(|p| p.factor).unwrap_or(1.0);
        self.base_multiplier(tuning) * slow
    }

    pub fn spawn_interval_ms(&self) -> f32 {
        self.spawn_interval_ms
    }

    /// Per-tick spawn chance under the `Chance` policy (0 otherwise)
    pub fn spawn_chance(&self, tuning: &Tuning) -> f32 {
        match tuning.spawn_policy {
            SpawnPolicy::Chance { per_tick } => (per_tick * self.level_multiplier).min(1.0),
            SpawnPolicy::Interval => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_level_one() {
        let tuning = Tuning::steady();
        let d = Difficulty::new(&tuning);
        assert_eq!(d.level(), 1);
        assert_eq!(d.speed_multiplier(&tuning), 1.0);
        assert_eq!(d.spawn_interval_ms(), tuning.spawn_interval_ms);
        assert!(!d.powerup_active());
    }

    #[test]
    fn test_level_up_scales_speed_and_interval() {
        let tuning = Tuning::steady();
        let mut d = Difficulty::new(&tuning);
        assert_eq!(
            d.on_score_threshold_reached(&tuning),
            LevelChange::Advanced {
                level: 2,
                reached_max: false
            }
        );
        assert!((d.speed_multiplier(&tuning) - 1.15).abs() < 1e-6);
        assert!((d.spawn_interval_ms() - 900.0 * 0.85).abs() < 1e-3);
    }

    #[test]
    fn test_level_clamped_at_max() {
        let tuning = Tuning::steady();
        let mut d = Difficulty::new(&tuning);
        for _ in 0..4 {
            d.on_score_threshold_reached(&tuning);
        }
        assert_eq!(
            d.on_score_threshold_reached(&tuning),
            LevelChange::Advanced {
                level: 6,
                reached_max: true
            }
        );

        let multiplier = d.speed_multiplier(&tuning);
        let interval = d.spawn_interval_ms();
        for _ in 0..3 {
            assert_eq!(d.on_score_threshold_reached(&tuning), LevelChange::Capped);
        }
        assert_eq!(d.level(), 6);
        assert_eq!(d.speed_multiplier(&tuning), multiplier);
        assert_eq!(d.spawn_interval_ms(), interval);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = Tuning {
            max_level: 50,
            ..Tuning::steady()
        };
        let mut d = Difficulty::new(&tuning);
        for _ in 0..40 {
            d.on_score_threshold_reached(&tuning);
        }
        assert_eq!(d.spawn_interval_ms(), tuning.min_spawn_interval_ms);
    }

    #[test]
    fn test_powerup_halves_and_restores() {
        let tuning = Tuning::steady();
        let mut d = Difficulty::new(&tuning);
        d.on_score_threshold_reached(&tuning);
        let before = d.speed_multiplier(&tuning);

        let expiry = d.activate_powerup(100, &tuning);
        assert_eq!(expiry, Some(100 + 600));
        assert_eq!(d.speed_multiplier(&tuning), before * 0.5);

        assert!(d.expire_powerup());
        assert_eq!(d.speed_multiplier(&tuning), before);
        assert!(!d.expire_powerup());
    }

    #[test]
    fn test_powerup_retrigger_ignored() {
        let tuning = Tuning::steady();
        let mut d = Difficulty::new(&tuning);
        assert_eq!(d.activate_powerup(10, &tuning), Some(610));
        assert_eq!(d.activate_powerup(300, &tuning), None);
        let window = d.powerup().unwrap();
        assert_eq!(window.started_at, 10);
        assert_eq!(window.expires_at, 610);
        // Not stacked
        assert_eq!(d.speed_multiplier(&tuning), 0.5);
    }

    #[test]
    fn test_time_ramp_compounds_and_caps() {
        let tuning = Tuning {
            speed_ramp_per_second: 0.1,
            max_speed_multiplier: 2.0,
            ..Tuning::steady()
        };
        let mut d = Difficulty::new(&tuning);
        for _ in 0..TICKS_PER_SECOND {
            d.advance_elapsed();
        }
        assert!((d.base_multiplier(&tuning) - 1.1).abs() < 1e-5);

        for _ in 0..(TICKS_PER_SECOND * 60) {
            d.advance_elapsed();
        }
        assert_eq!(d.base_multiplier(&tuning), 2.0);
    }

    #[test]
    fn test_ramp_frozen_during_powerup() {
        let tuning = Tuning::default();
        let mut d = Difficulty::new(&tuning);
        for _ in 0..120 {
            d.advance_elapsed();
        }
        let before = d.speed_multiplier(&tuning);
        assert!(before > 1.0);

        d.activate_powerup(120, &tuning);
        for _ in 0..600 {
            d.advance_elapsed();
        }
        assert_eq!(d.speed_multiplier(&tuning), before * tuning.powerup_factor);

        d.expire_powerup();
        assert_eq!(d.speed_multiplier(&tuning), before);

        // Ramp resumes afterwards
        d.advance_elapsed();
        assert!(d.speed_multiplier(&tuning) > before);
    }

    #[test]
    fn test_huge_powerup_duration_saturates() {
        let tuning = Tuning {
            powerup_duration_ms: 1e30,
            ..Tuning::steady()
        };
        let mut d = Difficulty::new(&tuning);
        assert_eq!(d.activate_powerup(500, &tuning), Some(u64::MAX));
    }

    #[test]
    fn test_spawn_chance_scales_with_level() {
        let tuning = Tuning {
            spawn_policy: SpawnPolicy::Chance { per_tick: 0.03 },
            ..Tuning::steady()
        };
        let mut d = Difficulty::new(&tuning);
        assert!((d.spawn_chance(&tuning) - 0.03).abs() < 1e-6);
        d.on_score_threshold_reached(&tuning);
        assert!((d.spawn_chance(&tuning) - 0.03 * 1.15).abs() < 1e-6);

        let interval = Tuning::steady();
        assert_eq!(Difficulty::new(&interval).spawn_chance(&interval), 0.0);
    }
}
