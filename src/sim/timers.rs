//! Deferred effects as explicit scheduler entries
//!
//! Deadlines are simulation ticks, so a timer only progresses while the clock
//! is running. Entries with equal deadlines fire in scheduling order.

use serde::{Deserialize, Serialize};

/// Effects that can be deferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Spawn the next object (interval spawn policy)
    Spawn,
    /// End the slow-motion window
    PowerupExpired,
    /// Hide the level-up banner
    HideLevelBanner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    due: u64,
    seq: u64,
    event: TimerEvent,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire once the clock reaches `due`
    pub fn schedule(&mut self, due: u64, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled { due, seq, event });
    }

    /// Drop every pending entry for `event`; returns how many were removed
    pub fn cancel(&mut self, event: TimerEvent) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.event != event);
        before - self.entries.len()
    }

    /// Earliest pending deadline for `event`
    pub fn due_tick(&self, event: TimerEvent) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.event == event)
            .map(|e| e.due)
            .min()
    }

    /// Remove and return the next entry due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<TimerEvent> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(index).event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut s = Scheduler::new();
        s.schedule(10, TimerEvent::Spawn);
        assert_eq!(s.pop_due(9), None);
        assert_eq!(s.pop_due(10), Some(TimerEvent::Spawn));
        assert!(s.is_empty());
    }

    #[test]
    fn test_fires_in_deadline_then_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(20, TimerEvent::HideLevelBanner);
        s.schedule(5, TimerEvent::PowerupExpired);
        s.schedule(5, TimerEvent::Spawn);

        assert_eq!(s.pop_due(100), Some(TimerEvent::PowerupExpired));
        assert_eq!(s.pop_due(100), Some(TimerEvent::Spawn));
        assert_eq!(s.pop_due(100), Some(TimerEvent::HideLevelBanner));
        assert_eq!(s.pop_due(100), None);
    }

    #[test]
    fn test_cancel_and_due_tick() {
        let mut s = Scheduler::new();
        s.schedule(50, TimerEvent::Spawn);
        s.schedule(30, TimerEvent::Spawn);
        s.schedule(40, TimerEvent::PowerupExpired);

        assert_eq!(s.due_tick(TimerEvent::Spawn), Some(30));
        assert_eq!(s.cancel(TimerEvent::Spawn), 2);
        assert_eq!(s.due_tick(TimerEvent::Spawn), None);
        assert_eq!(s.due_tick(TimerEvent::PowerupExpired), Some(40));
        assert_eq!(s.len(), 1);

        s.clear();
        assert!(s.is_empty());
    }
}
