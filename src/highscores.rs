//! Best score tracking
//!
//! Single all-time best; persistence goes through `persistence::HighScoreStore`.

use serde::{Deserialize, Serialize};

/// All-time best score (monotonically non-decreasing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a score; returns true if it became the new best
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_raises_best() {
        let mut hs = HighScore::default();
        assert!(hs.submit(30));
        assert_eq!(hs.best(), 30);
        assert!(hs.submit(45));
        assert_eq!(hs.best(), 45);
    }

    #[test]
    fn test_never_decreases() {
        let mut hs = HighScore::new(100);
        assert!(!hs.submit(40));
        assert!(!hs.submit(100));
        assert_eq!(hs.best(), 100);
        assert!(!hs.qualifies(0));
    }
}
