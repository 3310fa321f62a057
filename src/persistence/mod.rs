//! High-score persistence
//!
//! Features:
//! - Versioned JSON envelope (bare integers from older pages still load)
//! - Store trait so the session never touches browser APIs directly
//! - In-memory store for native builds and tests

pub mod envelope;

use std::cell::{Cell, RefCell};

use thiserror::Error;

pub use envelope::{HighScoreRecord, RECORD_VERSION};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("stored high score is corrupt: {0}")]
    Corrupt(String),
    #[error("stored high score has unsupported version {0}")]
    UnsupportedVersion(u32),
    #[error("failed to encode high score: {0}")]
    Encode(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Somewhere the best score survives between runs
pub trait HighScoreStore {
    /// Stored best, or 0 when nothing has been saved yet
    fn load_high_score(&self) -> Result<u64, PersistenceError>;

    fn save_high_score(&self, best: u64) -> Result<(), PersistenceError>;
}

/// Volatile store holding the encoded record
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw stored text (any format)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::default();
        store.raw.replace(Some(raw.into()));
        store
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Result<u64, PersistenceError> {
        match self.raw.borrow().as_deref() {
            Some(raw) => HighScoreRecord::decode(raw).map(|r| r.best),
            None => Ok(0),
        }
    }

    fn save_high_score(&self, best: u64) -> Result<(), PersistenceError> {
        let json = HighScoreRecord::new(best).encode()?;
        self.raw.replace(Some(json));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &S {
    fn load_high_score(&self) -> Result<u64, PersistenceError> {
        (**self).load_high_score()
    }

    fn save_high_score(&self, best: u64) -> Result<(), PersistenceError> {
        (**self).save_high_score(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_loads_zero() {
        assert_eq!(MemoryStore::new().load_high_score(), Ok(0));
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        store.save_high_score(90).unwrap();
        assert_eq!(store.load_high_score(), Ok(90));
        assert_eq!(store.saves(), 1);
        assert_eq!(store.raw().as_deref(), Some(r#"{"version":1,"best":90}"#));
    }

    #[test]
    fn test_legacy_and_corrupt_records() {
        assert_eq!(MemoryStore::with_raw("55").load_high_score(), Ok(55));
        assert!(matches!(
            MemoryStore::with_raw("{oops").load_high_score(),
            Err(PersistenceError::Corrupt(_))
        ));
    }
}
