//! LocalStorage-backed high score store

use crate::persistence::{HighScoreRecord, HighScoreStore, PersistenceError};

/// LocalStorage key
pub const HIGH_SCORE_KEY: &str = "highScore";

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(HIGH_SCORE_KEY)
    }
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load_high_score(&self) -> Result<u64, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(raw)) => {
                let record = HighScoreRecord::decode(&raw)?;
                log::info!("Loaded high score {}", record.best);
                Ok(record.best)
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Ok(0)
            }
            Err(_) => Err(PersistenceError::Unavailable),
        }
    }

    fn save_high_score(&self, best: u64) -> Result<(), PersistenceError> {
        let storage = Self::storage()?;
        let json = HighScoreRecord::new(best).encode()?;
        storage
            .set_item(&self.key, &json)
            .map_err(|e| PersistenceError::Write(format!("{:?}", e)))?;
        log::info!("High score saved ({})", best);
        Ok(())
    }
}
