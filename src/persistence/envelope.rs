//! Versioned JSON envelope for the stored best score

use serde::{Deserialize, Serialize};

use super::PersistenceError;

/// Current record format
pub const RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub version: u32,
    pub best: u64,
}

/// Accepted on-disk shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredForm {
    Record(HighScoreRecord),
    /// Older pages stored the bare number
    Legacy(u64),
}

impl HighScoreRecord {
    pub fn new(best: u64) -> Self {
        Self {
            version: RECORD_VERSION,
            best,
        }
    }

    pub fn encode(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(|e| PersistenceError::Encode(e.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self, PersistenceError> {
        let form: StoredForm = serde_json::from_str(raw.trim())
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        match form {
            StoredForm::Record(record) if record.version > RECORD_VERSION => {
                Err(PersistenceError::UnsupportedVersion(record.version))
            }
            StoredForm::Record(record) => Ok(record),
            StoredForm::Legacy(best) => Ok(Self::new(best)),
        }
    }
}
