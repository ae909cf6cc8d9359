//! Errors for settings/progress storage
//!
//! The rules engine never fails; only file persistence can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether a retry might succeed (e.g. transient filesystem issue)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageError::Io(_))
    }
}
