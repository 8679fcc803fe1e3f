//! Storage error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the write because it would exceed its capacity
    #[error("quota exceeded writing '{key}': need {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// Namespace fell back to the session overlay after an earlier failure
    #[error("namespace '{0}' is held in memory for this session")]
    Degraded(String),
}
