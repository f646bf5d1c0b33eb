//! Error types shared by the store, the runtime and the API

use thiserror::Error;

/// Failures of the persistence gateway
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of timer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("{0}")]
    Validation(String),

    #[error("Timer {0} not found")]
    NotFound(String),

    #[error("Timer {0} is completed, restart it first")]
    AlreadyCompleted(String),

    #[error("Timer service is not running")]
    ServiceUnavailable,
}
