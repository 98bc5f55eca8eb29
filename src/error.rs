//! Error types for the typed storage layer
//!
//! Provides unified error handling using thiserror.
//!
//! Malformed stored content is never an error: reads degrade to the caller's
//! fallback instead. Only medium and write-path failures surface here.

use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The medium refused a write for lack of space
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The medium is disabled or cannot be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A value could not be encoded into its stored text form
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// No executor is available to arm an expiration timer
    #[error("Scheduler unavailable: {0}")]
    SchedulerUnavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
