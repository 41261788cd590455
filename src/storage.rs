//! Transport-level storage failure, kept distinct from domain errors so
//! callers can decide on retry policy. The core never retries internally.

/// Raised when an underlying store (directory, catalog, enrollment store)
/// cannot be reached or its backing lock is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("storage unavailable: {0}")]
pub struct StorageError(pub String);

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
