//! Error types for verifier storage

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reasons a set or confirm did not succeed
///
/// The boolean API on [`crate::PinStorage`] collapses all of these to
/// `false`; the `try_` variants keep them apart for logging and tests.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Empty or absent PIN
    #[error("PIN is empty or missing")]
    InvalidInput,

    /// Confirm attempted before any PIN was set
    #[error("No PIN has been set")]
    NoStoredVerifier,

    /// The store did not commit the write, or could not be read
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// The hashing primitive could not produce a verifier
    #[error("Digest unavailable: {0}")]
    DigestUnavailable(String),

    /// Store contents could not be parsed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::PersistenceFailure(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
