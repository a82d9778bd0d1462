//! Error types for the entry core

use thiserror::Error;

/// Result type alias for entry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building an entry component
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A PIN needs at least one slot
    #[error("PIN length must be at least 1 digit, got {0}")]
    InvalidMaxLength(usize),

    /// Drag threshold must be a positive, finite distance
    #[error("Drag threshold must be positive and finite, got {0}")]
    InvalidDragThreshold(f64),
}
