//! Error types for the content store.

use thiserror::Error;

/// Errors that can occur during content store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached. Recoverable by failing over.
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the payload.
    #[error("content rejected: {0}")]
    Rejected(String),

    /// A reference string could not be parsed.
    #[error("invalid content reference: {0:?}")]
    InvalidRef(String),

    /// An internal lock was poisoned by a panicking writer.
    #[error("content store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether a fallback store may take over after this error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
