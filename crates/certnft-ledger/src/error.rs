//! Error types for the ledger.

use certnft_core::TokenId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced token does not exist.
    #[error("certificate with id {0} does not exist")]
    NotFound(TokenId),

    /// The ledger backend rejected the operation or could not be reached.
    #[error("ledger operation failed: {0}")]
    Upstream(String),

    /// The state lock was poisoned by a panicking writer.
    #[error("ledger state lock poisoned")]
    Poisoned,
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
