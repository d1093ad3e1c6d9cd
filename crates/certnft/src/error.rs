//! Error types for the certificate service.

use certnft_core::{CoreError, TokenId, ValidationError};
use certnft_ledger::LedgerError;
use certnft_store::StoreError;
use thiserror::Error;

use crate::settings::SettingsError;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The token does not exist.
    #[error("certificate with id {0} not found")]
    NotFound(TokenId),

    /// The ledger backend failed or is not reachable.
    #[error("ledger error: {0}")]
    Upstream(String),

    /// The content store rejected an upload or could not be read.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Metadata could not be encoded or a record could not be rendered.
    #[error("encoding error: {0}")]
    Core(#[from] CoreError),

    /// Settings could not be loaded or saved.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl From<LedgerError> for ServiceError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(id) => Self::NotFound(id),
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
