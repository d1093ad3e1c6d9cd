//! Error types for CertNFT Core.

use thiserror::Error;

/// Core errors that can occur while building certificate artifacts.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// Validation errors for caller-supplied certificate input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("invalid owner address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid token id: {0:?}")]
    InvalidTokenId(String),

    #[error("invalid issue date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("image is empty")]
    EmptyImage,

    #[error("image is {size} bytes, limit is {limit}")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("image filename is missing")]
    MissingFilename,
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            CoreError::DecodingError(e.to_string())
        } else {
            CoreError::EncodingError(e.to_string())
        }
    }
}
