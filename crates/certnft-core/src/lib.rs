//! # CertNFT Core
//!
//! Pure primitives for CertNFT: token identifiers, certificate records,
//! metadata blobs, and input validation.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`TokenId`] - Dense, 1-based identifier of a certificate token
//! - [`OwnerAddress`] - EVM-style address of a certificate holder
//! - [`Certificate`] - The record a ledger keeps per token
//! - [`MetadataBlob`] - The off-ledger JSON document a token URI points at
//! - [`TxHash`] - Identifier returned for every ledger write

pub mod certificate;
pub mod error;
pub mod metadata;
pub mod types;
pub mod validation;

pub use certificate::{format_issue_date, Certificate, CertificateFields};
pub use error::{CoreError, ValidationError};
pub use metadata::{Attribute, MetadataBlob};
pub use types::{OwnerAddress, TokenId, TxHash};
pub use validation::{parse_issue_date, require_text, validate_image, ImageLimits};
