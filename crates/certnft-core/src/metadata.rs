//! Metadata blobs: the JSON documents token URIs point at.
//!
//! A blob is immutable once stored. Changing a certificate's image produces a
//! new blob (and a new URI) rather than editing the old one.

use serde::{Deserialize, Serialize};

use crate::certificate::CertificateFields;
use crate::error::CoreError;

pub const TRAIT_RECIPIENT_NAME: &str = "Recipient Name";
pub const TRAIT_COURSE_NAME: &str = "Course Name";
pub const TRAIT_ISSUE_DATE: &str = "Issue Date";

/// One `{trait_type, value}` pair in a metadata blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

/// NFT metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBlob {
    pub name: String,
    pub description: String,
    /// Resolved URL of the certificate image.
    pub image: String,
    /// Ordered attributes.
    pub attributes: Vec<Attribute>,
}

impl MetadataBlob {
    /// Build the metadata for a certificate.
    ///
    /// The attribute order is fixed: recipient, course, issue date.
    pub fn for_certificate(
        fields: &CertificateFields,
        issue_date: &str,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: format!("Certificate: {}", fields.course_name),
            description: fields.description.clone(),
            image: image_url.into(),
            attributes: vec![
                Attribute::new(TRAIT_RECIPIENT_NAME, &fields.recipient_name),
                Attribute::new(TRAIT_COURSE_NAME, &fields.course_name),
                Attribute::new(TRAIT_ISSUE_DATE, issue_date),
            ],
        }
    }

    /// Look up an attribute value by trait type.
    pub fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| a.value.as_str())
    }

    /// Serialize to JSON bytes for storage.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse from stored JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
