//! Certificate: the record a ledger keeps for each token.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{OwnerAddress, TokenId};

/// The mutable text fields of a certificate.
///
/// Issue sets them; update overwrites all three at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateFields {
    pub recipient_name: String,
    pub course_name: String,
    pub description: String,
}

impl CertificateFields {
    pub fn new(
        recipient_name: impl Into<String>,
        course_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            course_name: course_name.into(),
            description: description.into(),
        }
    }
}

/// A certificate record as held by the ledger.
///
/// The token URI is not part of the record: the ledger keeps it in a
/// separate table keyed by the same token id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Ledger-assigned identifier.
    pub token_id: TokenId,

    /// Recipient, course and description text.
    #[serde(flatten)]
    pub fields: CertificateFields,

    /// Issue time, seconds since the Unix epoch.
    pub issue_date: i64,

    /// One-way flag: once true it never goes back to false.
    pub revoked: bool,

    /// Current holder of the token.
    pub owner: OwnerAddress,
}

impl Certificate {
    pub fn course_name(&self) -> &str {
        &self.fields.course_name
    }

    /// The issue date as a `YYYY-MM-DD` calendar date (UTC).
    pub fn issue_date_string(&self) -> Result<String, CoreError> {
        format_issue_date(self.issue_date)
    }
}

/// Render a Unix timestamp (seconds) as a `YYYY-MM-DD` calendar date in UTC.
pub fn format_issue_date(secs: i64) -> Result<String, CoreError> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or(CoreError::TimestampOutOfRange(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Certificate {
        Certificate {
            token_id: TokenId(3),
            fields: CertificateFields::new("Alice", "Systems 101", "Passed with honors"),
            issue_date: 1_700_000_000,
            revoked: false,
            owner: OwnerAddress::parse("0x00000000000000000000000000000000000000a1").unwrap(),
        }
    }

    #[test]
    fn test_issue_date_rendering() {
        assert_eq!(format_issue_date(0).unwrap(), "1970-01-01");
        assert_eq!(sample().issue_date_string().unwrap(), "2023-11-14");
    }

    #[test]
    fn test_issue_date_out_of_range() {
        assert!(matches!(
            format_issue_date(i64::MAX),
            Err(CoreError::TimestampOutOfRange(_))
        ));
    }

    #[test]
    fn test_certificate_serializes_flat() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["recipient_name"], "Alice");
        assert_eq!(value["course_name"], "Systems 101");
        assert_eq!(value["token_id"], 3);
        assert_eq!(value["revoked"], false);
    }
}
