//! Input validation for certificate requests.
//!
//! These checks run at the service boundary, before any upload or ledger
//! write happens.

use chrono::{NaiveDate, Utc};

use crate::error::ValidationError;

/// Default upper bound for certificate images (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Limits applied to uploaded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Require a non-blank text field, returning it trimmed.
pub fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// Normalize a caller-supplied issue date label.
///
/// Accepts `YYYY-MM-DD`. A missing or blank value means today (UTC).
pub fn parse_issue_date(value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .map_err(|_| ValidationError::InvalidDate(v.to_string())),
    }
}

/// Check an uploaded image against the limits.
pub fn validate_image(
    filename: &str,
    bytes: &[u8],
    limits: ImageLimits,
) -> Result<(), ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::MissingFilename);
    }
    if bytes.is_empty() {
        return Err(ValidationError::EmptyImage);
    }
    if bytes.len() > limits.max_bytes {
        return Err(ValidationError::ImageTooLarge {
            size: bytes.len(),
            limit: limits.max_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("course_name", "  Rust  ").unwrap(), "Rust");
        assert_eq!(
            require_text("course_name", "   "),
            Err(ValidationError::MissingField("course_name"))
        );
    }

    #[test]
    fn test_parse_issue_date() {
        assert_eq!(parse_issue_date(Some("2024-02-29")).unwrap(), "2024-02-29");
        assert!(parse_issue_date(Some("2023-02-29")).is_err());
        assert!(parse_issue_date(Some("29/02/2024")).is_err());

        let today = parse_issue_date(None).unwrap();
        assert_eq!(today.len(), 10);
        assert_eq!(parse_issue_date(Some("  ")).unwrap(), today);
    }

    #[test]
    fn test_validate_image() {
        let limits = ImageLimits { max_bytes: 4 };
        assert!(validate_image("a.png", b"abcd", limits).is_ok());
        assert_eq!(
            validate_image("a.png", b"", limits),
            Err(ValidationError::EmptyImage)
        );
        assert_eq!(
            validate_image("", b"ab", limits),
            Err(ValidationError::MissingFilename)
        );
        assert_eq!(
            validate_image("a.png", b"abcde", limits),
            Err(ValidationError::ImageTooLarge { size: 5, limit: 4 })
        );
    }
}
