//! Multipart form decoding for certificate uploads.

use axum::extract::Multipart;
use bytes::Bytes;

use certnft::{ImageUpload, IssueRequest, UpdateRequest};

use crate::error::AppError;

/// The fields of a certificate form. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct CertificateForm {
    pub recipient_name: Option<String>,
    pub recipient_address: Option<String>,
    pub course_name: Option<String>,
    pub issue_date: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageUpload>,
}

impl CertificateForm {
    /// Read every field of a multipart body.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes: Bytes = field.bytes().await?;
                    // Browsers send an empty part when no file is picked.
                    if filename.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.image = Some(ImageUpload::new(filename, bytes));
                }
                "recipient_name" => form.recipient_name = Some(field.text().await?),
                "recipient_address" => form.recipient_address = Some(field.text().await?),
                "course_name" => form.course_name = Some(field.text().await?),
                "issue_date" => form.issue_date = Some(field.text().await?),
                "description" => form.description = Some(field.text().await?),
                other => tracing::debug!(field = other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    pub fn into_issue_request(self) -> Result<IssueRequest, AppError> {
        Ok(IssueRequest {
            recipient_name: required(self.recipient_name, "recipient_name")?,
            recipient_address: required(self.recipient_address, "recipient_address")?,
            course_name: required(self.course_name, "course_name")?,
            issue_date: self.issue_date,
            description: self.description.unwrap_or_default(),
            image: self
                .image
                .ok_or_else(|| AppError::Validation("image is required".into()))?,
        })
    }

    /// `recipient_address` is accepted but ignored: ownership does not
    /// change on update.
    pub fn into_update_request(self) -> Result<UpdateRequest, AppError> {
        Ok(UpdateRequest {
            recipient_name: required(self.recipient_name, "recipient_name")?,
            course_name: required(self.course_name, "course_name")?,
            issue_date: self.issue_date,
            description: self.description.unwrap_or_default(),
            image: self.image,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_rejected() {
        let form = CertificateForm {
            recipient_name: Some("Alice".into()),
            recipient_address: Some("0x00000000000000000000000000000000000a11ce".into()),
            course_name: Some("Systems 101".into()),
            ..Default::default()
        };
        assert!(matches!(
            form.into_issue_request(),
            Err(AppError::Validation(m)) if m.contains("image")
        ));
    }

    #[test]
    fn test_update_without_image() {
        let form = CertificateForm {
            recipient_name: Some("Alice".into()),
            course_name: Some("Systems 102".into()),
            ..Default::default()
        };
        let req = form.into_update_request().unwrap();
        assert!(req.image.is_none());
        assert_eq!(req.description, "");
    }
}
