//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use bytes::Bytes;

use certnft::{
    CertificateService, ImageUpload, IssueRequest, Settings, SettingsHandle, UpdateRequest,
};
use certnft_core::OwnerAddress;
use certnft_ledger::MemoryLedger;
use certnft_store::ContentStore;

/// Smallest byte string that starts like a PNG file.
pub const SAMPLE_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// A service over a fresh in-memory ledger.
pub struct TestFixture {
    pub ledger: Arc<MemoryLedger>,
    pub settings: Arc<SettingsHandle>,
    pub service: CertificateService<MemoryLedger>,
}

impl TestFixture {
    /// Mock ledger and mock content store with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Fixed, file-less settings.
    pub fn with_settings(settings: Settings) -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        let settings = Arc::new(SettingsHandle::fixed(settings));
        let service = CertificateService::new(Arc::clone(&ledger), Arc::clone(&settings))
            .expect("default content backend builds");
        Self {
            ledger,
            settings,
            service,
        }
    }

    /// Default settings with `store` as the content backend.
    pub fn with_content_store(store: Arc<dyn ContentStore>) -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        let settings = Arc::new(SettingsHandle::fixed(Settings::default()));
        let service =
            CertificateService::with_content_store(Arc::clone(&ledger), Arc::clone(&settings), store)
                .expect("settings readable");
        Self {
            ledger,
            settings,
            service,
        }
    }

    /// An issue request for `recipient` on `course`, owned by address 1.
    pub fn issue_request(&self, recipient: &str, course: &str) -> IssueRequest {
        IssueRequest {
            recipient_name: recipient.to_string(),
            recipient_address: address(1).to_string(),
            course_name: course.to_string(),
            issue_date: None,
            description: format!("{recipient} completed {course}"),
            image: sample_image("certificate.png"),
        }
    }

    /// An update request without a new image.
    pub fn update_request(&self, recipient: &str, course: &str) -> UpdateRequest {
        UpdateRequest {
            recipient_name: recipient.to_string(),
            course_name: course.to_string(),
            issue_date: None,
            description: format!("{recipient} completed {course}"),
            image: None,
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A small image upload.
pub fn sample_image(filename: &str) -> ImageUpload {
    ImageUpload::new(filename, Bytes::from_static(SAMPLE_IMAGE))
}

/// A deterministic owner address: twenty copies of byte `n`.
pub fn address(n: u8) -> OwnerAddress {
    OwnerAddress::parse(&format!("0x{}", hex::encode([n; 20]))).expect("well-formed address")
}

/// Distinct owner addresses for multi-party tests.
pub fn multi_party_addresses(count: usize) -> Vec<OwnerAddress> {
    (0..count).map(|i| address(i as u8 + 1)).collect()
}
