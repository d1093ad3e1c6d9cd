//! # CertNFT
//!
//! Issue, read, update and revoke course certificates recorded as tokens on
//! a ledger, with their image and metadata kept in a content store.
//!
//! ## Overview
//!
//! - **Ledger**: allocates token ids, records owner, fields and revocation
//!   ([`certnft_ledger`])
//! - **Content store**: holds the certificate image and its metadata JSON
//!   ([`certnft_store`])
//! - **Service**: validates input, uploads artifacts, then writes to the
//!   ledger ([`CertificateService`])
//! - **Settings**: defaults, TOML file, `CERTNFT_*` environment, explicitly
//!   reloaded ([`SettingsHandle`])
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use certnft::{CertificateService, ImageUpload, IssueRequest, Settings, SettingsHandle};
//! use certnft::ledger::MemoryLedger;
//!
//! async fn example() -> certnft::Result<()> {
//!     let settings = Arc::new(SettingsHandle::fixed(Settings::default()));
//!     let service = CertificateService::new(Arc::new(MemoryLedger::new()), settings)?;
//!
//!     let receipt = service
//!         .issue(IssueRequest {
//!             recipient_name: "Alice".into(),
//!             recipient_address: "0x00000000000000000000000000000000000a11ce".into(),
//!             course_name: "Systems 101".into(),
//!             issue_date: None,
//!             description: String::new(),
//!             image: ImageUpload::new("cert.png", vec![0x89, b'P', b'N', b'G']),
//!         })
//!         .await?;
//!
//!     let view = service.get(receipt.id).await?;
//!     assert!(!view.revoked);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod service;
pub mod settings;

// Re-export component crates
pub use certnft_core as core;
pub use certnft_ledger as ledger;
pub use certnft_store as store;

pub use error::{Result, ServiceError};
pub use service::{
    network_name, CertificateReceipt, CertificateService, CertificateView, ImageUpload,
    IssueRequest, NetworkInfo, UpdateRequest, MOCK_CONTRACT_ADDRESS,
};
pub use settings::{
    ContentSettings, LedgerSettings, LimitSettings, Settings, SettingsError, SettingsHandle,
    SECRET_MASK,
};

pub use certnft_core::{TokenId, TxHash};
