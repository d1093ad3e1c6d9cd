//! # CertNFT Testkit
//!
//! Testing utilities for CertNFT.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a service over a fresh in-memory ledger, sample requests
//!   and deterministic owner addresses
//! - **Generators**: proptest strategies for addresses, certificate fields
//!   and images
//! - **Stores**: content stores that fail in controlled ways, and a stub
//!   IPFS node answering with a fixed status
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use certnft_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let receipt = fixture
//!         .service
//!         .issue(fixture.issue_request("Alice", "Systems 101"))
//!         .await
//!         .unwrap();
//!     assert_eq!(receipt.id.get(), 1);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use certnft_testkit::generators::owner_address;
//!
//! proptest! {
//!     #[test]
//!     fn address_roundtrips(addr in owner_address()) {
//!         prop_assert_eq!(addr.as_str().parse::<certnft_core::OwnerAddress>().unwrap(), addr);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod ipfs;
pub mod stores;

pub use fixtures::{address, multi_party_addresses, TestFixture};
pub use ipfs::stub_ipfs_node;
pub use stores::{FailingStore, FailureMode};
