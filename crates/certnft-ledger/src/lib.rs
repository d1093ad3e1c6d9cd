//! # CertNFT Ledger
//!
//! The ledger records certificate issuance, ownership and revocation. In
//! production that is an NFT contract; here it is the [`Ledger`] trait and
//! [`MemoryLedger`], an in-memory state machine that behaves like the
//! contract for everything the service relies on.
//!
//! ## Key Types
//!
//! - [`Ledger`] - Async trait with the contract operations
//! - [`MemoryLedger`] - In-memory implementation (not persisted)
//! - [`ListingPolicy`] - How enumeration treats missing token ids
//! - [`Issued`] - Result of an issue: token id plus transaction hash
//!
//! ## Invariants
//!
//! - Token ids are dense, start at 1 and are never reused.
//! - Every existing id has exactly one record and one token URI.
//! - `revoked` only ever goes from false to true.
//! - Operations on unknown ids fail with [`LedgerError::NotFound`]; they
//!   never create placeholder records.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use traits::{Issued, Ledger, ListingPolicy};
