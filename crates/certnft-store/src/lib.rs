//! # CertNFT Store
//!
//! Content store abstraction for CertNFT. Certificate images and metadata
//! blobs are written here; the ledger only ever sees the resolved URL.
//!
//! ## Key Types
//!
//! - [`ContentStore`] - The async trait for all content storage operations
//! - [`ContentRef`] - Opaque reference returned by `store`
//! - [`UrlResolver`] - Pure mapping from a reference to a dereferenceable URL
//! - [`MemoryContentStore`] - Deterministic local placeholder store
//! - [`IpfsContentStore`] - Client for an IPFS node's HTTP API
//! - [`FallbackContentStore`] - Fails over from a remote store to the local one
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use certnft_store::{ContentStore, MemoryContentStore, UrlResolver};
//!
//! async fn example() {
//!     let store = MemoryContentStore::new(UrlResolver::default());
//!
//!     let content_ref = store
//!         .store(Bytes::from_static(b"\x89PNG..."), "diploma.png")
//!         .await
//!         .unwrap();
//!
//!     // Resolving never touches the network.
//!     let url = store.resolve(&content_ref);
//!     println!("{content_ref} -> {url}");
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No aliasing**: two uploads never share a reference, even with the same
//!   filename; local references carry a per-store upload counter.
//! - **Pure resolution**: `resolve` is a function of the reference and the
//!   resolver configuration only.
//! - **Failover**: an unreachable remote store is never an error to the
//!   caller when wrapped in [`FallbackContentStore`].

pub mod content_ref;
pub mod error;
pub mod fallback;
pub mod ipfs;
pub mod memory;
pub mod traits;

pub use content_ref::{ContentRef, UrlResolver, DEFAULT_GATEWAY_URL, DEFAULT_PUBLIC_BASE_URL};
pub use error::{Result, StoreError};
pub use fallback::FallbackContentStore;
pub use ipfs::{IpfsConfig, IpfsContentStore};
pub use memory::MemoryContentStore;
pub use traits::{Blob, ContentStore};
