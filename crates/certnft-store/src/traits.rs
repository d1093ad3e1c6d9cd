//! ContentStore trait: the abstract interface for blob storage.
//!
//! This trait allows the certificate service to be storage-agnostic.
//! Implementations include a local placeholder store (tests, offline mode)
//! and an IPFS HTTP client.

use async_trait::async_trait;
use bytes::Bytes;

use crate::content_ref::ContentRef;
use crate::error::Result;

/// A stored blob together with the filename it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub filename: String,
    pub bytes: Bytes,
}

/// The ContentStore trait: async interface for blob persistence.
///
/// # Design Notes
///
/// - **Immutable blobs**: stored content is never modified. Changing a
///   certificate image means storing a new blob.
/// - **Unique references**: two `store` calls never return the same
///   reference, even for identical filenames.
/// - **Pure resolution**: `resolve` is synchronous and performs no I/O.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `bytes` and return a reference to them.
    ///
    /// `filename_hint` is advisory; stores may sanitize or ignore it.
    async fn store(&self, bytes: Bytes, filename_hint: &str) -> Result<ContentRef>;

    /// Map a reference to a dereferenceable URL.
    fn resolve(&self, content_ref: &ContentRef) -> String;

    /// Read back a stored blob, if this store holds it.
    async fn fetch(&self, content_ref: &ContentRef) -> Result<Option<Blob>>;
}

#[async_trait]
impl<S: ContentStore + ?Sized> ContentStore for std::sync::Arc<S> {
    async fn store(&self, bytes: Bytes, filename_hint: &str) -> Result<ContentRef> {
        (**self).store(bytes, filename_hint).await
    }

    fn resolve(&self, content_ref: &ContentRef) -> String {
        (**self).resolve(content_ref)
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Option<Blob>> {
        (**self).fetch(content_ref).await
    }
}
