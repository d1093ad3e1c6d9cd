//! Content stores that fail in controlled ways.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use certnft_store::{Blob, ContentRef, ContentStore, MemoryContentStore, Result, StoreError};

/// What a [`FailingStore`] does on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Every upload is rejected.
    RejectAll,
    /// Uploads succeed until `n` have been stored, then are rejected.
    RejectAfter(usize),
    /// Every upload fails as if the endpoint were unreachable.
    Unreachable,
}

/// A content store wrapping a [`MemoryContentStore`] that fails on demand.
pub struct FailingStore {
    mode: FailureMode,
    inner: MemoryContentStore,
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new(mode: FailureMode) -> Self {
        Self {
            mode,
            inner: MemoryContentStore::default(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of upload attempts seen, failed or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Number of blobs actually stored.
    pub fn stored(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn store(&self, bytes: Bytes, filename_hint: &str) -> Result<ContentRef> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            FailureMode::RejectAll => Err(StoreError::Rejected("upload refused".into())),
            FailureMode::RejectAfter(n) if attempt >= n => {
                Err(StoreError::Rejected(format!("upload {} refused", attempt + 1)))
            }
            FailureMode::Unreachable => {
                Err(StoreError::Unavailable("connection refused".into()))
            }
            FailureMode::RejectAfter(_) => self.inner.store(bytes, filename_hint).await,
        }
    }

    fn resolve(&self, content_ref: &ContentRef) -> String {
        self.inner.resolve(content_ref)
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Option<Blob>> {
        self.inner.fetch(content_ref).await
    }
}
