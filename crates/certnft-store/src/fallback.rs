//! Failover from a remote content store to the local placeholder store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::content_ref::ContentRef;
use crate::error::Result;
use crate::memory::MemoryContentStore;
use crate::traits::{Blob, ContentStore};

/// Wraps a primary store; on [`StoreError::Unavailable`] the upload goes to
/// the local store instead and the caller sees a successful `store`.
///
/// Other errors from the primary, such as a rejected empty payload,
/// propagate unchanged.
///
/// [`StoreError::Unavailable`]: crate::StoreError::Unavailable
pub struct FallbackContentStore<P: ContentStore> {
    primary: P,
    local: Arc<MemoryContentStore>,
}

impl<P: ContentStore> FallbackContentStore<P> {
    pub fn new(primary: P, local: Arc<MemoryContentStore>) -> Self {
        Self { primary, local }
    }
}

#[async_trait]
impl<P: ContentStore> ContentStore for FallbackContentStore<P> {
    async fn store(&self, bytes: Bytes, filename_hint: &str) -> Result<ContentRef> {
        match self.primary.store(bytes.clone(), filename_hint).await {
            Ok(content_ref) => Ok(content_ref),
            Err(e) if e.is_unavailable() => {
                tracing::warn!(
                    error = %e,
                    filename = filename_hint,
                    "content store unreachable, falling back to local placeholder"
                );
                self.local.store(bytes, filename_hint).await
            }
            Err(e) => Err(e),
        }
    }

    fn resolve(&self, content_ref: &ContentRef) -> String {
        if content_ref.is_local() {
            self.local.resolve(content_ref)
        } else {
            self.primary.resolve(content_ref)
        }
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Option<Blob>> {
        if content_ref.is_local() {
            self.local.fetch(content_ref).await
        } else {
            self.primary.fetch(content_ref).await
        }
    }
}
