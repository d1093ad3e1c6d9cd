//! In-memory implementation of the ContentStore trait.
//!
//! This is the deterministic placeholder store used in mock mode and as the
//! failover target when a remote store is unreachable. References are
//! derived from the filename hint plus a per-store upload counter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use crate::content_ref::{sanitize_filename, ContentRef, UrlResolver};
use crate::error::{Result, StoreError};
use crate::traits::{Blob, ContentStore};

/// In-memory content store.
///
/// All data is lost when the last view of the store is dropped.
/// Thread-safe via RwLock.
pub struct MemoryContentStore {
    resolver: UrlResolver,
    next_nonce: Arc<AtomicU64>,
    blobs: Arc<RwLock<HashMap<ContentRef, Blob>>>,
}

impl MemoryContentStore {
    /// Create a new empty store.
    pub fn new(resolver: UrlResolver) -> Self {
        Self {
            resolver,
            next_nonce: Arc::new(AtomicU64::new(1)),
            blobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A view over the same blobs and counter that resolves URLs with a
    /// different resolver.
    pub fn with_resolver(&self, resolver: UrlResolver) -> Self {
        Self {
            resolver,
            next_nonce: Arc::clone(&self.next_nonce),
            blobs: Arc::clone(&self.blobs),
        }
    }

    /// Number of blobs held.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new(UrlResolver::default())
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn store(&self, bytes: Bytes, filename_hint: &str) -> Result<ContentRef> {
        if bytes.is_empty() {
            return Err(StoreError::Rejected("empty payload".into()));
        }

        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        let filename = sanitize_filename(filename_hint);
        let content_ref = ContentRef::Local {
            nonce,
            filename: filename.clone(),
        };

        tracing::debug!(
            content_ref = %content_ref,
            size = bytes.len(),
            "stored blob in local content store"
        );

        let mut blobs = self.blobs.write().map_err(|_| StoreError::Poisoned)?;
        blobs.insert(content_ref.clone(), Blob { filename, bytes });
        Ok(content_ref)
    }

    fn resolve(&self, content_ref: &ContentRef) -> String {
        self.resolver.resolve(content_ref)
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Option<Blob>> {
        let blobs = self.blobs.read().map_err(|_| StoreError::Poisoned)?;
        Ok(blobs.get(content_ref).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryContentStore::default();

        let r = store
            .store(Bytes::from_static(b"png-bytes"), "x.png")
            .await
            .unwrap();
        assert!(r.is_local());

        let blob = store.fetch(&r).await.unwrap().unwrap();
        assert_eq!(blob.filename, "x.png");
        assert_eq!(&blob.bytes[..], b"png-bytes");
    }

    #[tokio::test]
    async fn test_same_filename_never_aliases() {
        let store = MemoryContentStore::default();

        let r1 = store.store(Bytes::from_static(b"a"), "x.png").await.unwrap();
        let r2 = store.store(Bytes::from_static(b"b"), "x.png").await.unwrap();

        assert_ne!(r1, r2);
        assert_ne!(store.resolve(&r1), store.resolve(&r2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_twice_same_url() {
        let store = MemoryContentStore::default();
        let r = store.store(Bytes::from_static(b"a"), "x.png").await.unwrap();
        assert_eq!(store.resolve(&r), store.resolve(&r));
    }

    #[tokio::test]
    async fn test_empty_payload_rejected() {
        let store = MemoryContentStore::default();
        let err = store.store(Bytes::new(), "x.png").await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_views_share_blobs() {
        let store = MemoryContentStore::default();
        let r1 = store.store(Bytes::from_static(b"a"), "x.png").await.unwrap();

        let view = store.with_resolver(UrlResolver::new("ipfs://", "https://certs.example"));
        let r2 = view.store(Bytes::from_static(b"b"), "x.png").await.unwrap();

        assert_ne!(r1, r2);
        assert!(view.fetch(&r1).await.unwrap().is_some());
        assert!(store.fetch(&r2).await.unwrap().is_some());
        assert_eq!(
            view.resolve(&r1),
            format!("https://certs.example/content/{r1}")
        );
    }

    #[tokio::test]
    async fn test_fetch_unknown_is_none() {
        let store = MemoryContentStore::default();
        let missing = ContentRef::local(99, "nope.png");
        assert!(store.fetch(&missing).await.unwrap().is_none());
    }

    proptest! {
        #[test]
        fn test_refs_unique_for_any_hints(hints in prop::collection::vec(".{0,20}", 1..30)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let store = MemoryContentStore::default();
            let refs: Vec<ContentRef> = rt.block_on(async {
                let mut out = Vec::new();
                for hint in &hints {
                    out.push(store.store(Bytes::from_static(b"x"), hint).await.unwrap());
                }
                out
            });

            let unique: std::collections::HashSet<_> = refs.iter().collect();
            prop_assert_eq!(unique.len(), refs.len());

            for r in &refs {
                let parsed: ContentRef = r.to_string().parse().unwrap();
                prop_assert_eq!(&parsed, r);
            }
        }
    }
}
