//! In-memory implementation of the Ledger trait.
//!
//! Stands in for the certificate contract so the system runs without a
//! chain. State lives for the lifetime of the value and is not persisted.
//! One instance is constructed per process and shared by `Arc`.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use certnft_core::{Certificate, CertificateFields, OwnerAddress, TokenId, TxHash};

use crate::error::{LedgerError, Result};
use crate::traits::{Issued, Ledger, ListingPolicy};

/// In-memory ledger.
///
/// A single RwLock guards the counter and both tables, so issue is atomic
/// and readers never observe a half-written record.
pub struct MemoryLedger {
    inner: RwLock<LedgerState>,
    /// Random per-instance salt mixed into transaction hashes.
    salt: [u8; 32],
    /// Source of `issue_date` timestamps (seconds since epoch).
    clock: fn() -> i64,
}

#[derive(Default)]
struct LedgerState {
    /// Highest token id ever allocated. Never decremented.
    counter: u64,

    /// Number of writes applied, used to keep transaction hashes unique.
    write_seq: u64,

    /// Certificate records by token id.
    records: BTreeMap<TokenId, Certificate>,

    /// Token URIs by token id.
    uris: BTreeMap<TokenId, String>,
}

impl LedgerState {
    fn record(&self, token_id: TokenId) -> Result<&Certificate> {
        self.records
            .get(&token_id)
            .ok_or(LedgerError::NotFound(token_id))
    }

    fn record_mut(&mut self, token_id: TokenId) -> Result<&mut Certificate> {
        self.records
            .get_mut(&token_id)
            .ok_or(LedgerError::NotFound(token_id))
    }

    fn next_write(&mut self) -> u64 {
        self.write_seq += 1;
        self.write_seq
    }
}

impl MemoryLedger {
    /// Create an empty ledger using the system clock.
    pub fn new() -> Self {
        Self::with_clock(now_secs)
    }

    /// Create an empty ledger with a custom clock.
    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
            salt: rand::random(),
            clock,
        }
    }

    /// Drop a record and its URI without touching the counter.
    ///
    /// Simulates pruned contract state; returns whether a record was removed.
    pub fn evict(&self, token_id: TokenId) -> Result<bool> {
        let mut state = self.inner.write().map_err(|_| LedgerError::Poisoned)?;
        state.uris.remove(&token_id);
        Ok(state.records.remove(&token_id).is_some())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>> {
        self.inner.read().map_err(|_| LedgerError::Poisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, LedgerState>> {
        self.inner.write().map_err(|_| LedgerError::Poisoned)
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn issue(
        &self,
        owner: &OwnerAddress,
        fields: CertificateFields,
        uri: &str,
    ) -> Result<Issued> {
        let issue_date = (self.clock)();
        let mut state = self.write()?;

        state.counter += 1;
        let token_id = TokenId(state.counter);
        let seq = state.next_write();

        state.records.insert(
            token_id,
            Certificate {
                token_id,
                fields,
                issue_date,
                revoked: false,
                owner: owner.clone(),
            },
        );
        state.uris.insert(token_id, uri.to_string());

        let tx_hash = TxHash::derive(&self.salt, "issue", token_id, seq);
        tracing::info!(token_id = %token_id, owner = %owner, tx = %tx_hash, "certificate issued");

        Ok(Issued { token_id, tx_hash })
    }

    async fn get(&self, token_id: TokenId) -> Result<Certificate> {
        let state = self.read()?;
        state.record(token_id).cloned()
    }

    async fn owner_of(&self, token_id: TokenId) -> Result<OwnerAddress> {
        let state = self.read()?;
        state.record(token_id).map(|c| c.owner.clone())
    }

    async fn token_uri(&self, token_id: TokenId) -> Result<String> {
        let state = self.read()?;
        state
            .uris
            .get(&token_id)
            .cloned()
            .ok_or(LedgerError::NotFound(token_id))
    }

    async fn update(
        &self,
        token_id: TokenId,
        fields: CertificateFields,
        uri: Option<&str>,
    ) -> Result<TxHash> {
        let mut state = self.write()?;
        state.record_mut(token_id)?.fields = fields;

        if let Some(uri) = uri.filter(|u| !u.is_empty()) {
            state.uris.insert(token_id, uri.to_string());
        }

        let seq = state.next_write();
        let tx_hash = TxHash::derive(&self.salt, "update", token_id, seq);
        tracing::info!(
            token_id = %token_id,
            uri_changed = uri.is_some_and(|u| !u.is_empty()),
            tx = %tx_hash,
            "certificate updated"
        );
        Ok(tx_hash)
    }

    async fn revoke(&self, token_id: TokenId) -> Result<TxHash> {
        let mut state = self.write()?;
        state.record_mut(token_id)?.revoked = true;

        let seq = state.next_write();
        let tx_hash = TxHash::derive(&self.salt, "revoke", token_id, seq);
        tracing::info!(token_id = %token_id, tx = %tx_hash, "certificate revoked");
        Ok(tx_hash)
    }

    async fn token_count(&self) -> Result<u64> {
        Ok(self.read()?.counter)
    }

    /// Lists from a single snapshot of the state instead of one lookup per id.
    async fn list_all(&self, policy: ListingPolicy, limit: u64) -> Result<Vec<Certificate>> {
        let state = self.read()?;
        let upper = state.counter.min(limit);
        let mut certificates = Vec::new();

        for raw in 1..=upper {
            match state.records.get(&TokenId(raw)) {
                Some(certificate) => certificates.push(certificate.clone()),
                None if policy == ListingPolicy::StopAtFirstGap => break,
                None => continue,
            }
        }

        tracing::debug!(count = certificates.len(), ?policy, "listed certificates");
        Ok(certificates)
    }
}

/// Get current time in seconds since the Unix epoch.
fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
