//! Ledger trait: the abstract interface of the certificate contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use certnft_core::{Certificate, CertificateFields, OwnerAddress, TokenId, TxHash};

use crate::error::{LedgerError, Result};

/// Result of issuing a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issued {
    pub token_id: TokenId,
    pub tx_hash: TxHash,
}

/// How [`Ledger::list_all`] treats ids that fail to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingPolicy {
    /// Stop at the first missing id and exclude it. A gap at id `k`
    /// truncates the listing to ids below `k`, even if later ids exist.
    #[default]
    StopAtFirstGap,
    /// Visit every issued id and skip the missing ones.
    SkipGaps,
}

/// The Ledger trait: async interface for certificate records.
///
/// # Design Notes
///
/// - **Atomic issue**: allocating the id and inserting the record happen as
///   one unit; concurrent issues never share an id.
/// - **Permanent counter**: once an id is allocated it is never handed out
///   again, whatever happens to the caller's workflow afterwards.
/// - **Partial update**: an absent or empty URI in `update` keeps the
///   current one.
/// - **Idempotent revoke**: revoking twice is not an error.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Mint a certificate to `owner` pointing at `uri`.
    async fn issue(
        &self,
        owner: &OwnerAddress,
        fields: CertificateFields,
        uri: &str,
    ) -> Result<Issued>;

    /// Get a certificate record.
    async fn get(&self, token_id: TokenId) -> Result<Certificate>;

    /// Get the current holder of a token.
    async fn owner_of(&self, token_id: TokenId) -> Result<OwnerAddress>;

    /// Get the metadata URI of a token.
    async fn token_uri(&self, token_id: TokenId) -> Result<String>;

    /// Overwrite the text fields and optionally the URI of a certificate.
    async fn update(
        &self,
        token_id: TokenId,
        fields: CertificateFields,
        uri: Option<&str>,
    ) -> Result<TxHash>;

    /// Mark a certificate revoked.
    async fn revoke(&self, token_id: TokenId) -> Result<TxHash>;

    /// The current value of the token counter (the highest id ever issued).
    async fn token_count(&self) -> Result<u64>;

    /// Enumerate certificates for ids `1..=min(token_count, limit)` in
    /// ascending order, treating missing ids according to `policy`.
    ///
    /// The default implementation scans with [`Ledger::get`], which is what a
    /// contract without an enumeration extension allows.
    async fn list_all(&self, policy: ListingPolicy, limit: u64) -> Result<Vec<Certificate>> {
        let upper = self.token_count().await?.min(limit);
        let mut certificates = Vec::new();

        for raw in 1..=upper {
            match self.get(TokenId(raw)).await {
                Ok(certificate) => certificates.push(certificate),
                Err(LedgerError::NotFound(_)) => match policy {
                    ListingPolicy::StopAtFirstGap => break,
                    ListingPolicy::SkipGaps => continue,
                },
                Err(e) => return Err(e),
            }
        }

        Ok(certificates)
    }
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for std::sync::Arc<L> {
    async fn issue(
        &self,
        owner: &OwnerAddress,
        fields: CertificateFields,
        uri: &str,
    ) -> Result<Issued> {
        (**self).issue(owner, fields, uri).await
    }

    async fn get(&self, token_id: TokenId) -> Result<Certificate> {
        (**self).get(token_id).await
    }

    async fn owner_of(&self, token_id: TokenId) -> Result<OwnerAddress> {
        (**self).owner_of(token_id).await
    }

    async fn token_uri(&self, token_id: TokenId) -> Result<String> {
        (**self).token_uri(token_id).await
    }

    async fn update(
        &self,
        token_id: TokenId,
        fields: CertificateFields,
        uri: Option<&str>,
    ) -> Result<TxHash> {
        (**self).update(token_id, fields, uri).await
    }

    async fn revoke(&self, token_id: TokenId) -> Result<TxHash> {
        (**self).revoke(token_id).await
    }

    async fn token_count(&self) -> Result<u64> {
        (**self).token_count().await
    }

    async fn list_all(&self, policy: ListingPolicy, limit: u64) -> Result<Vec<Certificate>> {
        (**self).list_all(policy, limit).await
    }
}
