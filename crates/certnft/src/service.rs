//! The certificate service: issue, read, update and revoke certificates by
//! composing a content store and a ledger.

use std::sync::{Arc, RwLock};

use bytes::Bytes;
use serde::Serialize;

use certnft_core::{
    parse_issue_date, require_text, validate_image, Certificate, CertificateFields, MetadataBlob,
    OwnerAddress, TokenId, TxHash,
};
use certnft_ledger::Ledger;
use certnft_store::{
    Blob, ContentRef, ContentStore, FallbackContentStore, IpfsContentStore, MemoryContentStore,
    StoreError,
};

use crate::error::{Result, ServiceError};
use crate::settings::{Settings, SettingsHandle};

/// Contract address reported for the mock ledger when none is configured.
pub const MOCK_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

const METADATA_FILENAME: &str = "metadata.json";

// ─────────────────────────────────────────────────────────────────────────────
// Requests and views
// ─────────────────────────────────────────────────────────────────────────────

/// An uploaded certificate image.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Input for [`CertificateService::issue`].
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub recipient_name: String,
    pub recipient_address: String,
    pub course_name: String,
    /// `YYYY-MM-DD` label for the metadata; today (UTC) when absent.
    pub issue_date: Option<String>,
    pub description: String,
    pub image: ImageUpload,
}

/// Input for [`CertificateService::update`].
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub recipient_name: String,
    pub course_name: String,
    pub issue_date: Option<String>,
    pub description: String,
    /// A new image; without one the token URI is kept.
    pub image: Option<ImageUpload>,
}

/// Result of an issue or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateReceipt {
    pub id: TokenId,
    pub recipient_name: String,
    pub recipient_address: OwnerAddress,
    pub course_name: String,
    pub issue_date: String,
    pub description: String,
    pub token_uri: String,
    pub transaction_hash: String,
}

/// A certificate joined with its owner and token URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateView {
    pub id: TokenId,
    pub recipient_name: String,
    pub course_name: String,
    pub issue_date: String,
    pub description: String,
    pub revoked: bool,
    pub owner: OwnerAddress,
    pub token_uri: String,
}

impl CertificateView {
    fn join(certificate: Certificate, token_uri: String) -> Result<Self> {
        let issue_date = certificate.issue_date_string()?;
        Ok(Self {
            id: certificate.token_id,
            recipient_name: certificate.fields.recipient_name,
            course_name: certificate.fields.course_name,
            issue_date,
            description: certificate.fields.description,
            revoked: certificate.revoked,
            owner: certificate.owner,
            token_uri,
        })
    }
}

/// Chain and contract the service talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub network_id: u64,
    pub network_name: String,
    pub contract_address: String,
    pub rpc_url: String,
    pub mock: bool,
    /// Tokens issued so far, when the ledger can be asked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_issued: Option<u64>,
}

/// Human-readable name of a chain id.
pub fn network_name(chain_id: u64) -> String {
    let known = match chain_id {
        1 => "Ethereum Mainnet",
        3 => "Ropsten Testnet",
        4 => "Rinkeby Testnet",
        5 => "Goerli Testnet",
        42 => "Kovan Testnet",
        56 => "Binance Smart Chain",
        97 => "Binance Smart Chain Testnet",
        137 => "Polygon Mainnet",
        80001 => "Polygon Mumbai Testnet",
        1337 => "Local Development Chain",
        31337 => "Hardhat Network",
        other => return format!("Unknown Network (ID: {other})"),
    };
    known.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

/// The certificate service.
///
/// Holds the ledger, the settings and the content backend built from them.
/// The backend is rebuilt by [`reload`](Self::reload); locally stored blobs
/// survive rebuilds.
pub struct CertificateService<L: Ledger> {
    ledger: Arc<L>,
    settings: Arc<SettingsHandle>,
    local: MemoryContentStore,
    content: RwLock<Arc<dyn ContentStore>>,
    /// Backend supplied by the caller; kept across reloads.
    pinned: Option<Arc<dyn ContentStore>>,
}

impl<L: Ledger> CertificateService<L> {
    /// Create a service over `ledger` with the given settings.
    pub fn new(ledger: Arc<L>, settings: Arc<SettingsHandle>) -> Result<Self> {
        let current = settings.current()?;
        let local = MemoryContentStore::new(current.content.resolver());
        let content = build_content_store(&local, &current)?;
        Ok(Self {
            ledger,
            settings,
            local,
            content: RwLock::new(content),
            pinned: None,
        })
    }

    /// Create a service that always uses `content` as its content backend,
    /// whatever the settings select.
    pub fn with_content_store(
        ledger: Arc<L>,
        settings: Arc<SettingsHandle>,
        content: Arc<dyn ContentStore>,
    ) -> Result<Self> {
        let current = settings.current()?;
        Ok(Self {
            ledger,
            settings,
            local: MemoryContentStore::new(current.content.resolver()),
            content: RwLock::new(Arc::clone(&content)),
            pinned: Some(content),
        })
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// The settings in effect.
    pub fn settings(&self) -> Result<Arc<Settings>> {
        Ok(self.settings.current()?)
    }

    /// Re-read settings and rebuild the content backend.
    pub fn reload(&self) -> Result<Arc<Settings>> {
        let fresh = self.settings.reload()?;
        self.rebuild(&fresh)?;
        Ok(fresh)
    }

    /// Replace and persist the settings, then rebuild the content backend.
    pub fn update_settings(&self, settings: Settings) -> Result<Arc<Settings>> {
        let fresh = self.settings.update(settings)?;
        self.rebuild(&fresh)?;
        Ok(fresh)
    }

    fn rebuild(&self, settings: &Settings) -> Result<()> {
        let content = match &self.pinned {
            Some(pinned) => Arc::clone(pinned),
            None => build_content_store(&self.local, settings)?,
        };
        *self.content.write().map_err(|_| StoreError::Poisoned)? = content;
        tracing::info!(
            mock_ledger = settings.ledger.use_mock,
            mock_content = settings.content.use_mock,
            "content backend rebuilt"
        );
        Ok(())
    }

    fn content(&self) -> Result<Arc<dyn ContentStore>> {
        let guard = self.content.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Arc::clone(&*guard))
    }

    /// The ledger, if the settings route operations to it.
    ///
    /// Only the in-memory contract is built in; with the mock switched off
    /// every ledger operation fails as an unreachable chain would.
    fn active_ledger(&self, settings: &Settings) -> Result<&L> {
        if settings.ledger.use_mock {
            Ok(self.ledger.as_ref())
        } else {
            Err(ServiceError::Upstream(format!(
                "no chain client available for {}",
                settings.ledger.rpc_url
            )))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Certificate Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a certificate.
    ///
    /// Uploads the image and its metadata, then mints. A failed upload
    /// leaves the ledger untouched.
    pub async fn issue(&self, request: IssueRequest) -> Result<CertificateReceipt> {
        let settings = self.settings()?;

        let fields = CertificateFields::new(
            require_text("recipient_name", &request.recipient_name)?,
            require_text("course_name", &request.course_name)?,
            request.description.trim(),
        );
        let owner = OwnerAddress::parse(&request.recipient_address)?;
        let issue_date = parse_issue_date(request.issue_date.as_deref())?;
        validate_image(
            &request.image.filename,
            &request.image.bytes,
            settings.limits.image_limits(),
        )?;

        let ledger = self.active_ledger(&settings)?;
        let token_uri = self
            .upload_artifacts(&fields, &issue_date, request.image)
            .await?;

        let issued = ledger.issue(&owner, fields.clone(), &token_uri).await?;
        tracing::info!(
            token_id = %issued.token_id,
            owner = %owner,
            tx_hash = %issued.tx_hash,
            "certificate issued"
        );

        Ok(CertificateReceipt {
            id: issued.token_id,
            recipient_name: fields.recipient_name,
            recipient_address: owner,
            course_name: fields.course_name,
            issue_date,
            description: fields.description,
            token_uri,
            transaction_hash: issued.tx_hash.to_hex(),
        })
    }

    /// Read one certificate.
    pub async fn get(&self, token_id: TokenId) -> Result<CertificateView> {
        let settings = self.settings()?;
        let ledger = self.active_ledger(&settings)?;

        let certificate = ledger.get(token_id).await?;
        let owner = ledger.owner_of(token_id).await?;
        let token_uri = ledger.token_uri(token_id).await?;
        tracing::debug!(token_id = %token_id, "certificate read");

        CertificateView::join(Certificate { owner, ..certificate }, token_uri)
    }

    /// List certificates in ascending id order.
    pub async fn list(&self) -> Result<Vec<CertificateView>> {
        let settings = self.settings()?;
        let ledger = self.active_ledger(&settings)?;
        let policy = settings.ledger.listing_policy;

        let certificates = ledger
            .list_all(policy, settings.ledger.list_scan_limit)
            .await?;

        let mut views = Vec::with_capacity(certificates.len());
        for certificate in certificates {
            let token_uri = ledger.token_uri(certificate.token_id).await?;
            views.push(CertificateView::join(certificate, token_uri)?);
        }

        tracing::debug!(count = views.len(), ?policy, "certificates listed");
        Ok(views)
    }

    /// Update the text fields of a certificate, and its image if one is given.
    pub async fn update(
        &self,
        token_id: TokenId,
        request: UpdateRequest,
    ) -> Result<CertificateReceipt> {
        let settings = self.settings()?;

        let fields = CertificateFields::new(
            require_text("recipient_name", &request.recipient_name)?,
            require_text("course_name", &request.course_name)?,
            request.description.trim(),
        );
        let issue_date = parse_issue_date(request.issue_date.as_deref())?;
        if let Some(image) = &request.image {
            validate_image(&image.filename, &image.bytes, settings.limits.image_limits())?;
        }

        let ledger = self.active_ledger(&settings)?;
        let current_uri = ledger.token_uri(token_id).await?;

        let new_uri = match request.image {
            Some(image) => Some(self.upload_artifacts(&fields, &issue_date, image).await?),
            None => None,
        };

        let tx_hash = ledger
            .update(token_id, fields.clone(), new_uri.as_deref())
            .await?;
        let owner = ledger.owner_of(token_id).await?;
        tracing::info!(
            token_id = %token_id,
            new_image = new_uri.is_some(),
            tx_hash = %tx_hash,
            "certificate updated"
        );

        Ok(CertificateReceipt {
            id: token_id,
            recipient_name: fields.recipient_name,
            recipient_address: owner,
            course_name: fields.course_name,
            issue_date,
            description: fields.description,
            token_uri: new_uri.unwrap_or(current_uri),
            transaction_hash: tx_hash.to_hex(),
        })
    }

    /// Revoke a certificate. Revoking twice is not an error.
    pub async fn revoke(&self, token_id: TokenId) -> Result<TxHash> {
        let settings = self.settings()?;
        let ledger = self.active_ledger(&settings)?;

        let tx_hash = ledger.revoke(token_id).await?;
        tracing::info!(token_id = %token_id, tx_hash = %tx_hash, "certificate revoked");
        Ok(tx_hash)
    }

    /// Fetch a stored blob by reference.
    pub async fn fetch_content(&self, content_ref: &ContentRef) -> Result<Option<Blob>> {
        Ok(self.content()?.fetch(content_ref).await?)
    }

    /// Describe the configured chain.
    pub async fn network_info(&self) -> Result<NetworkInfo> {
        let settings = self.settings()?;
        let ledger = &settings.ledger;

        let mut network_name = network_name(ledger.chain_id);
        let mut contract_address = ledger.contract_address.clone();
        if ledger.use_mock {
            network_name.push_str(" (Mock)");
            if contract_address.is_empty() {
                contract_address = MOCK_CONTRACT_ADDRESS.to_string();
            }
        }

        let total_issued = match self.active_ledger(&settings) {
            Ok(l) => l.token_count().await.ok(),
            Err(_) => None,
        };

        Ok(NetworkInfo {
            network_id: ledger.chain_id,
            network_name,
            contract_address,
            rpc_url: ledger.rpc_url.clone(),
            mock: ledger.use_mock,
            total_issued,
        })
    }

    /// Store the image, then the metadata that points at it. Returns the
    /// metadata URL.
    async fn upload_artifacts(
        &self,
        fields: &CertificateFields,
        issue_date: &str,
        image: ImageUpload,
    ) -> Result<String> {
        let content = self.content()?;

        let image_ref = content.store(image.bytes, &image.filename).await?;
        let image_url = content.resolve(&image_ref);

        let metadata = MetadataBlob::for_certificate(fields, issue_date, image_url);
        let metadata_ref = content
            .store(Bytes::from(metadata.to_json_bytes()?), METADATA_FILENAME)
            .await?;
        let metadata_url = content.resolve(&metadata_ref);

        tracing::info!(
            image_ref = %image_ref,
            metadata_ref = %metadata_ref,
            "certificate artifacts uploaded"
        );
        Ok(metadata_url)
    }
}

/// Build the content backend the settings select.
///
/// The local store is shared by every backend so blobs stored before a
/// rebuild stay reachable.
fn build_content_store(
    local: &MemoryContentStore,
    settings: &Settings,
) -> Result<Arc<dyn ContentStore>> {
    let resolver = settings.content.resolver();
    let local = local.with_resolver(resolver.clone());

    if settings.content.use_mock {
        return Ok(Arc::new(local));
    }

    let ipfs = IpfsContentStore::new(settings.content.ipfs_config(), resolver)?;
    Ok(Arc::new(FallbackContentStore::new(ipfs, Arc::new(local))))
}
