//! IPFS HTTP API client implementing the ContentStore trait.
//!
//! Talks to a Kubo-compatible node (`/api/v0/add`, `/api/v0/cat`). Transport
//! failures, timeouts, non-2xx statuses and undecodable `add` responses all
//! map to [`StoreError::Unavailable`] so that a [`FallbackContentStore`] can
//! take over. Only an empty payload is rejected outright.
//!
//! [`FallbackContentStore`]: crate::FallbackContentStore

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::content_ref::{sanitize_filename, ContentRef, UrlResolver};
use crate::error::{Result, StoreError};
use crate::traits::{Blob, ContentStore};

/// Connection settings for an IPFS node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfsConfig {
    /// Base URL of the node's HTTP API, e.g. `http://127.0.0.1:5001`.
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Basic-auth user (project id) for hosted nodes.
    pub api_key: Option<String>,
    /// Basic-auth password for hosted nodes.
    pub secret_key: Option<String>,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5001".to_string(),
            timeout_secs: 30,
            api_key: None,
            secret_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Content store backed by an IPFS node.
pub struct IpfsContentStore {
    client: reqwest::Client,
    config: IpfsConfig,
    resolver: UrlResolver,
}

impl IpfsContentStore {
    /// Build a client for the given node.
    pub fn new(config: IpfsConfig, resolver: UrlResolver) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            resolver,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v0/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) if !key.is_empty() => {
                request.basic_auth(key, self.config.secret_key.as_deref())
            }
            _ => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "IPFS node returned {status}: {body}"
            )));
        }
        Ok(response)
    }
}

fn map_transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable(format!("IPFS request timed out: {e}"))
    } else {
        StoreError::Unavailable(format!("IPFS request failed: {e}"))
    }
}

#[async_trait]
impl ContentStore for IpfsContentStore {
    async fn store(&self, bytes: Bytes, filename_hint: &str) -> Result<ContentRef> {
        if bytes.is_empty() {
            return Err(StoreError::Rejected("empty payload".into()));
        }

        let size = bytes.len();
        let part = Part::bytes(bytes.to_vec()).file_name(sanitize_filename(filename_hint));
        let form = Form::new().part("file", part);

        let request = self
            .client
            .post(self.endpoint("add"))
            .query(&[("pin", "true")])
            .multipart(form);

        let response = self.send(request).await?;
        let added: AddResponse = response.json().await.map_err(|e| {
            StoreError::Unavailable(format!("undecodable IPFS add response: {e}"))
        })?;

        let content_ref: ContentRef = added.hash.parse().map_err(|e| {
            StoreError::Unavailable(format!("IPFS node returned a bad hash: {e}"))
        })?;
        tracing::info!(content_ref = %content_ref, size, "uploaded blob to IPFS");
        Ok(content_ref)
    }

    fn resolve(&self, content_ref: &ContentRef) -> String {
        self.resolver.resolve(content_ref)
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Option<Blob>> {
        let ContentRef::Cid(cid) = content_ref else {
            return Ok(None);
        };

        let request = self
            .client
            .post(self.endpoint("cat"))
            .query(&[("arg", cid.as_str())]);

        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(Some(Blob {
            filename: cid.clone(),
            bytes,
        }))
    }
}
