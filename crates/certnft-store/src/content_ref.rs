//! Content references and URL resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Default gateway prefix for remote content identifiers.
pub const DEFAULT_GATEWAY_URL: &str = "ipfs://";

/// Default base URL under which the API serves locally stored blobs.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";

const LOCAL_PREFIX: &str = "local-";
const MAX_FILENAME_LEN: usize = 128;

/// An opaque reference to stored content.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentRef {
    /// Content identifier assigned by a remote content-addressed store.
    Cid(String),
    /// Placeholder reference assigned by the local store.
    Local { nonce: u64, filename: String },
}

impl ContentRef {
    /// Build a local reference, sanitizing the filename hint.
    pub fn local(nonce: u64, filename_hint: &str) -> Self {
        ContentRef::Local {
            nonce,
            filename: sanitize_filename(filename_hint),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ContentRef::Local { .. })
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentRef({})", self)
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRef::Cid(cid) => f.write_str(cid),
            ContentRef::Local { nonce, filename } => {
                write!(f, "{LOCAL_PREFIX}{nonce}-{filename}")
            }
        }
    }
}

impl FromStr for ContentRef {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix(LOCAL_PREFIX) {
            let (nonce, filename) = rest
                .split_once('-')
                .ok_or_else(|| StoreError::InvalidRef(s.to_string()))?;
            let nonce = nonce
                .parse::<u64>()
                .map_err(|_| StoreError::InvalidRef(s.to_string()))?;
            if filename.is_empty() || sanitize_filename(filename) != filename {
                return Err(StoreError::InvalidRef(s.to_string()));
            }
            return Ok(ContentRef::Local {
                nonce,
                filename: filename.to_string(),
            });
        }

        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StoreError::InvalidRef(s.to_string()));
        }
        Ok(ContentRef::Cid(s.to_string()))
    }
}

impl TryFrom<String> for ContentRef {
    type Error = StoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ContentRef> for String {
    fn from(r: ContentRef) -> Self {
        r.to_string()
    }
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
///
/// Empty hints become `blob`; long hints are truncated.
pub fn sanitize_filename(hint: &str) -> String {
    let base = hint.rsplit(['/', '\\']).next().unwrap_or(hint);
    let cleaned: String = base
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "blob".to_string()
    } else {
        cleaned
    }
}

/// Maps content references to URLs.
///
/// Resolution is pure: it depends only on the reference and this
/// configuration, never on the network or on store contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    /// Prefix prepended to remote content identifiers.
    pub gateway_url: String,
    /// Base URL of the API that serves `/content/<ref>`.
    pub public_base_url: String,
}

impl UrlResolver {
    pub fn new(gateway_url: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn resolve(&self, content_ref: &ContentRef) -> String {
        match content_ref {
            ContentRef::Cid(cid) => format!("{}{}", self.gateway_url, cid),
            ContentRef::Local { .. } => format!(
                "{}/content/{}",
                self.public_base_url.trim_end_matches('/'),
                content_ref
            ),
        }
    }
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL, DEFAULT_PUBLIC_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ref_display_and_parse() {
        let r = ContentRef::local(42, "diploma.png");
        assert_eq!(r.to_string(), "local-42-diploma.png");
        assert_eq!("local-42-diploma.png".parse::<ContentRef>().unwrap(), r);
    }

    #[test]
    fn test_filename_with_dashes_roundtrips() {
        let r = ContentRef::local(7, "my-cert-final.png");
        let parsed: ContentRef = r.to_string().parse().unwrap();
        assert_eq!(parsed, r);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(""), "blob");
        assert_eq!(sanitize_filename(&"a".repeat(500)).len(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ContentRef>().is_err());
        assert!("local-x-file.png".parse::<ContentRef>().is_err());
        assert!("local-3-".parse::<ContentRef>().is_err());
        assert!("local-3-a b".parse::<ContentRef>().is_err());
        assert!("Qm/../x".parse::<ContentRef>().is_err());
    }

    #[test]
    fn test_cid_parse() {
        let r: ContentRef = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".parse().unwrap();
        assert!(!r.is_local());
    }

    #[test]
    fn test_resolve_is_pure() {
        let resolver = UrlResolver::new("https://ipfs.io/ipfs/", "http://api.test/");
        let local = ContentRef::local(1, "x.png");
        let cid = ContentRef::Cid("QmAbc".into());

        assert_eq!(resolver.resolve(&local), "http://api.test/content/local-1-x.png");
        assert_eq!(resolver.resolve(&local), resolver.resolve(&local));
        assert_eq!(resolver.resolve(&cid), "https://ipfs.io/ipfs/QmAbc");
    }

    #[test]
    fn test_default_gateway_uses_ipfs_scheme() {
        let cid = ContentRef::Cid("QmAbc".into());
        assert_eq!(UrlResolver::default().resolve(&cid), "ipfs://QmAbc");
    }
}
