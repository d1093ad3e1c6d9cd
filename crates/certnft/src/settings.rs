//! Runtime settings.
//!
//! Sources, lowest precedence first: built-in defaults, the optional TOML
//! settings file, then `CERTNFT_*` environment variables. Settings are held
//! by a [`SettingsHandle`] and only change through its explicit
//! [`reload`](SettingsHandle::reload) and [`update`](SettingsHandle::update).

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use certnft_core::validation::DEFAULT_MAX_IMAGE_BYTES;
use certnft_core::ImageLimits;
use certnft_ledger::ListingPolicy;
use certnft_store::{IpfsConfig, UrlResolver, DEFAULT_GATEWAY_URL, DEFAULT_PUBLIC_BASE_URL};

/// Placeholder shown instead of secrets.
pub const SECRET_MASK: &str = "********";

/// Errors loading or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("settings lock poisoned")]
    Poisoned,
}

/// Ledger selection and chain endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Route ledger operations to the in-memory contract mock.
    pub use_mock: bool,
    pub rpc_url: String,
    pub contract_address: String,
    pub chain_id: u64,
    pub listing_policy: ListingPolicy,
    /// Maximum number of token ids a listing scans.
    pub list_scan_limit: u64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            use_mock: true,
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: String::new(),
            chain_id: 1337,
            listing_policy: ListingPolicy::StopAtFirstGap,
            list_scan_limit: 99,
        }
    }
}

/// Content store selection and endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Store blobs in the local placeholder store only.
    pub use_mock: bool,
    pub ipfs_api_url: String,
    pub gateway_url: String,
    pub public_base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl Default for ContentSettings {
    fn default() -> Self {
        let ipfs = IpfsConfig::default();
        Self {
            use_mock: true,
            ipfs_api_url: ipfs.api_url,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            timeout_secs: ipfs.timeout_secs,
            api_key: None,
            secret_key: None,
        }
    }
}

impl ContentSettings {
    pub fn resolver(&self) -> UrlResolver {
        UrlResolver::new(&self.gateway_url, &self.public_base_url)
    }

    pub fn ipfs_config(&self) -> IpfsConfig {
        IpfsConfig {
            api_url: self.ipfs_api_url.clone(),
            timeout_secs: self.timeout_secs,
            api_key: self.api_key.clone(),
            secret_key: self.secret_key.clone(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_image_bytes: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl LimitSettings {
    pub fn image_limits(&self) -> ImageLimits {
        ImageLimits {
            max_bytes: self.max_image_bytes,
        }
    }
}

/// All runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ledger: LedgerSettings,
    pub content: ContentSettings,
    pub limits: LimitSettings,
}

impl Settings {
    /// Load settings from `path` (if it exists) and the given environment.
    pub fn load(path: Option<&Path>, env: EnvSource) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        settings.apply_env(env)?;
        Ok(settings)
    }

    /// Parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Write as TOML to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from `CERTNFT_*` variables.
    pub fn apply_env(&mut self, env: EnvSource) -> Result<(), SettingsError> {
        if let Some(v) = env("CERTNFT_USE_MOCK_LEDGER") {
            self.ledger.use_mock = parse_bool("CERTNFT_USE_MOCK_LEDGER", &v)?;
        }
        if let Some(v) = env("CERTNFT_RPC_URL") {
            self.ledger.rpc_url = v;
        }
        if let Some(v) = env("CERTNFT_CONTRACT_ADDRESS") {
            self.ledger.contract_address = v;
        }
        if let Some(v) = env("CERTNFT_CHAIN_ID") {
            self.ledger.chain_id = parse_num("CERTNFT_CHAIN_ID", &v)?;
        }
        if let Some(v) = env("CERTNFT_LISTING_POLICY") {
            self.ledger.listing_policy = match v.trim() {
                "stop_at_first_gap" => ListingPolicy::StopAtFirstGap,
                "skip_gaps" => ListingPolicy::SkipGaps,
                _ => {
                    return Err(SettingsError::InvalidEnv {
                        key: "CERTNFT_LISTING_POLICY",
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = env("CERTNFT_LIST_SCAN_LIMIT") {
            self.ledger.list_scan_limit = parse_num("CERTNFT_LIST_SCAN_LIMIT", &v)?;
        }
        if let Some(v) = env("CERTNFT_USE_MOCK_CONTENT") {
            self.content.use_mock = parse_bool("CERTNFT_USE_MOCK_CONTENT", &v)?;
        }
        if let Some(v) = env("CERTNFT_IPFS_API_URL") {
            self.content.ipfs_api_url = v;
        }
        if let Some(v) = env("CERTNFT_GATEWAY_URL") {
            self.content.gateway_url = v;
        }
        if let Some(v) = env("CERTNFT_PUBLIC_BASE_URL") {
            self.content.public_base_url = v;
        }
        if let Some(v) = env("CERTNFT_IPFS_TIMEOUT_SECS") {
            self.content.timeout_secs = parse_num("CERTNFT_IPFS_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = env("CERTNFT_IPFS_API_KEY") {
            self.content.api_key = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = env("CERTNFT_IPFS_SECRET_KEY") {
            self.content.secret_key = Some(v).filter(|s| !s.is_empty());
        }
        if let Some(v) = env("CERTNFT_MAX_IMAGE_BYTES") {
            self.limits.max_image_bytes = parse_num("CERTNFT_MAX_IMAGE_BYTES", &v)?;
        }
        Ok(())
    }

    /// A copy safe to show to clients: secrets are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.content.secret_key.is_some() {
            copy.content.secret_key = Some(SECRET_MASK.to_string());
        }
        copy
    }

    /// Replace a masked secret with the one from `current`.
    ///
    /// Clients echo back [`SECRET_MASK`] when they did not change a secret.
    pub fn keep_masked_secrets(&mut self, current: &Settings) {
        if self.content.secret_key.as_deref() == Some(SECRET_MASK) {
            self.content.secret_key = current.content.secret_key.clone();
        }
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidEnv {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

/// Lookup function for environment variables.
pub type EnvSource = fn(&str) -> Option<String>;

/// Read from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// An empty environment.
pub fn no_env(_key: &str) -> Option<String> {
    None
}

/// Shared, reloadable settings.
pub struct SettingsHandle {
    path: Option<PathBuf>,
    env: EnvSource,
    current: RwLock<Arc<Settings>>,
}

impl SettingsHandle {
    /// Load settings from `path` and the process environment.
    pub fn open(path: Option<PathBuf>) -> Result<Self, SettingsError> {
        Self::with_env(path, process_env)
    }

    /// Load settings from `path` and a custom environment.
    pub fn with_env(path: Option<PathBuf>, env: EnvSource) -> Result<Self, SettingsError> {
        let settings = Settings::load(path.as_deref(), env)?;
        Ok(Self {
            path,
            env,
            current: RwLock::new(Arc::new(settings)),
        })
    }

    /// Fixed in-memory settings with no file and no environment.
    pub fn fixed(settings: Settings) -> Self {
        Self {
            path: None,
            env: no_env,
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// The settings in effect.
    pub fn current(&self) -> Result<Arc<Settings>, SettingsError> {
        self.current
            .read()
            .map(|s| Arc::clone(&*s))
            .map_err(|_| SettingsError::Poisoned)
    }

    /// Re-read the file and environment.
    ///
    /// Without a settings file there is nothing to re-read and the current
    /// value is kept, so settings set through [`update`](Self::update) on a
    /// file-less handle survive a reload.
    pub fn reload(&self) -> Result<Arc<Settings>, SettingsError> {
        let Some(path) = self.path.as_deref() else {
            return self.current();
        };
        let fresh = Arc::new(Settings::load(Some(path), self.env)?);
        *self.current.write().map_err(|_| SettingsError::Poisoned)? = Arc::clone(&fresh);
        tracing::info!(path = %path.display(), "settings reloaded");
        Ok(fresh)
    }

    /// Replace the settings, persisting them to the settings file if there
    /// is one, then reload.
    pub fn update(&self, mut settings: Settings) -> Result<Arc<Settings>, SettingsError> {
        let current = self.current()?;
        settings.keep_masked_secrets(&current);

        match self.path.as_deref() {
            Some(path) => {
                settings.save(path)?;
                self.reload()
            }
            None => {
                let fresh = Arc::new(settings);
                *self.current.write().map_err(|_| SettingsError::Poisoned)? = Arc::clone(&fresh);
                Ok(fresh)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_env(key: &str) -> Option<String> {
        match key {
            "CERTNFT_USE_MOCK_CONTENT" => Some("false".into()),
            "CERTNFT_CHAIN_ID" => Some("31337".into()),
            "CERTNFT_LISTING_POLICY" => Some("skip_gaps".into()),
            _ => None,
        }
    }

    fn bad_env(key: &str) -> Option<String> {
        (key == "CERTNFT_USE_MOCK_LEDGER").then(|| "maybe".to_string())
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.ledger.use_mock);
        assert!(s.content.use_mock);
        assert_eq!(s.ledger.list_scan_limit, 99);
        assert_eq!(s.ledger.listing_policy, ListingPolicy::StopAtFirstGap);
        assert_eq!(s.limits.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_env_overrides() {
        let s = Settings::load(None, test_env).unwrap();
        assert!(!s.content.use_mock);
        assert_eq!(s.ledger.chain_id, 31337);
        assert_eq!(s.ledger.listing_policy, ListingPolicy::SkipGaps);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = Settings::load(None, bad_env).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidEnv { key: "CERTNFT_USE_MOCK_LEDGER", .. }));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certnft.toml");
        std::fs::write(&path, "[ledger]\nchain_id = 5\n").unwrap();

        let s = Settings::load(Some(&path), no_env).unwrap();
        assert_eq!(s.ledger.chain_id, 5);
        assert!(s.ledger.use_mock);
        assert_eq!(s.content, ContentSettings::default());
    }

    #[test]
    fn test_redacted_masks_secret() {
        let mut s = Settings::default();
        assert_eq!(s.redacted().content.secret_key, None);

        s.content.secret_key = Some("hunter2".into());
        assert_eq!(s.redacted().content.secret_key.as_deref(), Some(SECRET_MASK));
        assert_eq!(s.content.secret_key.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certnft.toml");
        let handle = SettingsHandle::with_env(Some(path.clone()), no_env).unwrap();

        let mut next = (*handle.current().unwrap()).clone();
        next.content.use_mock = false;
        next.content.secret_key = Some("s3cret".into());
        handle.update(next).unwrap();

        assert!(!handle.current().unwrap().content.use_mock);
        let on_disk = Settings::from_file(&path).unwrap();
        assert_eq!(on_disk.content.secret_key.as_deref(), Some("s3cret"));

        // Echoing the mask keeps the stored secret.
        let mut masked = handle.current().unwrap().redacted();
        masked.ledger.chain_id = 80001;
        handle.update(masked).unwrap();
        let current = handle.current().unwrap();
        assert_eq!(current.ledger.chain_id, 80001);
        assert_eq!(current.content.secret_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_reload_picks_up_file_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certnft.toml");
        let handle = SettingsHandle::with_env(Some(path.clone()), no_env).unwrap();
        assert_eq!(handle.current().unwrap().ledger.chain_id, 1337);

        std::fs::write(&path, "[ledger]\nchain_id = 137\n").unwrap();
        assert_eq!(handle.current().unwrap().ledger.chain_id, 1337);

        handle.reload().unwrap();
        assert_eq!(handle.current().unwrap().ledger.chain_id, 137);
    }

    #[test]
    fn test_fixed_handle_update_survives_reload() {
        let handle = SettingsHandle::fixed(Settings::default());
        let mut next = Settings::default();
        next.ledger.use_mock = false;
        handle.update(next).unwrap();
        handle.reload().unwrap();
        assert!(!handle.current().unwrap().ledger.use_mock);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certnft.toml");
        std::fs::write(&path, "ledger = [").unwrap();
        assert!(matches!(
            Settings::load(Some(&path), no_env),
            Err(SettingsError::Parse(_))
        ));
    }
}
