//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use certnft::ledger::MemoryLedger;
use certnft::{CertificateService, SettingsHandle};

/// The service type the API drives.
pub type Service = CertificateService<MemoryLedger>;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

impl AppState {
    pub fn new(service: Service) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// A fresh in-memory ledger with settings from `settings_file` and the
    /// process environment.
    pub fn open(settings_file: Option<PathBuf>) -> certnft::Result<Self> {
        let settings = Arc::new(SettingsHandle::open(settings_file)?);
        let service = CertificateService::new(Arc::new(MemoryLedger::new()), settings)?;
        Ok(Self::new(service))
    }
}
