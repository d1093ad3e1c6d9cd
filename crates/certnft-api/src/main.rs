//! CertNFT API server.
//!
//! Environment:
//! - `CERTNFT_BIND` - listen address, default `0.0.0.0:8000`
//! - `CERTNFT_SETTINGS_FILE` - settings file, default `certnft.toml`
//! - `RUST_LOG` - log filter, default `info`

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use certnft_api::{app, AppState};

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_SETTINGS_FILE: &str = "certnft.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("CERTNFT_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid CERTNFT_BIND {bind:?}"))?;

    let settings_file = PathBuf::from(
        std::env::var("CERTNFT_SETTINGS_FILE")
            .unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string()),
    );

    let state = AppState::open(Some(settings_file.clone()))
        .with_context(|| format!("failed to load settings from {}", settings_file.display()))?;
    let settings = state.service.settings()?;
    tracing::info!(
        settings_file = %settings_file.display(),
        mock_ledger = settings.ledger.use_mock,
        mock_content = settings.content.use_mock,
        "settings loaded"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("certnft-api listening on {addr}");

    axum::serve(listener, app(state))
        .await
        .context("server error")?;
    Ok(())
}
