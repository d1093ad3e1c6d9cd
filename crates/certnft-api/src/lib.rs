//! # certnft-api - HTTP API for CertNFT
//!
//! ## API Surface
//!
//! | Method | Path                          | Module                    |
//! |--------|-------------------------------|---------------------------|
//! | GET    | `/`                           | liveness message          |
//! | POST   | `/api/certificates`           | [`routes::certificates`]  |
//! | GET    | `/api/certificates`           | [`routes::certificates`]  |
//! | GET    | `/api/certificates/:token_id` | [`routes::certificates`]  |
//! | PUT    | `/api/certificates/:token_id` | [`routes::certificates`]  |
//! | DELETE | `/api/certificates/:token_id` | [`routes::certificates`]  |
//! | GET    | `/api/network`                | [`routes::network`]       |
//! | GET    | `/api/settings`               | [`routes::settings`]      |
//! | POST   | `/api/settings`               | [`routes::settings`]      |
//! | GET    | `/content/:content_ref`       | [`routes::content`]       |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → CorsLayer (permissive) → body limit → Handler
//! ```

pub mod error;
pub mod multipart;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use certnft::core::validation::DEFAULT_MAX_IMAGE_BYTES;

pub use error::AppError;
pub use state::AppState;

/// Room for the text fields and multipart framing around an image.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Assemble the application router.
///
/// The request body limit follows `limits.max_image_bytes` as configured
/// when the router is built.
pub fn app(state: AppState) -> Router {
    let max_image_bytes = state
        .service
        .settings()
        .map(|s| s.limits.max_image_bytes)
        .unwrap_or(DEFAULT_MAX_IMAGE_BYTES);

    Router::new()
        .route("/", get(root))
        .merge(routes::certificates::router())
        .merge(routes::network::router())
        .merge(routes::settings::router())
        .merge(routes::content::router())
        .layer(DefaultBodyLimit::max(max_image_bytes + FORM_OVERHEAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "NFT Certificate API is running" }))
}
