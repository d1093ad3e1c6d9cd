//! Settings routes:
//!
//! - `GET  /api/settings` - current settings, secrets masked
//! - `POST /api/settings` - replace, persist and reload settings
//!
//! A masked secret sent back unchanged keeps the stored one.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use certnft::Settings;

use crate::error::{extract_json, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).post(update_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.service.settings()?.redacted()))
}

async fn update_settings(
    State(state): State<AppState>,
    body: Result<Json<Settings>, JsonRejection>,
) -> Result<Json<Settings>, AppError> {
    let settings = extract_json(body)?;
    let fresh = state.service.update_settings(settings)?;
    tracing::info!("settings updated");
    Ok(Json(fresh.redacted()))
}
