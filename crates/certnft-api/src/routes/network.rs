//! `GET /api/network` - chain id, network name, contract address, RPC URL.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use certnft::NetworkInfo;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/network", get(network_info))
}

async fn network_info(State(state): State<AppState>) -> Result<Json<NetworkInfo>, AppError> {
    Ok(Json(state.service.network_info().await?))
}
