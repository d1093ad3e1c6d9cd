//! Certificate routes:
//!
//! - `POST   /api/certificates`           - issue (multipart)
//! - `GET    /api/certificates`           - list
//! - `GET    /api/certificates/:token_id` - read
//! - `PUT    /api/certificates/:token_id` - update (multipart, image optional)
//! - `DELETE /api/certificates/:token_id` - revoke

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use certnft::{CertificateReceipt, CertificateView, TokenId};

use crate::error::AppError;
use crate::multipart::CertificateForm;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/certificates",
            get(list_certificates).post(issue_certificate),
        )
        .route(
            "/api/certificates/:token_id",
            get(get_certificate)
                .put(update_certificate)
                .delete(revoke_certificate),
        )
}

/// Response to a revoke.
#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub message: String,
    pub transaction_hash: String,
}

fn parse_token_id(raw: &str) -> Result<TokenId, AppError> {
    raw.parse()
        .map_err(|e: certnft::core::ValidationError| AppError::Validation(e.to_string()))
}

async fn issue_certificate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CertificateReceipt>), AppError> {
    let request = CertificateForm::read(multipart).await?.into_issue_request()?;
    let receipt = state.service.issue(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn list_certificates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CertificateView>>, AppError> {
    Ok(Json(state.service.list().await?))
}

async fn get_certificate(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
) -> Result<Json<CertificateView>, AppError> {
    let token_id = parse_token_id(&token_id)?;
    Ok(Json(state.service.get(token_id).await?))
}

async fn update_certificate(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<CertificateReceipt>, AppError> {
    let token_id = parse_token_id(&token_id)?;
    let request = CertificateForm::read(multipart).await?.into_update_request()?;
    Ok(Json(state.service.update(token_id, request).await?))
}

async fn revoke_certificate(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
) -> Result<Json<RevokeResponse>, AppError> {
    let token_id = parse_token_id(&token_id)?;
    let tx_hash = state.service.revoke(token_id).await?;
    Ok(Json(RevokeResponse {
        message: format!("Certificate {token_id} revoked successfully"),
        transaction_hash: tx_hash.to_hex(),
    }))
}
