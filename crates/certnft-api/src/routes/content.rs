//! `GET /content/:content_ref` - serve a blob held by the local store.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use certnft::store::ContentRef;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/content/:content_ref", get(get_content))
}

async fn get_content(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound(format!("content {raw} not found"));

    let content_ref: ContentRef = raw.parse().map_err(|_| not_found())?;
    if !content_ref.is_local() {
        return Err(not_found());
    }

    let blob = state
        .service
        .fetch_content(&content_ref)
        .await?
        .ok_or_else(not_found)?;

    Ok(([(header::CONTENT_TYPE, content_type(&blob.filename))], blob.bytes))
}

/// MIME type guessed from a filename extension.
fn content_type(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("cert.PNG"), "image/png");
        assert_eq!(content_type("metadata.json"), "application/json");
        assert_eq!(content_type("noext"), "application/octet-stream");
    }
}
