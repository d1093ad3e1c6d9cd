//! A stand-in IPFS node for failover tests.

use axum::http::StatusCode;
use axum::Router;

/// Serve every request with `status` and `body` on a loopback port.
///
/// Returns the base URL to use as `content.ipfs_api_url`. The server runs
/// on the current tokio runtime until it shuts down.
pub async fn stub_ipfs_node(status: StatusCode, body: &'static str) -> String {
    let app = Router::new()
        .fallback(move |_upload: axum::body::Bytes| async move { (status, body) });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("bound address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_answers_with_status() {
        let url = stub_ipfs_node(StatusCode::FORBIDDEN, "forbidden").await;
        let response = reqwest::Client::new()
            .post(format!("{url}/api/v0/add"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 403);
        assert_eq!(response.text().await.unwrap(), "forbidden");
    }
}
