//! End-to-end certificate lifecycle against the in-memory ledger.

use std::sync::Arc;

use certnft::ledger::{Ledger, ListingPolicy};
use axum::http::StatusCode;
use certnft::settings::no_env;
use certnft::store::{ContentRef, FallbackContentStore, MemoryContentStore};
use certnft::{CertificateService, ServiceError, Settings, SettingsHandle, TokenId};
use certnft_testkit::fixtures::{address, sample_image};
use certnft_testkit::{stub_ipfs_node, FailingStore, FailureMode, TestFixture};

#[tokio::test]
async fn test_issue_update_revoke_scenario() {
    let fixture = TestFixture::new();
    let service = &fixture.service;

    let issued = service
        .issue(fixture.issue_request("Alice", "Systems 101"))
        .await
        .unwrap();
    assert_eq!(issued.id, TokenId(1));

    let view = service.get(issued.id).await.unwrap();
    assert_eq!(view.owner, address(1));
    assert_eq!(view.course_name, "Systems 101");
    assert!(!view.revoked);
    assert_eq!(view.token_uri, issued.token_uri);

    let updated = service
        .update(issued.id, fixture.update_request("Alice", "Systems 102"))
        .await
        .unwrap();
    assert_eq!(updated.token_uri, issued.token_uri);
    assert_ne!(updated.transaction_hash, issued.transaction_hash);

    let view = service.get(issued.id).await.unwrap();
    assert_eq!(view.course_name, "Systems 102");
    assert_eq!(view.token_uri, issued.token_uri);

    service.revoke(issued.id).await.unwrap();
    assert!(service.get(issued.id).await.unwrap().revoked);

    // Revoking again is fine.
    service.revoke(issued.id).await.unwrap();
    assert!(service.get(issued.id).await.unwrap().revoked);

    assert!(matches!(
        service.get(TokenId(2)).await,
        Err(ServiceError::NotFound(TokenId(2)))
    ));
}

#[tokio::test]
async fn test_update_with_image_moves_token_uri() {
    let fixture = TestFixture::new();
    let service = &fixture.service;

    let issued = service
        .issue(fixture.issue_request("Bob", "Networks"))
        .await
        .unwrap();

    let mut req = fixture.update_request("Bob", "Networks II");
    req.image = Some(sample_image("new.png"));
    let updated = service.update(issued.id, req).await.unwrap();

    assert_ne!(updated.token_uri, issued.token_uri);
    assert_eq!(service.get(issued.id).await.unwrap().token_uri, updated.token_uri);

    let metadata_ref: ContentRef = updated
        .token_uri
        .rsplit('/')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    let blob = service.fetch_content(&metadata_ref).await.unwrap().unwrap();
    let metadata = certnft::core::MetadataBlob::from_json_bytes(&blob.bytes).unwrap();
    assert_eq!(metadata.name, "Certificate: Networks II");
}

#[tokio::test]
async fn test_storage_rejection_leaves_counter() {
    // Image rejected.
    let store = Arc::new(FailingStore::new(FailureMode::RejectAll));
    let fixture = TestFixture::with_content_store(store.clone());
    let err = fixture
        .service
        .issue(fixture.issue_request("Alice", "Systems 101"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert_eq!(fixture.ledger.token_count().await.unwrap(), 0);

    // Image stored, metadata rejected.
    let store = Arc::new(FailingStore::new(FailureMode::RejectAfter(1)));
    let fixture = TestFixture::with_content_store(store.clone());
    let err = fixture
        .service
        .issue(fixture.issue_request("Alice", "Systems 101"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert_eq!(store.attempts(), 2);
    assert_eq!(fixture.ledger.token_count().await.unwrap(), 0);
}

/// Issue one certificate and check it landed in the local store.
async fn assert_issued_locally(fixture: &TestFixture) {
    let issued = fixture
        .service
        .issue(fixture.issue_request("Alice", "Systems 101"))
        .await
        .unwrap();

    assert_eq!(issued.id, TokenId(1));
    assert!(issued.token_uri.contains("/content/local-"));

    let metadata_ref: ContentRef = issued.token_uri.rsplit('/').next().unwrap().parse().unwrap();
    assert!(fixture
        .service
        .fetch_content(&metadata_ref)
        .await
        .unwrap()
        .is_some());
}

fn ipfs_settings(api_url: String) -> Settings {
    let mut settings = Settings::default();
    settings.content.use_mock = false;
    settings.content.ipfs_api_url = api_url;
    settings.content.timeout_secs = 5;
    settings
}

#[tokio::test]
async fn test_unreachable_store_falls_back_to_local() {
    let local = Arc::new(MemoryContentStore::default());
    let store = FallbackContentStore::new(
        FailingStore::new(FailureMode::Unreachable),
        Arc::clone(&local),
    );
    let fixture = TestFixture::with_content_store(Arc::new(store));

    assert_issued_locally(&fixture).await;
    // Image and metadata.
    assert_eq!(local.len(), 2);
}

#[tokio::test]
async fn test_ipfs_error_status_falls_back_to_local() {
    let url = stub_ipfs_node(StatusCode::FORBIDDEN, "forbidden").await;
    let fixture = TestFixture::with_settings(ipfs_settings(url));
    assert_issued_locally(&fixture).await;
}

#[tokio::test]
async fn test_ipfs_non_json_reply_falls_back_to_local() {
    let url = stub_ipfs_node(StatusCode::OK, "<html>gateway</html>").await;
    let fixture = TestFixture::with_settings(ipfs_settings(url));
    assert_issued_locally(&fixture).await;
}

#[tokio::test]
async fn test_ipfs_upload_yields_gateway_uri() {
    let url = stub_ipfs_node(StatusCode::OK, r#"{"Hash":"QmStubbedMetadata"}"#).await;
    let fixture = TestFixture::with_settings(ipfs_settings(url));
    let issued = fixture
        .service
        .issue(fixture.issue_request("Alice", "Systems 101"))
        .await
        .unwrap();
    assert!(issued.token_uri.ends_with("/QmStubbedMetadata"));
    assert!(!issued.token_uri.contains("/content/local-"));
}

#[tokio::test]
async fn test_settings_update_switches_content_backend() {
    let fixture = TestFixture::new();
    let url = stub_ipfs_node(StatusCode::OK, r#"{"Hash":"QmAfterSwitch"}"#).await;

    let mut settings = (*fixture.service.settings().unwrap()).clone();
    settings.content = ipfs_settings(url).content;
    fixture.service.update_settings(settings).unwrap();

    let issued = fixture
        .service
        .issue(fixture.issue_request("Alice", "Systems 101"))
        .await
        .unwrap();
    assert!(issued.token_uri.ends_with("/QmAfterSwitch"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issues_get_distinct_ids() {
    let fixture = Arc::new(TestFixture::new());
    let n = 32;

    let mut handles = Vec::new();
    for i in 0..n {
        let fixture = Arc::clone(&fixture);
        handles.push(tokio::spawn(async move {
            let req = fixture.issue_request(&format!("Student {i}"), "Concurrency");
            fixture.service.issue(req).await.unwrap().id.get()
        }));
    }

    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=n).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_list_policies_around_gap() {
    let fixture = TestFixture::new();
    for course in ["A", "B", "C"] {
        fixture
            .service
            .issue(fixture.issue_request("Alice", course))
            .await
            .unwrap();
    }
    assert!(fixture.ledger.evict(TokenId(2)).unwrap());

    let listed = fixture.service.list().await.unwrap();
    let ids: Vec<u64> = listed.iter().map(|v| v.id.get()).collect();
    assert_eq!(ids, vec![1]);

    let mut settings = (*fixture.service.settings().unwrap()).clone();
    settings.ledger.listing_policy = ListingPolicy::SkipGaps;
    fixture.service.update_settings(settings).unwrap();

    let listed = fixture.service.list().await.unwrap();
    let ids: Vec<u64> = listed.iter().map(|v| v.id.get()).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_list_respects_scan_limit() {
    let mut settings = Settings::default();
    settings.ledger.list_scan_limit = 2;
    let fixture = TestFixture::with_settings(settings);
    for course in ["A", "B", "C"] {
        fixture
            .service
            .issue(fixture.issue_request("Alice", course))
            .await
            .unwrap();
    }
    assert_eq!(fixture.service.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_reload_applies_file_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("certnft.toml");
    std::fs::write(&path, "[ledger]\nchain_id = 1337\n").unwrap();

    let settings = Arc::new(SettingsHandle::with_env(Some(path.clone()), no_env).unwrap());
    let ledger = Arc::new(certnft::ledger::MemoryLedger::new());
    let service = CertificateService::new(ledger, settings).unwrap();
    assert_eq!(service.network_info().await.unwrap().network_id, 1337);

    std::fs::write(&path, "[ledger]\nchain_id = 31337\n").unwrap();
    assert_eq!(service.network_info().await.unwrap().network_id, 1337);

    service.reload().unwrap();
    let info = service.network_info().await.unwrap();
    assert_eq!(info.network_id, 31337);
    assert_eq!(info.network_name, "Hardhat Network (Mock)");
}
