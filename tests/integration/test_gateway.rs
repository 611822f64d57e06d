//! Integration tests for the backend gateway.
//!
//! Each test runs a mock RAG backend on an ephemeral port and drives the
//! gateway against it over real HTTP.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::MockBackend;
use imoye_session::{
    Config, Gateway, LoadingState, SelectedFile, SessionDraft, SessionError,
};
use serde_json::json;

fn gateway_for(backend: &MockBackend) -> Gateway {
    let gateway = Gateway::with_client(reqwest::Client::new(), backend.base_url.as_str());
    backend.observe(gateway.subscribe());
    gateway
}

fn draft_with_file(mime_type: &str) -> SessionDraft {
    let mut draft = SessionDraft::new().with_title("Doc");
    draft.select_file(Some(SelectedFile::new(
        "doc.txt",
        mime_type,
        b"chapter one".to_vec(),
    )));
    draft
}

// ============================================================================
// create_corpus
// ============================================================================

#[tokio::test]
async fn test_create_corpus_sends_title_as_json() {
    let backend = MockBackend::start().await;
    let gateway = gateway_for(&backend);

    let outcome = gateway
        .create_corpus(&SessionDraft::new().with_title("X"))
        .await
        .expect("create should succeed");

    assert_eq!(backend.create_bodies(), vec![json!({"corpus_name": "X"})]);
    assert!(outcome.is_success());
    assert_eq!(outcome.corpus_name.as_deref(), Some("notes-1"));
    assert_eq!(outcome.display_name.as_deref(), Some("Notes-abc"));
    assert!(gateway.last_error().is_none());
}

#[tokio::test]
async fn test_create_corpus_loading_is_creating_while_in_flight() {
    let backend = MockBackend::start().await;
    let gateway = gateway_for(&backend);

    assert_eq!(gateway.loading(), LoadingState::Idle);
    gateway
        .create_corpus(&SessionDraft::new().with_title("X"))
        .await
        .expect("create should succeed");

    assert_eq!(backend.loading_seen(), vec![LoadingState::Creating]);
    assert_eq!(gateway.loading(), LoadingState::Idle);
}

#[tokio::test]
async fn test_create_corpus_non_2xx_sets_error() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "corpus exists"}),
    );
    let gateway = gateway_for(&backend);

    let err = gateway
        .create_corpus(&SessionDraft::new().with_title("X"))
        .await
        .expect_err("create should fail");

    assert!(matches!(err, SessionError::RequestFailed { .. }));
    assert_eq!(err.to_string(), "Failed to create corpus");
    assert_eq!(
        gateway.last_error().as_deref(),
        Some("Failed to create corpus")
    );
    assert_eq!(backend.loading_seen(), vec![LoadingState::Creating]);
    assert_eq!(gateway.loading(), LoadingState::Idle);
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(StatusCode::BAD_REQUEST, json!({}));
    let gateway = gateway_for(&backend);
    let draft = SessionDraft::new().with_title("X");

    let _ = gateway.create_corpus(&draft).await;
    assert!(gateway.last_error().is_some());

    backend.respond_to_create(
        StatusCode::OK,
        json!({"status": "success", "corpus_name": "x-1", "display_name": "X-1"}),
    );
    gateway
        .create_corpus(&draft)
        .await
        .expect("second create should succeed");
    assert!(gateway.last_error().is_none());
}

#[tokio::test]
async fn test_create_corpus_keeps_unknown_fields() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(
        StatusCode::OK,
        json!({"status": "success", "corpus_name": "x-1", "region": "eu"}),
    );
    let gateway = gateway_for(&backend);

    let outcome = gateway
        .create_corpus(&SessionDraft::new().with_title("X"))
        .await
        .expect("create should succeed");

    assert!(outcome.display_name.is_none());
    assert_eq!(outcome.extra.get("region"), Some(&json!("eu")));
}

#[tokio::test]
async fn test_request_timeout_from_config() {
    let backend = MockBackend::start().await;
    backend.delay_create(Duration::from_secs(3));

    let config = Config {
        backend_url: backend.base_url.clone(),
        request_timeout_secs: 1,
    };
    let gateway = Gateway::new(&config).expect("gateway should build");

    let err = gateway
        .create_corpus(&SessionDraft::new().with_title("Slow"))
        .await
        .expect_err("request should time out");

    assert!(matches!(err, SessionError::RequestFailed { .. }));
    assert_eq!(gateway.last_error(), Some(err.to_string()));
    assert_eq!(gateway.loading(), LoadingState::Idle);
}

// ============================================================================
// upload_document
// ============================================================================

#[tokio::test]
async fn test_upload_document_sends_multipart_fields() {
    let backend = MockBackend::start().await;
    let gateway = gateway_for(&backend);

    let outcome = gateway
        .upload_document("notes-1", &draft_with_file("text/plain"))
        .await
        .expect("upload should succeed");
    assert!(outcome.is_success());

    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];

    assert_eq!(upload.text("corpus_name").as_deref(), Some("notes-1"));

    let file = upload.field("file").expect("file field should be present");
    assert_eq!(file.file_name.as_deref(), Some("doc.txt"));
    assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    assert_eq!(file.bytes, b"chapter one".to_vec());

    assert_eq!(backend.loading_seen(), vec![LoadingState::Finalising]);
    assert_eq!(gateway.loading(), LoadingState::Idle);
}

#[tokio::test]
async fn test_upload_without_file_makes_no_request() {
    let backend = MockBackend::start().await;
    let gateway = gateway_for(&backend);

    let mut draft = SessionDraft::new().with_title("Doc");
    draft.select_file(None);

    let err = gateway
        .upload_document("notes-1", &draft)
        .await
        .expect_err("upload should fail");

    assert!(matches!(err, SessionError::NoFileSelected));
    assert_eq!(gateway.last_error().as_deref(), Some("No file selected"));
    assert!(backend.uploads().is_empty());
    assert_eq!(gateway.loading(), LoadingState::Idle);
}

#[tokio::test]
async fn test_upload_non_2xx_sets_error() {
    let backend = MockBackend::start().await;
    backend.respond_to_upload(StatusCode::BAD_GATEWAY, json!({}));
    let gateway = gateway_for(&backend);

    let err = gateway
        .upload_document("notes-1", &draft_with_file("application/pdf"))
        .await
        .expect_err("upload should fail");

    assert_eq!(err.to_string(), "Failed to upload document");
    assert_eq!(
        gateway.last_error().as_deref(),
        Some("Failed to upload document")
    );
    assert_eq!(backend.uploads().len(), 1);
}
