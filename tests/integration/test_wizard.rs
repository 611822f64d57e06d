//! End-to-end tests for the session-creation wizard.
//!
//! The wizard is walked from the first step to submit against a mock RAG
//! backend, checking which requests reach the backend and where the flow
//! navigates afterwards.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::MockBackend;
use imoye_review::{MarkdownRenderer, ReviewSummary};
use imoye_session::{
    ContentKind, Gateway, LoadingState, Route, SelectedFile, SessionDraft, SessionError,
    SessionWizard, Step,
};
use serde_json::json;

fn wizard_for(backend: &MockBackend) -> SessionWizard {
    let gateway = Gateway::with_client(reqwest::Client::new(), backend.base_url.as_str());
    backend.observe(gateway.subscribe());
    SessionWizard::new(gateway)
}

/// Fills every step the way a user would and stops on the review step.
fn walk_to_review(wizard: &mut SessionWizard, title: &str, fill: impl FnOnce(&mut SessionDraft)) {
    fill(wizard.draft_mut());
    assert!(wizard.next(), "content step should pass");

    wizard.draft_mut().title = title.to_string();
    assert!(wizard.next(), "details step should pass");

    assert!(wizard.next(), "personalization step should pass");
    assert_eq!(wizard.step(), Step::Review);
}

fn text_file() -> SelectedFile {
    SelectedFile::new("doc.txt", "text/plain", b"chapter one".to_vec())
}

// ============================================================================
// Happy paths
// ============================================================================

#[tokio::test]
async fn test_text_session_navigates_without_upload() {
    let backend = MockBackend::start().await;
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Notes", |draft| draft.set_text("hello world"));
    let route = wizard.submit().await.expect("submit should succeed");

    assert_eq!(route, Route::session("Notes-abc"));
    assert_eq!(route.path(), "/session/Notes-abc");
    assert_eq!(backend.create_bodies(), vec![json!({"corpus_name": "Notes"})]);
    assert!(backend.uploads().is_empty());
    assert_eq!(wizard.gateway().loading(), LoadingState::Idle);
    assert!(wizard.gateway().last_error().is_none());
}

#[tokio::test]
async fn test_url_session_navigates_without_upload() {
    let backend = MockBackend::start().await;
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Rust Book", |draft| {
        draft.set_url("https://doc.rust-lang.org/book/");
    });
    let route = wizard.submit().await.expect("submit should succeed");

    assert_eq!(route.path(), "/session/Notes-abc");
    assert_eq!(backend.create_bodies().len(), 1);
    assert!(backend.uploads().is_empty());
}

#[tokio::test]
async fn test_file_session_creates_then_uploads() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(
        StatusCode::OK,
        json!({"status": "success", "corpus_name": "doc-7", "display_name": "Doc-7f"}),
    );
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let route = wizard.submit().await.expect("submit should succeed");

    assert_eq!(route.path(), "/session/Doc-7f");
    assert_eq!(backend.create_bodies(), vec![json!({"corpus_name": "Doc"})]);

    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].text("corpus_name").as_deref(), Some("doc-7"));
    let file = uploads[0].field("file").expect("file field should be present");
    assert_eq!(file.content_type.as_deref(), Some("text/plain"));

    assert_eq!(
        backend.loading_seen(),
        vec![LoadingState::Creating, LoadingState::Finalising]
    );
    assert_eq!(wizard.gateway().loading(), LoadingState::Idle);
}

#[tokio::test]
async fn test_missing_display_name_routes_by_corpus_name() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(
        StatusCode::OK,
        json!({"status": "success", "corpus_name": "notes-9"}),
    );
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Notes", |draft| draft.set_text("hello"));
    let route = wizard.submit().await.expect("submit should succeed");

    assert_eq!(route, Route::session("notes-9"));
}

#[tokio::test]
async fn test_review_summary_matches_submitted_draft() {
    let backend = MockBackend::start().await;
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Notes", |draft| {
        draft.set_text("hello world");
        draft.add_tag("Science");
    });

    let summary = ReviewSummary::from_draft(wizard.draft());
    assert_eq!(summary.title, "Notes");
    assert_eq!(summary.content_kind(), Some(ContentKind::Text));
    let markdown = MarkdownRenderer::new(&summary).render();
    assert!(markdown.contains("| Tags | `Science` |"));

    wizard.submit().await.expect("submit should succeed");
    assert_eq!(backend.create_bodies(), vec![json!({"corpus_name": "Notes"})]);
}

// ============================================================================
// Disabled submit
// ============================================================================

#[tokio::test]
async fn test_empty_title_submit_makes_no_request() {
    let backend = MockBackend::start().await;
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Notes", |draft| draft.set_text("hello"));
    wizard.draft_mut().title = "   ".to_string();

    assert!(!wizard.can_submit());
    let err = wizard.submit().await.expect_err("submit should be disabled");

    assert!(matches!(err, SessionError::TitleRequired));
    assert!(backend.create_bodies().is_empty());
    assert!(backend.uploads().is_empty());
    assert!(wizard.gateway().last_error().is_none());
}

#[tokio::test]
async fn test_unsupported_file_submit_makes_no_request() {
    let backend = MockBackend::start().await;
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Slides", |draft| {
        draft.select_file(Some(SelectedFile::new("diagram.png", "image/png", vec![1])));
    });

    let err = wizard.submit().await.expect_err("submit should be disabled");

    assert!(matches!(err, SessionError::UnsupportedFileType { .. }));
    assert!(backend.create_bodies().is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_create_failure_stays_on_review() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let err = wizard.submit().await.expect_err("submit should fail");

    assert_eq!(err.to_string(), "Failed to create corpus");
    assert_eq!(
        wizard.gateway().last_error().as_deref(),
        Some("Failed to create corpus")
    );
    assert!(backend.uploads().is_empty());
    assert_eq!(wizard.step(), Step::Review);
    assert!(wizard.can_submit());
}

#[tokio::test]
async fn test_unsuccessful_status_is_reported() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(StatusCode::OK, json!({"status": "error"}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let err = wizard.submit().await.expect_err("submit should fail");

    assert!(matches!(err, SessionError::CorpusRejected { ref status } if status == "error"));
    assert_eq!(wizard.gateway().last_error(), Some(err.to_string()));
    assert!(backend.uploads().is_empty());
}

#[tokio::test]
async fn test_success_without_corpus_name_is_reported() {
    let backend = MockBackend::start().await;
    backend.respond_to_create(StatusCode::OK, json!({"status": "success"}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let err = wizard.submit().await.expect_err("submit should fail");

    assert!(matches!(err, SessionError::CorpusNameMissing));
    assert_eq!(
        wizard.gateway().last_error().as_deref(),
        Some("Backend reported success but returned no corpus name")
    );
    assert!(backend.uploads().is_empty());
    assert!(wizard.can_submit());
}

#[tokio::test]
async fn test_partial_success_retries_only_upload() {
    let backend = MockBackend::start().await;
    backend.respond_to_upload(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));

    let err = wizard.submit().await.expect_err("upload should fail");
    assert!(matches!(
        err,
        SessionError::UploadAfterCreate { ref corpus_name, .. } if corpus_name == "notes-1"
    ));
    assert_eq!(
        wizard.gateway().last_error().as_deref(),
        Some("Failed to upload document")
    );
    assert_eq!(backend.create_bodies().len(), 1);
    assert_eq!(backend.uploads().len(), 1);

    backend.respond_to_upload(StatusCode::OK, json!({"status": "success"}));
    let route = wizard.submit().await.expect("retry should succeed");

    assert_eq!(route.path(), "/session/Notes-abc");
    assert_eq!(backend.create_bodies().len(), 1, "corpus is not created twice");
    assert_eq!(backend.uploads().len(), 2);
    assert_eq!(backend.uploads()[1].text("corpus_name").as_deref(), Some("notes-1"));
}

#[tokio::test]
async fn test_partial_success_with_new_title_creates_again() {
    let backend = MockBackend::start().await;
    backend.respond_to_upload(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let _ = wizard.submit().await;

    backend.respond_to_upload(StatusCode::OK, json!({"status": "success"}));
    wizard.draft_mut().title = "Doc v2".to_string();
    wizard.submit().await.expect("resubmit should succeed");

    assert_eq!(
        backend.create_bodies(),
        vec![json!({"corpus_name": "Doc"}), json!({"corpus_name": "Doc v2"})]
    );
    assert_eq!(backend.uploads().len(), 2);
}

#[tokio::test]
async fn test_partial_success_then_text_content_creates_again() {
    let backend = MockBackend::start().await;
    backend.respond_to_upload(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let _ = wizard.submit().await.expect_err("upload should fail");
    assert_eq!(backend.uploads().len(), 1);

    backend.respond_to_upload(StatusCode::OK, json!({"status": "success"}));
    wizard.draft_mut().set_text("chapter one, pasted");
    let route = wizard.submit().await.expect("resubmit should succeed");

    assert_eq!(route.path(), "/session/Notes-abc");
    assert_eq!(
        backend.create_bodies(),
        vec![json!({"corpus_name": "Doc"}), json!({"corpus_name": "Doc"})]
    );
    assert_eq!(backend.uploads().len(), 1, "text content is never uploaded");
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancelled_create_leaves_wizard_submittable() {
    let backend = MockBackend::start().await;
    backend.delay_create(Duration::from_secs(2));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Notes", |draft| draft.set_text("hello"));
    let cancelled = tokio::time::timeout(Duration::from_millis(200), wizard.submit()).await;
    assert!(cancelled.is_err(), "submit should still be waiting on create");

    assert_eq!(wizard.gateway().loading(), LoadingState::Idle);
    assert!(wizard.can_submit());

    backend.delay_create(Duration::ZERO);
    let route = wizard.submit().await.expect("resubmit should succeed");
    assert_eq!(route.path(), "/session/Notes-abc");
}

#[tokio::test]
async fn test_cancelled_upload_keeps_created_corpus() {
    let backend = MockBackend::start().await;
    backend.delay_upload(Duration::from_secs(2));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let cancelled = tokio::time::timeout(Duration::from_millis(500), wizard.submit()).await;
    assert!(cancelled.is_err(), "submit should still be waiting on upload");
    assert_eq!(backend.create_bodies().len(), 1);
    assert_eq!(wizard.gateway().loading(), LoadingState::Idle);

    backend.delay_upload(Duration::ZERO);
    wizard.submit().await.expect("retry should succeed");

    assert_eq!(backend.create_bodies().len(), 1, "corpus is not created twice");
    let uploads = backend.uploads();
    assert_eq!(
        uploads.last().and_then(|u| u.text("corpus_name")).as_deref(),
        Some("notes-1")
    );
}

#[tokio::test]
async fn test_cancelled_upload_retry_keeps_created_corpus() {
    let backend = MockBackend::start().await;
    backend.respond_to_upload(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let mut wizard = wizard_for(&backend);

    walk_to_review(&mut wizard, "Doc", |draft| draft.select_file(Some(text_file())));
    let _ = wizard.submit().await.expect_err("upload should fail");

    backend.respond_to_upload(StatusCode::OK, json!({"status": "success"}));
    backend.delay_upload(Duration::from_secs(2));
    let cancelled = tokio::time::timeout(Duration::from_millis(200), wizard.submit()).await;
    assert!(cancelled.is_err(), "retry should still be waiting on upload");
    assert!(wizard.can_submit());

    backend.delay_upload(Duration::ZERO);
    wizard.submit().await.expect("second retry should succeed");

    assert_eq!(backend.create_bodies().len(), 1, "corpus is not created twice");
}
