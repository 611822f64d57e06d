//! Backend gateway for the RAG service.
//!
//! All network traffic of the creation flow goes through [`Gateway`]. It
//! exposes two calls and two pieces of shared state:
//!
//! - `POST /rag/create_corpus` - JSON body `{"corpus_name": ...}`
//! - `POST /rag/upload_document` - multipart body with `corpus_name` and `file`
//! - a loading indicator (`idle`, `creating`, `finalising`) published on a
//!   `watch` channel so observers see it change while a request is in flight
//! - a last-error slot holding the message of the most recent failure
//!
//! Any non-2xx response is a failure; its body is not inspected. There is no
//! retry and no authentication.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::draft::SessionDraft;
use crate::error::{Result, SessionError, CREATE_CORPUS_FAILED, UPLOAD_DOCUMENT_FAILED};

/// Path of the create-corpus endpoint.
pub const CREATE_CORPUS_PATH: &str = "/rag/create_corpus";

/// Path of the upload-document endpoint.
pub const UPLOAD_DOCUMENT_PATH: &str = "/rag/upload_document";

// ============================================================================
// Wire types
// ============================================================================

/// Which request, if any, is currently in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingState {
    /// No request in flight.
    #[default]
    Idle,
    /// Creating the corpus.
    Creating,
    /// Uploading the document.
    Finalising,
}

impl LoadingState {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Label shown on the submit button.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Start Learning Session",
            Self::Creating => "Creating session...",
            Self::Finalising => "Finalising...",
        }
    }
}

impl std::fmt::Display for LoadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Creating => write!(f, "creating"),
            Self::Finalising => write!(f, "finalising"),
        }
    }
}

/// JSON body of the create-corpus request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCorpusRequest {
    /// Requested corpus name (the session title).
    pub corpus_name: String,
}

/// A backend response body.
///
/// Only `status`, `corpus_name` and `display_name` are interpreted; any other
/// field is kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    /// `"success"` when the backend did what was asked.
    #[serde(default)]
    pub status: String,

    /// Name the backend assigned to the corpus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_name: Option<String>,

    /// Identifier used to address the session in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Remaining fields, as returned.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RequestOutcome {
    /// Returns `true` if the backend reported `status == "success"`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Client for the two backend operations of the creation flow.
///
/// One gateway is scoped to one flow. Its loading state and error slot are
/// shared by both operations.
#[derive(Debug)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    loading: watch::Sender<LoadingState>,
    last_error: Mutex<Option<String>>,
}

impl Gateway {
    /// Creates a gateway for the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RequestFailed` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SessionError::request_failed(e.to_string()))?;

        Ok(Self::with_client(client, config.base_url()))
    }

    /// Creates a gateway from an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let (loading, _) = watch::channel(LoadingState::Idle);
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            loading,
            last_error: Mutex::new(None),
        }
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current loading state.
    #[must_use]
    pub fn loading(&self) -> LoadingState {
        *self.loading.borrow()
    }

    /// Subscribes to loading-state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.loading.subscribe()
    }

    /// Message of the most recent failure, if the last call failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the error slot.
    pub fn clear_error(&self) {
        self.set_error(None);
    }

    /// Stores a failure that was detected outside the two requests.
    pub(crate) fn record_error(&self, err: &SessionError) {
        self.set_error(Some(err.to_string()));
    }

    fn set_error(&self, message: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Creates a corpus named after the draft's title.
    ///
    /// Loading is `Creating` for the duration of the call and back to `Idle`
    /// before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RequestFailed` with "Failed to create corpus" on
    /// a non-2xx response, or with the transport's message if the request
    /// could not be completed. The message is also stored in the error slot.
    pub async fn create_corpus(&self, draft: &SessionDraft) -> Result<RequestOutcome> {
        let body = CreateCorpusRequest {
            corpus_name: draft.title.clone(),
        };
        let url = format!("{}{CREATE_CORPUS_PATH}", self.base_url);

        self.track(LoadingState::Creating, async move {
            info!(corpus_name = %body.corpus_name, "Creating corpus");

            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(transport_error)?;

            if !response.status().is_success() {
                warn!(status = %response.status(), "Create corpus rejected");
                return Err(SessionError::request_failed(CREATE_CORPUS_FAILED));
            }

            let outcome: RequestOutcome = response.json().await.map_err(transport_error)?;
            info!(
                status = %outcome.status,
                corpus_name = ?outcome.corpus_name,
                display_name = ?outcome.display_name,
                "Corpus created"
            );
            Ok(outcome)
        })
        .await
    }

    /// Uploads the draft's selected file into `corpus_name`.
    ///
    /// Loading is `Finalising` for the duration of the call.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoFileSelected` without touching the network if
    /// the draft has no file. Otherwise fails like [`Gateway::create_corpus`],
    /// with "Failed to upload document" on a non-2xx response.
    pub async fn upload_document(
        &self,
        corpus_name: &str,
        draft: &SessionDraft,
    ) -> Result<RequestOutcome> {
        let url = format!("{}{UPLOAD_DOCUMENT_PATH}", self.base_url);

        self.track(LoadingState::Finalising, async move {
            let file = draft.selected_file().ok_or(SessionError::NoFileSelected)?;

            info!(
                corpus_name,
                file = %file.name,
                mime_type = %file.mime_type,
                size = file.bytes.len(),
                "Uploading document"
            );

            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(transport_error)?;
            let form = reqwest::multipart::Form::new()
                .text("corpus_name", corpus_name.to_string())
                .part("file", part);

            let response = self
                .client
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(transport_error)?;

            if !response.status().is_success() {
                warn!(status = %response.status(), "Upload rejected");
                return Err(SessionError::request_failed(UPLOAD_DOCUMENT_FAILED));
            }

            let outcome: RequestOutcome = response.json().await.map_err(transport_error)?;
            info!(status = %outcome.status, "Document uploaded");
            Ok(outcome)
        })
        .await
    }

    /// Runs one request with the shared loading and error bookkeeping.
    async fn track<F>(&self, state: LoadingState, request: F) -> Result<RequestOutcome>
    where
        F: Future<Output = Result<RequestOutcome>>,
    {
        self.loading.send_replace(state);
        let _idle = IdleOnDrop(&self.loading);
        self.set_error(None);
        debug!(loading = %state, "Request started");

        let result = request.await;

        if let Err(e) = &result {
            warn!(error = %e, "Request failed");
            self.set_error(Some(e.to_string()));
        }
        result
    }
}

/// Puts the loading state back to idle when dropped, including when the
/// request future is cancelled mid-flight.
struct IdleOnDrop<'a>(&'a watch::Sender<LoadingState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(LoadingState::Idle);
    }
}

fn transport_error(e: reqwest::Error) -> SessionError {
    SessionError::request_failed(e.to_string())
}
