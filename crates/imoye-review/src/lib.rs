//! Imoye Review Summary
//!
//! Builds the summary shown on the last step of the session-creation wizard
//! and renders it for people (Markdown) or programs (JSON).
//!
//! # Types
//!
//! - [`ReviewSummary`] - What the user is about to submit
//! - [`ContentSummary`] - The chosen content, without its payload
//!
//! # Renderers
//!
//! - [`json::JsonRenderer`] - Compact or pretty JSON, optionally written to a file
//! - [`MarkdownRenderer`] - A human-readable summary card
//!
//! # Example
//!
//! ```rust
//! use imoye_review::{MarkdownRenderer, ReviewSummary};
//! use imoye_session::SessionDraft;
//!
//! let mut draft = SessionDraft::new().with_title("Biology 101");
//! draft.set_text("Cells are the basic unit of life.");
//!
//! let summary = ReviewSummary::from_draft(&draft);
//! let markdown = MarkdownRenderer::new(&summary).render();
//! assert!(markdown.contains("# Biology 101"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownRenderer;

use imoye_session::{ContentKind, ContentSource, Difficulty, SessionDraft};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown when the draft has no title yet.
pub const UNTITLED_SESSION: &str = "Untitled Session";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering a summary.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Failed to serialize the summary to JSON.
    #[error("failed to serialize review summary: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write the summary file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for review operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

// ============================================================================
// Summary Types
// ============================================================================

/// The chosen content, described without its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentSummary {
    /// A document to upload.
    File {
        /// File name, absent until a file is selected.
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Declared MIME type.
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// File size in bytes.
        size_bytes: u64,
    },
    /// A website reference.
    Url {
        /// The address as entered.
        url: String,
    },
    /// Pasted text.
    Text {
        /// Number of characters pasted.
        characters: usize,
    },
}

impl ContentSummary {
    /// Describes a content source.
    #[must_use]
    pub fn from_source(source: &ContentSource) -> Self {
        match source {
            ContentSource::File(file) => Self::File {
                name: file.as_ref().map(|f| f.name.clone()),
                mime_type: file.as_ref().map(|f| f.mime_type.clone()),
                size_bytes: file.as_ref().map_or(0, |f| f.size_bytes()),
            },
            ContentSource::Url(url) => Self::Url { url: url.clone() },
            ContentSource::Text(text) => Self::Text {
                characters: text.chars().count(),
            },
        }
    }

    /// The kind of content described.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::File { .. } => ContentKind::File,
            Self::Url { .. } => ContentKind::Url,
            Self::Text { .. } => ContentKind::Text,
        }
    }
}

/// Everything the review step shows before the session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Session title, or [`UNTITLED_SESSION`] when blank.
    pub title: String,
    /// Description, if one was entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Learning goal, if one was entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// The chosen content, if a content type was chosen.
    #[serde(default)]
    pub content: Option<ContentSummary>,
    /// Selected role, if any.
    #[serde(default)]
    pub role: Option<String>,
    /// Selected difficulty.
    pub difficulty: Difficulty,
    /// Selected focus areas.
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Tags in the order they were added.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ReviewSummary {
    /// Builds the summary of a draft.
    #[must_use]
    pub fn from_draft(draft: &SessionDraft) -> Self {
        let title = draft.title.trim();

        Self {
            title: if title.is_empty() {
                UNTITLED_SESSION.to_string()
            } else {
                title.to_string()
            },
            description: non_blank(&draft.description),
            goal: non_blank(&draft.goal),
            content: draft.source().map(ContentSummary::from_source),
            role: non_blank(&draft.role),
            difficulty: draft.difficulty,
            focus_areas: draft.focus_areas().map(str::to_string).collect(),
            tags: draft.tags().map(str::to_string).collect(),
        }
    }

    /// The chosen content type, if any.
    #[must_use]
    pub fn content_kind(&self) -> Option<ContentKind> {
        self.content.as_ref().map(ContentSummary::kind)
    }

    /// Number of focus areas selected.
    #[must_use]
    pub fn focus_area_count(&self) -> usize {
        self.focus_areas.len()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ============================================================================
// Tests
// ============================================================================
