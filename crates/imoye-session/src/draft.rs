//! The in-progress session record.
//!
//! A [`SessionDraft`] lives for as long as one creation flow and is never
//! persisted. Its content source is a tagged union, so a draft cannot hold a
//! file while its content type says `url`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

/// Tags offered as one-click suggestions in the details step.
pub const SUGGESTED_TAGS: [&str; 8] = [
    "Machine Learning",
    "Business",
    "Research",
    "Technology",
    "Marketing",
    "Finance",
    "Strategy",
    "Innovation",
];

/// Roles offered in the personalization step.
pub const ROLES: [&str; 8] = [
    "Student",
    "Professional",
    "Researcher",
    "Entrepreneur",
    "Developer",
    "Manager",
    "Consultant",
    "Analyst",
];

/// Focus areas offered in the personalization step.
pub const FOCUS_AREAS: [&str; 6] = [
    "Key Concepts",
    "Practical Applications",
    "Case Studies",
    "Best Practices",
    "Technical Details",
    "Strategic Insights",
];

/// MIME type used for files whose extension is not recognised.
pub const OCTET_STREAM: &str = "application/octet-stream";

// ============================================================================
// Difficulty
// ============================================================================

/// How demanding the generated session should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory material.
    Beginner,
    /// The default level.
    #[default]
    Intermediate,
    /// In-depth material.
    Advanced,
}

impl Difficulty {
    /// All levels, in display order.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Parses a level name, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| {
            format!("invalid difficulty '{s}': expected one of 'beginner', 'intermediate', 'advanced'")
        })
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Content source
// ============================================================================

/// Which kind of content the user chose in the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// An uploaded document.
    File,
    /// A website reference.
    Url,
    /// Pasted free text.
    Text,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Url => write!(f, "url"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A local file chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name sent with the multipart part.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    /// Creates a file from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, deriving its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().to_string());
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(OCTET_STREAM, mime_type_for_extension);

        tracing::debug!(name = %name, mime_type, size = bytes.len(), "File selected");

        Ok(Self::new(name, mime_type, bytes))
    }

    /// Size of the file in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Maps a file extension to the MIME type a browser would declare for it.
#[must_use]
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "md" => "text/markdown",
        _ => OCTET_STREAM,
    }
}

/// The single active content source of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// File mode; `None` until the user picks a file.
    File(Option<SelectedFile>),
    /// Website reference.
    Url(String),
    /// Pasted text.
    Text(String),
}

impl ContentSource {
    /// Returns an empty source of the given kind.
    #[must_use]
    pub const fn empty(kind: ContentKind) -> Self {
        match kind {
            ContentKind::File => Self::File(None),
            ContentKind::Url => Self::Url(String::new()),
            ContentKind::Text => Self::Text(String::new()),
        }
    }

    /// Returns the kind of this source.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::File(_) => ContentKind::File,
            Self::Url(_) => ContentKind::Url,
            Self::Text(_) => ContentKind::Text,
        }
    }
}

// ============================================================================
// SessionDraft
// ============================================================================

/// Everything the user has entered so far in the creation flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDraft {
    /// Session title; doubles as the corpus name sent to the backend.
    pub title: String,
    /// Free-form context about the session.
    pub description: String,
    /// What the user wants to achieve.
    pub goal: String,
    /// Selected role (empty when none).
    pub role: String,
    /// Selected difficulty.
    pub difficulty: Difficulty,
    tags: IndexSet<String>,
    focus_areas: IndexSet<String>,
    source: Option<ContentSource>,
}

impl SessionDraft {
    /// Creates an empty draft.
    ///
    /// # Examples
    ///
    /// ```
    /// use imoye_session::{Difficulty, SessionDraft};
    ///
    /// let draft = SessionDraft::new();
    /// assert!(draft.title.is_empty());
    /// assert_eq!(draft.difficulty, Difficulty::Intermediate);
    /// assert!(draft.content_kind().is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the content source.
    #[must_use]
    pub fn with_source(mut self, source: ContentSource) -> Self {
        self.source = Some(source);
        self
    }

    // ------------------------------------------------------------------------
    // Content source
    // ------------------------------------------------------------------------

    /// Chooses the content type.
    ///
    /// Picking the kind that is already active keeps its value; picking a
    /// different kind starts that kind empty and drops the previous value.
    pub fn choose_content(&mut self, kind: ContentKind) {
        if self.content_kind() != Some(kind) {
            self.source = Some(ContentSource::empty(kind));
        }
    }

    /// Replaces the content source.
    pub fn set_source(&mut self, source: ContentSource) {
        self.source = Some(source);
    }

    /// Selects text mode with the given content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.source = Some(ContentSource::Text(text.into()));
    }

    /// Selects url mode with the given address.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.source = Some(ContentSource::Url(url.into()));
    }

    /// Selects file mode with the given file, or clears the file with `None`.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.source = Some(ContentSource::File(file));
    }

    /// Returns the active content source, if a type was chosen.
    #[must_use]
    pub const fn source(&self) -> Option<&ContentSource> {
        self.source.as_ref()
    }

    /// Returns the chosen content type.
    #[must_use]
    pub fn content_kind(&self) -> Option<ContentKind> {
        self.source.as_ref().map(ContentSource::kind)
    }

    /// Returns the selected file when in file mode.
    #[must_use]
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        match &self.source {
            Some(ContentSource::File(file)) => file.as_ref(),
            _ => None,
        }
    }

    /// Returns the pasted text when in text mode.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.source {
            Some(ContentSource::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the url when in url mode.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.source {
            Some(ContentSource::Url(url)) => Some(url),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Tags and focus areas
    // ------------------------------------------------------------------------

    /// Adds a tag. Returns `false` if it was already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    /// Removes a tag, keeping the order of the rest.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.shift_remove(tag)
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Number of tags.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Suggested tags that have not been added yet.
    pub fn remaining_suggestions(&self) -> impl Iterator<Item = &'static str> + '_ {
        SUGGESTED_TAGS
            .into_iter()
            .filter(|tag| !self.tags.contains(*tag))
    }

    /// Toggles a focus area. Returns `true` if it is now selected.
    pub fn toggle_focus_area(&mut self, area: impl Into<String>) -> bool {
        let area = area.into();
        if self.focus_areas.shift_remove(&area) {
            false
        } else {
            self.focus_areas.insert(area);
            true
        }
    }

    /// Selected focus areas in selection order.
    pub fn focus_areas(&self) -> impl Iterator<Item = &str> {
        self.focus_areas.iter().map(String::as_str)
    }

    /// Number of selected focus areas.
    #[must_use]
    pub fn focus_area_count(&self) -> usize {
        self.focus_areas.len()
    }
}
