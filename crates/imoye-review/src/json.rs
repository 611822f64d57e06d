//! JSON rendering of a [`ReviewSummary`].
//!
//! # Example
//!
//! ```rust
//! use imoye_review::{json::JsonRenderer, ReviewSummary};
//! use imoye_session::SessionDraft;
//!
//! let summary = ReviewSummary::from_draft(&SessionDraft::new().with_title("Notes"));
//! let renderer = JsonRenderer::new(&summary);
//!
//! let compact = renderer.render().unwrap();
//! assert!(!compact.contains('\n'));
//!
//! let pretty = renderer.render_pretty().unwrap();
//! assert!(pretty.contains("\"title\": \"Notes\""));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{Result, ReviewError, ReviewSummary};

/// JSON renderer for a review summary.
pub struct JsonRenderer<'a> {
    summary: &'a ReviewSummary,
}

impl<'a> JsonRenderer<'a> {
    /// Creates a renderer for the given summary.
    #[must_use]
    pub const fn new(summary: &'a ReviewSummary) -> Self {
        Self { summary }
    }

    /// Renders compact single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Serialization`] if serialization fails.
    pub fn render(&self) -> Result<String> {
        serde_json::to_string(self.summary).map_err(ReviewError::from)
    }

    /// Renders indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Serialization`] if serialization fails.
    pub fn render_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.summary).map_err(ReviewError::from)
    }

    /// Writes the JSON to `path`, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Serialization`] if serialization fails, or
    /// [`ReviewError::Io`] if the file cannot be written.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.render_pretty()?
        } else {
            self.render()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
