//! Markdown rendering of a [`ReviewSummary`].
//!
//! The output mirrors the review card: the title as a heading, a table of the
//! selections, then the description and goal when present.

use std::fmt::Write;

use imoye_session::Difficulty;

use crate::{ContentSummary, ReviewSummary};

/// Renders a review summary as Markdown.
pub struct MarkdownRenderer<'a> {
    summary: &'a ReviewSummary,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates a renderer for the given summary.
    #[must_use]
    pub const fn new(summary: &'a ReviewSummary) -> Self {
        Self { summary }
    }

    /// Renders the complete summary.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_table(&mut output);
        self.write_sections(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(output, "# {}\n", escape_markdown(&self.summary.title));
    }

    fn write_table(&self, output: &mut String) {
        let summary = self.summary;

        let _ = writeln!(output, "| Field | Value |");
        let _ = writeln!(output, "|-------|-------|");
        let _ = writeln!(
            output,
            "| Content | {} |",
            summary
                .content
                .as_ref()
                .map_or_else(|| "Not selected".to_string(), format_content)
        );
        let _ = writeln!(
            output,
            "| Role | {} |",
            summary
                .role
                .as_deref()
                .map_or_else(|| "Not specified".to_string(), escape_markdown)
        );
        let _ = writeln!(
            output,
            "| Difficulty | {} |",
            format_difficulty(summary.difficulty)
        );
        let _ = writeln!(
            output,
            "| Focus Areas | {} selected |",
            summary.focus_area_count()
        );

        let tags = if summary.tags.is_empty() {
            "None".to_string()
        } else {
            summary
                .tags
                .iter()
                .map(|tag| format!("`{}`", tag.replace('`', "'")))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let _ = writeln!(output, "| Tags | {tags} |");
    }

    fn write_sections(&self, output: &mut String) {
        if let Some(description) = &self.summary.description {
            let _ = writeln!(output, "\n## Description\n\n{}", escape_markdown(description));
        }
        if let Some(goal) = &self.summary.goal {
            let _ = writeln!(output, "\n## Learning Goal\n\n{}", escape_markdown(goal));
        }
    }
}

fn format_content(content: &ContentSummary) -> String {
    match content {
        ContentSummary::File {
            name: Some(name),
            size_bytes,
            ..
        } => format!("File: {} ({})", escape_markdown(name), format_size(*size_bytes)),
        ContentSummary::File { name: None, .. } => "File (none selected)".to_string(),
        ContentSummary::Url { url } => format!("Website: {}", escape_markdown(url)),
        ContentSummary::Text { characters } => format!("Text ({characters} characters)"),
    }
}

const fn format_difficulty(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "Beginner",
        Difficulty::Intermediate => "Intermediate",
        Difficulty::Advanced => "Advanced",
    }
}

/// Formats a byte count with one decimal, e.g. `2.0 KB`.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    let (unit, divisor) = match bytes {
        b if b < KB => return format!("{b} B"),
        b if b < MB => ("KB", KB),
        _ => ("MB", MB),
    };
    let tenths = bytes * 10 / divisor;
    format!("{}.{} {unit}", tenths / 10, tenths % 10)
}

/// Escapes characters that would break Markdown formatting or table cells.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
