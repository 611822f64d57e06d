//! Error types for the Imoye session client.
//!
//! Every failure the creation flow can surface ends up as one human-readable
//! message in the gateway's error slot. The variants below keep the taxonomy
//! (local validation, request failure, missing file) so callers can still
//! branch on it.

use std::path::PathBuf;

/// A specialized `Result` type for session client operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Message recorded when the create-corpus call returns a non-2xx status.
pub const CREATE_CORPUS_FAILED: &str = "Failed to create corpus";

/// Message recorded when the upload-document call returns a non-2xx status.
pub const UPLOAD_DOCUMENT_FAILED: &str = "Failed to upload document";

/// Message recorded when an upload is attempted without a selected file.
pub const NO_FILE_SELECTED: &str = "No file selected";

/// Errors that can occur while creating a session, onboarding, or loading
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    // ========================================================================
    // Validation Errors (local, before any network call)
    // ========================================================================
    /// The session title is empty or whitespace.
    #[error("Session title is required")]
    TitleRequired,

    /// No content type (file, url, text) has been chosen yet.
    #[error("Choose a content type (file, url or text) to continue")]
    ContentTypeRequired,

    /// The content type is `file` but no file was selected.
    #[error("Select a file to upload")]
    FileMissing,

    /// The selected file's MIME type is not on the allow-list.
    #[error("Unsupported file type: '{mime_type}'")]
    UnsupportedFileType {
        /// The declared MIME type of the rejected file.
        mime_type: String,
    },

    /// The selected file exceeds the upload size limit.
    #[error("File is too large: {size_bytes} bytes (limit is 10 MiB)")]
    FileTooLarge {
        /// Size of the rejected file in bytes.
        size_bytes: u64,
    },

    /// The email address does not look like an email address.
    #[error("Invalid email address: '{email}'")]
    InvalidEmail {
        /// The rejected input.
        email: String,
    },

    /// An onboarding step was left without the selection it requires.
    #[error("Onboarding step '{step}' is incomplete")]
    StepIncomplete {
        /// Name of the incomplete step.
        step: String,
    },

    /// A wizard was asked to move past its first or last step.
    #[error("Invalid step transition: cannot go from {from} to {to}")]
    InvalidStateTransition {
        /// The current step.
        from: String,
        /// The attempted target.
        to: String,
    },

    /// Submit was invoked while the submit action is disabled.
    #[error("Submit is disabled: {reason}")]
    SubmitDisabled {
        /// Why the action is disabled.
        reason: String,
    },

    // ========================================================================
    // Request Errors (network or non-2xx response)
    // ========================================================================
    /// A backend request failed.
    ///
    /// The message is exactly what the error slot shows: either one of the
    /// fixed status messages or the transport's own description.
    #[error("{message}")]
    RequestFailed {
        /// Human-readable failure message.
        message: String,
    },

    /// The backend answered 2xx with a status other than `"success"`.
    #[error("Corpus was not created (status: '{status}')")]
    CorpusRejected {
        /// The `status` field returned by the backend.
        status: String,
    },

    /// The backend reported success but returned no `corpus_name`.
    #[error("Backend reported success but returned no corpus name")]
    CorpusNameMissing,

    /// The corpus was created but the document upload failed afterwards.
    ///
    /// Submitting again retries only the upload against `corpus_name`.
    #[error("{message}")]
    UploadAfterCreate {
        /// Name of the corpus that already exists on the backend.
        corpus_name: String,
        /// The upload failure message.
        message: String,
    },

    // ========================================================================
    // Upload Guard
    // ========================================================================
    /// An upload was attempted without a selected file.
    #[error("No file selected")]
    NoFileSelected,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your imoye.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad categories of [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local input check failed; no request was made.
    Validation,
    /// A backend request failed or was answered unexpectedly.
    Request,
    /// An upload was attempted without a file.
    NoFileSelected,
    /// Configuration or local I/O problem outside the flow itself.
    Environment,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Request => write!(f, "request"),
            Self::NoFileSelected => write!(f, "no_file_selected"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

impl SessionError {
    /// Creates a new `RequestFailed` error with the given message.
    #[must_use]
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    /// Creates a new `UnsupportedFileType` error.
    #[must_use]
    pub fn unsupported_file_type(mime_type: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            mime_type: mime_type.into(),
        }
    }

    /// Creates a new `InvalidEmail` error.
    #[must_use]
    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    /// Creates a new `StepIncomplete` error.
    #[must_use]
    pub fn step_incomplete(step: impl std::fmt::Display) -> Self {
        Self::StepIncomplete {
            step: step.to_string(),
        }
    }

    /// Creates a new `SubmitDisabled` error.
    #[must_use]
    pub fn submit_disabled(reason: impl Into<String>) -> Self {
        Self::SubmitDisabled {
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidStateTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates a new `CorpusRejected` error.
    #[must_use]
    pub fn corpus_rejected(status: impl Into<String>) -> Self {
        Self::CorpusRejected {
            status: status.into(),
        }
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TitleRequired
            | Self::ContentTypeRequired
            | Self::FileMissing
            | Self::UnsupportedFileType { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidEmail { .. }
            | Self::StepIncomplete { .. }
            | Self::InvalidStateTransition { .. }
            | Self::SubmitDisabled { .. } => ErrorKind::Validation,
            Self::RequestFailed { .. }
            | Self::CorpusRejected { .. }
            | Self::CorpusNameMissing
            | Self::UploadAfterCreate { .. } => ErrorKind::Request,
            Self::NoFileSelected => ErrorKind::NoFileSelected,
            Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. }
            | Self::Io(_) => ErrorKind::Environment,
        }
    }

    /// Returns an actionable suggestion for the user.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::TitleRequired => "Enter a session title in the details step",
            Self::ContentTypeRequired => "Pick one of --file, --url or --text",
            Self::FileMissing | Self::NoFileSelected => "Select a file before submitting",
            Self::UnsupportedFileType { .. } => {
                "Use a PDF, DOC, DOCX, TXT, XLS, XLSX, PPT or PPTX file"
            }
            Self::FileTooLarge { .. } => "Split the document or upload a smaller file",
            Self::InvalidEmail { .. } => "Enter an address like name@example.com",
            Self::StepIncomplete { .. } => "Make a selection before continuing",
            Self::InvalidStateTransition { .. } => "Use the previous/next steps that exist",
            Self::SubmitDisabled { .. } => "Wait for the current request or fix the inputs",
            Self::RequestFailed { .. } | Self::CorpusRejected { .. } => {
                "Check the backend URL and your network, then submit again"
            }
            Self::CorpusNameMissing => "Check that the backend version matches this client",
            Self::UploadAfterCreate { .. } => {
                "Submit again to retry the upload; the corpus already exists"
            }
            Self::ConfigParseError { .. } | Self::ConfigValidationError { .. } => {
                "Fix imoye.json or pass the value on the command line"
            }
            Self::Io(_) => "Check the file path and permissions",
        }
    }
}
