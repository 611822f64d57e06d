//! Pure checks over a [`SessionDraft`].

use crate::draft::{ContentKind, SessionDraft};
use crate::error::{Result, SessionError};

/// Largest file accepted for upload (10 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// MIME types accepted for upload: PDF, DOC, DOCX, TXT, XLS, XLSX, PPT, PPTX.
pub const ALLOWED_MIME_TYPES: [&str; 8] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-powerpoint",
];

/// Returns `true` if the draft has a non-blank title.
///
/// # Examples
///
/// ```
/// use imoye_session::{title_valid, SessionDraft};
///
/// assert!(!title_valid(&SessionDraft::new().with_title(" ")));
/// assert!(title_valid(&SessionDraft::new().with_title("Biology 101")));
/// ```
#[must_use]
pub fn title_valid(draft: &SessionDraft) -> bool {
    !draft.title.trim().is_empty()
}

/// Returns `true` if the draft holds an uploadable file.
///
/// The file must be present and have an allowed MIME type. On top of the
/// MIME allow-list it must also fit within [`MAX_UPLOAD_SIZE`], so an
/// oversized PDF is rejected here rather than by the backend.
#[must_use]
pub fn file_valid(draft: &SessionDraft) -> bool {
    check_file(draft).is_ok()
}

/// Checks the selected file, reporting why it is not uploadable.
pub fn check_file(draft: &SessionDraft) -> Result<()> {
    let file = draft.selected_file().ok_or(SessionError::FileMissing)?;

    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(SessionError::unsupported_file_type(&file.mime_type));
    }

    if file.size_bytes() > MAX_UPLOAD_SIZE {
        return Err(SessionError::FileTooLarge {
            size_bytes: file.size_bytes(),
        });
    }

    Ok(())
}

/// Checks everything the submit action requires of the draft.
///
/// Mirrors the disabled state of the submit button, minus the loading check
/// which belongs to the gateway.
pub fn validate_for_submit(draft: &SessionDraft) -> Result<()> {
    if !title_valid(draft) {
        return Err(SessionError::TitleRequired);
    }

    if draft.content_kind() == Some(ContentKind::File) {
        check_file(draft)?;
    }

    Ok(())
}
