//! Imoye Session Client
//!
//! Drives the session-creation wizard, the onboarding wizard and the password
//! reset form, and talks to the RAG backend.

pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod onboarding;
pub mod password_reset;
pub mod route;
pub mod validate;
pub mod wizard;

pub use config::{Config, DEFAULT_BACKEND_URL};
pub use draft::{
    mime_type_for_extension, ContentKind, ContentSource, Difficulty, SelectedFile, SessionDraft,
    FOCUS_AREAS, ROLES, SUGGESTED_TAGS,
};
pub use error::{
    ErrorKind, Result, SessionError, CREATE_CORPUS_FAILED, NO_FILE_SELECTED,
    UPLOAD_DOCUMENT_FAILED,
};
pub use gateway::{
    CreateCorpusRequest, Gateway, LoadingState, RequestOutcome, CREATE_CORPUS_PATH,
    UPLOAD_DOCUMENT_PATH,
};
pub use onboarding::{
    InterestOption, LearningStyle, OnboardingProfile, OnboardingStep, OnboardingWizard,
    INTEREST_OPTIONS, ONBOARDING_ROLES,
};
pub use password_reset::{is_email_valid, PasswordResetForm, ResetStatus};
pub use route::Route;
pub use validate::{
    check_file, file_valid, title_valid, validate_for_submit, ALLOWED_MIME_TYPES, MAX_UPLOAD_SIZE,
};
pub use wizard::{SessionWizard, Step, StepMark};
