//! The "forgot password" request form.
//!
//! Only the form's lifecycle lives here. No request is made; the caller
//! decides what `Submitting` means and calls [`PasswordResetForm::finish`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SessionError};

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Returns `true` if `email` looks like an email address.
///
/// # Examples
///
/// ```
/// use imoye_session::is_email_valid;
///
/// assert!(is_email_valid("a@b.co"));
/// assert!(!is_email_valid("a@b"));
/// ```
#[must_use]
pub fn is_email_valid(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Lifecycle of the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetStatus {
    /// Editing the email.
    #[default]
    Idle,
    /// Request accepted, waiting to finish.
    Submitting,
    /// Confirmation shown.
    Submitted,
}

/// State of the password reset form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordResetForm {
    /// The email being entered.
    pub email: String,
    status: ResetStatus,
}

impl PasswordResetForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form with the email filled in.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status: ResetStatus::Idle,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ResetStatus {
        self.status
    }

    /// Returns `true` if the submit button is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.status == ResetStatus::Idle && is_email_valid(&self.email)
    }

    /// Starts the request.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEmail` and leaves the form untouched if
    /// the email is malformed, or `SessionError::SubmitDisabled` if the form
    /// is not idle.
    pub fn submit(&mut self) -> Result<()> {
        if self.status != ResetStatus::Idle {
            return Err(SessionError::submit_disabled(
                "a reset request was already sent",
            ));
        }
        if !is_email_valid(&self.email) {
            return Err(SessionError::invalid_email(&self.email));
        }

        self.status = ResetStatus::Submitting;
        info!(email = %self.email, "Password reset requested");
        Ok(())
    }

    /// Marks the request as done and shows the confirmation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidStateTransition` unless submitting.
    pub fn finish(&mut self) -> Result<()> {
        if self.status != ResetStatus::Submitting {
            return Err(SessionError::invalid_transition(
                format!("{:?}", self.status),
                "Submitted",
            ));
        }

        self.status = ResetStatus::Submitted;
        Ok(())
    }

    /// Returns to an empty, idle form ("Try different email").
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
