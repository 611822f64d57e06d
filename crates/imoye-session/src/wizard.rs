//! The four-step session-creation wizard.
//!
//! The wizard moves linearly through its steps:
//! - `AddContent` -> `Details` -> `Personalization` -> `Review`
//!
//! Forward movement is gated at `AddContent` (a content type must be chosen)
//! and at `Details` (the title must be valid). `Personalization` is never
//! gated. `Review` has no next step; it ends in [`SessionWizard::submit`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::draft::{ContentKind, SessionDraft};
use crate::error::{Result, SessionError};
use crate::gateway::Gateway;
use crate::route::Route;
use crate::validate::{title_valid, validate_for_submit};

// ============================================================================
// Step
// ============================================================================

/// A step of the creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Choose and provide content.
    AddContent,
    /// Title, description, tags and goal.
    Details,
    /// Role, focus areas and difficulty.
    Personalization,
    /// Summary and submit.
    Review,
}

impl Step {
    /// All steps in order.
    pub const ALL: [Self; 4] = [
        Self::AddContent,
        Self::Details,
        Self::Personalization,
        Self::Review,
    ];

    /// 1-based position of this step.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::AddContent => 1,
            Self::Details => 2,
            Self::Personalization => 3,
            Self::Review => 4,
        }
    }

    /// Heading shown in the progress bar.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::AddContent => "Add Content",
            Self::Details => "Session Details",
            Self::Personalization => "Personalization",
            Self::Review => "Review & Start",
        }
    }

    /// The following step, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::AddContent => Some(Self::Details),
            Self::Details => Some(Self::Personalization),
            Self::Personalization => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The preceding step, if any.
    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        match self {
            Self::AddContent => None,
            Self::Details => Some(Self::AddContent),
            Self::Personalization => Some(Self::Details),
            Self::Review => Some(Self::Personalization),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// How a step is drawn relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    /// Already passed.
    Done,
    /// The current step.
    Current,
    /// Not reached yet.
    Upcoming,
}

// ============================================================================
// SessionWizard
// ============================================================================

/// A corpus that exists on the backend but whose upload has not succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CreatedCorpus {
    corpus_name: String,
    display_name: Option<String>,
    title: String,
}

/// State of one creation flow: the current step, the draft and the gateway.
///
/// Everything here is dropped when the flow ends; nothing is persisted.
#[derive(Debug)]
pub struct SessionWizard {
    step: Step,
    draft: SessionDraft,
    gateway: Gateway,
    pending_upload: Option<CreatedCorpus>,
}

impl SessionWizard {
    /// Starts a flow at `AddContent` with an empty draft.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self::with_draft(gateway, SessionDraft::new())
    }

    /// Starts a flow at `AddContent` with a prefilled draft.
    #[must_use]
    pub const fn with_draft(gateway: Gateway, draft: SessionDraft) -> Self {
        Self {
            step: Step::AddContent,
            draft,
            gateway,
            pending_upload: None,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// The draft being edited.
    #[must_use]
    pub const fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    /// Mutable access to the draft, for the inputs of every step.
    pub fn draft_mut(&mut self) -> &mut SessionDraft {
        &mut self.draft
    }

    /// The gateway, for its loading state and error slot.
    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Target of the header's back button.
    #[must_use]
    pub const fn exit_route(&self) -> Route {
        Route::Dashboard
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Checks whether `next` may run, returning the step it would move to.
    pub fn check_advance(&self) -> Result<Step> {
        let Some(target) = self.step.next() else {
            return Err(SessionError::invalid_transition(self.step, "a step after it"));
        };

        match self.step {
            Step::AddContent if self.draft.content_kind().is_none() => {
                Err(SessionError::ContentTypeRequired)
            }
            Step::Details if !title_valid(&self.draft) => Err(SessionError::TitleRequired),
            _ => Ok(target),
        }
    }

    /// Returns `true` if the next button is enabled.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    /// Returns `true` if the previous button is enabled.
    #[must_use]
    pub const fn can_go_back(&self) -> bool {
        self.step.previous().is_some()
    }

    /// Moves to the next step. Returns `false`, leaving the step unchanged,
    /// when the move is not allowed.
    pub fn next(&mut self) -> bool {
        match self.check_advance() {
            Ok(target) => {
                debug!(from = %self.step, to = %target, "Wizard advanced");
                self.step = target;
                true
            }
            Err(e) => {
                debug!(step = %self.step, reason = %e, "Wizard cannot advance");
                false
            }
        }
    }

    /// Moves to the previous step. Returns `false` at the first step.
    pub fn previous(&mut self) -> bool {
        match self.step.previous() {
            Some(target) => {
                debug!(from = %self.step, to = %target, "Wizard went back");
                self.step = target;
                true
            }
            None => false,
        }
    }

    /// Progress bar fill, in percent.
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        match self.step {
            Step::AddContent => 25,
            Step::Details => 50,
            Step::Personalization => 75,
            Step::Review => 100,
        }
    }

    /// Every step with its mark relative to the current one.
    #[must_use]
    pub fn step_marks(&self) -> [(Step, StepMark); 4] {
        Step::ALL.map(|step| {
            let mark = match step.cmp(&self.step) {
                std::cmp::Ordering::Less => StepMark::Done,
                std::cmp::Ordering::Equal => StepMark::Current,
                std::cmp::Ordering::Greater => StepMark::Upcoming,
            };
            (step, mark)
        })
    }

    // ------------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------------

    /// Checks whether the submit button is enabled.
    pub fn check_submit(&self) -> Result<()> {
        if self.step != Step::Review {
            return Err(SessionError::submit_disabled(format!(
                "submit is only available on the review step (current: {})",
                self.step
            )));
        }

        let loading = self.gateway.loading();
        if loading.is_busy() {
            return Err(SessionError::submit_disabled(format!(
                "a request is already in flight ({loading})"
            )));
        }

        validate_for_submit(&self.draft)
    }

    /// Returns `true` if the submit button is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.check_submit().is_ok()
    }

    /// Creates the session on the backend and returns where to navigate.
    ///
    /// Creates the corpus, uploads the file when the content is a file, and
    /// yields the session route for the backend's display name. If an earlier
    /// submit created the corpus but failed to upload, and the title has not
    /// changed since, only the upload is retried. The same holds when the
    /// returned future is dropped part way through: the gateway goes back to
    /// idle and a corpus that was already created is still remembered.
    ///
    /// # Errors
    ///
    /// Returns the disabled reason without any request when
    /// [`SessionWizard::check_submit`] fails. Gateway failures are returned as
    /// well as being left in the gateway's error slot.
    pub async fn submit(&mut self) -> Result<Route> {
        self.check_submit()?;

        let is_file = self.draft.content_kind() == Some(ContentKind::File);
        let reusable = self
            .pending_upload
            .clone()
            .filter(|created| is_file && created.title == self.draft.title);

        let created = if let Some(created) = reusable {
            info!(corpus_name = %created.corpus_name, "Retrying upload for existing corpus");
            created
        } else {
            self.pending_upload = None;
            let created = self.create().await?;
            if is_file {
                self.pending_upload = Some(created.clone());
            }
            created
        };

        if is_file {
            if let Err(e) = self
                .gateway
                .upload_document(&created.corpus_name, &self.draft)
                .await
            {
                warn!(corpus_name = %created.corpus_name, error = %e, "Corpus created but upload failed");
                return Err(SessionError::UploadAfterCreate {
                    corpus_name: created.corpus_name,
                    message: e.to_string(),
                });
            }
            self.pending_upload = None;
        }

        let route = Route::session(created.display_name.unwrap_or(created.corpus_name));
        info!(route = %route, "Session created");
        Ok(route)
    }

    async fn create(&self) -> Result<CreatedCorpus> {
        let outcome = self.gateway.create_corpus(&self.draft).await?;

        let success = outcome.is_success();

        let err = match outcome.corpus_name {
            Some(corpus_name) if success => {
                return Ok(CreatedCorpus {
                    corpus_name,
                    display_name: outcome.display_name.filter(|name| !name.is_empty()),
                    title: self.draft.title.clone(),
                });
            }
            None if success => SessionError::CorpusNameMissing,
            _ => SessionError::corpus_rejected(outcome.status),
        };

        warn!(error = %err, "Backend did not create a corpus");
        self.gateway.record_error(&err);
        Err(err)
    }
}

// ============================================================================
// Tests
// ============================================================================
