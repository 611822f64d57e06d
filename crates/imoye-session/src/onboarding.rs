//! The first-run onboarding wizard.
//!
//! Collects interests, a role and a learning style over four steps. Nothing is
//! sent anywhere; completing the flow yields an [`OnboardingProfile`] and the
//! home route.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SessionError};
use crate::route::Route;

/// An interest option: identifier and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestOption {
    /// Identifier stored in the profile.
    pub id: &'static str,
    /// Label shown to the user.
    pub label: &'static str,
}

/// Interest options offered on the interests step.
pub const INTEREST_OPTIONS: [InterestOption; 9] = [
    InterestOption { id: "frontend", label: "Frontend Development" },
    InterestOption { id: "backend", label: "Backend Development" },
    InterestOption { id: "datascience", label: "Data Science" },
    InterestOption { id: "cybersecurity", label: "Cybersecurity" },
    InterestOption { id: "ai", label: "AI/Machine Learning" },
    InterestOption { id: "business", label: "Business Strategy" },
    InterestOption { id: "design", label: "Design" },
    InterestOption { id: "finance", label: "Finance" },
    InterestOption { id: "marketing", label: "Marketing" },
];

/// Roles offered on the role step.
pub const ONBOARDING_ROLES: [&str; 8] = [
    "Student",
    "Software Developer",
    "Data Scientist",
    "Business Analyst",
    "Manager/Executive",
    "Researcher",
    "Consultant",
    "Career Changer",
];

// ============================================================================
// LearningStyle
// ============================================================================

/// How the user prefers to learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    /// Mind maps, diagrams and visual content.
    Visual,
    /// Chat, Q&A and hands-on activities.
    Interactive,
    /// Step-by-step courses and guided paths.
    Structured,
    /// Browse and discover at your own pace.
    Exploratory,
}

impl LearningStyle {
    /// All styles in display order.
    pub const ALL: [Self; 4] = [
        Self::Visual,
        Self::Interactive,
        Self::Structured,
        Self::Exploratory,
    ];

    /// Display title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Visual => "Visual",
            Self::Interactive => "Interactive",
            Self::Structured => "Structured",
            Self::Exploratory => "Exploratory",
        }
    }

    /// One-line description shown under the title.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Visual => "Mind maps, diagrams, and visual content",
            Self::Interactive => "Chat, Q&A, and hands-on activities",
            Self::Structured => "Step-by-step courses and guided paths",
            Self::Exploratory => "Browse and discover at your own pace",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visual => write!(f, "visual"),
            Self::Interactive => write!(f, "interactive"),
            Self::Structured => write!(f, "structured"),
            Self::Exploratory => write!(f, "exploratory"),
        }
    }
}

impl FromStr for LearningStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown learning style '{s}' (expected visual, interactive, structured or exploratory)")
            })
    }
}

// ============================================================================
// OnboardingStep
// ============================================================================

/// A step of the onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Introduction, always passable.
    Welcome,
    /// Pick at least one interest.
    Interests,
    /// Pick or enter a role.
    Role,
    /// Pick a learning style.
    LearningStyle,
}

impl OnboardingStep {
    /// 1-based position of this step.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Welcome => 1,
            Self::Interests => 2,
            Self::Role => 3,
            Self::LearningStyle => 4,
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Welcome => Some(Self::Interests),
            Self::Interests => Some(Self::Role),
            Self::Role => Some(Self::LearningStyle),
            Self::LearningStyle => None,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::Welcome => None,
            Self::Interests => Some(Self::Welcome),
            Self::Role => Some(Self::Interests),
            Self::LearningStyle => Some(Self::Role),
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => write!(f, "welcome"),
            Self::Interests => write!(f, "interests"),
            Self::Role => write!(f, "role"),
            Self::LearningStyle => write!(f, "learning_style"),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// The result of a completed onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    /// Interest ids and custom interests, in the order they were added.
    pub interests: Vec<String>,
    /// Chosen role.
    pub role: String,
    /// Chosen learning style.
    pub learning_style: LearningStyle,
    /// When the flow was completed.
    pub completed_at: DateTime<Utc>,
}

// ============================================================================
// OnboardingWizard
// ============================================================================

/// State of one onboarding flow.
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    step: OnboardingStep,
    interests: IndexSet<String>,
    /// Text typed into the custom-interest input.
    pub custom_interest: String,
    role: String,
    /// Text typed into the custom-role input.
    pub custom_role: String,
    learning_style: Option<LearningStyle>,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingWizard {
    /// Starts a flow at the welcome step with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: OnboardingStep::Welcome,
            interests: IndexSet::new(),
            custom_interest: String::new(),
            role: String::new(),
            custom_role: String::new(),
            learning_style: None,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> OnboardingStep {
        self.step
    }

    /// Selected interests in insertion order.
    pub fn interests(&self) -> impl Iterator<Item = &str> {
        self.interests.iter().map(String::as_str)
    }

    /// Selected role (empty when none).
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Selected learning style.
    #[must_use]
    pub const fn learning_style(&self) -> Option<LearningStyle> {
        self.learning_style
    }

    /// Progress bar fill, in percent.
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        match self.step {
            OnboardingStep::Welcome => 25,
            OnboardingStep::Interests => 50,
            OnboardingStep::Role => 75,
            OnboardingStep::LearningStyle => 100,
        }
    }

    /// Selects an interest, or deselects it if already selected.
    ///
    /// Returns `true` if the interest is now selected.
    pub fn toggle_interest(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.interests.shift_remove(&id) {
            false
        } else {
            self.interests.insert(id);
            true
        }
    }

    /// Adds the custom-interest input as an interest and clears the input.
    ///
    /// Blank input and interests already present are ignored and leave the
    /// input as it was. Returns `true` if an interest was added.
    pub fn add_custom_interest(&mut self) -> bool {
        let interest = self.custom_interest.trim();
        if interest.is_empty() || self.interests.contains(interest) {
            return false;
        }

        self.interests.insert(interest.to_string());
        self.custom_interest.clear();
        true
    }

    /// Selects a role.
    pub fn select_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }

    /// Uses the custom-role input as the role and clears the input.
    ///
    /// Returns `false` if the input is blank.
    pub fn add_custom_role(&mut self) -> bool {
        let role = self.custom_role.trim();
        if role.is_empty() {
            return false;
        }

        self.role = role.to_string();
        self.custom_role.clear();
        true
    }

    /// Selects a learning style.
    pub fn select_learning_style(&mut self, style: LearningStyle) {
        self.learning_style = Some(style);
    }

    /// Returns `true` if the current step's requirement is met.
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        match self.step {
            OnboardingStep::Welcome => true,
            OnboardingStep::Interests => !self.interests.is_empty(),
            OnboardingStep::Role => !self.role.is_empty(),
            OnboardingStep::LearningStyle => self.learning_style.is_some(),
        }
    }

    /// Moves to the next step. Returns `false` at the last step or when the
    /// current step is incomplete.
    pub fn next(&mut self) -> bool {
        if !self.can_proceed() {
            debug!(step = %self.step, "Onboarding step incomplete");
            return false;
        }

        match self.step.next() {
            Some(target) => {
                debug!(from = %self.step, to = %target, "Onboarding advanced");
                self.step = target;
                true
            }
            None => false,
        }
    }

    /// Moves to the previous step. Returns `false` at the first step.
    pub fn previous(&mut self) -> bool {
        match self.step.previous() {
            Some(target) => {
                self.step = target;
                true
            }
            None => false,
        }
    }

    /// Finishes the flow.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StepIncomplete` unless the wizard is on the
    /// learning-style step with a style chosen.
    pub fn complete(&self) -> Result<(OnboardingProfile, Route)> {
        let learning_style = match (self.step, self.learning_style) {
            (OnboardingStep::LearningStyle, Some(style)) => style,
            _ => return Err(SessionError::step_incomplete(self.step)),
        };

        let profile = OnboardingProfile {
            interests: self.interests.iter().cloned().collect(),
            role: self.role.clone(),
            learning_style,
            completed_at: Utc::now(),
        };

        info!(
            interests = profile.interests.len(),
            role = %profile.role,
            learning_style = %profile.learning_style,
            "Onboarding completed"
        );
        Ok((profile, Route::Home))
    }
}
