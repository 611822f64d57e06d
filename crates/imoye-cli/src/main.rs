//! Imoye CLI
//!
//! Drives the session-creation wizard, onboarding and password reset from the
//! command line.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use imoye_review::{json::JsonRenderer, MarkdownRenderer, ReviewSummary};
use imoye_session::{
    Config, Difficulty, Gateway, LearningStyle, OnboardingWizard, PasswordResetForm,
    FOCUS_AREAS, INTEREST_OPTIONS, ROLES, SelectedFile, SessionError, SessionWizard, Step,
};
use tracing_subscriber::EnvFilter;

/// Imoye - AI learning sessions from your own material
///
/// Creates learning sessions on the Imoye backend from a document, a website
/// or pasted text.
#[derive(Parser, Debug)]
#[command(name = "imoye")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: imoye.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Backend base URL, overriding the config file
    #[arg(long, value_name = "URL", global = true)]
    backend_url: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a learning session
    Create(CreateArgs),
    /// Set up interests, role and learning style
    Onboard(OnboardArgs),
    /// Request a password reset link
    ResetPassword {
        /// Account email address
        #[arg(long)]
        email: String,
    },
}

#[derive(ClapArgs, Debug)]
struct CreateArgs {
    /// Session title (also the corpus name)
    #[arg(long)]
    title: String,

    /// Paste text content
    #[arg(long, group = "content", value_name = "TEXT")]
    text: Option<String>,

    /// Use a website as content
    #[arg(long, group = "content", value_name = "URL")]
    url: Option<String>,

    /// Upload a document (PDF, DOC, DOCX, TXT, XLS, XLSX, PPT, PPTX; max 10 MiB)
    #[arg(long, group = "content", value_name = "PATH")]
    file: Option<PathBuf>,

    /// What the session is about
    #[arg(long)]
    description: Option<String>,

    /// What you want to achieve
    #[arg(long)]
    goal: Option<String>,

    /// Tag to attach (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Your role
    #[arg(long)]
    role: Option<String>,

    /// Focus area (repeatable)
    #[arg(long = "focus", value_name = "AREA")]
    focus_areas: Vec<String>,

    /// Difficulty level
    #[arg(long, default_value_t = Difficulty::Intermediate)]
    difficulty: Difficulty,

    /// Print the review summary without creating the session
    #[arg(long)]
    dry_run: bool,

    /// Print the review summary as JSON instead of Markdown
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct OnboardArgs {
    /// Interest id, e.g. frontend or ai (repeatable)
    #[arg(long = "interest", value_name = "ID")]
    interests: Vec<String>,

    /// An interest not in the list
    #[arg(long, value_name = "TEXT")]
    custom_interest: Option<String>,

    /// Your role
    #[arg(long, group = "who")]
    role: Option<String>,

    /// A role not in the list
    #[arg(long, group = "who", value_name = "TEXT")]
    custom_role: Option<String>,

    /// Learning style: visual, interactive, structured or exploratory
    #[arg(long)]
    style: LearningStyle,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(config = ?args.config, backend_url = ?args.backend_url, "Arguments parsed");

    let result = match args.command {
        Command::Create(ref create) => {
            run_create(args.config.as_deref(), args.backend_url.as_deref(), create).await
        }
        Command::Onboard(ref onboard) => run_onboard(onboard),
        Command::ResetPassword { ref email } => {
            run_reset_password(email, &mut std::io::stdout().lock())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

// ============================================================================
// create
// ============================================================================

/// Walks the creation wizard with the given flags and submits it.
async fn run_create(
    config_path: Option<&str>,
    backend_url: Option<&str>,
    args: &CreateArgs,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(url) = backend_url {
        config.backend_url = url.to_string();
    }
    config.validate().map_err(with_suggestion)?;

    print_config(&config);

    let gateway = Gateway::new(&config).map_err(with_suggestion)?;
    let mut wizard = SessionWizard::new(gateway);

    // Step 1: content
    fill_content(&mut wizard, args)?;
    advance(&mut wizard)?;

    // Step 2: details
    {
        let draft = wizard.draft_mut();
        draft.title.clone_from(&args.title);
        if let Some(description) = &args.description {
            draft.description.clone_from(description);
        }
        if let Some(goal) = &args.goal {
            draft.goal.clone_from(goal);
        }
        for tag in &args.tags {
            draft.add_tag(tag.trim());
        }
    }
    advance(&mut wizard)?;

    // Step 3: personalization
    {
        let draft = wizard.draft_mut();
        if let Some(role) = &args.role {
            if !ROLES.contains(&role.as_str()) {
                tracing::debug!(role = %role, "Role is not one of the listed roles");
            }
            draft.role.clone_from(role);
        }
        for area in &args.focus_areas {
            if !FOCUS_AREAS.contains(&area.as_str()) {
                tracing::warn!(focus = %area, known = ?FOCUS_AREAS, "Unlisted focus area");
            }
            if !draft.focus_areas().any(|selected| selected == area.as_str()) {
                draft.toggle_focus_area(area.as_str());
            }
        }
        draft.difficulty = args.difficulty;
    }
    advance(&mut wizard)?;

    // Step 4: review
    let summary = ReviewSummary::from_draft(wizard.draft());
    println!();
    if args.json {
        println!("{}", JsonRenderer::new(&summary).render_pretty()?);
    } else {
        print!("{}", MarkdownRenderer::new(&summary).render());
    }

    if args.dry_run {
        println!();
        println!("Dry run: session not created");
        return Ok(());
    }

    wizard.check_submit().map_err(with_suggestion)?;

    let mut loading = wizard.gateway().subscribe();
    let progress = tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            let state = *loading.borrow_and_update();
            if state.is_busy() {
                println!("{}", state.label());
            }
        }
    });

    println!();
    let result = wizard.submit().await;
    drop(wizard);
    let _ = progress.await;

    let route = result.map_err(with_suggestion)?;
    println!("Session created: {route}");
    Ok(())
}

/// Fills the content step from whichever of --text, --url, --file was given.
fn fill_content(wizard: &mut SessionWizard, args: &CreateArgs) -> anyhow::Result<()> {
    let draft = wizard.draft_mut();

    if let Some(text) = &args.text {
        draft.set_text(text.as_str());
    } else if let Some(url) = &args.url {
        draft.set_url(url.as_str());
    } else if let Some(path) = &args.file {
        let file = load_file(path)?;
        tracing::info!(file = %file.name, mime_type = %file.mime_type, size = file.size_bytes(), "File selected");
        draft.select_file(Some(file));
    }

    if let Some(kind) = draft.content_kind() {
        tracing::debug!(content = %kind, "Content chosen");
    }
    Ok(())
}

fn load_file(path: &Path) -> anyhow::Result<SelectedFile> {
    SelectedFile::load(path).map_err(|e| {
        anyhow::anyhow!(
            "Cannot read '{}': {e}\n\nSuggestion: Check the path passed to --file",
            path.display()
        )
    })
}

/// Moves the wizard forward one step, reporting the gate that blocks it.
fn advance(wizard: &mut SessionWizard) -> anyhow::Result<()> {
    let target: Step = wizard.check_advance().map_err(with_suggestion)?;
    wizard.next();
    tracing::debug!(step = %target, progress = wizard.progress_percent(), "Step reached");
    Ok(())
}

// ============================================================================
// onboard
// ============================================================================

fn run_onboard(args: &OnboardArgs) -> anyhow::Result<()> {
    let mut wizard = OnboardingWizard::new();

    // Welcome
    wizard.next();

    for interest in &args.interests {
        let Some(option) = INTEREST_OPTIONS.iter().find(|o| o.id == interest.as_str()) else {
            let ids: Vec<_> = INTEREST_OPTIONS.iter().map(|o| o.id).collect();
            anyhow::bail!(
                "Unknown interest '{interest}'\n\nSuggestion: Use one of {} or pass --custom-interest",
                ids.join(", ")
            );
        };
        tracing::debug!(id = option.id, label = option.label, "Interest selected");
        wizard.toggle_interest(option.id);
    }
    if let Some(custom) = &args.custom_interest {
        wizard.custom_interest.clone_from(custom);
        wizard.add_custom_interest();
    }
    onboarding_next(&mut wizard)?;

    if let Some(role) = &args.role {
        wizard.select_role(role.as_str());
    } else if let Some(custom) = &args.custom_role {
        wizard.custom_role.clone_from(custom);
        wizard.add_custom_role();
    }
    onboarding_next(&mut wizard)?;

    wizard.select_learning_style(args.style);
    let (profile, route) = wizard.complete().map_err(with_suggestion)?;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    println!("Onboarding complete: {route}");
    Ok(())
}

fn onboarding_next(wizard: &mut OnboardingWizard) -> anyhow::Result<()> {
    if wizard.next() {
        Ok(())
    } else {
        Err(with_suggestion(SessionError::step_incomplete(wizard.step())))
    }
}

// ============================================================================
// reset-password
// ============================================================================

fn run_reset_password(email: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let mut form = PasswordResetForm::with_email(email.trim());

    form.submit().map_err(with_suggestion)?;
    writeln!(out, "Sending...")?;
    form.finish().map_err(with_suggestion)?;

    writeln!(out, "Check your email")?;
    writeln!(out, "We've sent a password reset link to {}", form.email)?;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Formats a session error with its suggestion, unless it already has one.
fn with_suggestion(err: SessionError) -> anyhow::Error {
    let message = err.to_string();
    if message.contains("Suggestion:") {
        anyhow::anyhow!(message)
    } else {
        anyhow::anyhow!("{message}\n\nSuggestion: {}", err.suggestion())
    }
}

fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  Backend: {}", config.base_url());
    println!("  Request timeout: {}s", config.request_timeout_secs);
}
