//! HRIS CLI - sign in to the portal and inspect what each role sees.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password is read from stdin)
//! echo "$PASSWORD" | hris login -e admin@acme.test --remember
//!
//! # Who am I, and what does my sidebar look like?
//! hris whoami
//! hris menu
//!
//! # Open the notification panel (marks everything read)
//! hris notifications --open
//!
//! # Keep the sidebar badges current until Ctrl-C
//! hris watch
//! ```
//!
//! # Environment Variables
//!
//! - `HRIS_API_URL`, `HRIS_STATE_FILE`, ... - see [`hris_portal::PortalConfig`]
//! - `SENTRY_DSN` - Enables error reporting when set
//! - `SENTRY_ENVIRONMENT` - Environment tag for Sentry events
//! - `HRIS_LOG_JSON` - Emit JSON log lines instead of text

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use hris_portal::{ApiClient, FileStore, PortalConfig, SessionStore};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "hris")]
#[command(author, version, about = "HRIS portal from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password (password read from stdin)
    Login {
        #[arg(short, long)]
        email: String,

        /// Pre-fill this email next time
        #[arg(short, long)]
        remember: bool,
    },
    /// Sign in with a Google ID token (read from stdin)
    GoogleLogin,
    /// Create a company account (password read twice from stdin)
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        company: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Show the sidebar for the signed-in role
    Menu {
        /// Current path, used to highlight the active item
        #[arg(short, long)]
        path: Option<String>,
    },
    /// List notifications
    Notifications {
        /// Open the panel, marking every notification read
        #[arg(long)]
        open: bool,
    },
    /// Resolve a header search query to a route
    Search { query: String },
    /// Search the audit log
    Logs {
        #[arg(default_value = "")]
        query: String,
    },
    /// Poll sidebar badges until interrupted
    Watch,
    /// Request a password reset link
    ForgotPassword {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Set a new password from a reset link token (password read twice from stdin)
    ResetPassword { token: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hris_portal=info,hris=info".into());

    let json = std::env::var("HRIS_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Sentry before the subscriber so its layer has a client
    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = PortalConfig::from_env()?;
    let session = SessionStore::new(Arc::new(FileStore::new(config.state_file.clone())));
    let api = ApiClient::new(&config, session)?;

    match cli.command {
        Commands::Login { email, remember } => {
            commands::auth::login(&api, email, remember).await?;
        }
        Commands::GoogleLogin => commands::auth::google_login(&api, &config).await?,
        Commands::Register {
            first_name,
            last_name,
            email,
            company,
        } => {
            commands::auth::register(&api, first_name, last_name, email, company).await?;
        }
        Commands::Logout => commands::auth::logout(&api)?,
        Commands::ForgotPassword { email } => {
            commands::auth::forgot_password(&api, email).await?;
        }
        Commands::ResetPassword { token } => {
            commands::auth::reset_password(&api, &token).await?;
        }
        Commands::Whoami => commands::dashboard::whoami(&api, &config).await?,
        Commands::Menu { path } => commands::dashboard::menu(&api, path.as_deref()).await?,
        Commands::Notifications { open } => {
            commands::dashboard::notifications(&api, &config, open).await?;
        }
        Commands::Search { query } => commands::dashboard::search(&api, &config, &query)?,
        Commands::Logs { query } => commands::dashboard::logs(&api, &query).await?,
        Commands::Watch => commands::dashboard::watch(&api, &config).await?,
    }
    Ok(())
}
