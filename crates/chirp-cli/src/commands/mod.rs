//! CLI command definitions and dispatch.

pub mod migrate;
pub mod session;
pub mod token;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use chirp_auth::{SessionError, SessionManager};
use chirp_core::config::AppConfig;
use chirp_core::error::{AppError, ErrorKind};
use chirp_database::{PgRefreshTokenRepository, PgUserRepository};

use crate::output::OutputFormat;

/// Chirp: account and session administration
#[derive(Debug, Parser)]
#[command(name = "chirp", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and per-environment overrides
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Environment name; selects `{config_dir}/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User account management
    User(user::UserArgs),
    /// Login, refresh, and revoke
    Session(session::SessionArgs),
    /// Access token inspection
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config_dir, &self.env)?;
        crate::logging::init(&config.logging);

        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Session(args) => session::execute(args, &config, self.format).await,
            Commands::Token(args) => token::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: build a session manager backed by PostgreSQL
pub async fn session_manager(config: &AppConfig) -> Result<SessionManager, AppError> {
    let pool = chirp_database::connection::create_pool(&config.database).await?;
    SessionManager::new(
        &config.auth,
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgRefreshTokenRepository::new(pool)),
    )
}

/// Helper: turn a session error into a CLI error
pub fn session_error(err: SessionError) -> AppError {
    let kind = match &err {
        SessionError::InvalidRequest(_) => ErrorKind::Validation,
        SessionError::Conflict(_) => ErrorKind::Conflict,
        SessionError::PersistenceFailure => ErrorKind::Database,
        _ => ErrorKind::Internal,
    };
    AppError::new(kind, err.to_string())
}

/// Helper: read a password from the terminal, or one line from stdin
pub fn read_password(from_stdin: bool, confirm: bool) -> Result<String, AppError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
