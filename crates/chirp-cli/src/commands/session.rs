//! Session commands: login, refresh, revoke.

use clap::{Args, Subcommand};

use chirp_core::UserId;
use chirp_core::config::AppConfig;
use chirp_core::error::AppError;

use crate::output::{self, OutputFormat};

use super::{read_password, session_error};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Log in and print an access token and a refresh token
    Login {
        /// Login email
        #[arg(long)]
        email: String,
        /// Requested access token lifetime in seconds (capped)
        #[arg(long)]
        expires_in: Option<i64>,
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Exchange a refresh token for a new access token
    Refresh {
        /// Refresh token
        token: String,
    },
    /// Revoke a refresh token
    Revoke {
        /// Refresh token
        token: String,
    },
    /// Revoke every refresh token of a user
    RevokeAll {
        /// User ID
        user_id: UserId,
    },
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        SessionCommand::Login {
            email,
            expires_in,
            password_stdin,
        } => {
            let password = read_password(*password_stdin, false)?;
            let sessions = super::session_manager(config).await?;
            let requested = expires_in.and_then(chrono::Duration::try_seconds);
            let login = sessions
                .login(email, &password, requested)
                .await
                .map_err(session_error)?;

            match format {
                OutputFormat::Json => output::print_json(&login),
                OutputFormat::Text => {
                    output::print_kv("User ID", &login.user.id.to_string());
                    output::print_kv("Access token", &login.tokens.access_token);
                    output::print_kv(
                        "Access expires",
                        &login.tokens.access_expires_at.to_rfc3339(),
                    );
                    output::print_kv("Refresh token", &login.tokens.refresh_token);
                    output::print_kv(
                        "Refresh expires",
                        &login.tokens.refresh_expires_at.to_rfc3339(),
                    );
                }
            }
        }
        SessionCommand::Refresh { token } => {
            let sessions = super::session_manager(config).await?;
            let refreshed = sessions.refresh(token).await.map_err(session_error)?;

            match format {
                OutputFormat::Json => output::print_json(&refreshed),
                OutputFormat::Text => {
                    output::print_kv("Access token", &refreshed.access_token);
                    output::print_kv(
                        "Access expires",
                        &refreshed.access_expires_at.to_rfc3339(),
                    );
                    if let (Some(token), Some(expires)) =
                        (&refreshed.refresh_token, refreshed.refresh_expires_at)
                    {
                        output::print_kv("Refresh token", token);
                        output::print_kv("Refresh expires", &expires.to_rfc3339());
                    }
                }
            }
        }
        SessionCommand::Revoke { token } => {
            let sessions = super::session_manager(config).await?;
            sessions.revoke(token).await.map_err(session_error)?;
            output::print_success("Refresh token revoked.");
        }
        SessionCommand::RevokeAll { user_id } => {
            let sessions = super::session_manager(config).await?;
            let count = sessions.revoke_all(*user_id).await.map_err(session_error)?;
            output::print_success(&format!(
                "Revoked {} refresh token(s) for user {}.",
                count, user_id
            ));
        }
    }

    Ok(())
}
