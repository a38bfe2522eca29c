//! User account commands.

use clap::{Args, Subcommand};

use chirp_auth::{PasswordHasher, SessionError};
use chirp_core::UserId;
use chirp_core::config::AppConfig;
use chirp_core::error::AppError;

use crate::output::{self, OutputFormat};

use super::{read_password, session_error};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user
    Create {
        /// Login email
        #[arg(long)]
        email: String,
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Replace a user's email and password
    UpdateCredentials {
        /// User ID
        #[arg(long)]
        id: UserId,
        /// New login email
        #[arg(long)]
        email: String,
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Print the Argon2id digest of a password without storing anything
    HashPassword {
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        UserCommand::Create {
            email,
            password_stdin,
        } => {
            let password = read_password(*password_stdin, true)?;
            let sessions = super::session_manager(config).await?;
            let user = sessions
                .register(email, &password)
                .await
                .map_err(session_error)?;
            output::print_user(&user, format);
        }
        UserCommand::UpdateCredentials {
            id,
            email,
            password_stdin,
        } => {
            let password = read_password(*password_stdin, true)?;
            let sessions = super::session_manager(config).await?;
            let user = sessions
                .update_credentials(*id, email, &password)
                .await
                .map_err(|e| match e {
                    SessionError::AuthenticationFailure => {
                        AppError::not_found(format!("User '{}' not found", id))
                    }
                    other => session_error(other),
                })?;
            output::print_user(&user, format);
        }
        UserCommand::HashPassword { password_stdin } => {
            let password = read_password(*password_stdin, false)?;
            let hasher = PasswordHasher::new(&config.auth.argon2)
                .map_err(|e| AppError::configuration(e.to_string()))?;
            let hash = hasher
                .hash_password(&password)
                .map_err(|e| AppError::internal(e.to_string()))?;
            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({ "hash": hash })),
                OutputFormat::Text => println!("{}", hash),
            }
        }
    }

    Ok(())
}
