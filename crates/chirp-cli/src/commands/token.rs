//! Access token inspection.

use clap::{Args, Subcommand};

use chirp_auth::jwt::{JwtDecoder, SigningSecret};
use chirp_core::config::AppConfig;
use chirp_core::error::AppError;

use crate::output::{self, OutputFormat};

use super::session_error;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Validate an access token and print its claims
    Inspect {
        /// Access token
        token: String,
    },
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Inspect { token } => {
            // Validation is stateless; no database connection is needed.
            let secret = SigningSecret::from_config(&config.auth)
                .map_err(|e| AppError::configuration(e.to_string()))?;
            let decoder = JwtDecoder::new(&secret, &config.auth.jwt_issuer);
            let claims = decoder
                .decode(token)
                .map_err(|e| session_error(e.into()))?;

            match format {
                OutputFormat::Json => output::print_json(&claims),
                OutputFormat::Text => {
                    output::print_kv("Issuer", &claims.iss);
                    output::print_kv("Subject", &claims.sub);
                    output::print_kv("Token ID", &claims.jti.to_string());
                    if let Some(issued) = claims.issued_at() {
                        output::print_kv("Issued", &issued.to_rfc3339());
                    }
                    if let Some(expires) = claims.expires_at() {
                        output::print_kv("Expires", &expires.to_rfc3339());
                    }
                }
            }
        }
    }

    Ok(())
}
