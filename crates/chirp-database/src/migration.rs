//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use chirp_core::error::{AppError, ErrorKind};

/// Run all pending migrations for the `users` and `refresh_tokens` tables.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations complete");
    Ok(())
}
