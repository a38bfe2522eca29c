//! PostgreSQL refresh token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chirp_core::UserId;
use chirp_core::error::{AppError, ErrorKind};
use chirp_core::result::AppResult;
use chirp_entity::RefreshToken;

use super::RefreshTokenRepository;

/// Refresh token repository backed by the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSERT_SQL: &str = "INSERT INTO refresh_tokens \
     (token_hash, user_id, created_at, updated_at, expires_at, revoked_at) \
     VALUES ($1, $2, $3, $4, $5, $6)";

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> AppResult<()> {
        sqlx::query(INSERT_SQL)
            .bind(&token.token_hash)
            .bind(token.user_id)
            .bind(token.created_at)
            .bind(token.updated_at)
            .bind(token.expires_at)
            .bind(token.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to store refresh token"))?;
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT token_hash, user_id, created_at, updated_at, expires_at, revoked_at \
             FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find refresh token"))
    }

    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2, updated_at = $2 \
             WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke refresh token"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn revoke_all_for_user(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2, updated_at = $2 \
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke refresh tokens for user"))?;
        Ok(result.rows_affected())
    }

    async fn rotate(
        &self,
        old_hash: &str,
        replacement: &RefreshToken,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin rotation transaction"))?;

        // Conditional update: a concurrent rotation that already revoked the
        // row leaves zero rows affected here.
        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2, updated_at = $2 \
             WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > $2",
        )
        .bind(old_hash)
        .bind(at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to revoke rotated refresh token"))?;

        if revoked.rows_affected() != 1 {
            tx.rollback()
                .await
                .map_err(db_error("Failed to roll back rotation"))?;
            return Ok(false);
        }

        sqlx::query(INSERT_SQL)
            .bind(&replacement.token_hash)
            .bind(replacement.user_id)
            .bind(replacement.created_at)
            .bind(replacement.updated_at)
            .bind(replacement.expires_at)
            .bind(replacement.revoked_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to store replacement refresh token"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit rotation"))?;
        Ok(true)
    }
}
