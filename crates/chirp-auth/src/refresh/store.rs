//! Refresh token lifecycle on top of a [`RefreshTokenRepository`].
//!
//! Validation order: unknown, then revoked, then expired. Rotation is
//! delegated to the repository's conditional swap, so of two concurrent
//! rotations of the same token exactly one wins and the other observes
//! the token as revoked.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use chirp_core::UserId;
use chirp_database::RefreshTokenRepository;
use chirp_entity::{RefreshToken, RefreshTokenStatus};

use crate::error::AuthError;

use super::token::{fingerprint, generate_refresh_token, hash_refresh_token};

/// A refresh token handed to the caller. The plaintext exists only here.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    /// Opaque token value.
    pub token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedRefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedRefreshToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Issues, validates, revokes, and rotates refresh tokens.
#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
}

impl std::fmt::Debug for RefreshTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenStore")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl RefreshTokenStore {
    /// Creates a store issuing tokens valid for `ttl`.
    pub fn new(repo: Arc<dyn RefreshTokenRepository>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    /// Issues and persists a token for `user_id`.
    ///
    /// The token is returned only after the record is written.
    pub async fn issue(&self, user_id: UserId) -> Result<IssuedRefreshToken, AuthError> {
        let now = Utc::now();
        let (token, record) = self.new_record(user_id, now);

        self.repo.create(&record).await?;

        debug!(
            user_id = %user_id,
            token_hash_prefix = %fingerprint(&record.token_hash),
            expires_at = %record.expires_at,
            "Refresh token issued"
        );

        Ok(IssuedRefreshToken {
            token,
            expires_at: record.expires_at,
        })
    }

    /// Resolves a token to its bound user if it is known, not revoked, and
    /// not expired.
    pub async fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        let token_hash = hash_refresh_token(token);
        let record = self.lookup(&token_hash).await?;

        match record.status_at(Utc::now()) {
            RefreshTokenStatus::Active => Ok(record.user_id),
            RefreshTokenStatus::Revoked => {
                warn!(
                    user_id = %record.user_id,
                    token_hash_prefix = %fingerprint(&token_hash),
                    "Revoked refresh token presented"
                );
                Err(AuthError::RevokedToken)
            }
            RefreshTokenStatus::Expired => {
                info!(
                    user_id = %record.user_id,
                    token_hash_prefix = %fingerprint(&token_hash),
                    expires_at = %record.expires_at,
                    "Expired refresh token presented"
                );
                Err(AuthError::ExpiredToken)
            }
        }
    }

    /// Revokes a token.
    ///
    /// Idempotent: unknown and already-revoked tokens are not errors. The
    /// returned flag says whether this call did the revoking.
    pub async fn revoke(&self, token: &str) -> Result<bool, AuthError> {
        let token_hash = hash_refresh_token(token);
        let revoked = self.repo.revoke(&token_hash, Utc::now()).await?;

        debug!(
            token_hash_prefix = %fingerprint(&token_hash),
            revoked,
            "Refresh token revoke requested"
        );
        Ok(revoked)
    }

    /// Revokes every live token bound to `user_id`.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64, AuthError> {
        let count = self.repo.revoke_all_for_user(user_id, Utc::now()).await?;
        info!(user_id = %user_id, count, "Revoked all refresh tokens for user");
        Ok(count)
    }

    /// Validates `token`, then atomically revokes it and issues a replacement.
    ///
    /// A concurrent rotation that got there first makes this one fail with
    /// [`AuthError::RevokedToken`].
    pub async fn rotate(&self, token: &str) -> Result<(UserId, IssuedRefreshToken), AuthError> {
        let user_id = self.validate(token).await?;

        let old_hash = hash_refresh_token(token);
        let now = Utc::now();
        let (replacement_token, replacement) = self.new_record(user_id, now);

        if !self.repo.rotate(&old_hash, &replacement, now).await? {
            warn!(
                user_id = %user_id,
                token_hash_prefix = %fingerprint(&old_hash),
                "Refresh token was superseded concurrently"
            );
            return Err(AuthError::RevokedToken);
        }

        debug!(
            user_id = %user_id,
            token_hash_prefix = %fingerprint(&old_hash),
            replacement_hash_prefix = %fingerprint(&replacement.token_hash),
            "Refresh token rotated"
        );

        Ok((
            user_id,
            IssuedRefreshToken {
                token: replacement_token,
                expires_at: replacement.expires_at,
            },
        ))
    }

    async fn lookup(&self, token_hash: &str) -> Result<RefreshToken, AuthError> {
        match self.repo.find_by_hash(token_hash).await? {
            Some(record) => Ok(record),
            None => {
                warn!(
                    token_hash_prefix = %fingerprint(token_hash),
                    "Unknown refresh token presented"
                );
                Err(AuthError::UnknownToken)
            }
        }
    }

    fn new_record(&self, user_id: UserId, now: DateTime<Utc>) -> (String, RefreshToken) {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let token = generate_refresh_token();
        let record = RefreshToken::new(hash_refresh_token(&token), user_id, now, expires_at);
        (token, record)
    }
}
