//! Refresh token record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use chirp_core::UserId;

/// A persisted refresh token.
///
/// The opaque token itself is never stored; records are keyed by the hex
/// SHA-256 digest of the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Hex SHA-256 digest of the opaque token.
    pub token_hash: String,
    /// The user this token is bound to.
    pub user_id: UserId,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// When the token was revoked, if it was.
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Whether a refresh token may still be honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    /// Not revoked and not expired.
    Active,
    /// Explicitly revoked or superseded by rotation.
    Revoked,
    /// Past its expiry.
    Expired,
}

impl RefreshToken {
    /// Build a fresh, non-revoked record.
    pub fn new(
        token_hash: impl Into<String>,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token_hash: token_hash.into(),
            user_id,
            created_at: issued_at,
            updated_at: issued_at,
            expires_at,
            revoked_at: None,
        }
    }

    /// Check if the token has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Status at `now`. Revocation wins over expiry.
    pub fn status_at(&self, now: DateTime<Utc>) -> RefreshTokenStatus {
        if self.is_revoked() {
            RefreshTokenStatus::Revoked
        } else if self.is_expired_at(now) {
            RefreshTokenStatus::Expired
        } else {
            RefreshTokenStatus::Active
        }
    }

    /// Mark revoked. Returns `false` if it already was.
    pub fn revoke(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_revoked() {
            return false;
        }
        self.revoked_at = Some(at);
        self.updated_at = at;
        true
    }
}
