//! Record-store traits consumed by the auth core.
//!
//! Every method surfaces store I/O failures as an [`AppError`] of kind
//! `Database`; "not found" is `Ok(None)` / `Ok(false)`, never an error.

pub mod refresh_token;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chirp_core::UserId;
use chirp_core::result::AppResult;
use chirp_entity::{CreateUser, RefreshToken, UpdateCredentials, User};

/// User record store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Create a user. A duplicate email fails with `ErrorKind::Conflict`.
    async fn create(&self, user: &CreateUser) -> AppResult<User>;

    /// Replace a user's email and password hash. `None` if the user is gone.
    async fn update_credentials(
        &self,
        id: UserId,
        update: &UpdateCredentials,
    ) -> AppResult<Option<User>>;
}

/// Refresh token record store, keyed by token digest.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new record.
    async fn create(&self, token: &RefreshToken) -> AppResult<()>;

    /// Look up a record by token digest.
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>>;

    /// Mark a record revoked.
    ///
    /// Returns `true` only when this call moved the record from not-revoked
    /// to revoked; unknown or already-revoked records yield `false`.
    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> AppResult<bool>;

    /// Revoke every non-revoked record bound to `user_id`. Returns the count.
    async fn revoke_all_for_user(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<u64>;

    /// Atomically revoke `old_hash` and insert `replacement`.
    ///
    /// The old record is revoked only if it is still active at `at`; when it
    /// is not, nothing is written and `false` is returned. Two concurrent
    /// rotations of the same record can never both return `true`.
    async fn rotate(
        &self,
        old_hash: &str,
        replacement: &RefreshToken,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;
}
