//! Session lifecycle manager: login, refresh, revoke, and authorization flows.
//!
//! Every public method returns [`SessionError`]; the private `*_inner`
//! methods work in [`AuthError`] and the conversion happens once, at the
//! return of each public method.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use http::HeaderMap;
use serde::Serialize;
use tracing::{info, warn};

use chirp_core::UserId;
use chirp_core::config::AuthConfig;
use chirp_core::error::AppError;
use chirp_database::{RefreshTokenRepository, UserRepository};
use chirp_entity::{CreateUser, UpdateCredentials, User};

use crate::credentials::{extract_api_key, extract_bearer, parse_bearer, verify_api_key};
use crate::error::{AuthError, SessionError};
use crate::jwt::{Claims, JwtDecoder, JwtEncoder, SigningSecret};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::refresh::{IssuedRefreshToken, RefreshTokenStore};

/// Access and refresh tokens issued together at login.
#[derive(Clone, Serialize)]
pub struct TokenPair {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
    /// Refresh token expiry.
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Issued tokens.
    pub tokens: TokenPair,
}

/// Result of a successful refresh.
///
/// The refresh fields are set only when rotation replaced the presented token.
#[derive(Clone, Serialize)]
pub struct RefreshResult {
    /// New access token.
    pub access_token: String,
    /// New access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Replacement refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Replacement refresh token expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for RefreshResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshResult")
            .field("access_expires_at", &self.access_expires_at)
            .field("rotated", &self.refresh_token.is_some())
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

/// Manages the session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Access token encoder.
    jwt_encoder: Arc<JwtEncoder>,
    /// Access token decoder.
    jwt_decoder: Arc<JwtDecoder>,
    /// Refresh token lifecycle.
    refresh_store: Arc<RefreshTokenStore>,
    /// User records.
    user_repo: Arc<dyn UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Credential policy for register and update.
    password_validator: PasswordValidator,
    /// Digest checked when the login email is unknown.
    dummy_hash: Arc<str>,
    /// Replace refresh tokens on every use.
    rotate_refresh_tokens: bool,
    /// Shared key for machine callers.
    api_key: Option<Arc<str>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("jwt_encoder", &self.jwt_encoder)
            .field("refresh_store", &self.refresh_store)
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .field("api_key_configured", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Builds a manager from configuration and record stores.
    ///
    /// Fails with a configuration error if the signing secret is empty, the
    /// Argon2 parameters are invalid, or a lifetime is out of range.
    pub fn new(
        config: &AuthConfig,
        user_repo: Arc<dyn UserRepository>,
        token_repo: Arc<dyn RefreshTokenRepository>,
    ) -> Result<Self, AppError> {
        let secret = SigningSecret::from_config(config)
            .map_err(|e| AppError::configuration(e.to_string()))?;

        let access_ttl_cap = Duration::from_std(config.access_ttl_cap())
            .map_err(|e| AppError::configuration(format!("access_ttl_cap_seconds: {e}")))?;
        if access_ttl_cap <= Duration::zero() {
            return Err(AppError::configuration(
                "access_ttl_cap_seconds must be positive",
            ));
        }
        let refresh_ttl = config
            .refresh_ttl()
            .ok_or_else(|| AppError::configuration("refresh_ttl_days is out of range"))?;
        let refresh_ttl = Duration::from_std(refresh_ttl)
            .map_err(|e| AppError::configuration(format!("refresh_ttl_days: {e}")))?;

        let password_hasher = PasswordHasher::new(&config.argon2)
            .map_err(|e| AppError::configuration(e.to_string()))?;
        let dummy_hash = password_hasher
            .hash_password("chirp-dummy-password")
            .map_err(|e| AppError::internal(e.to_string()))?;

        Ok(Self {
            jwt_encoder: Arc::new(JwtEncoder::new(&secret, &config.jwt_issuer, access_ttl_cap)),
            jwt_decoder: Arc::new(JwtDecoder::new(&secret, &config.jwt_issuer)),
            refresh_store: Arc::new(RefreshTokenStore::new(token_repo, refresh_ttl)),
            user_repo,
            password_hasher: Arc::new(password_hasher),
            password_validator: PasswordValidator::new(config),
            dummy_hash: Arc::from(dummy_hash),
            rotate_refresh_tokens: config.rotate_refresh_tokens,
            api_key: config.api_key.as_deref().map(Arc::from),
        })
    }

    /// Verifies credentials and issues an access token and a refresh token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// `requested_ttl` is honored only when positive and below the cap.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl: Option<Duration>,
    ) -> Result<LoginResult, SessionError> {
        Ok(self.login_inner(email, password, requested_ttl).await?)
    }

    /// Issues a new access token for a valid refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, SessionError> {
        Ok(self.refresh_inner(refresh_token).await?)
    }

    /// Revokes a refresh token.
    ///
    /// Succeeds for unknown and already-revoked tokens; only a store failure
    /// is an error.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), SessionError> {
        self.refresh_store.revoke(refresh_token).await?;
        Ok(())
    }

    /// Revokes every refresh token of a user. Returns how many were live.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64, SessionError> {
        Ok(self.refresh_store.revoke_all(user_id).await?)
    }

    /// Resolves a raw `Authorization` value to the caller's user ID.
    pub fn authenticate(&self, raw_header: Option<&str>) -> Result<UserId, SessionError> {
        let token = parse_bearer(raw_header)?;
        Ok(self.jwt_decoder.validate(&token)?)
    }

    /// Resolves request headers to the caller's user ID.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<UserId, SessionError> {
        let token = extract_bearer(headers)?;
        Ok(self.jwt_decoder.validate(&token)?)
    }

    /// Authenticates the caller and requires them to be `owner`.
    pub fn authorize_owner(
        &self,
        headers: &HeaderMap,
        owner: UserId,
    ) -> Result<UserId, SessionError> {
        let caller = self.authenticate_headers(headers)?;
        Ok(ensure_owner(caller, owner)?)
    }

    /// Checks a machine caller's `ApiKey` credential.
    pub fn verify_api_key(&self, headers: &HeaderMap) -> Result<(), SessionError> {
        Ok(self.verify_api_key_inner(headers)?)
    }

    /// Decodes a valid access token into its claims.
    pub fn inspect(&self, access_token: &str) -> Result<Claims, SessionError> {
        Ok(self.jwt_decoder.decode(access_token)?)
    }

    /// Creates a user after checking credential policy.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, SessionError> {
        Ok(self.register_inner(email, password).await?)
    }

    /// Replaces a user's email and password.
    ///
    /// Existing refresh tokens stay valid; call [`Self::revoke_all`] to end
    /// other sessions.
    pub async fn update_credentials(
        &self,
        user_id: UserId,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        Ok(self.update_credentials_inner(user_id, email, password).await?)
    }

    /// Replaces the caller's own email and password, authenticating the
    /// bearer access token in `headers` first.
    pub async fn update_own_credentials(
        &self,
        headers: &HeaderMap,
        email: &str,
        password: &str,
    ) -> Result<User, SessionError> {
        let caller = self.authenticate_headers(headers)?;
        self.update_credentials(caller, email, password).await
    }

    async fn login_inner(
        &self,
        email: &str,
        password: &str,
        requested_ttl: Option<Duration>,
    ) -> Result<LoginResult, AuthError> {
        // Step 1: Find user
        let user = self.user_repo.find_by_email(email.trim()).await?;

        // Step 2: Verify password; unknown users still pay for one verification
        let Some(user) = user else {
            self.password_hasher
                .verify_password(password, &self.dummy_hash)?;
            warn!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        // Step 3: Issue tokens
        let access = self.jwt_encoder.issue_capped(user.id, requested_ttl)?;
        let refresh: IssuedRefreshToken = self.refresh_store.issue(user.id).await?;

        info!(
            user_id = %user.id,
            access_expires_at = %access.expires_at,
            "Login successful"
        );

        Ok(LoginResult {
            tokens: TokenPair {
                access_token: access.token,
                access_expires_at: access.expires_at,
                refresh_token: refresh.token,
                refresh_expires_at: refresh.expires_at,
            },
            user,
        })
    }

    async fn refresh_inner(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        // Step 1: Validate the refresh token
        let user_id = self.refresh_store.validate(refresh_token).await?;

        // Step 2: The bound user must still exist
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            warn!(user_id = %user_id, "Refresh token bound to missing user");
            return Err(AuthError::UnknownSubject);
        }

        // Step 3: Sign the access token before touching the presented token
        let access = self.jwt_encoder.issue_capped(user_id, None)?;

        // Step 4: Optionally rotate
        let replacement = if self.rotate_refresh_tokens {
            let (_, issued) = self.refresh_store.rotate(refresh_token).await?;
            Some(issued)
        } else {
            None
        };

        info!(
            user_id = %user_id,
            rotated = replacement.is_some(),
            "Access token refreshed"
        );

        Ok(RefreshResult {
            access_token: access.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: replacement.as_ref().map(|r| r.expires_at),
            refresh_token: replacement.map(|r| r.token),
        })
    }

    fn verify_api_key_inner(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = extract_api_key(headers)?;
        let Some(expected) = self.api_key.as_deref() else {
            warn!("API key presented but none is configured");
            return Err(AuthError::InvalidApiKey);
        };
        if !verify_api_key(&presented, expected) {
            return Err(AuthError::InvalidApiKey);
        }
        Ok(())
    }

    async fn register_inner(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        self.password_validator.validate_email(email)?;
        self.password_validator.validate(password)?;

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn update_credentials_inner(
        &self,
        user_id: UserId,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        self.password_validator.validate_email(email)?;
        self.password_validator.validate(password)?;

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .user_repo
            .update_credentials(
                user_id,
                &UpdateCredentials {
                    email: email.to_string(),
                    password_hash,
                },
            )
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        info!(user_id = %user.id, "User credentials updated");
        Ok(user)
    }
}

/// Requires the authenticated caller to be the resource owner.
pub fn ensure_owner(caller: UserId, owner: UserId) -> Result<UserId, AuthError> {
    if caller != owner {
        return Err(AuthError::Forbidden(format!(
            "user {caller} does not own this resource"
        )));
    }
    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes() {
        let id = UserId::new();
        assert_eq!(ensure_owner(id, id).unwrap(), id);
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let err = ensure_owner(UserId::new(), UserId::new()).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
        assert_eq!(SessionError::from(err), SessionError::AuthorizationFailure);
    }
}
