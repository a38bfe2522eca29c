//! `AuthUser` extractor: validates the bearer access token and yields the caller.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use chirp_auth::{SessionError, ensure_owner};
use chirp_core::UserId;

use crate::error::ApiError;
use crate::state::AuthState;

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl AuthUser {
    /// Returns the caller's user ID.
    pub fn user_id(&self) -> UserId {
        self.0
    }

    /// Requires the caller to own a resource owned by `owner`.
    pub fn require_owner(&self, owner: UserId) -> Result<(), ApiError> {
        ensure_owner(self.0, owner).map_err(SessionError::from)?;
        Ok(())
    }
}

impl std::ops::Deref for AuthUser {
    type Target = UserId;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        let user_id = auth.sessions.authenticate_headers(&parts.headers)?;
        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::test_support::{parts, state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_valid_access_token() {
        let state = state();
        let user = state.sessions.register("a@b.com", "password1").await.unwrap();
        let login = state.sessions.login("a@b.com", "password1", None).await.unwrap();

        let mut parts = parts(Some(&format!("Bearer {}", login.tokens.access_token)));
        let caller = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(caller.user_id(), user.id);
        assert!(caller.require_owner(user.id).is_ok());
        assert_eq!(
            caller.require_owner(UserId::new()).unwrap_err().status,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_missing_and_bad_tokens_are_401() {
        let state = state();
        for header in [None, Some("Token abc"), Some("Bearer not-a-jwt")] {
            let mut parts = parts(header);
            let err = AuthUser::from_request_parts(&mut parts, &state)
                .await
                .unwrap_err();
            assert_eq!(err, ApiError::unauthorized());
        }
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let state = state();
        state.sessions.register("a@b.com", "password1").await.unwrap();
        let login = state.sessions.login("a@b.com", "password1", None).await.unwrap();

        let mut parts = parts(Some(&format!("Bearer {}", login.tokens.refresh_token)));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
