//! `ApiKeyCaller` extractor: admits machine callers holding the shared key.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AuthState;

/// Marker for a request authenticated with the machine API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiKeyCaller;

impl<S> FromRequestParts<S> for ApiKeyCaller
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        auth.sessions.verify_api_key(&parts.headers)?;
        Ok(ApiKeyCaller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::test_support::{API_KEY, parts, state};

    #[tokio::test]
    async fn test_accepts_configured_key() {
        let state = state();
        let mut parts = parts(Some(&format!("ApiKey {API_KEY}")));
        assert_eq!(
            ApiKeyCaller::from_request_parts(&mut parts, &state).await.unwrap(),
            ApiKeyCaller
        );
    }

    #[tokio::test]
    async fn test_rejects_wrong_key_and_bearer_scheme() {
        let state = state();
        for header in ["ApiKey nope".to_string(), format!("Bearer {API_KEY}")] {
            let mut parts = parts(Some(&header));
            let err = ApiKeyCaller::from_request_parts(&mut parts, &state)
                .await
                .unwrap_err();
            assert_eq!(err, ApiError::unauthorized());
        }
    }
}
