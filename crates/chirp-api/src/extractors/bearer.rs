//! `BearerCredential` extractor: the raw bearer value, unvalidated.
//!
//! Used by the refresh and revoke endpoints, which receive the opaque
//! refresh token in the `Authorization` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use chirp_auth::{SessionError, extract_bearer};

use crate::error::ApiError;

/// A bearer credential taken from the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential(pub String);

impl BearerCredential {
    /// The credential value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BearerCredential").field(&"<redacted>").finish()
    }
}

impl<S> FromRequestParts<S> for BearerCredential
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers).map_err(SessionError::from)?;
        Ok(BearerCredential(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::test_support::parts;

    #[tokio::test]
    async fn test_extracts_trimmed_value() {
        let mut parts = parts(Some("Bearer   abc123  "));
        let credential = BearerCredential::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(credential.as_str(), "abc123");
        assert!(!format!("{credential:?}").contains("abc123"));
    }

    #[tokio::test]
    async fn test_rejects_missing_header() {
        let mut parts = parts(None);
        let err = BearerCredential::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::unauthorized());
    }
}
