//! Maps session errors to HTTP responses.
//!
//! Missing, malformed, and rejected credentials all produce the same 401
//! status, code, and message. A known caller acting on someone else's
//! resource gets 403.

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use chirp_auth::SessionError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// The uniform authentication rejection.
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Authentication required")
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingCredential
            | SessionError::MalformedCredential
            | SessionError::AuthenticationFailure => Self::unauthorized(),
            SessionError::AuthorizationFailure => Self::new(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Not permitted to perform this action",
            ),
            SessionError::InvalidRequest(message) => {
                Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            SessionError::Conflict(message) => Self::new(StatusCode::CONFLICT, "CONFLICT", message),
            SessionError::PersistenceFailure => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Service temporarily unavailable",
            ),
            SessionError::HashingFailure | SessionError::SigningFailure => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: self.code.to_string(),
            message: self.message,
        };

        let mut response = (self.status, Json(body)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ApiErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_credential_failures_are_indistinguishable() {
        let mut rendered = Vec::new();
        for err in [
            SessionError::MissingCredential,
            SessionError::MalformedCredential,
            SessionError::AuthenticationFailure,
        ] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
            let body = body_of(response).await;
            rendered.push((body.error, body.message));
        }
        assert!(rendered.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn test_authorization_failure_is_403() {
        let response = ApiError::from(SessionError::AuthorizationFailure).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await.error, "FORBIDDEN");
    }

    #[test]
    fn test_persistence_failure_is_retryable_status() {
        let err = ApiError::from(SessionError::PersistenceFailure);
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_policy_message_is_kept() {
        let err = ApiError::from(SessionError::InvalidRequest("Password too short".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Password too short");
    }
}
