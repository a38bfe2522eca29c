//! Authentication error taxonomy.
//!
//! [`AuthError`] is what the components return: it says exactly why a
//! credential was refused. [`SessionError`] is what untrusted callers see.
//! The only conversion between the two is `From<AuthError> for SessionError`
//! below; it logs the detailed reason and then collapses every
//! "identity not established" case into [`SessionError::AuthenticationFailure`].

use thiserror::Error;
use tracing::{debug, error, warn};

use chirp_core::error::{AppError, ErrorKind};

/// Why an access token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// `exp` is not in the future.
    Expired,
    /// Signature does not verify against the signing secret.
    BadSignature,
    /// `iss` is not the configured issuer.
    WrongIssuer,
    /// Not a decodable token, or required claims are missing.
    Malformed,
    /// `sub` is not a user identifier.
    MalformedSubject,
}

impl std::fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::BadSignature => write!(f, "bad signature"),
            Self::WrongIssuer => write!(f, "wrong issuer"),
            Self::Malformed => write!(f, "malformed"),
            Self::MalformedSubject => write!(f, "malformed subject"),
        }
    }
}

/// Detailed internal authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential in the header.
    #[error("credential is missing")]
    MissingCredential,

    /// Header present but not of the expected shape.
    #[error("credential is malformed")]
    MalformedCredential,

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Access token failed validation.
    #[error("access token rejected: {0}")]
    InvalidToken(TokenRejection),

    /// Refresh token has no record.
    #[error("refresh token is unknown")]
    UnknownToken,

    /// Refresh token was revoked or superseded.
    #[error("refresh token has been revoked")]
    RevokedToken,

    /// Refresh token is past its expiry.
    #[error("refresh token has expired")]
    ExpiredToken,

    /// Token subject has no user record.
    #[error("token subject does not exist")]
    UnknownSubject,

    /// Machine key did not match, or none is configured.
    #[error("api key rejected")]
    InvalidApiKey,

    /// Caller is authenticated but not entitled to the action.
    #[error("not permitted: {0}")]
    Forbidden(String),

    /// New credentials do not satisfy policy.
    #[error("{0}")]
    PolicyViolation(String),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// The hashing primitive failed or a stored digest is corrupt.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The signing secret is unusable or encoding failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The record store failed.
    #[error("persistence failure: {0}")]
    Persistence(AppError),
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Conflict => Self::Conflict(err.message),
            _ => Self::Persistence(err),
        }
    }
}

/// Caller-facing errors.
///
/// Authentication sub-reasons are deliberately indistinguishable here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No credential supplied.
    #[error("missing credential")]
    MissingCredential,

    /// Credential header has the wrong shape.
    #[error("malformed credential")]
    MalformedCredential,

    /// Identity could not be established.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Identity established, action not permitted.
    #[error("not authorized")]
    AuthorizationFailure,

    /// Request content was rejected by policy.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Password hashing failed.
    #[error("password hashing failed")]
    HashingFailure,

    /// Token signing failed.
    #[error("token signing failed")]
    SigningFailure,

    /// The record store failed; the caller may retry.
    #[error("persistence failure")]
    PersistenceFailure,
}

impl From<AuthError> for SessionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => {
                debug!("credential missing");
                Self::MissingCredential
            }
            AuthError::MalformedCredential => {
                debug!("credential malformed");
                Self::MalformedCredential
            }
            AuthError::InvalidCredentials
            | AuthError::InvalidToken(_)
            | AuthError::UnknownToken
            | AuthError::RevokedToken
            | AuthError::ExpiredToken
            | AuthError::UnknownSubject
            | AuthError::InvalidApiKey => {
                warn!(reason = %err, "authentication rejected");
                Self::AuthenticationFailure
            }
            AuthError::Forbidden(action) => {
                warn!(action = %action, "authorization rejected");
                Self::AuthorizationFailure
            }
            AuthError::PolicyViolation(message) => Self::InvalidRequest(message),
            AuthError::Conflict(message) => Self::Conflict(message),
            AuthError::Hashing(message) => {
                error!(error = %message, "password hashing failed");
                Self::HashingFailure
            }
            AuthError::Signing(message) => {
                error!(error = %message, "token signing failed");
                Self::SigningFailure
            }
            AuthError::Persistence(source) => {
                error!(error = %source, "record store failure");
                Self::PersistenceFailure
            }
        }
    }
}
