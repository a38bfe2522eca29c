//! Access token encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod secret;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::{AccessToken, JwtEncoder};
pub use secret::SigningSecret;

use chirp_core::UserId;

use crate::error::AuthError;

/// Issuer label used when none is configured.
pub const DEFAULT_ISSUER: &str = "app";

/// Issues an access token for `subject` with the default issuer.
///
/// `ttl` is used as given, so a negative value yields a token that is
/// already expired.
pub fn issue(
    subject: UserId,
    secret: &SigningSecret,
    ttl: chrono::Duration,
) -> Result<AccessToken, AuthError> {
    JwtEncoder::new(secret, DEFAULT_ISSUER, ttl).issue(subject, ttl)
}

/// Validates an access token issued with the default issuer.
pub fn validate(token: &str, secret: &SigningSecret) -> Result<UserId, AuthError> {
    JwtDecoder::new(secret, DEFAULT_ISSUER).validate(token)
}
