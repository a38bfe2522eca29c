//! Access token creation with a capped TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use chirp_core::UserId;

use crate::error::AuthError;

use super::claims::Claims;
use super::secret::SigningSecret;

/// A freshly signed access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Compact serialized token.
    pub token: String,
    /// Expiration instant (second precision).
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Creates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC key for signing.
    encoding_key: EncodingKey,
    /// Issuer label written into every token.
    issuer: String,
    /// Upper bound on requested lifetimes.
    ttl_cap: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl_cap", &self.ttl_cap)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder for the given secret, issuer, and lifetime cap.
    pub fn new(secret: &SigningSecret, issuer: impl Into<String>, ttl_cap: Duration) -> Self {
        Self {
            encoding_key: secret.encoding_key(),
            issuer: issuer.into(),
            ttl_cap,
        }
    }

    /// The configured lifetime cap.
    pub fn ttl_cap(&self) -> Duration {
        self.ttl_cap
    }

    /// Resolves a requested lifetime: honored when positive and below the
    /// cap, otherwise the cap.
    pub fn clamp_ttl(&self, requested: Option<Duration>) -> Duration {
        match requested {
            Some(ttl) if ttl > Duration::zero() && ttl < self.ttl_cap => ttl,
            _ => self.ttl_cap,
        }
    }

    /// Issues a token with a lifetime resolved by [`Self::clamp_ttl`].
    pub fn issue_capped(
        &self,
        subject: UserId,
        requested: Option<Duration>,
    ) -> Result<AccessToken, AuthError> {
        self.issue(subject, self.clamp_ttl(requested))
    }

    /// Issues a token valid for exactly `ttl` from now.
    pub fn issue(&self, subject: UserId, ttl: Duration) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("Token lifetime out of range".to_string()))?;

        let claims = Claims::new(&self.issuer, subject, now, expires_at);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(format!("Failed to encode access token: {e}")))?;

        Ok(AccessToken {
            token,
            expires_at: claims.expires_at().unwrap_or(expires_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> JwtEncoder {
        let secret = SigningSecret::new("encoder-test-secret").unwrap();
        JwtEncoder::new(&secret, "app", Duration::hours(1))
    }

    #[test]
    fn test_clamp_ttl() {
        let enc = encoder();
        assert_eq!(enc.clamp_ttl(None), Duration::hours(1));
        assert_eq!(enc.clamp_ttl(Some(Duration::seconds(30))), Duration::seconds(30));
        assert_eq!(enc.clamp_ttl(Some(Duration::zero())), Duration::hours(1));
        assert_eq!(enc.clamp_ttl(Some(Duration::seconds(-5))), Duration::hours(1));
        assert_eq!(enc.clamp_ttl(Some(Duration::hours(1))), Duration::hours(1));
        assert_eq!(enc.clamp_ttl(Some(Duration::days(2))), Duration::hours(1));
    }

    #[test]
    fn test_issue_sets_expiry() {
        let enc = encoder();
        let before = Utc::now();
        let token = enc.issue_capped(UserId::new(), Some(Duration::minutes(5))).unwrap();
        let lifetime = token.expires_at - before;
        assert!(lifetime <= Duration::minutes(5));
        assert!(lifetime > Duration::minutes(4));
        assert_eq!(token.token.split('.').count(), 3);
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let enc = encoder();
        let id = UserId::new();
        let a = enc.issue(id, Duration::minutes(1)).unwrap();
        let b = enc.issue(id, Duration::minutes(1)).unwrap();
        assert_ne!(a.token, b.token);
    }
}
