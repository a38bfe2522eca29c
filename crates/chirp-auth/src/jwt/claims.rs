//! Access token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirp_core::UserId;

use crate::error::{AuthError, TokenRejection};

/// Claims payload embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer label.
    pub iss: String,
    /// Subject: the stringified user ID.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID; two tokens issued in the same second still differ.
    pub jti: Uuid,
}

impl Claims {
    /// Builds claims for `subject` valid from `issued_at` until `expires_at`.
    pub fn new(
        issuer: &str,
        subject: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Parses the subject into a user ID.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(TokenRejection::MalformedSubject))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issue time as a `DateTime<Utc>`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Whether the token is expired at `now`. Expiry is inclusive.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_subject_round_trips_through_string() {
        let id = UserId::new();
        let now = Utc::now();
        let claims = Claims::new("app", id, now, now + Duration::hours(1));
        assert_eq!(claims.user_id().unwrap(), id);
        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::hours(1)));
    }

    #[test]
    fn test_non_uuid_subject() {
        let now = Utc::now();
        let mut claims = Claims::new("app", UserId::new(), now, now);
        claims.sub = "42".into();
        assert!(matches!(
            claims.user_id(),
            Err(AuthError::InvalidToken(TokenRejection::MalformedSubject))
        ));
    }
}
