//! Access token validation.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use chirp_core::UserId;

use crate::error::{AuthError, TokenRejection};

use super::claims::Claims;
use super::secret::SigningSecret;

/// Validates access tokens. Stateless: no store lookup.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder that accepts only tokens from `issuer`.
    pub fn new(secret: &SigningSecret, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: secret.decoding_key(),
            validation,
        }
    }

    /// Decodes and validates a token, returning its subject.
    pub fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        self.decode(token)?.user_id()
    }

    /// Decodes and validates a token, returning all claims.
    ///
    /// Checks, in order: signature, issuer, expiry (`exp <= now` is expired).
    /// The subject is not parsed here; see [`Claims::user_id`].
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(rejection_for(e.kind())))?;

        let claims = token_data.claims;
        if claims.is_expired_at(Utc::now()) {
            return Err(AuthError::InvalidToken(TokenRejection::Expired));
        }
        Ok(claims)
    }
}

fn rejection_for(kind: &JwtErrorKind) -> TokenRejection {
    match kind {
        JwtErrorKind::ExpiredSignature => TokenRejection::Expired,
        JwtErrorKind::InvalidSignature => TokenRejection::BadSignature,
        JwtErrorKind::InvalidIssuer => TokenRejection::WrongIssuer,
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{JwtEncoder, issue, validate};
    use chrono::Duration;

    fn secret(value: &str) -> SigningSecret {
        SigningSecret::new(value).unwrap()
    }

    fn rejection(result: Result<UserId, AuthError>) -> TokenRejection {
        match result {
            Err(AuthError::InvalidToken(reason)) => reason,
            other => panic!("expected token rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let key = secret("round-trip-secret");
        let id = UserId::new();
        let token = issue(id, &key, Duration::hours(1)).unwrap();
        assert_eq!(validate(&token.token, &key).unwrap(), id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let id = UserId::new();
        let token = issue(id, &secret("secret-one"), Duration::hours(1)).unwrap();
        assert_eq!(
            rejection(validate(&token.token, &secret("secret-two"))),
            TokenRejection::BadSignature
        );
    }

    #[test]
    fn test_already_expired_token_is_rejected() {
        let key = secret("expiry-secret");
        let token = issue(UserId::new(), &key, Duration::hours(-1)).unwrap();
        assert_eq!(rejection(validate(&token.token, &key)), TokenRejection::Expired);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let key = secret("boundary-secret");
        let token = issue(UserId::new(), &key, Duration::zero()).unwrap();
        assert_eq!(rejection(validate(&token.token, &key)), TokenRejection::Expired);
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let key = secret("issuer-secret");
        let token = JwtEncoder::new(&key, "someone-else", Duration::hours(1))
            .issue(UserId::new(), Duration::hours(1))
            .unwrap();
        assert_eq!(
            rejection(JwtDecoder::new(&key, "app").validate(&token.token)),
            TokenRejection::WrongIssuer
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let key = secret("garbage-secret");
        assert_eq!(rejection(validate("not.a.jwt", &key)), TokenRejection::Malformed);
        assert_eq!(rejection(validate("", &key)), TokenRejection::Malformed);
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let key = secret("subject-secret");
        let now = Utc::now();
        let mut claims = Claims::new("app", UserId::new(), now, now + Duration::hours(1));
        claims.sub = "not-a-user-id".into();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"subject-secret"),
        )
        .unwrap();

        assert_eq!(
            rejection(validate(&token, &key)),
            TokenRejection::MalformedSubject
        );
    }
}
