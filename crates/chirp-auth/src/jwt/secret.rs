//! Process-wide signing secret.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};

use chirp_core::config::AuthConfig;

use crate::error::AuthError;

/// HMAC secret shared by the encoder and decoder.
///
/// Immutable after construction and cheap to clone.
#[derive(Clone)]
pub struct SigningSecret(Arc<[u8]>);

impl SigningSecret {
    /// Wraps raw secret bytes. An empty secret is unusable.
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(AuthError::Signing("Signing secret is empty".to_string()));
        }
        Ok(Self(Arc::from(bytes)))
    }

    /// Reads the secret from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(config.jwt_secret.as_bytes())
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.0)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.0)
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
    }
}
