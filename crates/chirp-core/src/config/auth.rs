//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access-token signing (HMAC-SHA256). Required.
    pub jwt_secret: String,
    /// Issuer label embedded in and required of every access token.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Upper bound on access-token lifetime in seconds.
    #[serde(default = "default_access_ttl_cap")]
    pub access_ttl_cap_seconds: u64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Whether a refresh token is replaced every time it is used.
    #[serde(default)]
    pub rotate_refresh_tokens: bool,
    /// Minimum password length for new credentials.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Argon2id cost parameters for new password hashes.
    #[serde(default)]
    pub argon2: Argon2Config,
    /// Shared key for machine-to-machine callers (`Authorization: ApiKey ...`).
    #[serde(default)]
    pub api_key: Option<String>,
}

impl AuthConfig {
    /// Creates a config with the given signing secret and defaults elsewhere.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            jwt_issuer: default_issuer(),
            access_ttl_cap_seconds: default_access_ttl_cap(),
            refresh_ttl_days: default_refresh_ttl(),
            rotate_refresh_tokens: false,
            password_min_length: default_password_min(),
            argon2: Argon2Config::default(),
            api_key: None,
        }
    }

    /// Access-token lifetime cap.
    pub fn access_ttl_cap(&self) -> Duration {
        Duration::from_secs(self.access_ttl_cap_seconds)
    }

    /// Refresh-token lifetime, or `None` if `refresh_ttl_days` overflows.
    pub fn refresh_ttl(&self) -> Option<Duration> {
        self.refresh_ttl_days
            .checked_mul(24 * 60 * 60)
            .map(Duration::from_secs)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_ttl_cap_seconds", &self.access_ttl_cap_seconds)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .field("password_min_length", &self.password_min_length)
            .field("argon2", &self.argon2)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_issuer() -> String {
    "app".to_string()
}

fn default_access_ttl_cap() -> u64 {
    60 * 60
}

fn default_refresh_ttl() -> u64 {
    60
}

fn default_password_min() -> usize {
    8
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_document() {
        let config: AuthConfig = serde_json::from_str(r#"{"jwt_secret": "s3cret"}"#).unwrap();
        assert_eq!(config.jwt_issuer, "app");
        assert_eq!(config.access_ttl_cap(), Duration::from_secs(3600));
        assert_eq!(config.refresh_ttl(), Some(Duration::from_secs(60 * 86_400)));
        assert!(!config.rotate_refresh_tokens);
        assert_eq!(config.argon2, Argon2Config::default());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_oversized_refresh_ttl_does_not_overflow() {
        let mut config = AuthConfig::with_secret("s3cret");
        config.refresh_ttl_days = u64::MAX / 1000;
        assert_eq!(config.refresh_ttl(), None);
    }

    #[test]
    fn test_secret_is_required() {
        let parsed = serde_json::from_str::<AuthConfig>("{}");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = AuthConfig::with_secret("top-secret-value");
        config.api_key = Some("machine-key".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret-value"));
        assert!(!rendered.contains("machine-key"));
    }
}
