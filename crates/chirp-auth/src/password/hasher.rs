//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use chirp_core::config::Argon2Config;

use crate::error::AuthError;

/// Handles password hashing and verification using Argon2id.
///
/// The stored digest is a PHC string carrying algorithm, cost parameters,
/// and salt, so verification always uses the parameters the digest was
/// created with, even after the configured costs change.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given cost parameters.
    pub fn new(config: &Argon2Config) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::Hashing(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch. A digest that cannot be parsed is an
    /// error, never a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Hashing(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(&Argon2Config {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = cheap();
        let hash = hasher.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("correct horse", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hasher = cheap();
        let hash = hasher.hash_password("pw-one").unwrap();
        assert!(!hasher.verify_password("pw-two", &hash).unwrap());
    }

    #[test]
    fn test_same_input_gets_distinct_salts() {
        let hasher = cheap();
        let first = hasher.hash_password("repeat").unwrap();
        let second = hasher.hash_password("repeat").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify_password("repeat", &first).unwrap());
        assert!(hasher.verify_password("repeat", &second).unwrap());
    }

    #[test]
    fn test_corrupt_digest_is_a_hashing_error() {
        let hasher = cheap();
        let err = hasher.verify_password("pw", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }

    #[test]
    fn test_verifies_digest_made_with_other_costs() {
        let hash = cheap().hash_password("portable").unwrap();
        let other = PasswordHasher::new(&Argon2Config {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(other.verify_password("portable", &hash).unwrap());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let err = PasswordHasher::new(&Argon2Config {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, AuthError::Hashing(_)));
    }
}
