//! Credential policy for new accounts and credential changes.

use chirp_core::config::AuthConfig;

use crate::error::AuthError;

/// Validates new emails and passwords against configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against the length policy.
    pub fn validate(&self, password: &str) -> Result<(), AuthError> {
        if password.trim().is_empty() {
            return Err(AuthError::PolicyViolation(
                "Password must not be blank".to_string(),
            ));
        }

        if password.chars().count() < self.min_length {
            return Err(AuthError::PolicyViolation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        Ok(())
    }

    /// Validates an email address shape.
    pub fn validate_email(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        };

        if !valid {
            return Err(AuthError::PolicyViolation(
                "Email address is not valid".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::with_secret("s"))
    }

    #[test]
    fn test_length_policy() {
        let v = validator();
        assert!(v.validate("12345678").is_ok());
        assert!(matches!(
            v.validate("short"),
            Err(AuthError::PolicyViolation(_))
        ));
        assert!(v.validate("        ").is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let v = validator();
        assert!(v.validate("ééééééé").is_err());
        assert!(v.validate("éééééééé").is_ok());
    }

    #[test]
    fn test_email_shape() {
        let v = validator();
        assert!(v.validate_email("a@b.com").is_ok());
        assert!(v.validate_email("  a@b.com ").is_ok());
        assert!(v.validate_email("ab.com").is_err());
        assert!(v.validate_email("@b.com").is_err());
        assert!(v.validate_email("a@").is_err());
        assert!(v.validate_email("a@b@c").is_err());
    }
}
