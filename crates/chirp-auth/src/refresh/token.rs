//! Refresh token generation and digesting.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Digest characters shown in logs.
const FINGERPRINT_LEN: usize = 8;

/// Generates a new opaque refresh token: 32 random bytes, hex-encoded.
pub fn generate_refresh_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

/// Hex SHA-256 digest of a token. Records are keyed by this, never by the token.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short digest prefix that is safe to log.
pub fn fingerprint(token_hash: &str) -> &str {
    let end = FINGERPRINT_LEN.min(token_hash.len());
    token_hash.get(..end).unwrap_or(token_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_refresh_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_hash_is_stable_and_not_the_token() {
        let token = generate_refresh_token();
        let hash = hash_refresh_token(&token);
        assert_eq!(hash, hash_refresh_token(&token));
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, token);
    }

    #[test]
    fn test_fingerprint() {
        assert_eq!(fingerprint("0123456789abcdef"), "01234567");
        assert_eq!(fingerprint("abc"), "abc");
    }
}
