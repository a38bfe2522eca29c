//! Machine API key comparison.

use sha2::{Digest, Sha256};

/// Compares a presented key with the configured one without an early exit.
///
/// Both sides are digested first so the comparison length never depends
/// on either input.
pub fn verify_api_key(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
