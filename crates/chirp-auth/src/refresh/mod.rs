//! Opaque, store-backed refresh tokens.

pub mod store;
pub mod token;

pub use store::{IssuedRefreshToken, RefreshTokenStore};
pub use token::{fingerprint, generate_refresh_token, hash_refresh_token};
