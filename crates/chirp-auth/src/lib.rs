//! # chirp-auth
//!
//! Authentication and session lifecycle for Chirp.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and credential policy
//! - `credentials`: `Authorization` header parsing (`Bearer` and `ApiKey`)
//! - `jwt`: short-lived signed access tokens
//! - `refresh`: long-lived, revocable, store-backed refresh tokens
//! - `session`: login, refresh, revoke, and authorization flows
//! - `error`: internal detailed errors and the coarse caller-facing errors

pub mod credentials;
pub mod error;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod session;

pub use credentials::{extract_api_key, extract_bearer};
pub use error::{AuthError, SessionError, TokenRejection};
pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder, SigningSecret};
pub use password::{PasswordHasher, PasswordValidator};
pub use refresh::{IssuedRefreshToken, RefreshTokenStore};
pub use session::{LoginResult, RefreshResult, SessionManager, TokenPair, ensure_owner};
