//! In-memory record stores backed by `dashmap`.
//!
//! Used by tests and by embedders that do not need durability. Both stores
//! are cheap to clone and share their maps across clones.

pub mod refresh_token;
pub mod user;

pub use refresh_token::InMemoryRefreshTokenRepository;
pub use user::InMemoryUserRepository;
