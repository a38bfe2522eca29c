//! # chirp-database
//!
//! Persistence collaborators for the auth core: the [`UserRepository`] and
//! [`RefreshTokenRepository`] traits, their PostgreSQL implementations, and
//! `dashmap`-backed in-memory implementations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use memory::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
pub use repositories::refresh_token::PgRefreshTokenRepository;
pub use repositories::user::PgUserRepository;
pub use repositories::{RefreshTokenRepository, UserRepository};
