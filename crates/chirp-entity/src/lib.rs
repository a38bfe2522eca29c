//! # chirp-entity
//!
//! Persistence models shared by the record stores and the auth core.

pub mod refresh_token;
pub mod user;

pub use refresh_token::{RefreshToken, RefreshTokenStatus};
pub use user::{CreateUser, UpdateCredentials, User};
