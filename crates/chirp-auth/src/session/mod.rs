//! Session lifecycle: login, refresh, revoke, and request authorization.

pub mod manager;

pub use manager::{LoginResult, RefreshResult, SessionManager, TokenPair, ensure_owner};
