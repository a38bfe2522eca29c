//! # chirp-api
//!
//! The seam between the HTTP layer and the auth core: request extractors
//! that authenticate callers, shared auth state, and the mapping from
//! session errors to HTTP responses.

pub mod error;
pub mod extractors;
pub mod state;

pub use error::{ApiError, ApiErrorResponse};
pub use extractors::{ApiKeyCaller, AuthUser, BearerCredential};
pub use state::AuthState;
