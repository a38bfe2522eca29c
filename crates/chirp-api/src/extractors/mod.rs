//! Custom Axum extractors.

pub mod api_key;
pub mod auth;
pub mod bearer;

pub use api_key::ApiKeyCaller;
pub use auth::AuthUser;
pub use bearer::BearerCredential;
