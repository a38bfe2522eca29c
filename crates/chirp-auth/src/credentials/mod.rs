//! Credential extraction from the `Authorization` header.
//!
//! Two schemes are recognised and never interchangeable: `Bearer` for user
//! tokens and `ApiKey` for machine callers.

pub mod api_key;
pub mod extractor;

pub use api_key::verify_api_key;
pub use extractor::{
    API_KEY_PREFIX, BEARER_PREFIX, extract_api_key, extract_bearer, parse_api_key, parse_bearer,
};
