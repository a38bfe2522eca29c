//! `Authorization` header parsing.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use crate::error::AuthError;

/// Scheme prefix for user access and refresh tokens.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Scheme prefix for machine-to-machine keys.
pub const API_KEY_PREFIX: &str = "ApiKey ";

/// Extracts a bearer token from request headers.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_with_prefix(headers, BEARER_PREFIX)
}

/// Extracts an API key from request headers.
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_with_prefix(headers, API_KEY_PREFIX)
}

/// Parses a raw `Authorization` value as a bearer credential.
pub fn parse_bearer(raw: Option<&str>) -> Result<String, AuthError> {
    parse_with_prefix(raw, BEARER_PREFIX)
}

/// Parses a raw `Authorization` value as an API key credential.
pub fn parse_api_key(raw: Option<&str>) -> Result<String, AuthError> {
    parse_with_prefix(raw, API_KEY_PREFIX)
}

fn extract_with_prefix(headers: &HeaderMap, prefix: &str) -> Result<String, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingCredential);
    };
    if value.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    let raw = value.to_str().map_err(|_| AuthError::MalformedCredential)?;
    parse_with_prefix(Some(raw), prefix)
}

fn parse_with_prefix(raw: Option<&str>, prefix: &str) -> Result<String, AuthError> {
    let raw = match raw {
        None | Some("") => return Err(AuthError::MissingCredential),
        Some(raw) => raw,
    };

    // Prefix match is exact: case-sensitive, one space.
    let credential = raw
        .strip_prefix(prefix)
        .ok_or(AuthError::MalformedCredential)?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::MalformedCredential);
    }
    Ok(credential.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn test_bearer_plain() {
        assert_eq!(extract_bearer(&headers("Bearer 123")).unwrap(), "123");
    }

    #[test]
    fn test_bearer_extra_spaces_are_trimmed() {
        assert_eq!(extract_bearer(&headers("Bearer     123")).unwrap(), "123");
        assert_eq!(parse_bearer(Some("Bearer 123   ")).unwrap(), "123");
    }

    #[test]
    fn test_missing_or_empty_header() {
        assert!(matches!(
            extract_bearer(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            extract_bearer(&headers("")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(parse_bearer(None), Err(AuthError::MissingCredential)));
    }

    #[test]
    fn test_api_key_missing_or_empty_header() {
        assert!(matches!(
            extract_api_key(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            extract_api_key(&headers("")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(parse_api_key(None), Err(AuthError::MissingCredential)));
    }

    #[test]
    fn test_wrong_scheme_is_malformed() {
        assert!(matches!(
            extract_bearer(&headers("Token 123")),
            Err(AuthError::MalformedCredential)
        ));
        assert!(matches!(
            extract_bearer(&headers("bearer 123")),
            Err(AuthError::MalformedCredential)
        ));
        assert!(matches!(
            extract_bearer(&headers("Bearer")),
            Err(AuthError::MalformedCredential)
        ));
    }

    #[test]
    fn test_prefix_without_credential_is_malformed() {
        assert!(matches!(
            parse_bearer(Some("Bearer    ")),
            Err(AuthError::MalformedCredential)
        ));
    }

    #[test]
    fn test_schemes_are_not_interchangeable() {
        assert!(matches!(
            extract_api_key(&headers("Bearer 123")),
            Err(AuthError::MalformedCredential)
        ));
        assert!(matches!(
            extract_bearer(&headers("ApiKey 123")),
            Err(AuthError::MalformedCredential)
        ));
        assert_eq!(extract_api_key(&headers("ApiKey  k-1 ")).unwrap(), "k-1");
    }

    #[test]
    fn test_header_name_lookup_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            http::HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer abc"),
        );
        assert_eq!(extract_bearer(&map).unwrap(), "abc");
    }

    #[test]
    fn test_non_utf8_value_is_malformed() {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff").unwrap());
        assert!(matches!(
            extract_bearer(&map),
            Err(AuthError::MalformedCredential)
        ));
    }
}
