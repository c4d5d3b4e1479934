//! Bearer Credential Extraction
//!
//! Parses `Authorization: Bearer <token>`.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from the `Authorization` header
///
/// Returns `None` when the header is absent, not valid ASCII, uses another
/// scheme, or carries an empty credential.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();

    if token.is_empty() { None } else { Some(token) }
}
