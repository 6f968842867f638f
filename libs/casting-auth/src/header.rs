//! `Authorization` header parsing

use http::{HeaderMap, header::AUTHORIZATION};

use crate::errors::AuthError;

pub const MUST_START_WITH_BEARER: &str = r#"Authorization header must start with "Bearer"."#;
pub const TOKEN_NOT_FOUND: &str = "Token not found.";
pub const MUST_BE_BEARER_TOKEN: &str = "Authorization header must be bearer token.";

/// Extract the raw token from a `Bearer <token>` authorization header.
///
/// The header value is split on whitespace and must consist of exactly the
/// scheme (case-insensitive `bearer`) followed by the token.
///
/// # Errors
/// - [`AuthError::MissingHeader`] if there is no `Authorization` header
/// - [`AuthError::MalformedHeader`] if the value is blank or not a bearer credential
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader(MUST_BE_BEARER_TOKEN))?;

    let mut parts = value.split_whitespace();

    let scheme = parts
        .next()
        .ok_or(AuthError::MalformedHeader(MUST_BE_BEARER_TOKEN))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(MUST_START_WITH_BEARER));
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader(TOKEN_NOT_FOUND))?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(MUST_BE_BEARER_TOKEN));
    }

    Ok(token)
}
