//! Bearer credential extraction.
//!
//! Accepts `Authorization: Bearer <token>` and, for older clients, a bare `token: <token>`
//! header. The framework-specific caller passes the raw header values in.

/// Why no usable credential was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthHeaderError {
    #[error("no authorization header provided")]
    Missing,
    #[error("authorization header must use the Bearer scheme")]
    WrongScheme,
    #[error("authorization header carries an empty token")]
    Empty,
}

/// Picks the token out of the `Authorization` header, falling back to the `token` header.
///
/// # Errors
///
/// Returns [`AuthHeaderError`] if neither header yields a non-empty token. A present but
/// malformed `Authorization` header is an error even when `token` is also set.
pub fn credential_from_headers<'a>(
    authorization: Option<&'a str>,
    legacy_token: Option<&'a str>,
) -> Result<&'a str, AuthHeaderError> {
    if let Some(value) = authorization {
        let value = value.trim();
        let (scheme, rest) = value.split_once(' ').unwrap_or((value, ""));
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthHeaderError::WrongScheme);
        }
        let token = rest.trim();
        if token.is_empty() {
            return Err(AuthHeaderError::Empty);
        }
        return Ok(token);
    }

    match legacy_token.map(str::trim) {
        Some("") => Err(AuthHeaderError::Empty),
        Some(token) => Ok(token),
        None => Err(AuthHeaderError::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        assert_eq!(credential_from_headers(Some("Bearer abc.def"), None), Ok("abc.def"));
        assert_eq!(credential_from_headers(Some("bearer  abc "), None), Ok("abc"));
    }

    #[test]
    fn test_legacy_token_header() {
        assert_eq!(credential_from_headers(None, Some("abc")), Ok("abc"));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            credential_from_headers(None, None),
            Err(AuthHeaderError::Missing)
        );
        assert_eq!(
            credential_from_headers(Some("Basic dXNlcg=="), Some("abc")),
            Err(AuthHeaderError::WrongScheme)
        );
        assert_eq!(
            credential_from_headers(Some("Bearer"), None),
            Err(AuthHeaderError::Empty)
        );
        assert_eq!(
            credential_from_headers(None, Some("  ")),
            Err(AuthHeaderError::Empty)
        );
    }
}
