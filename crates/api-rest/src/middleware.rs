//! Bearer token check for protected routes.

use crate::error::ApiError;
use crate::AppState;
use api_shared::credential_from_headers;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use hms_core::TokenKind;

/// Header older clients send the bare access token in.
pub const LEGACY_TOKEN_HEADER: &str = "token";

/// Rejects the request with 401 unless it carries a valid access token. On success the
/// token's [`hms_core::Claims`] are added to the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = req.headers();
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let legacy = headers
        .get(LEGACY_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let token = credential_from_headers(authorization, legacy).map_err(|e| {
        tracing::debug!("unauthenticated request to {}: {}", req.uri().path(), e);
        ApiError::unauthorized(e.to_string())
    })?;

    let claims = state
        .tokens
        .validate(token, TokenKind::Access)
        .map_err(|e| {
            tracing::warn!("rejected token for {}: {:?}", req.uri().path(), e);
            ApiError::unauthorized("invalid or expired token")
        })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
