//! HTTP error mapping.
//!
//! Handlers return [`ApiError`]; every variant renders as `{ "error": ... }` via
//! [`api_shared::ErrorRes`]. Store failures are logged with their cause and answered with
//! a generic message.

use api_shared::{ErrorRes, FieldErrorRes};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hms_core::HmsError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorRes,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorRes::new(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a core error to a response. `context` is the generic message used when the
    /// underlying cause must not reach the client.
    pub fn from_core(err: HmsError, context: &str) -> Self {
        match err {
            HmsError::Validation(errs) => {
                tracing::debug!("{}: {}", context, errs);
                let fields = errs
                    .fields()
                    .iter()
                    .map(|f| FieldErrorRes {
                        field: f.field.clone(),
                        message: f.message.clone(),
                    })
                    .collect();
                Self {
                    status: StatusCode::BAD_REQUEST,
                    body: ErrorRes::with_fields("validation failed", fields),
                }
            }
            HmsError::Uuid(_) | HmsError::InvalidInput(_) => {
                tracing::debug!("{}: {:?}", context, err);
                Self::bad_request(err.to_string())
            }
            HmsError::InvalidToken(_) => {
                tracing::warn!("{}: {:?}", context, err);
                Self::unauthorized("invalid or expired token")
            }
            HmsError::DuplicatePatient
            | HmsError::IncorrectCredentials
            | HmsError::DoctorNotFound
            | HmsError::InvalidTimeSpan => {
                tracing::info!("{}: {}", context, err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            HmsError::NotFound(_)
            | HmsError::PasswordHash(_)
            | HmsError::TokenSigning(_)
            | HmsError::Timeout(_)
            | HmsError::Store(_) => {
                tracing::error!("{}: {:?}", context, err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
