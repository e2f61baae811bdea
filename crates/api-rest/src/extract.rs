use crate::error::ApiError;
use axum::extract::FromRequest;

/// `Json` whose rejection renders as an [`ApiError`] (400 with `{ "error": ... }`).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
