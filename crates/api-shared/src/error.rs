//! Error response bodies.

use serde::Serialize;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

/// Body of every non-2xx response: `{ "error": ... }`, plus `fields` for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorRes>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(error: impl Into<String>, fields: Vec<FieldErrorRes>) -> Self {
        Self {
            error: error.into(),
            fields,
        }
    }
}
