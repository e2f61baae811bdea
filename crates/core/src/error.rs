use crate::validation::ValidationErrors;
use std::time::Duration;

/// Errors raised by the document store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for unique field '{field}' in collection '{collection}'")]
    Duplicate { collection: String, field: String },
    #[error("document is missing a string '_id' field")]
    MissingId,
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),
    #[error("failed to access store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document from '{collection}': {source}")]
    Deserialization {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum HmsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("invalid record id: {0}")]
    Uuid(#[from] hms_uuid::UuidError),

    #[error("this email or phone number already exists")]
    DuplicatePatient,
    #[error("login or password is incorrect")]
    IncorrectCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("doctor not found")]
    DoctorNotFound,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("kindly retype the time")]
    InvalidTimeSpan,

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
    #[error("failed to sign token: {0}")]
    TokenSigning(jsonwebtoken::errors::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type HmsResult<T> = std::result::Result<T, HmsError>;
