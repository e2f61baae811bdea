//! # API Shared
//!
//! Shared wire-level pieces for the HMS HTTP API.
//!
//! Contains:
//! - The health service and its response body
//! - The error response bodies every endpoint uses
//! - Bearer credential parsing for request headers
//!
//! Kept free of any HTTP framework so the bodies can be reused by other transports.

pub mod auth;
pub mod error;
pub mod health;

pub use auth::{credential_from_headers, AuthHeaderError};
pub use error::{ErrorRes, FieldErrorRes};
pub use health::{HealthRes, HealthService};
