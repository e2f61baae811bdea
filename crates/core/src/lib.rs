//! # HMS Core
//!
//! Core business logic for the hospital management service.
//!
//! This crate contains pure data operations:
//! - Entity shapes for patients, doctors, appointments, prescriptions and invoices
//! - Explicit input validation returning structured field errors
//! - The partial-update merge ([`FieldSet`]) applied as an upsert
//! - Password hashing and access/refresh token issuance
//! - The [`DocumentStore`] abstraction with in-memory and sharded-JSON backends
//!
//! **No API concerns**: HTTP routing, status codes and middleware belong in `api-rest`.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod scope;
pub mod store;
pub mod update;
pub mod validation;

pub use auth::{Claims, TokenKind, TokenPair, TokenService};
pub use config::CoreConfig;
pub use error::{HmsError, HmsResult, StoreError, StoreResult};
pub use hms_types::{EmailAddress, NonEmptyText, TextError};
pub use hms_uuid::RecordId;
pub use pagination::{Page, PageQuery, Pagination};
pub use store::{Collection, Document, DocumentStore, Filter, InsertOneResult, UpdateResult};
pub use update::FieldSet;
pub use validation::{FieldError, ValidationErrors};
