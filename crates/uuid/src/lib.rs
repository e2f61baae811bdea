//! Record identifiers and sharded-path utilities.
//!
//! Every HMS record (patient, doctor, appointment, prescription, invoice) is identified by a
//! *canonical* identifier: **32 lowercase hexadecimal characters** (no hyphens). The same
//! string is stored as the document's `_id` and as its `<resource>_id` field.
//!
//! This crate provides:
//! - A small wrapper type ([`RecordId`]) that *guarantees* the canonical format once
//!   constructed.
//! - Shared sharding logic used by the file-backed document store to place each document.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//!
//! ## Sharded layout
//! For a canonical id `u`, the file store writes documents to
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>.json`, which keeps directory fan-out small.

mod record_id;

pub use record_id::{RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
