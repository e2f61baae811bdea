//! Document store abstraction.
//!
//! Records are kept as JSON objects ([`Document`]) grouped into named collections. Every
//! document carries a string `_id`. The [`DocumentStore`] trait is the seam between the
//! services and a concrete backend:
//!
//! - [`MemoryStore`] keeps collections in process memory (default, and used by tests)
//! - [`JsonFileStore`] writes one JSON file per document under a sharded directory tree
//!
//! Operations are single-document and atomic per document. The only multi-step operation,
//! [`DocumentStore::insert_unique`], performs its uniqueness check and insert under one
//! write lock so that concurrent signups cannot both pass the check.

mod collection;
mod json_files;
mod memory;

pub use collection::Collection;
pub use json_files::JsonFileStore;
pub use memory::MemoryStore;

use crate::config::CoreConfig;
use crate::constants::ID_FIELD;
use crate::update::FieldSet;
use crate::{HmsResult, StoreError, StoreResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub type Document = serde_json::Map<String, Value>;

/// Equality filter: a document matches when every listed field equals the given value.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Vec<(String, Value)>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-field equality filter.
    pub fn by(field: &str, value: impl Into<Value>) -> Self {
        Self::new().eq(field, value)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.push((field.to_string(), value.into()));
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.0
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// Returns the `_id` value when the filter pins one.
    pub fn id(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field == ID_FIELD)
            .and_then(|(_, value)| value.as_str())
    }
}

/// Acknowledgment of an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct InsertOneResult {
    pub inserted_id: String,
}

/// Outcome of an update or upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

/// A window of a collection plus the size of the whole collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub total_count: u64,
    pub documents: Vec<Document>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Returns the first document matching `filter`.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Returns up to `limit` documents starting at `skip`, in creation order.
    async fn find_page(&self, collection: &str, skip: usize, limit: usize)
        -> StoreResult<DocumentPage>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Inserts `document`, which must carry a string `_id` not already present.
    async fn insert_one(&self, collection: &str, document: Document)
        -> StoreResult<InsertOneResult>;

    /// Inserts `document` only if no stored document shares a value with it on any of
    /// `unique_fields` (fields absent or `null` in `document` are not checked).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] naming the first conflicting field.
    async fn insert_unique(
        &self,
        collection: &str,
        document: Document,
        unique_fields: &[&str],
    ) -> StoreResult<InsertOneResult>;

    /// Applies `fields` to the first document matching `filter`. With `upsert`, a missing
    /// document is created from the filter's pairs plus `fields` and its insert-only pairs,
    /// with a fresh `_id` unless the filter pins one.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: &FieldSet,
        upsert: bool,
    ) -> StoreResult<UpdateResult>;
}

/// Opens the backend selected by configuration.
pub async fn open(cfg: &CoreConfig) -> HmsResult<Arc<dyn DocumentStore>> {
    match cfg.data_dir() {
        Some(dir) => {
            let store = JsonFileStore::open(dir).await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

pub(crate) fn document_id(doc: &Document) -> StoreResult<&str> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or(StoreError::MissingId)
}

/// Finds the first unique field on which `candidate` collides with `existing`.
pub(crate) fn conflicting_field<'a>(
    candidate: &Document,
    existing: &Document,
    unique_fields: &[&'a str],
) -> Option<&'a str> {
    unique_fields.iter().copied().find(|field| {
        match (candidate.get(*field), existing.get(*field)) {
            (Some(Value::Null), _) | (None, _) => false,
            (Some(a), Some(b)) => a == b,
            (Some(_), None) => false,
        }
    })
}

/// Builds the document created by an upsert that matched nothing.
pub(crate) fn upsert_document(filter: &Filter, fields: &FieldSet, new_id: &str) -> Document {
    let mut doc = Document::new();
    doc.insert(ID_FIELD.to_string(), Value::String(new_id.to_string()));
    for (field, value) in filter.pairs() {
        doc.insert(field.to_string(), value.clone());
    }
    fields.apply_to_new(&mut doc);
    doc
}
