use super::{
    conflicting_field, document_id, upsert_document, Document, DocumentPage, DocumentStore,
    Filter, InsertOneResult, UpdateResult,
};
use crate::update::FieldSet;
use crate::{RecordId, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process store. Collections are vectors in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_checked(
    docs: &mut Vec<Document>,
    collection: &str,
    document: Document,
    unique_fields: &[&str],
) -> StoreResult<InsertOneResult> {
    let id = document_id(&document)?.to_string();

    for existing in docs.iter() {
        if document_id(existing).ok() == Some(id.as_str()) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: "_id".into(),
            });
        }
        if let Some(field) = conflicting_field(&document, existing, unique_fields) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: field.to_string(),
            });
        }
    }

    docs.push(document);
    Ok(InsertOneResult { inserted_id: id })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_page(
        &self,
        collection: &str,
        skip: usize,
        limit: usize,
    ) -> StoreResult<DocumentPage> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(DocumentPage::default());
        };
        Ok(DocumentPage {
            total_count: docs.len() as u64,
            documents: docs.iter().skip(skip).take(limit).cloned().collect(),
        })
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> StoreResult<InsertOneResult> {
        self.insert_unique(collection, document, &[]).await
    }

    async fn insert_unique(
        &self,
        collection: &str,
        document: Document,
        unique_fields: &[&str],
    ) -> StoreResult<InsertOneResult> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        insert_checked(docs, collection, document, unique_fields)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: &FieldSet,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| filter.matches(doc)) {
            let changed = fields.apply_to(doc);
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: u64::from(changed),
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateResult {
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            });
        }

        let new_id = filter
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| RecordId::new().to_string());
        let created = upsert_document(filter, fields, &new_id);
        let inserted = insert_checked(docs, collection, created, &[])?;
        Ok(UpdateResult {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(inserted.inserted_id),
        })
    }
}
