use super::{DocumentStore, Filter, InsertOneResult, UpdateResult};
use crate::pagination::{Page, Pagination};
use crate::update::FieldSet;
use crate::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Typed handle on one named collection of a [`DocumentStore`].
///
/// Handles are cheap to clone and are built per service from the injected store.
#[derive(Clone)]
pub struct Collection {
    name: &'static str,
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl Collection {
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self { name, store }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn decode<T: DeserializeOwned>(&self, doc: super::Document) -> StoreResult<T> {
        serde_json::from_value(Value::Object(doc)).map_err(|source| {
            StoreError::Deserialization {
                collection: self.name.to_string(),
                source,
            }
        })
    }

    fn encode<T: Serialize>(record: &T) -> StoreResult<super::Document> {
        match serde_json::to_value(record).map_err(StoreError::Serialization)? {
            Value::Object(doc) => Ok(doc),
            _ => Err(StoreError::NotAnObject),
        }
    }

    pub async fn find_one<T: DeserializeOwned>(&self, filter: &Filter) -> StoreResult<Option<T>> {
        match self.store.find_one(self.name, filter).await? {
            Some(doc) => self.decode(doc).map(Some),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, filter: &Filter) -> StoreResult<bool> {
        Ok(self.store.find_one(self.name, filter).await?.is_some())
    }

    /// Reads one page. Documents that no longer decode as `T` are logged and skipped; the
    /// total still counts them.
    pub async fn find_page<T: DeserializeOwned>(&self, pagination: Pagination) -> StoreResult<Page<T>> {
        let page = self
            .store
            .find_page(self.name, pagination.start_index, pagination.record_per_page)
            .await?;

        let mut items = Vec::with_capacity(page.documents.len());
        for doc in page.documents {
            match self.decode(doc) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!("skipping undecodable document: {}", e),
            }
        }

        Ok(Page {
            total_count: page.total_count,
            items,
        })
    }

    pub async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.store.count(self.name, filter).await
    }

    pub async fn insert<T: Serialize>(&self, record: &T) -> StoreResult<InsertOneResult> {
        self.store.insert_one(self.name, Self::encode(record)?).await
    }

    pub async fn insert_unique<T: Serialize>(
        &self,
        record: &T,
        unique_fields: &[&str],
    ) -> StoreResult<InsertOneResult> {
        self.store
            .insert_unique(self.name, Self::encode(record)?, unique_fields)
            .await
    }

    /// Applies `fields` to the matching document, creating it when missing.
    pub async fn upsert(&self, filter: &Filter, fields: &FieldSet) -> StoreResult<UpdateResult> {
        self.store.update_one(self.name, filter, fields, true).await
    }
}
