//! Sharded JSON file store.
//!
//! Each document is a pretty-printed JSON file placed by its `_id`:
//!
//! ```text
//! <root>/
//!   <collection>/
//!     <s1>/
//!       <s2>/
//!         <id>.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the canonical id. Ids must
//! therefore be canonical [`RecordId`]s. Writes go to `<id>.json.tmp` and are renamed into
//! place, so readers never observe a half-written document. All mutations are serialised
//! through one async mutex, which makes [`DocumentStore::insert_unique`] atomic within the
//! process. Queries other than a pinned `_id` scan the collection.

use super::{
    conflicting_field, document_id, upsert_document, Document, DocumentPage, DocumentStore,
    Filter, InsertOneResult, UpdateResult,
};
use crate::constants::CREATED_AT_FIELD;
use crate::update::FieldSet;
use crate::{RecordId, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub async fn open(root: &Path) -> StoreResult<Self> {
        fs::create_dir_all(root).await?;
        tracing::info!("document store rooted at {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> StoreResult<PathBuf> {
        let ok = !collection.is_empty()
            && collection
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if !ok {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> StoreResult<PathBuf> {
        let id = RecordId::parse(id).map_err(|e| StoreError::InvalidId(e.to_string()))?;
        Ok(id.sharded_file(&self.collection_dir(collection)?, DOCUMENT_EXTENSION))
    }

    async fn read_document(path: &Path) -> StoreResult<Option<Document>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(doc)) => Ok(Some(doc)),
            Ok(_) => {
                tracing::warn!("skipping non-object document: {}", path.display());
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("skipping unparsable document {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn write_document(&self, collection: &str, doc: &Document) -> StoreResult<()> {
        let path = self.document_path(collection, document_id(doc)?)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialization)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn document_paths(dir: &Path) -> StoreResult<Vec<PathBuf>> {
        let mut paths = Vec::new();

        let mut s1_iter = match fs::read_dir(dir).await {
            Ok(it) => it,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(paths),
            Err(e) => return Err(e.into()),
        };
        while let Some(s1) = s1_iter.next_entry().await? {
            if !s1.file_type().await?.is_dir() {
                continue;
            }
            let mut s2_iter = fs::read_dir(s1.path()).await?;
            while let Some(s2) = s2_iter.next_entry().await? {
                if !s2.file_type().await?.is_dir() {
                    continue;
                }
                let mut file_iter = fs::read_dir(s2.path()).await?;
                while let Some(file) = file_iter.next_entry().await? {
                    let path = file.path();
                    if path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION) {
                        paths.push(path);
                    }
                }
            }
        }

        Ok(paths)
    }

    /// Loads a whole collection in creation order (`created_at`, then `_id`).
    async fn load_collection(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let dir = self.collection_dir(collection)?;
        let mut docs = Vec::new();
        for path in Self::document_paths(&dir).await? {
            if let Some(doc) = Self::read_document(&path).await? {
                docs.push(doc);
            }
        }

        fn created_at(doc: &Document) -> Option<DateTime<FixedOffset>> {
            doc.get(CREATED_AT_FIELD)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        }

        docs.sort_by(|a, b| {
            created_at(a)
                .cmp(&created_at(b))
                .then_with(|| document_id(a).ok().cmp(&document_id(b).ok()))
        });
        Ok(docs)
    }

    async fn find_matching(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        if let Some(id) = filter.id() {
            if !RecordId::is_canonical(id) {
                return Ok(None);
            }
            let path = self.document_path(collection, id)?;
            return Ok(Self::read_document(&path)
                .await?
                .filter(|doc| filter.matches(doc)));
        }

        Ok(self
            .load_collection(collection)
            .await?
            .into_iter()
            .find(|doc| filter.matches(doc)))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json-files"
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.find_matching(collection, filter).await
    }

    async fn find_page(
        &self,
        collection: &str,
        skip: usize,
        limit: usize,
    ) -> StoreResult<DocumentPage> {
        let docs = self.load_collection(collection).await?;
        Ok(DocumentPage {
            total_count: docs.len() as u64,
            documents: docs.into_iter().skip(skip).take(limit).collect(),
        })
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let docs = self.load_collection(collection).await?;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
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
        let _guard = self.write_lock.lock().await;

        let id = document_id(&document)?.to_string();
        if fs::try_exists(self.document_path(collection, &id)?).await? {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: "_id".into(),
            });
        }

        if !unique_fields.is_empty() {
            for existing in self.load_collection(collection).await? {
                if let Some(field) = conflicting_field(&document, &existing, unique_fields) {
                    return Err(StoreError::Duplicate {
                        collection: collection.to_string(),
                        field: field.to_string(),
                    });
                }
            }
        }

        self.write_document(collection, &document).await?;
        Ok(InsertOneResult { inserted_id: id })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        fields: &FieldSet,
        upsert: bool,
    ) -> StoreResult<UpdateResult> {
        let _guard = self.write_lock.lock().await;

        if let Some(mut doc) = self.find_matching(collection, filter).await? {
            let changed = fields.apply_to(&mut doc);
            if changed {
                self.write_document(collection, &doc).await?;
            }
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
        self.write_document(collection, &created).await?;
        Ok(UpdateResult {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(new_id),
        })
    }
}
