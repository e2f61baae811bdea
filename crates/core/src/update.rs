//! Partial-update merge.
//!
//! An update request carries only the fields the caller wants to change. Each service turns
//! the present fields into a [`FieldSet`], appends `updated_at`, and upserts it: the listed
//! fields are overwritten and every other stored field is left as it was. Pairs registered
//! with [`FieldSet::set_on_insert`] are written only when the upsert creates the document.

use crate::constants::{CREATED_AT_FIELD, UPDATED_AT_FIELD};
use crate::store::Document;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Ordered `(field, value)` pairs applied by a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    updates: Vec<(String, Value)>,
    on_insert: Vec<(String, Value)>,
}

fn put(pairs: &mut Vec<(String, Value)>, field: &str, value: Value) {
    match pairs.iter_mut().find(|(name, _)| name == field) {
        Some(entry) => entry.1 = value,
        None => pairs.push((field.to_string(), value)),
    }
}

/// Renders a timestamp the same way `chrono`'s serde support does.
pub fn timestamp_value(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`, replacing an earlier entry for the same field.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        put(&mut self.updates, field, value.into());
        self
    }

    /// Sets `field` only on a document created by the upsert.
    pub fn set_on_insert(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        put(&mut self.on_insert, field, value.into());
        self
    }

    pub fn set_if_present(&mut self, field: &str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    pub fn set_timestamp(&mut self, field: &str, ts: DateTime<Utc>) -> &mut Self {
        self.set(field, timestamp_value(ts))
    }

    /// Appends the `updated_at` bump every update carries. A document created by the
    /// upsert also gets `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) -> &mut Self {
        self.set_on_insert(CREATED_AT_FIELD, timestamp_value(now));
        self.set_timestamp(UPDATED_AT_FIELD, now)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.updates
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.updates.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Writes every pair into `doc`. Returns `true` if any stored value changed.
    pub fn apply_to(&self, doc: &mut Document) -> bool {
        let mut changed = false;
        for (field, value) in &self.updates {
            if doc.get(field) != Some(value) {
                doc.insert(field.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    /// Writes the update pairs and then the insert-only pairs into a new document.
    pub fn apply_to_new(&self, doc: &mut Document) {
        self.apply_to(doc);
        for (field, value) in &self.on_insert {
            doc.entry(field.clone()).or_insert_with(|| value.clone());
        }
    }
}
