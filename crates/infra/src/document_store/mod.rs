//! Collection-oriented JSON document storage.
//!
//! Every resource is stored as a JSON document keyed by its UUID inside a
//! named collection. [`DocumentStore`] is the untyped boundary implemented by
//! the in-memory and Postgres backends; [`Collection`] layers the typed
//! `serde` mapping for one [`Entity`] on top of it.

pub mod collection;
pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub use collection::Collection;
pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Another document in the collection already holds this unique value.
    #[error("duplicate {field} in {collection}")]
    Duplicate { collection: String, field: String },

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Untyped document storage shared by all request handlers.
///
/// `unique_fields` name top-level string fields that must not repeat within
/// the collection; a clash yields [`StoreError::Duplicate`] and nothing is
/// written.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Prepare backend structures (indexes) for a collection.
    async fn ensure_collection(
        &self,
        _collection: &str,
        _unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<JsonValue>, StoreError>;

    /// Overwrite an existing document. Returns `false` when `id` is absent.
    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<bool, StoreError>;

    /// Returns `false` when `id` is absent.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError>;

    /// All documents of a collection in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError>;

    /// First document (in insertion order) whose string `field` equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<JsonValue>, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn ensure_collection(
        &self,
        collection: &str,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        (**self).ensure_collection(collection, unique_fields).await
    }

    async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        (**self).insert(collection, id, document, unique_fields).await
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<JsonValue>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<bool, StoreError> {
        (**self).replace(collection, id, document, unique_fields).await
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete(collection, id).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        (**self).list(collection).await
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<JsonValue>, StoreError> {
        (**self).find_one(collection, field, value).await
    }
}
