//! Typed view over one collection of a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use folio_core::Entity;

use super::{DocumentStore, StoreError};

/// Serializes `T` into its collection and back.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn ensure(&self) -> Result<(), StoreError> {
        self.store
            .ensure_collection(T::COLLECTION, T::UNIQUE_FIELDS)
            .await
    }

    pub async fn insert(&self, entity: &T) -> Result<(), StoreError> {
        let document = serde_json::to_value(entity)?;
        self.store
            .insert(T::COLLECTION, key(*entity.id()), document, T::UNIQUE_FIELDS)
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.store
            .get(T::COLLECTION, key(id))
            .await?
            .map(decode)
            .transpose()
    }

    /// Persist the current state of an existing entity. `false` if it was deleted meanwhile.
    pub async fn save(&self, entity: &T) -> Result<bool, StoreError> {
        let document = serde_json::to_value(entity)?;
        self.store
            .replace(T::COLLECTION, key(*entity.id()), document, T::UNIQUE_FIELDS)
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, key(id)).await
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn find_by(&self, field: &str, value: &str) -> Result<Option<T>, StoreError> {
        self.store
            .find_one(T::COLLECTION, field, value)
            .await?
            .map(decode)
            .transpose()
    }
}

fn key<I: Into<Uuid>>(id: I) -> Uuid {
    id.into()
}

fn decode<T: DeserializeOwned>(document: serde_json::Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(document)?)
}
