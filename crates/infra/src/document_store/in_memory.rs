use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::{DocumentStore, StoreError};

type Documents = Vec<(Uuid, JsonValue)>;

/// In-memory document store for tests/dev.
///
/// Collections keep insertion order; replacing a document keeps its position.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<HashMap<String, Documents>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("document store lock poisoned".to_string())
}

/// First unique field whose value is already held by a document other than `id`.
fn clashing_field(
    docs: &Documents,
    id: Uuid,
    document: &JsonValue,
    unique_fields: &[&str],
) -> Option<String> {
    unique_fields.iter().find_map(|field| {
        let value = document.get(*field)?;
        docs.iter()
            .any(|(other_id, other)| *other_id != id && other.get(*field) == Some(value))
            .then(|| field.to_string())
    })
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let docs = map.entry(collection.to_string()).or_default();

        if let Some(field) = clashing_field(docs, id, &document, unique_fields) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field,
            });
        }
        if docs.iter().any(|(existing, _)| *existing == id) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: "_id".to_string(),
            });
        }

        docs.push((id, document));
        Ok(())
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<JsonValue>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map
            .get(collection)
            .and_then(|docs| docs.iter().find(|(existing, _)| *existing == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let Some(docs) = map.get_mut(collection) else {
            return Ok(false);
        };

        if let Some(field) = clashing_field(docs, id, &document, unique_fields) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field,
            });
        }

        match docs.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => {
                *slot = document;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let Some(docs) = map.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(existing, _)| *existing != id);
        Ok(docs.len() != before)
    }

    async fn list(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<JsonValue>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(_, doc)| doc.get(field).and_then(JsonValue::as_str) == Some(value))
                .map(|(_, doc)| doc.clone())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = InMemoryDocumentStore::new();
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::now_v7()).collect();
        for (n, id) in ids.iter().rev().enumerate() {
            store.insert("things", *id, json!({ "n": n }), &[]).await.unwrap();
        }

        let ns: Vec<u64> = store
            .list("things")
            .await
            .unwrap()
            .iter()
            .map(|d| d["n"].as_u64().unwrap())
            .collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn unique_field_rejects_second_insert() {
        let store = InMemoryDocumentStore::new();
        store
            .insert("users", Uuid::now_v7(), json!({ "email": "a@b.co" }), &["email"])
            .await
            .unwrap();

        let err = store
            .insert("users", Uuid::now_v7(), json!({ "email": "a@b.co" }), &["email"])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field, .. } if field == "email"));
        assert_eq!(store.list("users").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn replace_may_keep_its_own_unique_value() {
        let store = InMemoryDocumentStore::new();
        let id = Uuid::now_v7();
        store
            .insert("users", id, json!({ "email": "a@b.co", "v": 1 }), &["email"])
            .await
            .unwrap();

        let replaced = store
            .replace("users", id, json!({ "email": "a@b.co", "v": 2 }), &["email"])
            .await
            .unwrap();
        assert!(replaced);
        assert_eq!(store.get("users", id).await.unwrap().unwrap()["v"], 2);
    }

    #[tokio::test]
    async fn replace_into_taken_unique_value_fails() {
        let store = InMemoryDocumentStore::new();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        store.insert("users", first, json!({ "email": "a@b.co" }), &["email"]).await.unwrap();
        store.insert("users", second, json!({ "email": "c@d.co" }), &["email"]).await.unwrap();

        let err = store
            .replace("users", second, json!({ "email": "a@b.co" }), &["email"])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(store.get("users", second).await.unwrap().unwrap()["email"], "c@d.co");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        let id = Uuid::now_v7();
        store.insert("skills", id, json!({ "title": "Rust" }), &[]).await.unwrap();

        assert!(store.get("projects", id).await.unwrap().is_none());
        assert!(!store.delete("projects", id).await.unwrap());
        assert!(store.find_one("skills", "title", "Rust").await.unwrap().is_some());
        assert!(store.find_one("skills", "title", "Go").await.unwrap().is_none());
    }
}
