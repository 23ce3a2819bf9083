//! Postgres-backed document store.
//!
//! All collections share one `documents` table holding JSONB payloads. Unique
//! fields are enforced twice: a pre-insert lookup that yields a precise
//! [`StoreError::Duplicate`], and a partial unique index per
//! (collection, field) created by `ensure_collection` that catches races.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Any other | – | `Backend` |

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;
use uuid::Uuid;

use super::{DocumentStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq BIGSERIAL,
    collection VARCHAR(255) NOT NULL,
    id UUID NOT NULL,
    data JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (collection, id)
);
CREATE INDEX IF NOT EXISTS idx_documents_collection_seq ON documents(collection, seq);
"#;

const MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", "", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `documents` table and its indexes if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", "", e))?;
        tracing::info!("document schema initialized");
        Ok(())
    }

    async fn check_unique(
        &self,
        collection: &str,
        id: Uuid,
        document: &JsonValue,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        for field in unique_fields {
            let Some(value) = document.get(*field) else {
                continue;
            };
            let taken: Option<i32> = sqlx::query_scalar(
                "SELECT 1 FROM documents WHERE collection = $1 AND id <> $2 AND data -> $3 = $4 LIMIT 1",
            )
            .bind(collection)
            .bind(id)
            .bind(*field)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("check_unique", collection, e))?;

            if taken.is_some() {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Index names and predicates are spliced into DDL, so only plain identifiers pass.
fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name.len() <= 48
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Backend(format!("invalid identifier: {name:?}")))
    }
}

fn unique_index_name(collection: &str, field: &str) -> String {
    format!("uq_documents_{collection}__{field}")
}

fn map_sqlx_error(operation: &str, collection: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let prefix = format!("uq_documents_{collection}__");
            let field = db_err
                .constraint()
                .and_then(|c| c.strip_prefix(prefix.as_str()))
                .unwrap_or("_id")
                .to_string();
            return StoreError::Duplicate {
                collection: collection.to_string(),
                field,
            };
        }
    }
    StoreError::Backend(format!("{operation}: {err}"))
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self))]
    async fn ensure_collection(
        &self,
        collection: &str,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        validate_identifier(collection)?;
        for field in unique_fields {
            validate_identifier(field)?;
            let ddl = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {index} ON documents ((data ->> '{field}')) WHERE collection = '{collection}'",
                index = unique_index_name(collection, field),
            );
            sqlx::raw_sql(&ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_collection", collection, e))?;
        }
        Ok(())
    }

    #[instrument(skip(self, document))]
    async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        self.check_unique(collection, id, &document, unique_fields).await?;

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(&document)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert", collection, e))?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<JsonValue>, StoreError> {
        sqlx::query_scalar("SELECT data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", collection, e))
    }

    #[instrument(skip(self, document))]
    async fn replace(
        &self,
        collection: &str,
        id: Uuid,
        document: JsonValue,
        unique_fields: &[&str],
    ) -> Result<bool, StoreError> {
        self.check_unique(collection, id, &document, unique_fields).await?;

        let result = sqlx::query(
            "UPDATE documents SET data = $3, updated_at = NOW() WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(&document)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("replace", collection, e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", collection, e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, collection: &str) -> Result<Vec<JsonValue>, StoreError> {
        sqlx::query_scalar("SELECT data FROM documents WHERE collection = $1 ORDER BY seq")
            .bind(collection)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", collection, e))
    }

    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<JsonValue>, StoreError> {
        sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND data ->> $2 = $3 ORDER BY seq LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_one", collection, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_restricted() {
        assert!(validate_identifier("software_applications").is_ok());
        assert!(validate_identifier("email").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("users'; DROP TABLE documents; --").is_err());
        assert!(validate_identifier("Email").is_err());
    }

    #[test]
    fn unique_index_name_encodes_collection_and_field() {
        assert_eq!(unique_index_name("users", "email"), "uq_documents_users__email");
    }
}
