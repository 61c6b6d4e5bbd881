//! Persistent document store implementation using PostgreSQL.
//!
//! Each collection is a table `(id TEXT PRIMARY KEY, seq BIGSERIAL, doc JSONB NOT NULL)`;
//! `seq` orders listings. Unique fields become expression indexes on `doc->>'<field>'`.

use super::{validate_ident, Document, DocumentStore, Patch, StoreError};
use crate::domain::object_id::ObjectId;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

const RECORD_EXPR: &str = "jsonb_build_object('_id', id) || doc AS record";

/// A document store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the process-wide pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn table(collection: &str) -> Result<&str, StoreError> {
    if validate_ident(collection) {
        Ok(collection)
    } else {
        Err(StoreError::InvalidName(collection.to_string()))
    }
}

fn unique_index_name(collection: &str, field: &str) -> String {
    format!("{}_{}_key", collection, field)
}

fn record_from_row(collection: &str, row: &PgRow) -> Result<Document, StoreError> {
    let record: JsonValue = row.try_get("record")?;
    match record {
        JsonValue::Object(doc) => Ok(doc),
        other => Err(StoreError::MalformedRecord {
            collection: collection.to_string(),
            reason: format!("expected an object, found {}", other),
        }),
    }
}

/// Turns a unique-index violation into `StoreError::Duplicate`, naming the
/// offending field from the index name.
fn map_write_error(collection: &str, err: sqlx::Error, written: &Document) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .and_then(|c| c.strip_prefix(collection))
                .and_then(|c| c.strip_prefix('_'))
                .and_then(|c| c.strip_suffix("_key"))
                .unwrap_or("_id")
                .to_string();
            let value = written.get(&field).cloned().unwrap_or(JsonValue::Null);
            return StoreError::Duplicate {
                collection: collection.to_string(),
                field,
                value,
            };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn ensure_collection(
        &self,
        collection: &str,
        unique_fields: &[&str],
    ) -> Result<(), StoreError> {
        let t = table(collection)?;
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                seq BIGSERIAL,
                doc JSONB NOT NULL
            )",
            t
        ))
        .execute(&self.pool)
        .await?;
        sqlx::query(&format!(
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS seq BIGSERIAL",
            t
        ))
        .execute(&self.pool)
        .await?;

        for field in unique_fields {
            if !validate_ident(field) {
                return Err(StoreError::InvalidName(field.to_string()));
            }
            sqlx::query(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ((doc->>'{}'))",
                unique_index_name(t, field),
                t,
                field
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<Document, StoreError> {
        let t = table(collection)?;
        let id = ObjectId::new();
        let row = sqlx::query(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING {}",
            t, RECORD_EXPR
        ))
        .bind(id.to_hex())
        .bind(JsonValue::Object(doc.clone()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(t, e, &doc))?;
        record_from_row(t, &row)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let t = table(collection)?;
        let row = sqlx::query(&format!("SELECT {} FROM {} WHERE id = $1", RECORD_EXPR, t))
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| record_from_row(t, &r)).transpose()
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let t = table(collection)?;
        let rows = sqlx::query(&format!("SELECT {} FROM {} ORDER BY seq", RECORD_EXPR, t))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| record_from_row(t, r)).collect()
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        patch: Patch,
    ) -> Result<Option<Document>, StoreError> {
        let t = table(collection)?;
        // Merge and key removal happen in one statement.
        let row = sqlx::query(&format!(
            "UPDATE {} SET doc = (doc || $2::jsonb) - $3::text[] WHERE id = $1 RETURNING {}",
            t, RECORD_EXPR
        ))
        .bind(id.to_hex())
        .bind(JsonValue::Object(patch.set.clone()))
        .bind(&patch.unset)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(t, e, &patch.set))?;
        row.map(|r| record_from_row(t, &r)).transpose()
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let t = table(collection)?;
        let row = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            t, RECORD_EXPR
        ))
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| record_from_row(t, &r)).transpose()
    }
}
