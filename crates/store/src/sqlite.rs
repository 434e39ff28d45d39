//! SQLite-backed document storage.
//!
//! One `documents` table keyed by (partition_key, id). Conditional writes
//! ride on the primary key (create) and an etag-guarded UPDATE (update); a
//! zero-row UPDATE is probed to tell a vanished document from a stale token.

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::document::{Etag, RawDocument};
use crate::entity::EntityType;
use crate::error::StoreError;
use crate::partition::PartitionKey;
use crate::ports::{DocumentStore, DocumentStream, WritePrecondition};
use crate::query::DocumentQuery;

const SELECT_COLUMNS: &str =
    "SELECT id, partition_key, entity_type, etag, created_at, updated_at, body FROM documents";

/// SQLite implementation of the document container.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{db_path}?mode=rwc"))
            .await
            .map_err(|e| StoreError::unavailable("connect", e))?;
        Self::prepare(pool).await
    }

    /// Private in-process database, handy for tests. Pinned to a single
    /// connection: every `sqlite::memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::unavailable("connect", e))?;
        Self::prepare(pool).await
    }

    async fn prepare(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT NOT NULL,
                partition_key TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                etag TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (partition_key, id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::unavailable("connect", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_entity_type ON documents (entity_type)",
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::unavailable("connect", e))?;

        tracing::info!("document store schema ready");
        Ok(Self { pool })
    }
}

fn row_to_raw(row: &SqliteRow) -> Result<RawDocument, StoreError> {
    let id_str: String = row.get("id");
    let partition_key_str: String = row.get("partition_key");
    let entity_type_str: String = row.get("entity_type");
    let etag: String = row.get("etag");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");
    let body_json: String = row.get("body");

    let id = Uuid::parse_str(&id_str)
        .map_err(|e| StoreError::serialization(format!("stored id '{id_str}': {e}")))?;
    let partition_key = PartitionKey::parse(&partition_key_str)?;
    let entity_type: EntityType = entity_type_str
        .parse()
        .map_err(StoreError::serialization)?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| StoreError::serialization(format!("created_at of {id}: {e}")))?
        .with_timezone(&chrono::Utc);
    let updated_at = chrono::DateTime::parse_from_rfc3339(&updated_at_str)
        .map_err(|e| StoreError::serialization(format!("updated_at of {id}: {e}")))?
        .with_timezone(&chrono::Utc);
    let body = serde_json::from_str(&body_json)
        .map_err(|e| StoreError::serialization(format!("body of {id}: {e}")))?;

    Ok(RawDocument {
        id,
        partition_key,
        entity_type,
        etag: Some(Etag::from(etag)),
        created_at,
        updated_at,
        body,
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn read(
        &self,
        id: Uuid,
        partition_key: &PartitionKey,
    ) -> Result<Option<RawDocument>, StoreError> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE partition_key = ? AND id = ?"
        ))
        .bind(partition_key.as_str())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable("read", e))?;

        row.as_ref().map(row_to_raw).transpose()
    }

    async fn write(
        &self,
        document: &RawDocument,
        precondition: WritePrecondition,
    ) -> Result<Etag, StoreError> {
        let body_json = serde_json::to_string(&document.body)
            .map_err(|e| StoreError::serialization(format!("body of {}: {e}", document.id)))?;
        let etag = Etag::generate();

        match precondition {
            WritePrecondition::MustBeNew => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO documents
                        (id, partition_key, entity_type, etag, created_at, updated_at, body)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(document.id.to_string())
                .bind(document.partition_key.as_str())
                .bind(document.entity_type.as_str())
                .bind(etag.as_str())
                .bind(document.created_at.to_rfc3339())
                .bind(document.updated_at.to_rfc3339())
                .bind(body_json)
                .execute(&self.pool)
                .await;

                match result {
                    Ok(_) => Ok(etag),
                    Err(e)
                        if e.as_database_error()
                            .is_some_and(|db| db.is_unique_violation()) =>
                    {
                        Err(StoreError::already_exists(document.entity_type, document.id))
                    }
                    Err(e) => Err(StoreError::unavailable("write", e)),
                }
            }
            WritePrecondition::IfMatch(expected) => {
                let result = sqlx::query(
                    r#"
                    UPDATE documents
                    SET etag = ?, updated_at = ?, body = ?
                    WHERE partition_key = ? AND id = ? AND etag = ?
                    "#,
                )
                .bind(etag.as_str())
                .bind(document.updated_at.to_rfc3339())
                .bind(body_json)
                .bind(document.partition_key.as_str())
                .bind(document.id.to_string())
                .bind(expected.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::unavailable("write", e))?;

                if result.rows_affected() > 0 {
                    return Ok(etag);
                }

                // Zero rows: either the document vanished or the token is stale
                let exists = sqlx::query("SELECT 1 FROM documents WHERE partition_key = ? AND id = ?")
                    .bind(document.partition_key.as_str())
                    .bind(document.id.to_string())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| StoreError::unavailable("write", e))?;

                if exists.is_some() {
                    tracing::warn!(id = %document.id, "rejected stale write");
                    Err(StoreError::version_conflict(document.id))
                } else {
                    Err(StoreError::not_found(document.entity_type, document.id))
                }
            }
        }
    }

    async fn delete(&self, id: Uuid, partition_key: &PartitionKey) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE partition_key = ? AND id = ?")
            .bind(partition_key.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::unavailable("delete", e))?;
        Ok(())
    }

    async fn query(&self, query: DocumentQuery) -> Result<DocumentStream, StoreError> {
        // Scope by discriminator and partition in SQL; filter predicates are
        // evaluated on the decoded body, same as the in-memory backend.
        let rows = match query.partition_key() {
            Some(partition_key) => {
                sqlx::query(&format!(
                    "{SELECT_COLUMNS} WHERE entity_type = ? AND partition_key = ?"
                ))
                .bind(query.entity_type().as_str())
                .bind(partition_key.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!("{SELECT_COLUMNS} WHERE entity_type = ?"))
                    .bind(query.entity_type().as_str())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| StoreError::unavailable("query", e))?;

        let mut matches = Vec::new();
        for row in &rows {
            let raw = row_to_raw(row)?;
            if query.matches(&raw) {
                matches.push(raw);
            }
        }
        if let Some(limit) = query.max_results() {
            matches.truncate(limit);
        }
        Ok(stream::iter(matches.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use tripbldr_domain::TripId;

    fn raw_doc() -> RawDocument {
        RawDocument {
            id: Uuid::new_v4(),
            partition_key: PartitionKey::for_trip(TripId::new()).expect("derive"),
            entity_type: EntityType::Itinerary,
            etag: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            body: serde_json::json!({"title": "Lisbon week", "days": []}),
        }
    }

    #[tokio::test]
    async fn documents_survive_a_reopen() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let db_path = temp_dir.path().join("documents.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let doc = raw_doc();
        {
            let store = SqliteStore::new(&db_path_str).await.expect("open");
            store
                .write(&doc, WritePrecondition::MustBeNew)
                .await
                .expect("write");
        }

        let store = SqliteStore::new(&db_path_str).await.expect("reopen");
        let stored = store
            .read(doc.id, &doc.partition_key)
            .await
            .expect("read")
            .expect("present after reopen");
        assert_eq!(stored.id, doc.id);
        assert_eq!(stored.body, doc.body);
        assert!(stored.etag.is_some());
    }

    #[tokio::test]
    async fn stale_update_leaves_the_row_unchanged() {
        let store = SqliteStore::in_memory().await.expect("open");
        let mut doc = raw_doc();
        let etag = store
            .write(&doc, WritePrecondition::MustBeNew)
            .await
            .expect("create");

        doc.body = serde_json::json!({"title": "changed"});
        let err = store
            .write(&doc, WritePrecondition::IfMatch(Etag::generate()))
            .await
            .expect_err("stale token");
        assert!(err.is_version_conflict());

        let stored = store
            .read(doc.id, &doc.partition_key)
            .await
            .expect("read")
            .expect("present");
        assert_eq!(stored.etag, Some(etag));
        assert_eq!(stored.body["title"], "Lisbon week");
    }

    #[tokio::test]
    async fn update_of_a_missing_document_is_not_found() {
        let store = SqliteStore::in_memory().await.expect("open");
        let doc = raw_doc();
        let err = store
            .write(&doc, WritePrecondition::IfMatch(Etag::generate()))
            .await
            .expect_err("nothing stored");
        assert!(err.is_not_found());
    }
}
