use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::db::{create_pool, ensure_schema};
use crate::documents::store::{DocumentStore, StoreError, StoreOutcome};
use crate::models::document::{DocumentRow, DocumentSummaryRow};

/// PostgreSQL-backed CV store. Safe to share between horizontally scaled instances: the
/// primary key on `cv_id` arbitrates concurrent inserts.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn open(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = create_pool(database_url, max_connections).await?;
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_if_absent(&self, row: &DocumentRow) -> Result<StoreOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO cv_documents
                (cv_id, raw_text, structured, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (cv_id) DO NOTHING
            "#,
        )
        .bind(&row.cv_id)
        .bind(&row.raw_text)
        .bind(&row.structured)
        .bind(&row.metadata)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => Ok(StoreOutcome::Created),
            Ok(_) => Ok(StoreOutcome::AlreadyExists),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Ok(StoreOutcome::AlreadyExists)
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn find(&self, cv_id: &str) -> Result<Option<DocumentRow>, StoreError> {
        Ok(sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT cv_id, raw_text, structured, metadata, created_at, updated_at
            FROM cv_documents
            WHERE cv_id = $1
            "#,
        )
        .bind(cv_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_recent(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<DocumentSummaryRow>, StoreError> {
        // LIMIT NULL means no limit in PostgreSQL.
        Ok(sqlx::query_as::<_, DocumentSummaryRow>(
            r#"
            SELECT cv_id, metadata->>'filename' AS filename, created_at
            FROM cv_documents
            ORDER BY created_at DESC, seq DESC
            LIMIT $1
            "#,
        )
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn latest(&self) -> Result<Option<DocumentRow>, StoreError> {
        Ok(sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT cv_id, raw_text, structured, metadata, created_at, updated_at
            FROM cv_documents
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
