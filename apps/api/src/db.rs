use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the CV table and its indexes if they do not exist yet.
///
/// `cv_id` is the primary key: the dedup guarantee rests on it.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cv_documents (
            seq         BIGSERIAL,
            cv_id       TEXT PRIMARY KEY,
            raw_text    TEXT NOT NULL,
            structured  JSONB NOT NULL,
            metadata    JSONB NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL,
            updated_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS cv_documents_created_at_idx \
         ON cv_documents (created_at DESC, seq DESC)",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
