//! Content-addressed, deduplicating CV storage.
//!
//! `DocumentStore` is the seam between the service and its persistence backend. Backends
//! only need insert-if-absent, get-by-key and newest-first listing; uniqueness of `cv_id`
//! is the backend's job and must hold across processes, so no in-process locking happens
//! in this module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::documents::hashing::content_id;
use crate::documents::metadata::{derive_metadata, DocumentOrigin};
use crate::models::document::{DocumentRow, DocumentSummaryRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("CV {0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result tag of a store attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReceipt {
    pub cv_id: String,
    pub outcome: StoreOutcome,
    /// Creation time of the stored record, which predates this call on a duplicate.
    pub created_at: DateTime<Utc>,
}

/// Persistence backend for CVs.
///
/// `insert_if_absent` must be atomic per `cv_id`: of any number of concurrent inserts with
/// the same key exactly one returns `Created`. A uniqueness violation is an
/// `AlreadyExists` outcome, never an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_if_absent(&self, row: &DocumentRow) -> Result<StoreOutcome, StoreError>;

    async fn find(&self, cv_id: &str) -> Result<Option<DocumentRow>, StoreError>;

    /// Newest first by `created_at`, ties broken by insertion order.
    async fn list_recent(&self, limit: Option<u32>)
        -> Result<Vec<DocumentSummaryRow>, StoreError>;

    async fn latest(&self) -> Result<Option<DocumentRow>, StoreError>;

    /// Releases backend resources. Called once at shutdown.
    async fn close(&self);

    fn backend_name(&self) -> &'static str;
}

/// Stores a CV unless one with identical raw text already exists.
///
/// The existing record is never touched on a duplicate: its structured content, metadata
/// and timestamps stay as first written.
pub async fn store_document(
    store: &dyn DocumentStore,
    raw_text: &str,
    structured: Value,
    origin: &DocumentOrigin,
) -> Result<StoreReceipt, StoreError> {
    let cv_id = content_id(raw_text);

    if let Some(existing) = store.find(&cv_id).await? {
        debug!("CV {cv_id} already stored, skipping insert");
        return Ok(StoreReceipt {
            cv_id,
            outcome: StoreOutcome::AlreadyExists,
            created_at: existing.created_at,
        });
    }

    let now = Utc::now();
    let metadata = derive_metadata(raw_text, origin, now);
    let row = DocumentRow {
        cv_id: cv_id.clone(),
        raw_text: raw_text.to_string(),
        structured,
        metadata: serde_json::to_value(&metadata)?,
        created_at: now,
        updated_at: now,
    };

    // A concurrent request may have won the race since the lookup above.
    let outcome = store.insert_if_absent(&row).await?;
    let created_at = match outcome {
        StoreOutcome::Created => {
            info!(
                "Stored CV {cv_id} ({} chars) in {}",
                metadata.character_count,
                store.backend_name()
            );
            now
        }
        StoreOutcome::AlreadyExists => {
            debug!("CV {cv_id} inserted concurrently elsewhere");
            retrieve_document(store, &cv_id).await?.created_at
        }
    };

    Ok(StoreReceipt {
        cv_id,
        outcome,
        created_at,
    })
}

pub async fn retrieve_document(
    store: &dyn DocumentStore,
    cv_id: &str,
) -> Result<DocumentRow, StoreError> {
    store
        .find(cv_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(cv_id.to_string()))
}

pub async fn list_documents(
    store: &dyn DocumentStore,
    limit: Option<u32>,
) -> Result<Vec<DocumentSummaryRow>, StoreError> {
    store.list_recent(limit).await
}

pub async fn latest_document(store: &dyn DocumentStore) -> Result<DocumentRow, StoreError> {
    store
        .latest()
        .await?
        .ok_or_else(|| StoreError::NotFound("latest".to_string()))
}
