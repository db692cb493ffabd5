use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::documents::store::{DocumentStore, StoreError, StoreOutcome};
use crate::models::document::{DocumentRow, DocumentSummaryRow};

#[derive(Default)]
struct Inner {
    rows: HashMap<String, (u64, DocumentRow)>,
    next_seq: u64,
}

/// Process-local store. Check-and-insert happens under a single write guard, which is the
/// uniqueness constraint for this backend. Only suitable for tests and single-process runs.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows sorted newest first.
    async fn sorted(&self) -> Vec<DocumentRow> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner.rows.values().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        rows.into_iter().map(|(_, row)| row.clone()).collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_if_absent(&self, row: &DocumentRow) -> Result<StoreOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.rows.contains_key(&row.cv_id) {
            return Ok(StoreOutcome::AlreadyExists);
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.insert(row.cv_id.clone(), (seq, row.clone()));
        Ok(StoreOutcome::Created)
    }

    async fn find(&self, cv_id: &str) -> Result<Option<DocumentRow>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(cv_id).map(|(_, row)| row.clone()))
    }

    async fn list_recent(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<DocumentSummaryRow>, StoreError> {
        let rows = self.sorted().await;
        let limit = limit.map(|l| l as usize).unwrap_or(rows.len());
        Ok(rows.iter().take(limit).map(DocumentSummaryRow::from).collect())
    }

    async fn latest(&self) -> Result<Option<DocumentRow>, StoreError> {
        Ok(self.sorted().await.into_iter().next())
    }

    async fn close(&self) {}

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
