//! Gateway orchestration: extract → structure → store for ingestion, and
//! retrieve → compare for analysis.
//!
//! The gateway owns no state beyond its collaborator handles. Collaborator failures are
//! surfaced once, without retries, and a failure before the store step commits nothing.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::comparison::{AnalysisMode, AnalysisReport, Comparator};
use crate::analysis::structuring::Structurer;
use crate::analysis::CollaboratorError;
use crate::documents::hashing::is_content_id;
use crate::documents::metadata::{DocumentOrigin, SourceKind};
use crate::documents::store::{
    latest_document, list_documents, retrieve_document, store_document, DocumentStore,
    StoreError, StoreOutcome, StoreReceipt,
};
use crate::events::{CvCreatedEvent, EventPublisher};
use crate::models::document::{DocumentRow, DocumentSummaryRow};
use crate::pdf::{ExtractionError, PdfExtractor};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("PDF extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("CV structuring failed: {0}")]
    Structuring(CollaboratorError),

    #[error("CV comparison failed: {0}")]
    Comparison(CollaboratorError),

    #[error("Unknown CV {0}")]
    UnknownDocument(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A CV as received from a client.
#[derive(Debug, Clone)]
pub enum IngestInput {
    Text {
        text: String,
        filename: Option<String>,
    },
    Pdf {
        bytes: Bytes,
        filename: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub cv_id: String,
    pub status: StoreOutcome,
    pub message: String,
}

impl From<StoreReceipt> for IngestResult {
    fn from(receipt: StoreReceipt) -> Self {
        let message = match receipt.outcome {
            StoreOutcome::Created => "CV stored successfully",
            StoreOutcome::AlreadyExists => "CV with this content already exists",
        };
        Self {
            cv_id: receipt.cv_id,
            status: receipt.outcome,
            message: message.to_string(),
        }
    }
}

pub struct Gateway {
    store: Arc<dyn DocumentStore>,
    structurer: Arc<dyn Structurer>,
    comparator: Arc<dyn Comparator>,
    events: Option<Arc<dyn EventPublisher>>,
    pdf: PdfExtractor,
    collaborator_timeout: Duration,
}

impl Gateway {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        structurer: Arc<dyn Structurer>,
        comparator: Arc<dyn Comparator>,
        pdf: PdfExtractor,
        collaborator_timeout: Duration,
    ) -> Self {
        Self {
            store,
            structurer,
            comparator,
            events: None,
            pdf,
            collaborator_timeout,
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub async fn ingest(&self, input: IngestInput) -> Result<IngestResult, GatewayError> {
        let (raw_text, kind, filename) = match input {
            IngestInput::Text { text, filename } => {
                (text.trim().to_string(), SourceKind::Text, filename)
            }
            IngestInput::Pdf { bytes, filename } => {
                (self.pdf.extract_text(bytes).await?, SourceKind::Pdf, filename)
            }
        };
        if raw_text.is_empty() {
            return Err(GatewayError::Validation("CV text is empty".to_string()));
        }

        let structured = self
            .with_deadline(self.structurer.structure(&raw_text))
            .await
            .map_err(GatewayError::Structuring)?;

        let origin = DocumentOrigin {
            kind,
            filename,
            structuring_model: self.structurer.model_name().to_string(),
        };
        let receipt = store_document(self.store.as_ref(), &raw_text, structured, &origin).await?;

        if receipt.outcome == StoreOutcome::Created {
            self.announce(&receipt).await;
        } else {
            info!("Ingest of CV {} short-circuited as duplicate", receipt.cv_id);
        }

        Ok(receipt.into())
    }

    pub async fn analyze(
        &self,
        cv_id: &str,
        jd_text: &str,
        mode: AnalysisMode,
    ) -> Result<AnalysisReport, GatewayError> {
        if jd_text.trim().is_empty() {
            return Err(GatewayError::Validation(
                "jd_text cannot be empty".to_string(),
            ));
        }

        // Malformed ids can never have been issued.
        if !is_content_id(cv_id) {
            return Err(GatewayError::UnknownDocument(cv_id.to_string()));
        }
        let document = match retrieve_document(self.store.as_ref(), cv_id).await {
            Ok(document) => document,
            Err(StoreError::NotFound(id)) => return Err(GatewayError::UnknownDocument(id)),
            Err(e) => return Err(e.into()),
        };

        self.with_deadline(self.comparator.compare(&document.structured, jd_text, mode))
            .await
            .map_err(GatewayError::Comparison)
    }

    pub async fn document(&self, cv_id: &str) -> Result<DocumentRow, GatewayError> {
        if !is_content_id(cv_id) {
            return Err(StoreError::NotFound(cv_id.to_string()).into());
        }
        Ok(retrieve_document(self.store.as_ref(), cv_id).await?)
    }

    pub async fn latest(&self) -> Result<DocumentRow, GatewayError> {
        Ok(latest_document(self.store.as_ref()).await?)
    }

    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<DocumentSummaryRow>, GatewayError> {
        Ok(list_documents(self.store.as_ref(), limit).await?)
    }

    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, CollaboratorError>>,
    ) -> Result<T, CollaboratorError> {
        tokio::time::timeout(self.collaborator_timeout, call)
            .await
            .map_err(|_| CollaboratorError::Timeout(self.collaborator_timeout))?
    }

    async fn announce(&self, receipt: &StoreReceipt) {
        let Some(events) = &self.events else {
            return;
        };
        let event = CvCreatedEvent {
            cv_id: receipt.cv_id.clone(),
            created_at: receipt.created_at,
        };
        if let Err(e) = events.publish_created(&event).await {
            warn!("Failed to publish created event for CV {}: {e}", receipt.cv_id);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::documents::hashing::content_id;
    use crate::pdf::test_support::single_page_pdf;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn text(text: &str) -> IngestInput {
        IngestInput::Text {
            text: text.to_string(),
            filename: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_ingest_returns_same_id_and_keeps_original() {
        let h = harness(FakeStructurer::default());
        let cv = "Jane Doe, Software Engineer...";

        let first = h.gateway.ingest(text(cv)).await.unwrap();
        let second = h.gateway.ingest(text(cv)).await.unwrap();

        assert_eq!(first.cv_id, content_id(cv));
        assert_eq!(first.status, StoreOutcome::Created);
        assert_eq!(second.cv_id, first.cv_id);
        assert_eq!(second.status, StoreOutcome::AlreadyExists);

        // Structured output of the first ingest (calls == 1) survives the second.
        let stored = h.gateway.document(&first.cv_id).await.unwrap();
        assert_eq!(
            stored.structured,
            json!({"contact": {"name": cv}, "calls": 1})
        );
        assert_eq!(h.events.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_text_input_trimmed_before_hashing() {
        let h = harness(FakeStructurer::default());
        let padded = h.gateway.ingest(text("  Jane Doe\n")).await.unwrap();
        let plain = h.gateway.ingest(text("Jane Doe")).await.unwrap();
        assert_eq!(padded.cv_id, content_id("Jane Doe"));
        assert_eq!(plain.status, StoreOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn test_blank_text_rejected_without_structuring() {
        let h = harness(FakeStructurer::default());
        let err = h.gateway.ingest(text(" \n\t ")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(h.structurer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_structuring_failure_stores_nothing() {
        let h = harness(FakeStructurer {
            fail: true,
            ..Default::default()
        });
        let err = h.gateway.ingest(text("Jane Doe")).await.unwrap_err();

        assert!(matches!(err, GatewayError::Structuring(_)));
        assert!(h.gateway.list(None).await.unwrap().is_empty());
        assert!(h.events.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_structuring_timeout_is_typed() {
        let h = harness(FakeStructurer {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let err = h.gateway.ingest(text("Jane Doe")).await.unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Structuring(CollaboratorError::Timeout(_))
        ));
        assert!(h.store.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pdf_and_text_of_same_cv_share_identity() {
        let h = harness(FakeStructurer::default());
        let from_pdf = h
            .gateway
            .ingest(IngestInput::Pdf {
                bytes: Bytes::from(single_page_pdf("Jane Doe Software Engineer")),
                filename: Some("jane.pdf".to_string()),
            })
            .await
            .unwrap();
        let from_text = h
            .gateway
            .ingest(text("Jane Doe Software Engineer"))
            .await
            .unwrap();

        assert_eq!(from_pdf.status, StoreOutcome::Created);
        assert_eq!(from_text.status, StoreOutcome::AlreadyExists);
        assert_eq!(from_text.cv_id, from_pdf.cv_id);
        let stored = h.gateway.document(&from_pdf.cv_id).await.unwrap();
        assert_eq!(stored.metadata["extraction_method"], "pdf");
    }

    #[tokio::test]
    async fn test_invalid_pdf_fails_extraction_without_structuring() {
        let h = harness(FakeStructurer::default());
        let err = h
            .gateway
            .ingest(IngestInput::Pdf {
                bytes: Bytes::from_static(b"not a pdf"),
                filename: Some("cv.pdf".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Extraction(_)));
        assert_eq!(h.structurer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_unknown_document_skips_comparator() {
        let h = harness(FakeStructurer::default());
        let unknown = content_id("never ingested");
        let err = h
            .gateway
            .analyze(&unknown, "Rust engineer", AnalysisMode::Keywords)
            .await
            .unwrap_err();

        match err {
            GatewayError::UnknownDocument(id) => assert_eq!(id, unknown),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(h.comparator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_passes_stored_structure_to_comparator() {
        let h = harness(FakeStructurer::default());
        let ingested = h.gateway.ingest(text("Jane Doe\nRust")).await.unwrap();

        let report = h
            .gateway
            .analyze(&ingested.cv_id, "Kafka", AnalysisMode::Keywords)
            .await
            .unwrap();

        let AnalysisReport::Keywords(report) = report else {
            panic!("expected keyword report");
        };
        assert_eq!(report.technical.present, vec!["Jane Doe".to_string()]);
        assert_eq!(report.technical.missing, vec!["Kafka".to_string()]);
        assert_eq!(h.comparator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_blank_jd_rejected() {
        let h = harness(FakeStructurer::default());
        let ingested = h.gateway.ingest(text("Jane Doe")).await.unwrap();
        let err = h
            .gateway
            .analyze(&ingested.cv_id, "   ", AnalysisMode::Score)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(h.comparator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_id_is_unknown() {
        let h = harness(FakeStructurer::default());
        let err = h
            .gateway
            .analyze("../etc/passwd", "Rust", AnalysisMode::Score)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownDocument(_)));
        assert!(matches!(
            h.gateway.document("nope").await.unwrap_err(),
            GatewayError::Store(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_created_event_carries_cv_id() {
        let h = harness(FakeStructurer::default());
        let ingested = h.gateway.ingest(text("Jane Doe")).await.unwrap();
        let stored = h.gateway.document(&ingested.cv_id).await.unwrap();
        let events = h.events.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].cv_id, ingested.cv_id);
        assert_eq!(events[0].created_at, stored.created_at);
    }
}
