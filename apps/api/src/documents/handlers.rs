//! Axum route handlers for the CV document API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::documents::store::StoreOutcome;
use crate::errors::AppError;
use crate::gateway::{IngestInput, IngestResult};
use crate::models::document::{DocumentRow, DocumentSummaryRow};
use crate::state::AppState;

/// Multipart field carrying the PDF upload.
pub const PDF_FIELD: &str = "cv_file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadTextRequest {
    pub cv_text: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub cvs: Vec<DocumentSummaryRow>,
    pub count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cvs/text
///
/// Structures and stores a CV supplied as plain text. Returns 201 for a new CV and
/// 200 when identical content was stored before.
pub async fn handle_upload_text(
    State(state): State<AppState>,
    Json(request): Json<UploadTextRequest>,
) -> Result<(StatusCode, Json<IngestResult>), AppError> {
    let result = state
        .gateway
        .ingest(IngestInput::Text {
            text: request.cv_text,
            filename: request.filename,
        })
        .await?;
    Ok(ingest_response(result))
}

/// POST /api/v1/cvs/pdf
///
/// Multipart upload; the PDF goes in the `cv_file` field.
pub async fn handle_upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<IngestResult>), AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(PDF_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        upload = Some((bytes, filename));
        break;
    }

    let Some((bytes, filename)) = upload else {
        return Err(AppError::Validation(format!(
            "multipart field '{PDF_FIELD}' is required"
        )));
    };
    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    let result = state
        .gateway
        .ingest(IngestInput::Pdf { bytes, filename })
        .await?;
    Ok(ingest_response(result))
}

/// GET /api/v1/cvs?limit=N
///
/// Summaries of stored CVs, newest first.
pub async fn handle_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let cvs = state.gateway.list(query.limit).await?;
    Ok(Json(ListResponse {
        count: cvs.len(),
        cvs,
    }))
}

/// GET /api/v1/cvs/latest
pub async fn handle_latest(State(state): State<AppState>) -> Result<Json<DocumentRow>, AppError> {
    Ok(Json(state.gateway.latest().await?))
}

/// GET /api/v1/cvs/:cv_id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(cv_id): Path<String>,
) -> Result<Json<DocumentRow>, AppError> {
    Ok(Json(state.gateway.document(&cv_id).await?))
}

fn ingest_response(result: IngestResult) -> (StatusCode, Json<IngestResult>) {
    let status = match result.status {
        StoreOutcome::Created => StatusCode::CREATED,
        StoreOutcome::AlreadyExists => StatusCode::OK,
    };
    (status, Json(result))
}
