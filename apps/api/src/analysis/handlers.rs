//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::comparison::{AnalysisMode, AnalysisReport};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub cv_id: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub cv_id: String,
    pub mode: AnalysisMode,
    pub report: AnalysisReport,
}

/// POST /api/v1/analysis/keywords
///
/// Technical and soft-skill keywords from the JD, split into present and missing.
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    analyze(state, request, AnalysisMode::Keywords).await
}

/// POST /api/v1/analysis/score
///
/// Overall 0-100 fit score with a per-category breakdown.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    analyze(state, request, AnalysisMode::Score).await
}

async fn analyze(
    state: AppState,
    request: AnalysisRequest,
    mode: AnalysisMode,
) -> Result<Json<AnalysisResponse>, AppError> {
    let report = state
        .gateway
        .analyze(&request.cv_id, &request.jd_text, mode)
        .await?;
    Ok(Json(AnalysisResponse {
        cv_id: request.cv_id,
        mode,
        report,
    }))
}
