pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV documents
        .route("/api/v1/cvs", get(documents::handle_list))
        .route("/api/v1/cvs/latest", get(documents::handle_latest))
        .route("/api/v1/cvs/text", post(documents::handle_upload_text))
        .route("/api/v1/cvs/pdf", post(documents::handle_upload_pdf))
        .route("/api/v1/cvs/:cv_id", get(documents::handle_get))
        // Analysis
        .route("/api/v1/analysis/keywords", post(analysis::handle_keywords))
        .route("/api/v1/analysis/score", post(analysis::handle_score))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
