use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::CollaboratorError;
use crate::documents::store::StoreError;
use crate::gateway::GatewayError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(msg) => AppError::Validation(msg),
            GatewayError::Extraction(e) => AppError::UnprocessableEntity(e.to_string()),
            GatewayError::UnknownDocument(id) => AppError::NotFound(format!("CV {id} not found")),
            GatewayError::Structuring(e) => collaborator_error("Structuring", e),
            GatewayError::Comparison(e) => collaborator_error("Comparison", e),
            GatewayError::Store(StoreError::NotFound(id)) => {
                AppError::NotFound(format!("CV {id} not found"))
            }
            GatewayError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

fn collaborator_error(step: &str, err: CollaboratorError) -> AppError {
    match err {
        CollaboratorError::Timeout(_) => AppError::UpstreamTimeout(format!("{step}: {err}")),
        _ => AppError::Upstream(format!("{step}: {err}")),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::UpstreamTimeout(msg) => {
                tracing::error!("Upstream timeout: {msg}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    "The AI provider did not respond in time".to_string(),
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::ExtractionError;
    use std::time::Duration;

    fn status_of(err: GatewayError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_gateway_error_status_mapping() {
        assert_eq!(
            status_of(GatewayError::Validation("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GatewayError::Extraction(ExtractionError::NoText)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(GatewayError::UnknownDocument("abc".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(GatewayError::Store(StoreError::NotFound("abc".into()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(GatewayError::Structuring(CollaboratorError::Malformed(
                "x".into()
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GatewayError::Comparison(CollaboratorError::Timeout(
                Duration::from_secs(1)
            ))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(GatewayError::Store(StoreError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
