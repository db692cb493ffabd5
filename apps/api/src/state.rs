use std::sync::Arc;

use crate::gateway::Gateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrates extraction, structuring, storage and comparison.
    pub gateway: Arc<Gateway>,
}
