// External collaborators backed by the LLM: CV structuring and CV vs JD comparison.
// All LLM calls go through llm_client; no direct provider calls here.

use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

pub mod comparison;
pub mod handlers;
pub mod prompts;
pub mod structuring;

/// Failure of an external collaborator call.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("malformed response: {0}")]
    Malformed(String),
}
