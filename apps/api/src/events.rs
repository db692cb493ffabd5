//! Ingest notifications for downstream consumers (e.g. an embedding worker).
//!
//! Publishing is best-effort: the CV is already committed when an event goes out, so a
//! failure here is logged by the caller and never fails the ingest.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Publishing timed out after {0:?}")]
    Timeout(Duration),
}

/// Emitted once per newly created CV. Never emitted for duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvCreatedEvent {
    pub cv_id: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_created(&self, event: &CvCreatedEvent) -> Result<(), EventError>;
}

/// Pushes events as JSON onto a Redis list; consumers pop from the other end.
///
/// The connection is opened on first publish and then shared. `ConnectionManager`
/// reconnects on its own, so a Redis restart does not need a service restart.
pub struct RedisEventPublisher {
    client: redis::Client,
    key: String,
    conn: OnceCell<ConnectionManager>,
}

impl RedisEventPublisher {
    pub fn new(client: redis::Client, key: String) -> Self {
        Self {
            client,
            key,
            conn: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager, EventError> {
        let conn = self
            .conn
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish_created(&self, event: &CvCreatedEvent) -> Result<(), EventError> {
        let payload = serde_json::to_string(event)?;
        let publish = async {
            let mut conn = self.connection().await?;
            conn.lpush::<_, _, ()>(&self.key, payload).await?;
            Ok::<_, EventError>(())
        };
        tokio::time::timeout(PUBLISH_TIMEOUT, publish)
            .await
            .map_err(|_| EventError::Timeout(PUBLISH_TIMEOUT))?
    }
}
