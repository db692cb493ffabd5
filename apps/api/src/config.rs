use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_max_connections: u32,
    /// Ingest events are disabled when unset.
    pub redis_url: Option<String>,
    pub events_key: String,
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    pub llm_timeout: Duration,
    pub llm_max_attempts: u32,
    pub pdf_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let parsed = |key: &str, default: &str| -> Result<u64> {
            lookup(key)
                .unwrap_or_else(|| default.to_string())
                .parse::<u64>()
                .with_context(|| format!("{key} must be a non-negative integer"))
        };

        let store_backend = match lookup("STORE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => StoreBackend::Postgres {
                database_url: require("DATABASE_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        Ok(Config {
            store_backend,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", "10")?
                .try_into()
                .context("DATABASE_MAX_CONNECTIONS is too large")?,
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            events_key: lookup("CV_EVENTS_KEY").unwrap_or_else(|| "cv_embedding_queue".to_string()),
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            anthropic_base_url: lookup("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(parsed("LLM_TIMEOUT_SECS", "60")?),
            llm_max_attempts: parsed("LLM_MAX_ATTEMPTS", "1")?
                .clamp(1, 5)
                .try_into()
                .context("LLM_MAX_ATTEMPTS is out of range")?,
            pdf_timeout: Duration::from_secs(parsed("PDF_TIMEOUT_SECS", "20")?),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", "10485760")?
                .try_into()
                .context("MAX_UPLOAD_BYTES is too large")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
