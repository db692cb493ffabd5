mod analysis;
mod config;
mod db;
mod documents;
mod errors;
mod events;
mod gateway;
mod llm_client;
mod models;
mod pdf;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::comparison::LlmComparator;
use crate::analysis::structuring::LlmStructurer;
use crate::config::{Config, StoreBackend};
use crate::documents::memory::MemoryDocumentStore;
use crate::documents::pg_store::PgDocumentStore;
use crate::documents::store::DocumentStore;
use crate::events::RedisEventPublisher;
use crate::gateway::Gateway;
use crate::llm_client::{LlmClient, LlmSettings};
use crate::pdf::PdfExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TailorCV API v{}", env!("CARGO_PKG_VERSION"));

    // Open the document store
    let store: Arc<dyn DocumentStore> = match &config.store_backend {
        StoreBackend::Postgres { database_url } => Arc::new(
            PgDocumentStore::open(database_url, config.database_max_connections).await?,
        ),
        StoreBackend::Memory => {
            warn!("Using in-memory document store; CVs will not survive a restart");
            Arc::new(MemoryDocumentStore::new())
        }
    };
    info!("Document store opened ({})", store.backend_name());

    // Initialize LLM collaborators
    let llm_settings = LlmSettings {
        api_key: config.anthropic_api_key.clone(),
        base_url: config.anthropic_base_url.clone(),
        request_timeout: config.llm_timeout,
        max_attempts: config.llm_max_attempts,
    };
    let collaborator_timeout = llm_settings.call_budget();
    let llm = LlmClient::new(llm_settings)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let mut gateway = Gateway::new(
        store.clone(),
        Arc::new(LlmStructurer::new(llm.clone())),
        Arc::new(LlmComparator::new(llm)),
        PdfExtractor::new(config.pdf_timeout),
        collaborator_timeout,
    );

    // Initialize Redis (optional ingest events)
    if let Some(redis_url) = &config.redis_url {
        let redis = redis::Client::open(redis_url.as_str())?;
        gateway = gateway.with_events(Arc::new(RedisEventPublisher::new(
            redis,
            config.events_key.clone(),
        )));
        info!("Redis event publisher initialized (key: {})", config.events_key);
    }

    let state = AppState {
        gateway: Arc::new(gateway),
    };

    // Build router
    let app = build_router(state, config.max_upload_bytes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the frontend host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Document store closed");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
