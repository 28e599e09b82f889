//! Prompt Sync Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the source registry, corpus store,
//! orchestrator, background scheduler, and the Prometheus exporter.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prompt_sync::api::{create_router, AppState};
use prompt_sync::metrics::Metrics;
use prompt_sync::rate_limit::RateLimiter;
use prompt_sync::registry::SourceRegistry;
use prompt_sync::store::JsonFileStore;
use prompt_sync::sync::fetch::HttpFetcher;
use prompt_sync::sync::scheduler::{spawn_sync_scheduler, SyncSchedulerCfg};
use prompt_sync::sync::SyncOrchestrator;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prompt_sync=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let registry = Arc::new(SourceRegistry::load_default()?);
    tracing::info!(sources = registry.len(), "source registry loaded");

    let corpus_path =
        std::env::var("SYNC_CORPUS_PATH").unwrap_or_else(|_| "data/corpus.json".to_string());
    let store = Arc::new(JsonFileStore::new(corpus_path));

    let metrics = Metrics::init(registry.len());

    let orchestrator = Arc::new(SyncOrchestrator::new(
        registry,
        Arc::new(RateLimiter::new()),
        Arc::new(HttpFetcher::new()),
        store,
    ));

    // Optional periodic sync: SYNC_INTERVAL_SECS=0 (or unset) disables it.
    let interval_secs = std::env::var("SYNC_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    if interval_secs > 0 {
        spawn_sync_scheduler(SyncSchedulerCfg { interval_secs }, orchestrator.clone());
    }

    let router = create_router(AppState::new(orchestrator)).merge(metrics.router());

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
