// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::registry::SourceKind;
use crate::sync::types::{SyncMetrics, SyncResult};
use crate::sync::SyncOrchestrator;

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<SyncOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<SyncOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sync", post(run_sync))
        .route("/sync/metrics", get(sync_metrics))
        .route("/sources", get(list_sources))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn run_sync(State(state): State<AppState>) -> Json<Vec<SyncResult>> {
    Json(state.orchestrator.sync_all().await)
}

async fn sync_metrics(State(state): State<AppState>) -> Json<Vec<SyncMetrics>> {
    Json(state.orchestrator.metrics_snapshot())
}

#[derive(serde::Serialize)]
struct SourceOut {
    id: String,
    name: String,
    kind: SourceKind,
    endpoint: String,
    enabled: bool,
    categories: Vec<String>,
}

async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceOut>> {
    let out = state
        .orchestrator
        .registry()
        .list()
        .iter()
        .map(|s| SourceOut {
            id: s.id.clone(),
            name: s.name.clone(),
            kind: s.kind,
            endpoint: s.endpoint.clone(),
            enabled: s.enabled,
            categories: s.categories.clone(),
        })
        .collect::<Vec<_>>();
    Json(out)
}
