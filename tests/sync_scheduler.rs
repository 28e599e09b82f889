// tests/sync_scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use prompt_sync::sync::scheduler::{spawn_sync_scheduler, SyncSchedulerCfg};
use prompt_sync::{
    FixtureFetcher, MemoryStore, RateLimitPolicy, RateLimiter, SourceConfig, SourceKind,
    SourceRegistry, SyncOrchestrator,
};

const CSV: &str = "\"act\",\"prompt\"\n\
    \"Storyteller\",\"You are a storyteller. Write a short fable about patience.\"";

#[tokio::test]
async fn smoke_first_tick_imports_records() {
    let source = SourceConfig {
        id: "ticker".to_string(),
        name: "Ticker Source".to_string(),
        kind: SourceKind::Repository,
        endpoint: "https://raw.example.test/prompts.csv".to_string(),
        rate_limit: RateLimitPolicy {
            requests_per_window: 10,
            window_minutes: 60,
        },
        attribution_template: "From {source}".to_string(),
        supported_languages: vec!["en".to_string()],
        categories: vec![],
        requires_auth: false,
        auth_ref: None,
        enabled: true,
    };

    let registry = Arc::new(SourceRegistry::new(vec![source]));
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(FixtureFetcher::new().with_payload("ticker", CSV));

    let orchestrator = Arc::new(
        SyncOrchestrator::new(
            registry,
            Arc::new(RateLimiter::new()),
            fetcher,
            store.clone(),
        )
        .with_pacing(Duration::ZERO),
    );

    // First tick fires immediately; a long interval keeps the test to one run.
    let handle = spawn_sync_scheduler(SyncSchedulerCfg { interval_secs: 3600 }, orchestrator);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let corpus = store.records.lock().unwrap().clone();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus[0].source_id, "ticker");

    assert!(!handle.is_finished());
    handle.abort();
}
