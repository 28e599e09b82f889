// tests/sync_isolation.rs
use std::sync::Arc;
use std::time::Duration;

use prompt_sync::{
    FixtureFetcher, MemoryStore, RateLimiter, SourceConfig, SourceKind, SourceRegistry,
    SyncOrchestrator,
};

fn source(id: &str, endpoint: &str) -> SourceConfig {
    SourceConfig {
        id: id.to_string(),
        name: id.to_string(),
        kind: SourceKind::Api,
        endpoint: endpoint.to_string(),
        rate_limit: Default::default(),
        attribution_template: "Imported from {source}".to_string(),
        supported_languages: vec!["en".to_string()],
        categories: vec![],
        requires_auth: false,
        auth_ref: None,
        enabled: true,
    }
}

#[tokio::test]
async fn one_failing_source_never_aborts_the_run() {
    let registry = Arc::new(SourceRegistry::new(vec![
        source("first", "https://a.test/prompts.json"),
        source("second", "https://b.test/prompts.json"),
        source("third", "https://c.test/prompts.json"),
    ]));
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .with_payload(
                "first",
                r#"[{"title":"One","prompt":"First body with enough text."}]"#,
            )
            .with_failure("second", "connection refused")
            .with_payload(
                "third",
                r#"[{"title":"Three","prompt":"Third body with enough text."}]"#,
            ),
    );

    let orchestrator = SyncOrchestrator::new(
        registry,
        Arc::new(RateLimiter::new()),
        fetcher,
        store.clone(),
    )
    .with_pacing(Duration::ZERO);

    let results = orchestrator.sync_all().await;

    // Exactly one result per source, registry order preserved.
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].source_id, "first");
    assert_eq!(results[1].source_id, "second");
    assert_eq!(results[2].source_id, "third");

    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[2].success);

    assert_eq!(results[1].records_found, 0);
    assert_eq!(results[1].records_imported, 0);
    assert_eq!(results[1].errors.len(), 1);
    assert!(
        results[1].errors[0].contains("connection refused"),
        "transport error should be reported: {:?}",
        results[1].errors
    );

    // Committed records from healthy sources are unaffected.
    assert_eq!(store.records.lock().unwrap().len(), 2);

    // The failure also lands in the metrics map.
    let metrics = orchestrator.metrics_snapshot();
    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics[1].errors.len(), 1);
    assert_eq!(metrics[1].successful_requests, 0);
    assert_eq!(metrics[1].total_requests, 1);
}

#[tokio::test]
async fn undecodable_payload_is_fatal_for_that_source_only() {
    let registry = Arc::new(SourceRegistry::new(vec![
        source("bad", "https://a.test/prompts.json"),
        source("good", "https://b.test/prompts.json"),
    ]));
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(
        FixtureFetcher::new()
            // filename hint says json, but the payload is not decodable
            .with_payload("bad", "{{{ definitely not json")
            .with_payload(
                "good",
                r#"[{"title":"Ok","prompt":"A perfectly fine body."}]"#,
            ),
    );

    let orchestrator = SyncOrchestrator::new(
        registry,
        Arc::new(RateLimiter::new()),
        fetcher,
        store.clone(),
    )
    .with_pacing(Duration::ZERO);

    let results = orchestrator.sync_all().await;
    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert!(results[0].errors[0].starts_with("parse:"));
    assert!(results[1].success);
    assert_eq!(results[1].records_imported, 1);
}

#[tokio::test]
async fn persistence_failure_is_fatal_for_the_source() {
    let registry = Arc::new(SourceRegistry::new(vec![source(
        "src",
        "https://a.test/prompts.json",
    )]));
    let store = Arc::new(MemoryStore::new());
    store
        .fail_appends
        .store(true, std::sync::atomic::Ordering::Relaxed);
    let fetcher = Arc::new(FixtureFetcher::new().with_payload(
        "src",
        r#"[{"title":"T","prompt":"Body that would have been imported."}]"#,
    ));

    let orchestrator = SyncOrchestrator::new(
        registry,
        Arc::new(RateLimiter::new()),
        fetcher,
        store.clone(),
    )
    .with_pacing(Duration::ZERO);

    let results = orchestrator.sync_all().await;
    assert!(!results[0].success);
    assert!(results[0].errors[0].starts_with("persist:"));
    assert!(store.records.lock().unwrap().is_empty());
}
