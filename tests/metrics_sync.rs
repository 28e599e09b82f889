// tests/metrics_sync.rs
#![cfg(feature = "strict-metrics")]
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use prompt_sync::{
    FixtureFetcher, MemoryStore, RateLimiter, SourceConfig, SourceKind, SourceRegistry,
    SyncOrchestrator,
};

#[tokio::test]
async fn metrics_exposed_after_sync() {
    // Install a local recorder for the test
    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder().expect("recorder");

    let source = SourceConfig {
        id: "m".to_string(),
        name: "M".to_string(),
        kind: SourceKind::Repository,
        endpoint: "https://a.test/prompts.json".to_string(),
        rate_limit: Default::default(),
        attribution_template: "Imported from {source}".to_string(),
        supported_languages: vec!["en".to_string()],
        categories: vec![],
        requires_auth: false,
        auth_ref: None,
        enabled: true,
    };
    let orchestrator = SyncOrchestrator::new(
        Arc::new(SourceRegistry::new(vec![source])),
        Arc::new(RateLimiter::new()),
        Arc::new(FixtureFetcher::new().with_payload(
            "m",
            r#"[{"title":"T","prompt":"A body long enough to import."}]"#,
        )),
        Arc::new(MemoryStore::new()),
    )
    .with_pacing(Duration::ZERO);

    let _ = orchestrator.sync_all().await;

    // Scrape metrics text and check series presence by substring
    let out = handle.render();
    assert!(out.contains("sync_records_found_total"));
    assert!(out.contains("sync_records_imported_total"));
    assert!(out.contains("sync_runs_total"));
    assert!(out.contains("sync_parse_ms"));
    assert!(out.contains("sync_last_run_ts"));
}
