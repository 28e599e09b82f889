// src/sync/mod.rs
pub mod fetch;
pub mod scheduler;
pub mod types;
pub mod worker;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::rate_limit::RateLimiter;
use crate::registry::SourceRegistry;
use crate::store::PromptStore;
use crate::sync::fetch::ContentFetcher;
use crate::sync::types::{SyncMetrics, SyncResult};
use crate::sync::worker::SourceSyncWorker;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "sync_records_found_total",
            "Records parsed from source payloads."
        );
        describe_counter!(
            "sync_records_imported_total",
            "Records appended to the corpus after dedup."
        );
        describe_counter!(
            "sync_duplicates_total",
            "Records dropped as duplicates of the corpus."
        );
        describe_counter!(
            "sync_source_errors_total",
            "Source fetch/parse/persist failures."
        );
        describe_counter!(
            "sync_rate_limited_total",
            "Source syncs skipped because the window was exhausted."
        );
        describe_counter!("sync_runs_total", "Completed sync_all invocations.");
        describe_histogram!("sync_parse_ms", "Payload parse time in milliseconds.");
        describe_gauge!("sync_last_run_ts", "Unix ts when a sync run last finished.");
    });
}

/// Delay applied between sources so third-party endpoints are never hit
/// back-to-back.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Drives one sequential sync pass over the registry. Sources are
/// processed in registration order; one source's failure never aborts the
/// loop.
pub struct SyncOrchestrator {
    registry: Arc<SourceRegistry>,
    limiter: Arc<RateLimiter>,
    fetcher: Arc<dyn ContentFetcher>,
    store: Arc<dyn PromptStore>,
    pacing: Duration,
    metrics: Mutex<HashMap<String, SyncMetrics>>,
}

impl SyncOrchestrator {
    pub fn new(
        registry: Arc<SourceRegistry>,
        limiter: Arc<RateLimiter>,
        fetcher: Arc<dyn ContentFetcher>,
        store: Arc<dyn PromptStore>,
    ) -> Self {
        Self {
            registry,
            limiter,
            fetcher,
            store,
            pacing: DEFAULT_PACING,
            metrics: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Run every active source once and collect the per-source results.
    pub async fn sync_all(&self) -> Vec<SyncResult> {
        self.sync_all_with_cancel(&AtomicBool::new(false)).await
    }

    /// Like [`sync_all`](Self::sync_all), with a cancellation flag checked
    /// between sources. Early termination returns the results gathered so
    /// far; it is not an error condition.
    pub async fn sync_all_with_cancel(&self, cancel: &AtomicBool) -> Vec<SyncResult> {
        ensure_metrics_described();

        let worker = SourceSyncWorker::new(&self.limiter, self.fetcher.as_ref(), self.store.as_ref());
        let active: Vec<_> = self.registry.active().collect();
        let mut results = Vec::with_capacity(active.len());

        for (i, source) in active.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(completed = results.len(), "sync run cancelled");
                break;
            }

            let (result, stats) = worker.run(source).await;
            self.metrics
                .lock()
                .expect("metrics mutex poisoned")
                .insert(source.id.clone(), stats);
            results.push(result);

            // Inter-source pacing, skipped after the last source.
            if i + 1 < active.len() && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        let now = chrono::Utc::now().timestamp().max(0) as u64;
        counter!("sync_runs_total").increment(1);
        gauge!("sync_last_run_ts").set(now as f64);

        tracing::info!(
            sources = results.len(),
            imported = results.iter().map(|r| r.records_imported).sum::<usize>(),
            failed = results.iter().filter(|r| !r.success).count(),
            "sync run complete"
        );

        results
    }

    /// Read-only metrics accessor, registry order. Entries are overwritten
    /// per run, not accumulated across runs.
    pub fn metrics_snapshot(&self) -> Vec<SyncMetrics> {
        let map = self.metrics.lock().expect("metrics mutex poisoned");
        self.registry
            .list()
            .iter()
            .filter_map(|s| map.get(&s.id).cloned())
            .collect()
    }
}
