// src/sync/worker.rs
//! Per-source sync pipeline: budget check -> fetch -> parse -> attribute
//! -> classify -> dedup-filter -> persist.
//!
//! No error escapes [`SourceSyncWorker::run`]; every failure mode is
//! folded into the returned `SyncResult`.

use chrono::Utc;
use metrics::counter;

use crate::classify;
use crate::dedup::DedupIndex;
use crate::parse::{self, ParseHint};
use crate::rate_limit::RateLimiter;
use crate::registry::SourceConfig;
use crate::store::PromptStore;
use crate::sync::fetch::ContentFetcher;
use crate::sync::types::{SyncMetrics, SyncResult};

pub struct SourceSyncWorker<'a> {
    pub limiter: &'a RateLimiter,
    pub fetcher: &'a dyn ContentFetcher,
    pub store: &'a dyn PromptStore,
}

impl<'a> SourceSyncWorker<'a> {
    pub fn new(
        limiter: &'a RateLimiter,
        fetcher: &'a dyn ContentFetcher,
        store: &'a dyn PromptStore,
    ) -> Self {
        Self {
            limiter,
            fetcher,
            store,
        }
    }

    pub async fn run(&self, source: &SourceConfig) -> (SyncResult, SyncMetrics) {
        let t0 = std::time::Instant::now();
        let mut stats = SyncMetrics::begin(&source.id, Utc::now());

        let fail = |mut stats: SyncMetrics, message: String, t0: std::time::Instant| {
            tracing::warn!(source = %source.id, error = %message, "source sync failed");
            counter!("sync_source_errors_total").increment(1);
            stats.errors.push(message.clone());
            stats.finish(Utc::now());
            (
                SyncResult::failed(&source.id, message, elapsed_ms(t0)),
                stats,
            )
        };

        // 1) Budget. A denied window is an expected condition, not an error.
        if !self.limiter.try_acquire(&source.id, &source.rate_limit) {
            tracing::info!(source = %source.id, "rate limit window exhausted, skipping");
            counter!("sync_rate_limited_total").increment(1);
            stats.finish(Utc::now());
            return (
                SyncResult::skipped(&source.id, "rate limit window exhausted", elapsed_ms(t0)),
                stats,
            );
        }

        // 2) Fetch
        stats.total_requests += 1;
        let payload = match self.fetcher.fetch(source).await {
            Ok(p) => p,
            Err(e) => return fail(stats, format!("fetch: {e:#}"), t0),
        };
        stats.successful_requests += 1;

        // 3) Parse. Row-level drops are silent; only an undecodable
        //    payload is fatal here.
        let filename = endpoint_filename(&source.endpoint);
        let hint = ParseHint {
            source_id: &source.id,
            filename: filename
                .as_deref()
                .or_else(|| payload.is_json().then_some("payload.json")),
        };
        let mut records = match parse::parse(&payload.body, &hint) {
            Ok(r) => r,
            Err(e) => return fail(stats, format!("parse: {e:#}"), t0),
        };
        stats.records_found = records.len();

        // 4) + 5) Attribute and classify
        for rec in &mut records {
            rec.attribution = source.attribution();
            if rec.language.is_empty() {
                rec.language = source.default_language().to_string();
            }
            if rec.categories.is_empty() {
                rec.categories = classify::categorize(&rec.title, &rec.body, &source.categories);
            }
            if rec.tags.is_empty() {
                rec.tags = classify::extract_tags(&rec.title, &rec.body);
            }
            if rec.difficulty.is_none() {
                rec.difficulty = Some(classify::derive_difficulty(&rec.title, &rec.body));
            }
        }

        // 6) Dedup against the corpus snapshot (and within the batch)
        let corpus = match self.store.load().await {
            Ok(c) => c,
            Err(e) => return fail(stats, format!("store: {e:#}"), t0),
        };
        let mut index = DedupIndex::from_corpus(&corpus);
        let found = records.len();
        let mut importable = Vec::with_capacity(records.len());
        for rec in records {
            if index.is_duplicate(&rec) {
                counter!("sync_duplicates_total").increment(1);
                continue;
            }
            index.insert(&rec);
            importable.push(rec);
        }

        // 7) Persist
        let imported = importable.len();
        if !importable.is_empty() {
            if let Err(e) = self.store.append(importable).await {
                return fail(stats, format!("persist: {e:#}"), t0);
            }
        }
        counter!("sync_records_imported_total").increment(imported as u64);

        stats.records_imported = imported;
        stats.finish(Utc::now());
        tracing::info!(
            source = %source.id,
            found,
            imported,
            "source sync complete"
        );

        (
            SyncResult {
                source_id: source.id.clone(),
                success: true,
                records_found: found,
                records_imported: imported,
                records_updated: 0,
                errors: Vec::new(),
                duration_ms: elapsed_ms(t0),
                note: None,
            },
            stats,
        )
    }
}

fn elapsed_ms(t0: std::time::Instant) -> u64 {
    t0.elapsed().as_millis() as u64
}

/// Last path segment of the endpoint when it carries an extension, used
/// as the parser's filename hint.
fn endpoint_filename(endpoint: &str) -> Option<String> {
    let path = endpoint.split(['?', '#']).next().unwrap_or(endpoint);
    let seg = path.rsplit('/').next()?;
    (seg.contains('.') && !seg.is_empty()).then(|| seg.to_string())
}
