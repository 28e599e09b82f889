// src/sync/scheduler.rs
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::sync::SyncOrchestrator;

#[derive(Clone, Copy, Debug)]
pub struct SyncSchedulerCfg {
    pub interval_secs: u64,
}

/// Spawn a lightweight background task that runs a full sync on a fixed
/// interval. The first tick fires immediately.
pub fn spawn_sync_scheduler(
    cfg: SyncSchedulerCfg,
    orchestrator: Arc<SyncOrchestrator>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;

            let results = orchestrator.sync_all().await;

            tracing::info!(
                target: "sync",
                sources = results.len(),
                imported = results.iter().map(|r| r.records_imported).sum::<usize>(),
                failed = results.iter().filter(|r| !r.success).count(),
                "scheduled sync tick"
            );
        }
    })
}
