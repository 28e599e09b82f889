// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod classify;
pub mod dedup;
pub mod metrics;
pub mod parse;
pub mod rate_limit;
pub mod registry;
pub mod store;
pub mod sync;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::rate_limit::RateLimiter;
pub use crate::registry::{RateLimitPolicy, SourceConfig, SourceKind, SourceRegistry};
pub use crate::store::{JsonFileStore, MemoryStore, PromptStore};
pub use crate::sync::fetch::{ContentFetcher, FixtureFetcher, HttpFetcher};
pub use crate::sync::types::{Difficulty, ExternalPromptRecord, SyncMetrics, SyncResult};
pub use crate::sync::SyncOrchestrator;
