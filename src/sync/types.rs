// src/sync/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Skill level a prompt is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Intermediate
    }
}

/// Canonical unit of ingested prompt content.
///
/// `id` is source-scoped (`{source_id}-{format}-{ordinal}`) and unique
/// within one sync batch. `body` is never empty; `categories` is never
/// empty (falls back to `general`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalPromptRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
    pub source_id: String,
    #[serde(default)]
    pub attribution: String,
    /// `None` until classification stamps it; a value set by the parser
    /// (declared in the payload) is kept as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Externally visible outcome of syncing one source. Produced exactly
/// once per source per orchestration run, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub source_id: String,
    pub success: bool,
    pub records_found: usize,
    pub records_imported: usize,
    pub records_updated: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
    /// Informational only (e.g. "rate limit window exhausted"); a set
    /// note never implies failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SyncResult {
    pub fn failed(source_id: &str, message: String, duration_ms: u64) -> Self {
        Self {
            source_id: source_id.to_string(),
            success: false,
            records_found: 0,
            records_imported: 0,
            records_updated: 0,
            errors: vec![message],
            duration_ms,
            note: None,
        }
    }

    pub fn skipped(source_id: &str, note: &str, duration_ms: u64) -> Self {
        Self {
            source_id: source_id.to_string(),
            success: true,
            records_found: 0,
            records_imported: 0,
            records_updated: 0,
            errors: Vec::new(),
            duration_ms,
            note: Some(note.to_string()),
        }
    }
}

/// Per-source observability record, append-only during a run and
/// finalized when the worker completes or fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMetrics {
    pub source_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_requests: u32,
    pub successful_requests: u32,
    pub records_found: usize,
    pub records_imported: usize,
    pub errors: Vec<String>,
}

impl SyncMetrics {
    pub fn begin(source_id: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            source_id: source_id.to_string(),
            started_at,
            ended_at: None,
            total_requests: 0,
            successful_requests: 0,
            records_found: 0,
            records_imported: 0,
            errors: Vec::new(),
        }
    }

    pub fn finish(&mut self, ended_at: DateTime<Utc>) {
        self.ended_at = Some(ended_at);
    }
}
