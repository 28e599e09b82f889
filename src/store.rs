// src/store.rs
//! Persistence boundary. The corpus is owned by a collaborator; append is
//! the only mutation this engine requires of it.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::sync::types::ExternalPromptRecord;

#[async_trait::async_trait]
pub trait PromptStore: Send + Sync {
    /// Snapshot of the persisted corpus.
    async fn load(&self) -> Result<Vec<ExternalPromptRecord>>;

    /// Append new records. Never rewrites existing ones.
    async fn append(&self, records: Vec<ExternalPromptRecord>) -> Result<()>;
}

/// Corpus as a single pretty-printed JSON array on disk. Read-modify-write
/// is serialized behind a mutex; a missing file reads as an empty corpus.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<Vec<ExternalPromptRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading corpus from {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("decoding corpus at {}", self.path.display()))
    }
}

#[async_trait::async_trait]
impl PromptStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<ExternalPromptRecord>> {
        let _guard = self.lock.lock().expect("store mutex poisoned");
        self.read_all()
    }

    async fn append(&self, records: Vec<ExternalPromptRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock().expect("store mutex poisoned");
        let mut all = self.read_all()?;
        all.extend(records);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing corpus to {}", self.path.display()))
    }
}

// --- Test helper ---
/// In-memory store that records every append batch.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<Vec<ExternalPromptRecord>>,
    pub appends: Mutex<Vec<usize>>,
    pub fail_appends: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ExternalPromptRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl PromptStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ExternalPromptRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn append(&self, records: Vec<ExternalPromptRecord>) -> Result<()> {
        if self.fail_appends.load(std::sync::atomic::Ordering::Relaxed) {
            anyhow::bail!("simulated persistence failure");
        }
        self.appends.lock().unwrap().push(records.len());
        self.records.lock().unwrap().extend(records);
        Ok(())
    }
}
