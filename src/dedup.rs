// src/dedup.rs
//! Duplicate detection against the persisted corpus.
//!
//! Two records are duplicates when their body fingerprints match OR their
//! titles match exactly. The title check is corpus-global and
//! content-blind: any two records sharing a title count as duplicates
//! regardless of source or body. Known precision/recall tradeoff, kept
//! for compatibility with corpora imported by earlier versions.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::sync::types::ExternalPromptRecord;

/// Deterministic, order-independent fingerprint of body content:
/// lowercased alphanumeric tokens, sorted, hashed. Reordering or
/// re-punctuating a body does not change its fingerprint.
pub fn fingerprint(body: &str) -> String {
    let mut tokens: Vec<String> = body
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();
    tokens.sort_unstable();

    let mut hasher = Sha256::new();
    for t in &tokens {
        hasher.update(t.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();

    let mut out = String::with_capacity(16);
    for b in digest.iter().take(8) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Lookup structure built once per worker run from a corpus snapshot.
#[derive(Debug, Default)]
pub struct DedupIndex {
    fingerprints: HashSet<String>,
    titles: HashSet<String>,
}

impl DedupIndex {
    pub fn from_corpus(corpus: &[ExternalPromptRecord]) -> Self {
        let mut idx = Self::default();
        for rec in corpus {
            idx.insert(rec);
        }
        idx
    }

    pub fn is_duplicate(&self, record: &ExternalPromptRecord) -> bool {
        self.fingerprints.contains(&fingerprint(&record.body)) || self.titles.contains(&record.title)
    }

    /// Register a record so later candidates in the same batch dedup
    /// against it too.
    pub fn insert(&mut self, record: &ExternalPromptRecord) {
        self.fingerprints.insert(fingerprint(&record.body));
        self.titles.insert(record.title.clone());
    }
}
