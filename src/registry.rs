// src/registry.rs
//! Source catalogue: which external origins we sync from and under what
//! policy. Read-only to the engine; loaded once from TOML or JSON.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SOURCES_PATH: &str = "SYNC_SOURCES_PATH";

/// Fetch strategy selector for a source. Tagged-variant dispatch, not
/// inheritance: every kind goes through the same fetch + parse path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Repository,
    Api,
    Feed,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub requests_per_window: u32,
    pub window_minutes: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            requests_per_window: 10,
            window_minutes: 60,
        }
    }
}

/// Identity and policy for one external source. Immutable for the
/// duration of a sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub name: String,
    pub kind: SourceKind,
    pub endpoint: String,
    #[serde(default)]
    pub rate_limit: RateLimitPolicy,
    /// "{source}" is replaced with the source name at stamp time.
    #[serde(default = "default_attribution")]
    pub attribution_template: String,
    #[serde(default = "default_languages")]
    pub supported_languages: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub requires_auth: bool,
    /// Name of the environment variable holding the credential.
    #[serde(default)]
    pub auth_ref: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_attribution() -> String {
    "Imported from {source}".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    /// Default language stamped onto records that carry none.
    pub fn default_language(&self) -> &str {
        self.supported_languages
            .first()
            .map(String::as_str)
            .unwrap_or("en")
    }

    pub fn attribution(&self) -> String {
        self.attribution_template.replace("{source}", &self.name)
    }
}

/// Catalogue of configured sources in registration order. That order is
/// caller-significant: it is the scheduling and pacing tie-break.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        Self { sources }
    }

    /// All sources, registration order.
    pub fn list(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Lookup by id. A miss is a normal result, not an error.
    pub fn get(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sources from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_sources(&content, ext.as_str()).map(Self::new)
    }

    /// Load using env var + fallbacks:
    /// 1) $SYNC_SOURCES_PATH
    /// 2) config/sources.toml
    /// 3) config/sources.json
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("SYNC_SOURCES_PATH points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from("config/sources.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/sources.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceConfig>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported sources format"))
}

fn parse_toml(s: &str) -> Result<Vec<SourceConfig>> {
    #[derive(Deserialize)]
    struct TomlSources {
        sources: Vec<SourceConfig>,
    }
    let v: TomlSources = toml::from_str(s)?;
    check_unique_ids(v.sources)
}

fn parse_json(s: &str) -> Result<Vec<SourceConfig>> {
    let v: Vec<SourceConfig> = serde_json::from_str(s)?;
    check_unique_ids(v)
}

fn check_unique_ids(sources: Vec<SourceConfig>) -> Result<Vec<SourceConfig>> {
    let mut seen = std::collections::HashSet::new();
    for s in &sources {
        if s.id.trim().is_empty() {
            return Err(anyhow!("source with empty id"));
        }
        if !seen.insert(s.id.clone()) {
            return Err(anyhow!("duplicate source id `{}`", s.id));
        }
    }
    Ok(sources)
}
