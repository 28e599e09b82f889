// src/sync/fetch.rs
//! Fetch boundary: HTTP(S) GET against a source endpoint, plus a fixture
//! variant for tests and offline runs.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::registry::SourceConfig;

/// Raw payload pulled from a source, before any parsing.
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchedPayload {
    /// A JSON content-type means the body is already structured; anything
    /// else goes through extension/content sniffing.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("json"))
    }
}

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, source: &SourceConfig) -> Result<FetchedPayload>;
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Reqwest-backed fetcher with an enforced timeout. Authenticated sources
/// attach a bearer token read from the env var named by `auth_ref`; the
/// token value is never logged.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        // Every client must carry the timeout; never fall back to a
        // plain `Client::new()`.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceConfig) -> Result<FetchedPayload> {
        let mut req = self.client.get(&source.endpoint);

        if source.requires_auth {
            let var = source
                .auth_ref
                .as_deref()
                .ok_or_else(|| anyhow!("source `{}` requires auth but has no auth_ref", source.id))?;
            let token = std::env::var(var)
                .with_context(|| format!("credential variable `{var}` not set"))?;
            req = req.bearer_auth(token);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, source = %source.id, "source http error");
                return Err(e).with_context(|| format!("GET {}", source.endpoint));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {}", source.endpoint, status));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body from {}", source.endpoint))?;

        Ok(FetchedPayload { body, content_type })
    }
}

// --- Test helper ---
/// Canned payloads (or failures) keyed by source id.
#[derive(Default)]
pub struct FixtureFetcher {
    payloads: HashMap<String, std::result::Result<FetchedPayload, String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, source_id: &str, body: &str) -> Self {
        self.payloads.insert(
            source_id.to_string(),
            Ok(FetchedPayload {
                body: body.to_string(),
                content_type: None,
            }),
        );
        self
    }

    pub fn with_failure(mut self, source_id: &str, message: &str) -> Self {
        self.payloads
            .insert(source_id.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl ContentFetcher for FixtureFetcher {
    async fn fetch(&self, source: &SourceConfig) -> Result<FetchedPayload> {
        match self.payloads.get(&source.id) {
            Some(Ok(payload)) => Ok(payload.clone()),
            Some(Err(msg)) => Err(anyhow!("{msg}")),
            None => Err(anyhow!("no fixture for source `{}`", source.id)),
        }
    }
}
