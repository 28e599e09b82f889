// src/parse/json.rs
//! JSON payloads: a top-level array of objects, each carrying a body
//! under one of `prompt`, `content`, `text`. Elements without a usable
//! body are skipped; a missing title synthesizes `Prompt {index+1}`.
//! Optional metadata (author, language, categories, tags, difficulty)
//! is taken when present so the classifier doesn't overwrite curation.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use super::{build_record, normalize_body, RecordFormat};
use crate::sync::types::{Difficulty, ExternalPromptRecord};

const BODY_KEYS: [&str; 3] = ["prompt", "content", "text"];

pub fn parse(raw: &str, source_id: &str) -> Result<Vec<ExternalPromptRecord>> {
    let value: Value = serde_json::from_str(raw).context("decoding json payload")?;
    let items = value
        .as_array()
        .ok_or_else(|| anyhow!("json payload is not an array"))?;

    let mut out = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            continue;
        };

        let body = BODY_KEYS
            .iter()
            .filter_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(normalize_body)
            .find(|b| !b.is_empty());
        let Some(body) = body else {
            continue;
        };

        let title = obj
            .get("title")
            .or_else(|| obj.get("name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Prompt {}", idx + 1));

        let mut rec = build_record(source_id, RecordFormat::Json, out.len(), title, body);

        if let Some(author) = obj.get("author").and_then(Value::as_str) {
            rec.author = author.trim().to_string();
        }
        if let Some(lang) = obj.get("language").and_then(Value::as_str) {
            rec.language = lang.trim().to_ascii_lowercase();
        }
        rec.categories = string_list(obj.get("categories").or_else(|| obj.get("category")));
        rec.tags = string_list(obj.get("tags"));
        rec.tags.truncate(5);
        if let Some(d) = obj.get("difficulty").and_then(Value::as_str) {
            rec.difficulty = parse_difficulty(d);
        }

        out.push(rec);
    }

    Ok(out)
}

/// Accept either a string or an array of strings.
fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_lowercase()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_difficulty(s: &str) -> Option<Difficulty> {
    match s.trim().to_ascii_lowercase().as_str() {
        "beginner" => Some(Difficulty::Beginner),
        "intermediate" => Some(Difficulty::Intermediate),
        "advanced" => Some(Difficulty::Advanced),
        "expert" => Some(Difficulty::Expert),
        _ => None,
    }
}
