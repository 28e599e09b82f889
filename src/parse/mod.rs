// src/parse/mod.rs
//! Format-specific parsing strategies: CSV, JSON, Markdown.
//!
//! Individual malformed rows/sections are dropped, never raised; a parse
//! only fails when the whole payload is undecodable (invalid top-level
//! JSON, for instance).

pub mod csv;
pub mod json;
pub mod markdown;

use anyhow::Result;
use metrics::{counter, histogram};

use crate::sync::types::ExternalPromptRecord;

/// Record format a payload resolved to. Also the middle segment of
/// derived record ids (`{source_id}-{format}-{ordinal}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
    Markdown,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFormat::Json => "json",
            RecordFormat::Csv => "csv",
            RecordFormat::Markdown => "markdown",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParseHint<'a> {
    pub source_id: &'a str,
    pub filename: Option<&'a str>,
}

/// Normalize body text: entity decode, tag strip, quote fold, whitespace
/// collapse, length cap.
pub fn normalize_body(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 4000 chars
    if out.chars().count() > 4000 {
        out = out.chars().take(4000).collect();
    }

    out
}

/// Pick the format: explicit filename extension when available, else
/// content sniffing in fixed priority JSON -> CSV -> Markdown.
pub fn detect_format(raw: &str, filename: Option<&str>) -> RecordFormat {
    if let Some(name) = filename {
        let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        match ext.as_str() {
            "json" => return RecordFormat::Json,
            "csv" => return RecordFormat::Csv,
            "md" | "markdown" => return RecordFormat::Markdown,
            _ => {}
        }
    }

    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return RecordFormat::Json;
    }

    static RE_CSV_PAIR: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re = RE_CSV_PAIR.get_or_init(|| regex::Regex::new(r#""[^"]*"\s*,\s*"[^"]*""#).unwrap());
    if re.is_match(raw) {
        return RecordFormat::Csv;
    }

    RecordFormat::Markdown
}

/// Parse raw payload content into canonical records.
pub fn parse(raw: &str, hint: &ParseHint<'_>) -> Result<Vec<ExternalPromptRecord>> {
    let t0 = std::time::Instant::now();
    let format = detect_format(raw, hint.filename);
    let out = match format {
        RecordFormat::Json => json::parse(raw, hint.source_id)?,
        RecordFormat::Csv => csv::parse(raw, hint.source_id),
        RecordFormat::Markdown => markdown::parse(raw, hint.source_id),
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("sync_parse_ms").record(ms);
    counter!("sync_records_found_total").increment(out.len() as u64);
    Ok(out)
}

/// Shared record constructor for the format strategies.
pub(crate) fn build_record(
    source_id: &str,
    format: RecordFormat,
    ordinal: usize,
    title: String,
    body: String,
) -> ExternalPromptRecord {
    let now = chrono::Utc::now();
    ExternalPromptRecord {
        id: format!("{}-{}-{}", source_id, format.as_str(), ordinal),
        title,
        body,
        categories: Vec::new(),
        tags: Vec::new(),
        author: String::new(),
        source_id: source_id.to_string(),
        attribution: String::new(),
        difficulty: Default::default(),
        language: String::new(),
        usage_count: 0,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_wins_over_sniffing() {
        // Content sniffs as JSON, but the filename says markdown.
        let raw = "[not actually markdown]";
        assert_eq!(
            detect_format(raw, Some("prompts.md")),
            RecordFormat::Markdown
        );
        assert_eq!(detect_format(raw, None), RecordFormat::Json);
    }

    #[test]
    fn sniffing_priority_json_csv_markdown() {
        assert_eq!(detect_format(r#"{"a":1}"#, None), RecordFormat::Json);
        assert_eq!(
            detect_format("\"Title\",\"Body\"\n", None),
            RecordFormat::Csv
        );
        assert_eq!(detect_format("# Heading\ntext", None), RecordFormat::Markdown);
    }

    #[test]
    fn normalize_strips_tags_and_collapses_ws() {
        let s = "  <b>Hello&nbsp;&nbsp;world</b> &ldquo;ok&rdquo;  ";
        assert_eq!(normalize_body(s), r#"Hello world "ok""#);
    }

    #[test]
    fn parse_dispatches_on_content() {
        let hint = ParseHint {
            source_id: "src",
            filename: None,
        };
        let recs = parse(
            r#"[{"title":"T","prompt":"Write a haiku about rust."}]"#,
            &hint,
        )
        .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "src-json-0");
    }
}
