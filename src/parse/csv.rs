// src/parse/csv.rs
//! Two-quoted-field CSV rows: `"title","body"`. The first line is the
//! header. Rows that don't match the pattern are dropped silently; the
//! caller sees them only as a smaller record count.

use once_cell::sync::OnceCell;
use regex::Regex;

use super::{build_record, normalize_body, RecordFormat};
use crate::sync::types::ExternalPromptRecord;

fn row_pattern() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r#"^\s*"([^"]+)"\s*,\s*"([^"]*)"\s*$"#).unwrap())
}

pub fn parse(raw: &str, source_id: &str) -> Vec<ExternalPromptRecord> {
    let re = row_pattern();
    let mut out = Vec::new();

    for line in raw.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let Some(caps) = re.captures(line) else {
            // malformed row, skip
            continue;
        };
        let title = caps[1].trim().to_string();
        let body = normalize_body(&caps[2]);
        if body.is_empty() {
            continue;
        }
        out.push(build_record(
            source_id,
            RecordFormat::Csv,
            out.len(),
            title,
            body,
        ));
    }

    out
}
