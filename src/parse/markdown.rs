// src/parse/markdown.rs
//! Markdown payloads split on ATX heading markers. The heading is the
//! title; the section's remaining lines, trimmed and joined, are the
//! body. Sections shorter than [`MIN_BODY_CHARS`] are discarded as noise
//! (heading-only TOC entries, badges, and the like).

use super::{build_record, normalize_body, RecordFormat};
use crate::sync::types::ExternalPromptRecord;

pub const MIN_BODY_CHARS: usize = 20;

pub fn parse(raw: &str, source_id: &str) -> Vec<ExternalPromptRecord> {
    let mut out = Vec::new();
    let mut title: Option<String> = None;
    let mut body_lines: Vec<&str> = Vec::new();

    let flush = |title: &mut Option<String>, body_lines: &mut Vec<&str>, out: &mut Vec<ExternalPromptRecord>| {
        if let Some(t) = title.take() {
            let body = normalize_body(&body_lines.join(" "));
            if body.chars().count() >= MIN_BODY_CHARS {
                out.push(build_record(
                    source_id,
                    RecordFormat::Markdown,
                    out.len(),
                    t,
                    body,
                ));
            }
        }
        body_lines.clear();
    };

    for line in raw.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            flush(&mut title, &mut body_lines, &mut out);
            let t = trimmed.trim_start_matches('#').trim();
            // Heading without text starts no section
            title = (!t.is_empty()).then(|| t.to_string());
        } else if title.is_some() {
            let l = line.trim();
            if !l.is_empty() {
                body_lines.push(l);
            }
        }
        // Text before the first heading has no title; ignored.
    }
    flush(&mut title, &mut body_lines, &mut out);

    out
}
