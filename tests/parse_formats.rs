// tests/parse_formats.rs
use prompt_sync::parse::{self, detect_format, ParseHint, RecordFormat};

fn hint(source_id: &str) -> ParseHint<'_> {
    ParseHint {
        source_id,
        filename: None,
    }
}

#[test]
fn csv_round_trip_excludes_header() {
    let raw = "\"A\",\"B\"\n\"Title1\",\"Body text 1\"\n\"Title2\",\"Body text 2\"";
    let recs = parse::parse(raw, &hint("csv-src")).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].title, "Title1");
    assert_eq!(recs[0].body, "Body text 1");
    assert_eq!(recs[1].title, "Title2");
    assert_eq!(recs[1].body, "Body text 2");
}

#[test]
fn csv_tolerates_malformed_rows() {
    let raw = "\"A\",\"B\"\n\"Good\",\"Well formed body\"\n\"Bad\",\"missing close";
    let recs = parse::parse(raw, &hint("csv-src")).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title, "Good");
}

#[test]
fn json_records_skip_bodyless_elements() {
    let raw = r#"[
        {"title":"Has body","content":"Something to work with."},
        {"title":"No body at all"},
        {"text":"Second usable body, title synthesized."}
    ]"#;
    let recs = parse::parse(raw, &hint("j")).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].title, "Has body");
    assert_eq!(recs[1].title, "Prompt 3");
}

#[test]
fn markdown_sections_with_short_bodies_are_noise() {
    let raw = "# Keep\nA section body longer than twenty characters stays.\n# Drop\nshort";
    let recs = parse::parse(raw, &hint("md")).unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title, "Keep");
}

#[test]
fn record_ids_are_source_scoped_and_unique() {
    let raw = "# One\nFirst body long enough to keep around.\n# Two\nSecond body long enough to keep around, reworded.";
    let recs = parse::parse(raw, &hint("src")).unwrap();
    let ids: Vec<_> = recs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["src-markdown-0", "src-markdown-1"]);
}

#[test]
fn sniffing_priority_is_fixed() {
    assert_eq!(detect_format(r#"[{"a":1}]"#, None), RecordFormat::Json);
    assert_eq!(detect_format("\"t\",\"b\"", None), RecordFormat::Csv);
    assert_eq!(detect_format("plain prose", None), RecordFormat::Markdown);
    // Explicit extension beats sniffing
    assert_eq!(
        detect_format(r#"[{"a":1}]"#, Some("README.md")),
        RecordFormat::Markdown
    );
}
