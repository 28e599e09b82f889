// src/classify.rs
//! Heuristic classification of ingested prompts: keyword-family
//! categories, role-phrase tags, and a difficulty cue scan. Everything
//! here is pure and deterministic for identical input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sync::types::Difficulty;

pub const MAX_TAGS: usize = 5;

/// Keyword families checked case-insensitively on title + body. A text
/// can land in several categories; order here is emission order.
const FAMILIES: &[(&str, &[&str])] = &[
    ("business", &["business", "sales", "marketing", "startup"]),
    ("creative", &["art", "music", "design", "writing", "story"]),
    ("technical", &["code", "programming", "software", "developer"]),
    ("czech", &["čeština", "česky", "cesky", "czech"]),
    ("spanish", &["español", "espanol", "spanish"]),
    ("german", &["deutsch", "german"]),
    ("productivity", &["focus", "productivity", "task", "habit"]),
    ("music", &["music", "beat", "audio", "production"]),
];

static FAMILY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FAMILIES
        .iter()
        .map(|(category, words)| {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&format!(r"(?iu)\b(?:{alternation})\b")).expect("family regex");
            (*category, re)
        })
        .collect()
});

/// Role-assignment phrasings whose bounded object becomes a tag.
static ROLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bact as\b|\byou are\b|\brole\s*:|\bpersona\s*:)\s*(?:an?\s+)?([^.,;:!?\n]{2,20})")
        .expect("role regex")
});

/// Derive category tags from title + body.
///
/// Falls back to the source's default categories when no family matches,
/// and to `general` when those are empty too. The result is never empty.
pub fn categorize(title: &str, body: &str, source_defaults: &[String]) -> Vec<String> {
    let text = format!("{} {}", title, body);

    let mut out: Vec<String> = Vec::new();
    for (category, re) in FAMILY_PATTERNS.iter() {
        if re.is_match(&text) && !out.iter().any(|c| c == category) {
            out.push((*category).to_string());
        }
    }

    if out.is_empty() {
        out = source_defaults
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
    }
    if out.is_empty() {
        out.push("general".to_string());
    }
    out
}

/// Extract up to [`MAX_TAGS`] role tags ("act as X", "you are X",
/// "role: X", "persona: X"), deduplicated, in order of appearance.
pub fn extract_tags(title: &str, body: &str) -> Vec<String> {
    let text = format!("{} {}", title, body);
    let mut out: Vec<String> = Vec::new();

    for caps in ROLE_PATTERN.captures_iter(&text) {
        let tag = caps[1].trim().to_lowercase();
        if tag.len() < 2 {
            continue;
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
        if out.len() == MAX_TAGS {
            break;
        }
    }

    out
}

/// Difficulty cue scan; records without a cue stay at the default.
pub fn derive_difficulty(title: &str, body: &str) -> Difficulty {
    static RE_EXPERT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\bexpert\b").expect("difficulty regex"));
    static RE_ADVANCED: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\badvanced\b").expect("difficulty regex"));
    static RE_BEGINNER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\b(beginner|basic|simple|easy)\b").expect("difficulty regex"));

    let text = format!("{} {}", title, body);
    if RE_EXPERT.is_match(&text) {
        Difficulty::Expert
    } else if RE_ADVANCED.is_match(&text) {
        Difficulty::Advanced
    } else if RE_BEGINNER.is_match(&text) {
        Difficulty::Beginner
    } else {
        Difficulty::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_families_match_case_insensitively() {
        let cats = categorize("Sales pitch", "Write MARKETING copy for a launch.", &[]);
        assert_eq!(cats, vec!["business"]);

        let cats = categorize("Beat maker", "Act as a music producer mixing audio.", &[]);
        assert!(cats.contains(&"creative".to_string()));
        assert!(cats.contains(&"music".to_string()));
    }

    #[test]
    fn fallback_to_source_defaults_then_general() {
        let defaults = vec!["Curated".to_string()];
        let cats = categorize("Plain", "Nothing from the lexicon here.", &defaults);
        assert_eq!(cats, vec!["curated"]);

        let cats = categorize("Plain", "Nothing from the lexicon here.", &[]);
        assert_eq!(cats, vec!["general"]);
    }

    #[test]
    fn role_tags_are_bounded_and_capped() {
        let body = "Act as a travel agent. You are a historian. Role: editor. \
                    Persona: critic. Act as a chef. Act as a pilot.";
        let tags = extract_tags("", body);
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags[0], "travel agent");
        assert!(tags.contains(&"historian".to_string()));
        assert!(tags.contains(&"editor".to_string()));
    }

    #[test]
    fn duplicate_roles_collapse() {
        let tags = extract_tags("", "Act as a chef. You are a chef.");
        assert_eq!(tags, vec!["chef"]);
    }

    #[test]
    fn long_role_phrases_are_truncated_by_the_window() {
        // Capture window stops at 20 chars; the tag is still produced.
        let tags = extract_tags("", "Act as an exceptionally meticulous archivist");
        assert_eq!(tags.len(), 1);
        assert!(tags[0].len() <= 20);
    }

    #[test]
    fn difficulty_cues() {
        assert_eq!(derive_difficulty("", "an expert-level prompt"), Difficulty::Expert);
        assert_eq!(derive_difficulty("Advanced SQL", ""), Difficulty::Advanced);
        assert_eq!(derive_difficulty("", "a simple warmup"), Difficulty::Beginner);
        assert_eq!(derive_difficulty("", "no cue at all"), Difficulty::Intermediate);
    }
}
