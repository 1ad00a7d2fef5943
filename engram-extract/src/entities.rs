//! Rule-based entity extraction: capitalization runs and quoted spans,
//! normalized once at extraction time so every downstream consumer
//! (storage, graph, recall) compares the same folded form.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static CAPITALIZED_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][\p{L}0-9]*(?:\s+[A-Z][\p{L}0-9]*){0,3}\b").unwrap()
});

static QUOTED_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]{1,80})"|`([^`]{1,80})`"#).unwrap());

/// Words that commonly start a sentence but aren't entities on their own.
const SENTENCE_STARTERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "i", "we", "he", "she", "they", "it",
    "yesterday", "today", "tomorrow",
];

/// Trim, case-fold and diacritic-fold a raw entity span into its stored,
/// comparable form (spec §3 `entities`/`Entity.name`).
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let folded: String = trimmed.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    folded.to_lowercase()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
}

/// Walk capitalization runs and quoted spans, returning normalized,
/// deduplicated entity names.
pub fn extract(content: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();

    for mat in CAPITALIZED_RUN_RE.find_iter(content) {
        let span = mat.as_str();
        let normalized = normalize(span);
        if normalized.len() < 2 {
            continue;
        }
        if SENTENCE_STARTERS.contains(&normalized.as_str()) {
            continue;
        }
        out.insert(normalized);
    }

    for caps in QUOTED_SPAN_RE.captures_iter(content) {
        let span = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        if let Some(span) = span {
            let normalized = normalize(span);
            if normalized.len() >= 2 {
                out.insert(normalized);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_capitalized_names() {
        let out = extract("Alex met with Priya Sharma about the Acme Corp contract");
        assert!(out.contains("alex"));
        assert!(out.contains("priya sharma"));
        assert!(out.contains("acme corp"));
    }

    #[test]
    fn extracts_quoted_spans() {
        let out = extract(r#"the config key is "max_retries" in the settings file"#);
        assert!(out.contains("max_retries"));
    }

    #[test]
    fn skips_bare_sentence_starters() {
        let out = extract("The meeting ran long.");
        assert!(!out.contains("the"));
    }

    #[test]
    fn folds_diacritics_and_case() {
        assert_eq!(normalize("RenÉ Dubois"), normalize("rene dubois"));
    }
}
