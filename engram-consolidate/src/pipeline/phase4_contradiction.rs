//! Phase 4: Contradiction detection — LLM opposition check with a
//! deterministic rule-based fallback for numeric/boolean facts
//! (spec §4.6 step 3).

use engram_core::{CompletionOptions, Llm, Memory};
use regex::Regex;
use std::sync::LazyLock;

/// Matches a month-name date (`march 1`, `apr. 15th`) or a bare number
/// (`42`, `3.5`, `15%`) — the value tokens compared by `value_opposition`.
static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?\b|\b\d+(?:\.\d+)?%?\b",
    )
    .unwrap()
});

/// Negation pairs that indicate semantic opposition between two statements.
const NEGATION_PAIRS: &[(&str, &str)] = &[
    ("always", "never"),
    ("must", "must not"),
    ("should", "should not"),
    ("enable", "disable"),
    ("allow", "deny"),
    ("include", "exclude"),
    ("use", "avoid"),
    ("prefer", "avoid"),
    ("recommended", "discouraged"),
    ("required", "forbidden"),
    ("do", "don't"),
    ("can", "cannot"),
    ("safe", "unsafe"),
    ("increase", "decrease"),
    ("true", "false"),
    ("yes", "no"),
];

const CONTRADICTION_TIMEOUT_MS: u64 = 2_000;

/// A detected contradiction between two constituents, already resolved to
/// a winner by recency: `newer_id` supersedes `older_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContradictionPair {
    pub newer_id: String,
    pub older_id: String,
    pub description: String,
}

/// Find contradicting pairs within a cluster. Tries the injected `Llm`
/// first; any absence or failure degrades to the rule-based negation
/// detector rather than skipping the pair.
pub fn detect(cluster: &[&Memory], llm: Option<&dyn Llm>) -> Vec<ContradictionPair> {
    let mut pairs = Vec::new();
    for i in 0..cluster.len() {
        for j in (i + 1)..cluster.len() {
            let a = cluster[i];
            let b = cluster[j];
            let contradicts = match llm {
                Some(llm) => ask_llm(llm, a, b).unwrap_or_else(|| rule_based_opposition(a, b)),
                None => rule_based_opposition(a, b),
            };
            if !contradicts {
                continue;
            }
            let (newer, older) = if a.valid_from >= b.valid_from { (a, b) } else { (b, a) };
            pairs.push(ContradictionPair {
                newer_id: newer.id.clone(),
                older_id: older.id.clone(),
                description: format!("'{}' supersedes '{}'", newer.content, older.content),
            });
        }
    }
    pairs
}

/// Rule-based opposition detector (spec §4.6 step 3): antonym pairs for
/// boolean/policy facts, plus a value-opposition check for numeric/date
/// facts an LLM-free pass can't catch by keyword lookup alone.
fn rule_based_opposition(a: &Memory, b: &Memory) -> bool {
    negation_pair(a, b) || value_opposition(a, b)
}

fn negation_pair(a: &Memory, b: &Memory) -> bool {
    let a_text = a.content.to_lowercase();
    let b_text = b.content.to_lowercase();
    NEGATION_PAIRS
        .iter()
        .any(|(pos, neg)| (a_text.contains(pos) && b_text.contains(neg)) || (a_text.contains(neg) && b_text.contains(pos)))
}

/// Detects same-subject numeric/date facts with differing values, e.g.
/// "deadline is march 1" vs "deadline is april 15": strip the value tokens
/// out of each statement and compare what's left. Equal templates with
/// differing values is an opposition; equal templates with equal values is
/// just reinforcement, not a contradiction.
fn value_opposition(a: &Memory, b: &Memory) -> bool {
    let (a_template, a_values) = extract_values(&a.content.to_lowercase());
    let (b_template, b_values) = extract_values(&b.content.to_lowercase());
    if a_values.is_empty() || b_values.len() != a_values.len() {
        return false;
    }
    if a_template.split_whitespace().count() < 2 || a_template != b_template {
        return false;
    }
    a_values != b_values
}

fn extract_values(text: &str) -> (String, Vec<String>) {
    let mut values = Vec::new();
    let template = VALUE_RE.replace_all(text, |caps: &regex::Captures| {
        values.push(caps[0].to_string());
        "{value}"
    });
    (template.into_owned(), values)
}

fn ask_llm(llm: &dyn Llm, a: &Memory, b: &Memory) -> Option<bool> {
    let prompt = format!(
        "Do these two statements directly contradict each other? Answer with \
         exactly one word, \"yes\" or \"no\".\n\nA: {}\nB: {}",
        a.content, b.content
    );
    let options = CompletionOptions { max_tokens: Some(8), json_mode: false, timeout_ms: Some(CONTRADICTION_TIMEOUT_MS) };
    match llm.complete(&prompt, &options) {
        Ok(text) => Some(text.trim().to_lowercase().starts_with("yes")),
        Err(err) => {
            tracing::warn!(error = %err, "contradiction detection llm call failed, degrading to rules");
            None
        }
    }
}
