//! Rule-based topic extraction: frequency-ranked content words, folded the
//! same way entities are.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::entities::normalize;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}0-9_]+").unwrap());

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "for", "to", "of", "in", "on",
    "at", "by", "with", "from", "is", "are", "was", "were", "be", "been", "being", "this",
    "that", "these", "those", "it", "its", "as", "we", "i", "you", "he", "she", "they", "will",
    "would", "should", "could", "can", "about", "into", "over", "after", "before", "has", "have",
    "had", "not", "no", "so", "than", "their", "our", "your", "my",
];

/// Maximum number of rule-derived topics returned for a single content body.
const MAX_TOPICS: usize = 6;

/// Frequency-rank content words into a bounded topic set.
pub fn extract(content: &str) -> BTreeSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for mat in WORD_RE.find_iter(content) {
        let word = normalize(mat.as_str());
        if word.len() < 4 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(MAX_TOPICS).map(|(w, _)| w).collect()
}
