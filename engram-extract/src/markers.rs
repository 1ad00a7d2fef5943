//! Keyword-class regexes used to infer memory type and status from raw
//! content. Same idiom as a contradiction detector reaching for a handful
//! of `LazyLock<Regex>` constants instead of a model call.

use regex::Regex;
use std::sync::LazyLock;

/// "I promised...", "committed to...", "the decision was...", "I will...".
pub static COMMITMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(promised?|committed?|decision|will)\b").unwrap()
});

/// "done", "completed", "fulfilled", "shipped" — marks a commitment closed.
pub static FULFILLMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(done|completed|fulfilled|shipped)\b").unwrap()
});

/// Copula / definition templates: "X is a Y", "X refers to Y", "X means Y".
pub static DECLARATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(is a|is the|are the|refers to|means|defined as)\b").unwrap()
});

/// Imperative / recipe markers: numbered or ordinal step language.
pub static IMPERATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(first|then|next,|finally|step \d+|to configure|to install|to set up)\b")
        .unwrap()
});
