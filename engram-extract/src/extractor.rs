//! Orchestrates rule-based extraction with a bounded, best-effort LLM
//! fallback (spec §4.2).

use std::collections::BTreeSet;
use std::sync::Arc;

use engram_core::{CompletionOptions, Llm, MemoryStatus, MemoryType, Salience};

use crate::{entities, infer, topics};

/// Content shorter than this is assumed to be a fragment ("ok", "thanks")
/// not worth an LLM fallback call even when rules find nothing.
const MIN_CONTENT_LEN_FOR_LLM_FALLBACK: usize = 20;

const LLM_FALLBACK_TIMEOUT_MS: u64 = 2_000;

/// Caller-supplied hints that take precedence over whatever the rules infer
/// (spec §4.1 `remember` options).
#[derive(Debug, Clone, Default)]
pub struct CallerOverrides {
    pub entities: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub salience: Option<f64>,
    pub status: Option<MemoryStatus>,
    pub memory_type: Option<MemoryType>,
}

/// Output of a single extraction pass, folded into the stored `Memory`.
#[derive(Debug, Clone)]
pub struct ExtractedMemory {
    pub entities: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    pub memory_type: MemoryType,
    pub status: MemoryStatus,
    pub salience: Salience,
    /// Set when the rule-based pass found nothing and either there was no
    /// LLM fallback available or the fallback itself failed/degraded.
    pub needs_review: bool,
}

pub struct Extractor {
    llm: Option<Arc<dyn Llm>>,
}

impl Extractor {
    pub fn new(llm: Option<Arc<dyn Llm>>) -> Self {
        Self { llm }
    }

    pub fn extract(
        &self,
        content: &str,
        known_entities: &BTreeSet<String>,
        overrides: CallerOverrides,
    ) -> ExtractedMemory {
        let mut found_entities = entities::extract(content);
        let mut found_topics = topics::extract(content);
        let mut needs_review = false;

        let rules_found_nothing = found_entities.is_empty() && found_topics.is_empty();
        if rules_found_nothing && content.trim().len() >= MIN_CONTENT_LEN_FOR_LLM_FALLBACK {
            match self.try_llm_fallback(content) {
                Some((llm_entities, llm_topics)) => {
                    found_entities.extend(llm_entities);
                    found_topics.extend(llm_topics);
                }
                None => needs_review = true,
            }
        }

        if let Some(extra) = &overrides.entities {
            found_entities.extend(extra.iter().map(|e| entities::normalize(e)));
        }
        if let Some(extra) = &overrides.topics {
            found_topics.extend(extra.iter().map(|t| entities::normalize(t)));
        }

        let known_entities_present = found_entities.iter().any(|e| known_entities.contains(e));

        let memory_type = overrides.memory_type.unwrap_or_else(|| infer::infer_type(content));
        let status = overrides.status.unwrap_or_else(|| infer::infer_status(content));
        let salience = overrides
            .salience
            .map(Salience::new)
            .unwrap_or_else(|| infer::infer_salience(content, known_entities_present));

        ExtractedMemory {
            entities: found_entities,
            topics: found_topics,
            memory_type,
            status,
            salience,
            needs_review,
        }
    }

    /// Ask the configured LLM for a small JSON object of entities/topics.
    /// Any failure (missing provider, error, malformed response) degrades
    /// to an empty result rather than failing the write.
    fn try_llm_fallback(&self, content: &str) -> Option<(Vec<String>, Vec<String>)> {
        let llm = self.llm.as_ref()?;
        let prompt = format!(
            "Extract entities and topics from the following note as a JSON object \
             with \"entities\" and \"topics\" string arrays, nothing else:\n\n{content}"
        );
        let options = CompletionOptions {
            max_tokens: Some(256),
            json_mode: true,
            timeout_ms: Some(LLM_FALLBACK_TIMEOUT_MS),
        };
        let response = match llm.complete(&prompt, &options) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "extraction llm fallback failed, degrading");
                return None;
            }
        };
        match parse_llm_response(&response) {
            Some(parsed) => Some(parsed),
            None => {
                tracing::warn!("extraction llm fallback returned unparseable response");
                None
            }
        }
    }
}

fn parse_llm_response(response: &str) -> Option<(Vec<String>, Vec<String>)> {
    let value: serde_json::Value = serde_json::from_str(response).ok()?;
    let entities = value
        .get("entities")?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(entities::normalize)
        .collect();
    let topics = value
        .get("topics")?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(entities::normalize)
        .collect();
    Some((entities, topics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_support::FakeLlm;

    #[test]
    fn rule_based_pass_needs_no_llm() {
        let extractor = Extractor::new(None);
        let out = extractor.extract(
            "Alex promised to send the Acme Corp proposal",
            &BTreeSet::new(),
            CallerOverrides::default(),
        );
        assert!(out.entities.contains("alex"));
        assert_eq!(out.status, MemoryStatus::Pending);
        assert!(!out.needs_review);
    }

    #[test]
    fn falls_back_to_llm_when_rules_find_nothing() {
        let llm = Arc::new(FakeLlm::new());
        llm.when_contains(
            "quarterly numbers looked soft across the board this cycle",
            r#"{"entities": ["finance team"], "topics": ["quarterly review"]}"#,
        );
        let extractor = Extractor::new(Some(llm));
        let out = extractor.extract(
            "the quarterly numbers looked soft across the board this cycle",
            &BTreeSet::new(),
            CallerOverrides::default(),
        );
        assert!(out.entities.contains("finance team"));
        assert!(!out.needs_review);
    }

    #[test]
    fn marks_needs_review_when_llm_fallback_fails() {
        let llm = Arc::new(FakeLlm::new());
        llm.set_failing(true);
        let extractor = Extractor::new(Some(llm));
        let out = extractor.extract(
            "the quarterly numbers looked soft across the board this cycle",
            &BTreeSet::new(),
            CallerOverrides::default(),
        );
        assert!(out.needs_review);
    }

    #[test]
    fn short_fragments_skip_llm_fallback_entirely() {
        let llm = Arc::new(FakeLlm::new());
        let extractor = Extractor::new(Some(llm.clone()));
        let out = extractor.extract("ok", &BTreeSet::new(), CallerOverrides::default());
        assert!(llm.calls().is_empty());
        assert!(!out.needs_review);
    }

    #[test]
    fn caller_overrides_win_over_inference() {
        let extractor = Extractor::new(None);
        let overrides = CallerOverrides {
            memory_type: Some(MemoryType::Procedural),
            status: Some(MemoryStatus::Fulfilled),
            salience: Some(0.9),
            ..Default::default()
        };
        let out = extractor.extract("we met for coffee", &BTreeSet::new(), overrides);
        assert_eq!(out.memory_type, MemoryType::Procedural);
        assert_eq!(out.status, MemoryStatus::Fulfilled);
        assert_eq!(out.salience.value(), 0.9);
    }
}
