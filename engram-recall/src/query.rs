//! Query understanding (spec §4.5.1): turns caller input into a query
//! vector, extracted entity/topic sets, and an aggregation-routing hint.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use engram_core::{Embedder, MemoryStatus, MemoryType};
use engram_extract::{CallerOverrides, Extractor};

/// Caller-supplied recall input (spec §4.5.1).
#[derive(Debug, Clone)]
pub struct RecallQuery {
    pub context: String,
    pub entities: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub types: Option<Vec<MemoryType>>,
    pub limit: usize,
    pub spread: bool,
    pub spread_hops: Option<usize>,
    pub spread_decay: Option<f64>,
    /// Additional hop allowance applied on top of `spread_hops` when the
    /// query supplied explicit seed entities (spec §4.5.1 names this
    /// distinctly from `spreadHops`; folded in here since spreading
    /// activation itself doesn't distinguish edges by the seed that
    /// originated them).
    pub spread_entity_hops: Option<usize>,
    /// Point-in-time filter: subsequent phases require `valid_from <= at
    /// < valid_until`.
    pub at: Option<DateTime<Utc>>,
}

impl RecallQuery {
    pub fn new(context: impl Into<String>, limit: usize) -> Self {
        Self {
            context: context.into(),
            entities: None,
            topics: None,
            types: None,
            limit,
            spread: false,
            spread_hops: None,
            spread_decay: None,
            spread_entity_hops: None,
            at: None,
        }
    }
}

/// Which materialization the seed phase should prefer when the query text
/// matches a configured aggregation phrase (spec §4.5.1, §4.5.2(a)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRoute {
    ByStatus(MemoryStatus),
    ByType(MemoryType),
}

/// Output of the query-understanding phase, consumed by `seed`/`spread`/`score`.
#[derive(Debug, Clone)]
pub struct Understanding {
    pub query_vector: Option<Vec<f32>>,
    pub entities: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    pub aggregation: Option<AggregationRoute>,
    pub at: Option<DateTime<Utc>>,
}

/// Runs query understanding: extracts entities/topics from `query.context`
/// via the rule-based extractor (no LLM — recall is latency-sensitive and
/// the rule pass is sufficient for query text), embeds the context through
/// `embedder` if one is configured, and checks aggregation routing against
/// `aggregation_phrases`.
pub fn understand(
    query: &RecallQuery,
    embedder: Option<&dyn Embedder>,
    aggregation_phrases: &[String],
) -> Understanding {
    let extractor = Extractor::new(None);
    let extracted = extractor.extract(&query.context, &BTreeSet::new(), CallerOverrides::default());

    let mut entities = extracted.entities;
    if let Some(caller_entities) = &query.entities {
        entities.extend(caller_entities.iter().map(|e| engram_extract::normalize_entity(e)));
    }

    let mut topics = extracted.topics;
    if let Some(caller_topics) = &query.topics {
        topics.extend(caller_topics.iter().map(|t| engram_extract::normalize_entity(t)));
    }

    let query_vector = embedder.and_then(|e| match e.embed(&query.context) {
        Ok(vec) => Some(vec),
        Err(err) => {
            tracing::warn!(error = %err, "query embedding failed, falling back to non-vector seeding");
            None
        }
    });

    let aggregation = route_aggregation(&query.context, aggregation_phrases, query.types.as_deref());

    Understanding {
        query_vector,
        entities,
        topics,
        aggregation,
        at: query.at,
    }
}

fn route_aggregation(
    context: &str,
    aggregation_phrases: &[String],
    types: Option<&[MemoryType]>,
) -> Option<AggregationRoute> {
    let lower = context.to_lowercase();
    let matched = aggregation_phrases.iter().any(|p| lower.contains(&p.to_lowercase()));
    if !matched {
        return None;
    }
    if lower.contains("pending") || lower.contains("commitment") {
        return Some(AggregationRoute::ByStatus(MemoryStatus::Pending));
    }
    if let Some(first_type) = types.and_then(|t| t.first()) {
        return Some(AggregationRoute::ByType(*first_type));
    }
    Some(AggregationRoute::ByStatus(MemoryStatus::Active))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> Vec<String> {
        vec![
            "all".to_string(),
            "every".to_string(),
            "pending".to_string(),
            "what are my commitments".to_string(),
            "list of decisions".to_string(),
        ]
    }

    #[test]
    fn extracts_entities_and_topics_from_context() {
        let query = RecallQuery::new("Alex promised to send the Acme Corp proposal", 10);
        let out = understand(&query, None, &phrases());
        assert!(out.entities.contains("alex"));
    }

    #[test]
    fn caller_entities_merge_with_extracted_ones() {
        let mut query = RecallQuery::new("a quiet note", 10);
        query.entities = Some(vec!["BambooHR".to_string()]);
        let out = understand(&query, None, &phrases());
        assert!(out.entities.contains("bamboohr"));
    }

    #[test]
    fn routes_pending_phrase_to_aggregation() {
        let query = RecallQuery::new("what are my pending commitments", 10);
        let out = understand(&query, None, &phrases());
        assert_eq!(out.aggregation, Some(AggregationRoute::ByStatus(MemoryStatus::Pending)));
    }

    #[test]
    fn non_aggregation_query_has_no_route() {
        let query = RecallQuery::new("what did Alex say about the budget", 10);
        let out = understand(&query, None, &phrases());
        assert_eq!(out.aggregation, None);
    }

    #[test]
    fn no_embedder_yields_no_query_vector() {
        let query = RecallQuery::new("hello", 10);
        let out = understand(&query, None, &phrases());
        assert!(out.query_vector.is_none());
    }
}
