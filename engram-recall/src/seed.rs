//! Seed phase (spec §4.5.2): up to `limit * seedExpansionFactor` candidates
//! drawn, in priority order, from aggregation materialization, vector
//! top-K, entity-seed top-M, and topic-seed, union-deduplicated by id.

use std::collections::HashSet;

use engram_core::errors::StoreError;
use engram_core::{MemoryStatus, Store};

use crate::query::{AggregationRoute, Understanding};

/// A candidate surfaced by the seed phase, with per-source rank/score
/// provenance carried through to RRF fusion and scoring.
#[derive(Debug, Clone)]
pub struct SeedCandidate {
    pub id: String,
    pub vector_rank: Option<usize>,
    pub vector_score: Option<f64>,
    pub entity_rank: Option<usize>,
    pub topic_rank: Option<usize>,
    pub from_aggregation: bool,
}

impl SeedCandidate {
    fn bare(id: String) -> Self {
        Self {
            id,
            vector_rank: None,
            vector_score: None,
            entity_rank: None,
            topic_rank: None,
            from_aggregation: false,
        }
    }
}

pub fn seed(store: &dyn Store, understanding: &Understanding, cap: usize) -> Result<Vec<SeedCandidate>, StoreError> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<SeedCandidate> = Vec::new();

    if let Some(route) = understanding.aggregation {
        let status = match route {
            AggregationRoute::ByStatus(s) => s,
            AggregationRoute::ByType(_) => MemoryStatus::Active,
        };
        for m in store.by_status(status, cap)? {
            if let AggregationRoute::ByType(t) = route {
                if m.memory_type != t {
                    continue;
                }
            }
            if seen.insert(m.id.clone()) {
                let mut c = SeedCandidate::bare(m.id);
                c.from_aggregation = true;
                candidates.push(c);
            }
        }
    }

    // Aggregation routing is exclusive (spec §4.5.1): a matched aggregation
    // phrase replaces vector/entity/topic seeding rather than blending with
    // it, so e.g. "all pending commitments" returns exactly the routed set
    // regardless of vector similarity (spec §8.2).
    if understanding.aggregation.is_none() {
        if let Some(vec) = &understanding.query_vector {
            for (rank, (id, score)) in store.vector_search(vec, cap)?.into_iter().enumerate() {
                if seen.insert(id.clone()) {
                    let mut c = SeedCandidate::bare(id);
                    c.vector_rank = Some(rank + 1);
                    c.vector_score = Some(score);
                    candidates.push(c);
                } else if let Some(c) = candidates.iter_mut().find(|c| c.id == id) {
                    c.vector_rank.get_or_insert(rank + 1);
                    c.vector_score.get_or_insert(score);
                }
            }
        }

        if !understanding.entities.is_empty() {
            let entities: Vec<String> = understanding.entities.iter().cloned().collect();
            for (rank, id) in store.entity_seed(&entities, cap)?.into_iter().enumerate() {
                if seen.insert(id.clone()) {
                    let mut c = SeedCandidate::bare(id);
                    c.entity_rank = Some(rank + 1);
                    candidates.push(c);
                } else if let Some(c) = candidates.iter_mut().find(|c| c.id == id) {
                    c.entity_rank.get_or_insert(rank + 1);
                }
            }
        }

        if !understanding.topics.is_empty() {
            let topics: Vec<String> = understanding.topics.iter().cloned().collect();
            for (rank, id) in store.topic_seed(&topics, cap)?.into_iter().enumerate() {
                if seen.insert(id.clone()) {
                    let mut c = SeedCandidate::bare(id);
                    c.topic_rank = Some(rank + 1);
                    candidates.push(c);
                } else if let Some(c) = candidates.iter_mut().find(|c| c.id == id) {
                    c.topic_rank.get_or_insert(rank + 1);
                }
            }
        }
    }

    candidates.truncate(cap);
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engram_core::{Memory, MemoryType, Salience, Source};
    use engram_store::StoreEngine;
    use std::collections::BTreeSet;

    fn memory(id: &str, entities: &[&str], topics: &[&str]) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            content: id.to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Salience::default(),
            entities: entities.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            topics: topics.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            source: Source::System { reference: None },
            created_at: now,
            valid_from: now,
            valid_until: None,
            last_accessed_at: now,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(id),
        }
    }

    fn understanding_with(entities: &[&str], topics: &[&str]) -> Understanding {
        Understanding {
            query_vector: None,
            entities: entities.iter().map(|s| s.to_string()).collect(),
            topics: topics.iter().map(|s| s.to_string()).collect(),
            aggregation: None,
            at: None,
        }
    }

    #[test]
    fn entity_seed_surfaces_matching_memories() {
        let store = StoreEngine::open_in_memory().unwrap();
        store.insert(&memory("a", &["acme"], &[])).unwrap();
        store.insert(&memory("b", &["other"], &[])).unwrap();
        let und = understanding_with(&["acme"], &[]);
        let out = seed(&store, &und, 10).unwrap();
        assert!(out.iter().any(|c| c.id == "a"));
        assert!(!out.iter().any(|c| c.id == "b"));
    }

    #[test]
    fn topic_seed_surfaces_matching_memories() {
        let store = StoreEngine::open_in_memory().unwrap();
        store.insert(&memory("a", &[], &["budget"])).unwrap();
        let und = understanding_with(&[], &["budget"]);
        let out = seed(&store, &und, 10).unwrap();
        assert!(out.iter().any(|c| c.id == "a" && c.topic_rank == Some(1)));
    }

    #[test]
    fn aggregation_route_pulls_by_status() {
        let store = StoreEngine::open_in_memory().unwrap();
        let mut m = memory("a", &[], &[]);
        m.status = MemoryStatus::Pending;
        store.insert(&m).unwrap();
        let und = Understanding {
            query_vector: None,
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            aggregation: Some(AggregationRoute::ByStatus(MemoryStatus::Pending)),
            at: None,
        };
        let out = seed(&store, &und, 10).unwrap();
        assert!(out.iter().any(|c| c.id == "a" && c.from_aggregation));
    }

    #[test]
    fn aggregation_route_is_exclusive_of_entity_and_topic_seeding() {
        let store = StoreEngine::open_in_memory().unwrap();
        let mut pending = memory("a", &["acme"], &["budget"]);
        pending.status = MemoryStatus::Pending;
        store.insert(&pending).unwrap();
        // Shares the same entity/topic as "a" but is not pending — would be
        // pulled in by entity/topic seeding if aggregation weren't exclusive.
        store.insert(&memory("b", &["acme"], &["budget"])).unwrap();

        let und = Understanding {
            query_vector: None,
            entities: ["acme".to_string()].into_iter().collect(),
            topics: ["budget".to_string()].into_iter().collect(),
            aggregation: Some(AggregationRoute::ByStatus(MemoryStatus::Pending)),
            at: None,
        };
        let out = seed(&store, &und, 10).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
        assert!(out[0].from_aggregation);
        assert!(out[0].entity_rank.is_none());
        assert!(out[0].topic_rank.is_none());
    }

    #[test]
    fn empty_vault_yields_no_candidates() {
        let store = StoreEngine::open_in_memory().unwrap();
        let und = understanding_with(&["nobody"], &[]);
        let out = seed(&store, &und, 10).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn same_id_from_two_sources_merges_rank_fields() {
        let store = StoreEngine::open_in_memory().unwrap();
        store.insert(&memory("a", &["acme"], &["budget"])).unwrap();
        let und = understanding_with(&["acme"], &["budget"]);
        let out = seed(&store, &und, 10).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].entity_rank.is_some());
        assert!(out[0].topic_rank.is_some());
    }
}
