//! Multi-factor relevance scoring (spec §4.5.4): 7 named weights over
//! vector similarity, entity/topic overlap, type bonus, spread activation,
//! recency and salience, minus a superseded penalty and an age penalty.
//! Adapted from the teacher's 8-factor coding-specific scorer shape down to
//! the 7 weights + 2 penalties spec.md names.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use engram_core::config::RecallConfig;
use engram_core::{Memory, MemoryType};

use crate::query::Understanding;

/// Flat penalty applied to a candidate whose status is `superseded` — such
/// candidates are occasionally still seeded (e.g. via a stale entity/topic
/// match) but should rank well below their replacement.
const PENALTY_SUPERSEDED: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub memory: Memory,
    pub score: f64,
}

pub fn score_candidates(
    memories: Vec<Memory>,
    understanding: &Understanding,
    spread_activation: &HashMap<String, f64>,
    config: &RecallConfig,
    now: DateTime<Utc>,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = memories
        .into_iter()
        .map(|m| {
            let score = score_one(&m, understanding, spread_activation, config, now);
            ScoredCandidate { memory: m, score }
        })
        .collect();
    scored.sort_by(compare_candidates);
    scored
}

fn score_one(
    m: &Memory,
    understanding: &Understanding,
    spread_activation: &HashMap<String, f64>,
    config: &RecallConfig,
    now: DateTime<Utc>,
) -> f64 {
    let w = &config.weights;

    let f_vec = match (&understanding.query_vector, &m.embedding) {
        (Some(q), Some(e)) if q.len() == e.len() => cosine_similarity(q, e),
        _ => 0.0,
    };
    let f_ent = jaccard(&understanding.entities, &m.entities);
    let f_top = jaccard(&understanding.topics, &m.topics);
    let f_type = if m.memory_type == MemoryType::Consolidated { 0.25 } else { 0.0 };
    let activation = spread_activation.get(&m.id).copied().unwrap_or(0.0);
    let f_spread = (1.0 + activation).ln();
    let f_recency = exp_decay_kernel(m.last_accessed_at, now, config.recency_half_life_days);
    let f_sal = m.salience.value();

    let penalty_superseded = if m.is_superseded() { PENALTY_SUPERSEDED } else { 0.0 };
    let penalty_age = age_penalty(m, now, config.age_penalty_half_life_days);

    w.w_vec * f_vec
        + w.w_ent * f_ent
        + w.w_top * f_top
        + w.w_type * f_type
        + w.w_spread * f_spread
        + w.w_recency * f_recency
        + w.w_salience * f_sal
        - penalty_superseded
        - penalty_age
}

/// `score(m) = exp(-ln2 * days_since(m.last_accessed_at) / half_life)`.
fn exp_decay_kernel(since: DateTime<Utc>, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    let days = (now - since).num_seconds().max(0) as f64 / 86_400.0;
    (-days * std::f64::consts::LN_2 / half_life_days).exp()
}

/// Grows toward `(1 - salience)` as a memory goes stale against the longer
/// 180-day half-life, so high-salience content is never suppressed purely
/// by age while low-salience stale content is nudged down.
fn age_penalty(m: &Memory, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    let staleness = 1.0 - exp_decay_kernel(m.last_accessed_at, now, half_life_days);
    staleness * (1.0 - m.salience.value())
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Score descending; ties broken by higher salience, then more recent
/// `valid_from`, then lexicographic id (spec §4.5.4). Kept as an explicit
/// comparator rather than a derived sort key — floats don't implement
/// `Ord`, and this keeps the tie-break order visible at the call site.
fn compare_candidates(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.memory
                .salience
                .value()
                .partial_cmp(&a.memory.salience.value())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.memory.valid_from.cmp(&a.memory.valid_from))
        .then_with(|| a.memory.id.cmp(&b.memory.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::{MemoryStatus, Salience, Source};

    fn memory(id: &str, salience: f64, last_accessed_at: DateTime<Utc>) -> Memory {
        Memory {
            id: id.to_string(),
            content: id.to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Salience::new(salience),
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            source: Source::System { reference: None },
            created_at: last_accessed_at,
            valid_from: last_accessed_at,
            valid_until: None,
            last_accessed_at,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(id),
        }
    }

    fn understanding() -> Understanding {
        Understanding {
            query_vector: None,
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            aggregation: None,
            at: None,
        }
    }

    #[test]
    fn missing_embedding_scores_zero_for_vector_factor_but_stays_eligible() {
        let now = Utc::now();
        let mut und = understanding();
        und.query_vector = Some(vec![1.0, 0.0]);
        let m = memory("a", 0.5, now);
        let scored = score_candidates(vec![m], &und, &HashMap::new(), &RecallConfig::default(), now);
        assert_eq!(scored.len(), 1);
    }

    #[test]
    fn higher_salience_outranks_on_tie() {
        let now = Utc::now();
        let low = memory("a", 0.2, now);
        let high = memory("b", 0.8, now);
        let scored = score_candidates(
            vec![low, high],
            &understanding(),
            &HashMap::new(),
            &RecallConfig::default(),
            now,
        );
        assert_eq!(scored[0].memory.id, "b");
    }

    #[test]
    fn superseded_candidate_ranks_below_equivalent_active_one() {
        let now = Utc::now();
        let mut active = memory("a", 0.5, now);
        let mut superseded = memory("b", 0.5, now);
        active.status = MemoryStatus::Active;
        superseded.status = MemoryStatus::Superseded;
        let scored = score_candidates(
            vec![active, superseded],
            &understanding(),
            &HashMap::new(),
            &RecallConfig::default(),
            now,
        );
        assert_eq!(scored[0].memory.id, "a");
    }

    #[test]
    fn stale_low_salience_memory_is_penalized_more_than_stale_high_salience() {
        let now = Utc::now();
        let stale = now - chrono::Duration::days(400);
        let low_sal = memory("a", 0.05, stale);
        let high_sal = memory("b", 0.95, stale);
        let scored = score_candidates(
            vec![low_sal, high_sal],
            &understanding(),
            &HashMap::new(),
            &RecallConfig::default(),
            now,
        );
        assert_eq!(scored[0].memory.id, "b");
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a: BTreeSet<String> = ["x".to_string()].into_iter().collect();
        let b: BTreeSet<String> = ["y".to_string()].into_iter().collect();
        assert_eq!(jaccard(&a, &b), 0.0);
    }
}
