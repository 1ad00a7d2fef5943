//! Spread phase (spec §4.5.3): runs `engram-graph`'s spreading activation
//! from the fused candidate set with per-seed activation equal to each
//! seed's own seed-score, normalized to `[0, 1]`.

use std::collections::HashMap;

use engram_graph::{spread as graph_spread, IndexedGraph, SpreadConfig};

use crate::fusion::FusedCandidate;

/// Seed-score for spreading activation: the raw cosine similarity when the
/// candidate came from vector search, otherwise a reciprocal-rank proxy for
/// match count (the store's `entity_seed`/`topic_seed` expose rank order,
/// not raw counts).
fn seed_score(candidate: &FusedCandidate) -> f64 {
    if let Some(cos) = candidate.vector_score {
        return cos.clamp(0.0, 1.0);
    }
    if let Some(rank) = candidate.entity_rank.or(candidate.topic_rank) {
        return 1.0 / rank as f64;
    }
    if candidate.from_aggregation {
        return 1.0;
    }
    0.0
}

/// Runs spreading activation from every fused candidate, returning
/// accumulated activation per reached memory id (including ids not in the
/// seed set — these are the newly surfaced candidates spec §4.5.3 adds to
/// the pool).
pub fn run(graph: &IndexedGraph, candidates: &[FusedCandidate], config: &SpreadConfig) -> HashMap<String, f64> {
    let seeds: Vec<(String, f64)> = candidates
        .iter()
        .map(|c| (c.id.clone(), seed_score(c)))
        .filter(|(_, score)| *score > 0.0)
        .collect();
    if seeds.is_empty() {
        return HashMap::new();
    }
    graph_spread(graph, &seeds, config)
}
