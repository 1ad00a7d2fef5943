//! Reciprocal Rank Fusion over the seed phase's four ranked sources
//! (aggregation, vector, entity, topic): `score = sum(1 / (k + rank))`.
//! Generalizes the teacher's three-source (FTS5/vector/entity) fuse
//! function to Engram's four seed sources; aggregation hits are treated as
//! rank 1 since the aggregation route is itself a hard priority override,
//! not a ranked list.

use crate::seed::SeedCandidate;

#[derive(Debug, Clone)]
pub struct FusedCandidate {
    pub id: String,
    pub rrf_score: f64,
    pub vector_rank: Option<usize>,
    pub vector_score: Option<f64>,
    pub entity_rank: Option<usize>,
    pub topic_rank: Option<usize>,
    pub from_aggregation: bool,
}

/// Fuses seed candidates into a single descending-score ordering. `k` is
/// the RRF smoothing constant (spec-configured, default 60).
pub fn fuse(candidates: Vec<SeedCandidate>, k: f64) -> Vec<FusedCandidate> {
    let mut fused: Vec<FusedCandidate> = candidates
        .into_iter()
        .map(|c| {
            let mut rrf_score = 0.0;
            if c.from_aggregation {
                rrf_score += 1.0 / (k + 1.0);
            }
            if let Some(rank) = c.vector_rank {
                rrf_score += 1.0 / (k + rank as f64);
            }
            if let Some(rank) = c.entity_rank {
                rrf_score += 1.0 / (k + rank as f64);
            }
            if let Some(rank) = c.topic_rank {
                rrf_score += 1.0 / (k + rank as f64);
            }
            FusedCandidate {
                id: c.id,
                rrf_score,
                vector_rank: c.vector_rank,
                vector_score: c.vector_score,
                entity_rank: c.entity_rank,
                topic_rank: c.topic_rank,
                from_aggregation: c.from_aggregation,
            }
        })
        .collect();

    fused.sort_by(|a, b| b.rrf_score.partial_cmp(&a.rrf_score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}
