//! Phase 2: Clustering — HDBSCAN over a composite embedding + entity-overlap
//! feature space (spec §4.6 step 1: "cosine similarity ≥ τ_merge AND
//! overlapping entity sets").
//!
//! Both signals are folded into one composite vector per candidate rather
//! than gated as a literal boolean AND, the same way the teacher blends
//! multiple weighted signals into a single HDBSCAN distance space.

use std::collections::HashMap;

use engram_core::config::ConsolidationConfig;
use engram_core::Memory;
use hdbscan::{Hdbscan, HdbscanHyperParams};

/// Weight given to the (already-normalized) embedding signal.
const W_EMBEDDING: f32 = 0.7;
/// Weight given to the entity-overlap signal.
const W_ENTITY_OVERLAP: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// Each inner `Vec` holds indices into the original candidate slice.
    pub clusters: Vec<Vec<usize>>,
    /// Indices of candidates that did not join any cluster.
    pub noise: Vec<usize>,
}

/// Cluster candidates using HDBSCAN on composite feature vectors.
///
/// `embeddings` is parallel to `candidates`; a `None` entry means the
/// embedder had nothing for that candidate and only the entity signal
/// contributes to its placement.
pub fn cluster_candidates(
    candidates: &[&Memory],
    embeddings: &[Option<Vec<f32>>],
    config: &ConsolidationConfig,
) -> ClusterResult {
    if candidates.len() < config.min_cluster_size {
        return ClusterResult { clusters: vec![], noise: (0..candidates.len()).collect() };
    }

    let features = build_composite_features(candidates, embeddings);
    let hyper_params = HdbscanHyperParams::builder()
        .min_cluster_size(config.min_cluster_size)
        .min_samples(1)
        .build();
    let clusterer = Hdbscan::new(&features, hyper_params);
    let labels = match clusterer.cluster() {
        Ok(l) => l,
        Err(_) => return ClusterResult { clusters: vec![], noise: (0..candidates.len()).collect() },
    };

    let mut cluster_map: HashMap<i32, Vec<usize>> = HashMap::new();
    let mut noise = Vec::new();
    for (idx, &label) in labels.iter().enumerate() {
        if label < 0 {
            noise.push(idx);
        } else {
            cluster_map.entry(label).or_default().push(idx);
        }
    }

    let mut clusters: Vec<Vec<usize>> = cluster_map.into_values().collect();
    clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));
    ClusterResult { clusters, noise }
}

fn build_composite_features(candidates: &[&Memory], embeddings: &[Option<Vec<f32>>]) -> Vec<Vec<f32>> {
    let embed_dim = embeddings.iter().find_map(|e| e.as_ref().map(|v| v.len())).unwrap_or(0);
    let all_entities: Vec<String> = {
        let mut set: Vec<String> = candidates.iter().flat_map(|m| m.entities.iter().cloned()).collect();
        set.sort();
        set.dedup();
        set
    };

    candidates
        .iter()
        .enumerate()
        .map(|(i, mem)| {
            let mut features = Vec::with_capacity(embed_dim + all_entities.len());
            match embeddings.get(i).and_then(|e| e.as_ref()) {
                Some(v) => features.extend(v.iter().map(|x| x * W_EMBEDDING)),
                None => features.extend(std::iter::repeat(0.0f32).take(embed_dim)),
            }
            for entity in &all_entities {
                let present = if mem.entities.contains(entity) { 1.0 } else { 0.0 };
                features.push(present * W_ENTITY_OVERLAP);
            }
            features
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engram_core::{MemoryStatus, MemoryType, Source};
    use std::collections::BTreeSet;

    fn memory(id: &str, entities: &[&str]) -> Memory {
        Memory {
            id: id.to_string(),
            content: id.to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Default::default(),
            entities: entities.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            topics: BTreeSet::new(),
            source: Source::System { reference: None },
            created_at: Utc::now(),
            valid_from: Utc::now(),
            valid_until: None,
            last_accessed_at: Utc::now(),
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(id),
        }
    }

    #[test]
    fn too_few_candidates_returns_all_as_noise() {
        let m = memory("a", &["acme"]);
        let result = cluster_candidates(&[&m], &[Some(vec![1.0; 4])], &ConsolidationConfig::default());
        assert!(result.clusters.is_empty());
        assert_eq!(result.noise.len(), 1);
    }

    #[test]
    fn similar_memories_with_shared_entity_cluster_together() {
        let m1 = memory("a", &["acme corp"]);
        let m2 = memory("b", &["acme corp"]);
        let m3 = memory("c", &["acme corp"]);
        let m4 = memory("d", &["globex"]);
        let candidates: Vec<&Memory> = vec![&m1, &m2, &m3, &m4];
        let embeddings = vec![
            Some(vec![1.0, 1.0, 1.0, 1.0]),
            Some(vec![1.0, 1.0, 1.0, 1.1]),
            Some(vec![1.0, 1.0, 1.1, 1.0]),
            Some(vec![10.0, 10.0, 10.0, 10.0]),
        ];
        let result = cluster_candidates(&candidates, &embeddings, &ConsolidationConfig::default());
        let total: usize = result.clusters.iter().map(|c| c.len()).sum::<usize>() + result.noise.len();
        assert_eq!(total, 4);
    }

    #[test]
    fn missing_embeddings_still_cluster_on_entity_signal_alone() {
        let m1 = memory("a", &["acme corp"]);
        let m2 = memory("b", &["acme corp"]);
        let candidates: Vec<&Memory> = vec![&m1, &m2];
        let embeddings = vec![None, None];
        let result = cluster_candidates(&candidates, &embeddings, &ConsolidationConfig::default());
        let total: usize = result.clusters.iter().map(|c| c.len()).sum::<usize>() + result.noise.len();
        assert_eq!(total, 2);
    }
}
