//! 5-phase consolidation pipeline orchestrator (spec §4.6).
//!
//! Phase 1: Selection → Phase 2: Clustering → Phase 3: Synthesis →
//! Phase 4: Contradiction detection → Phase 5: Entity graph refinement.
//! A decay pass (spec §4.6 step 5) is delegated to `engram-lifecycle`
//! rather than folded into this module, since it runs over the whole
//! vault and not just the selected candidates.

pub mod phase1_selection;
pub mod phase2_clustering;
pub mod phase3_synthesis;
pub mod phase4_contradiction;
pub mod phase5_entity_refine;

use std::time::Instant;

use chrono::Utc;
use engram_core::config::ConsolidationConfig;
use engram_core::errors::ConsolidateError;
use engram_core::{Edge, EdgeKind, Embedder, EngramResult, Llm, Memory, Store};
use engram_graph::IndexedGraph;
use tokio_util::sync::CancellationToken;

/// Outcome of one consolidation run.
#[derive(Debug, Clone, Default)]
pub struct ConsolidationReport {
    /// Ids of newly created consolidated memories.
    pub consolidated_ids: Vec<String>,
    /// `(newer_id, older_id)` pairs resolved by supersession.
    pub superseded_pairs: Vec<(String, String)>,
    /// `(alias, canonical)` entity merges applied.
    pub merged_entities: Vec<(String, String)>,
    /// Clusters left unprocessed because the wall-clock budget ran out.
    pub deferred_clusters: usize,
    /// Memories whose salience was decayed by the piggybacked lifecycle
    /// pass (spec §4.6 step 5). Left at 0 by `run_pipeline` itself; set by
    /// `ConsolidationEngine` after the decay sweep runs.
    pub decayed_count: usize,
    pub elapsed_ms: u64,
}

/// Runs phases 1-4 over selected candidates, then phase 5 over the whole
/// entity graph. Stops starting new clusters once `config.budget_ms`
/// elapses; whatever already committed stays committed (spec §4.6
/// "partial progress persists" — a cluster is only ever fully processed
/// or not started, never half-applied).
pub fn run_pipeline(
    store: &dyn Store,
    graph: &mut IndexedGraph,
    embedder: Option<&dyn Embedder>,
    llm: Option<&dyn Llm>,
    config: &ConsolidationConfig,
    memories: &[Memory],
    cancel: Option<&CancellationToken>,
) -> EngramResult<ConsolidationReport> {
    let started = Instant::now();
    let llm = if config.llm_polish { llm } else { None };

    let now = Utc::now();
    let selected = phase1_selection::select_candidates(memories, now);
    tracing::info!(count = selected.len(), "phase 1: selected consolidation candidates");

    let mut report = ConsolidationReport::default();
    if selected.is_empty() {
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        return Ok(report);
    }

    let embeddings: Vec<Option<Vec<f32>>> = selected
        .iter()
        .map(|m| match &m.embedding {
            Some(v) => Some(v.clone()),
            None => embedder.and_then(|e| e.embed(&m.content).ok()),
        })
        .collect();

    let cluster_result = phase2_clustering::cluster_candidates(&selected, &embeddings, config);
    tracing::info!(
        clusters = cluster_result.clusters.len(),
        noise = cluster_result.noise.len(),
        "phase 2: clustering complete"
    );

    for indices in &cluster_result.clusters {
        if cancelled(cancel) {
            return Err(ConsolidateError::Cancelled.into());
        }
        if started.elapsed().as_millis() as u64 >= config.budget_ms {
            report.deferred_clusters += cluster_result.clusters.len() - report.consolidated_ids.len()
                - report.deferred_clusters;
            break;
        }

        let cluster: Vec<&Memory> = indices.iter().map(|&i| selected[i]).collect();
        let cluster_embeddings: Vec<Option<Vec<f32>>> =
            indices.iter().map(|&i| embeddings[i].clone()).collect();

        let synthesis = phase3_synthesis::synthesize(&cluster, &cluster_embeddings, llm);
        let consolidated = synthesis.memory;

        store.insert(&consolidated).map_err(|err| ConsolidateError::MergeFailed {
            cluster_id: consolidated.id.clone(),
            reason: err.to_string(),
        })?;

        for constituent in &cluster {
            let edge = Edge::new(
                consolidated.id.clone(),
                constituent.id.clone(),
                EdgeKind::Elaborates,
                1.0,
                now,
            );
            engram_graph::persist_edge(store, graph, edge)?;
        }
        report.consolidated_ids.push(consolidated.id.clone());

        let contradictions = phase4_contradiction::detect(&cluster, llm);
        for pair in contradictions {
            store.supersede(&pair.older_id, &pair.newer_id, now)?;
            engram_graph::persist_edge(
                store,
                graph,
                Edge::new(pair.newer_id.clone(), pair.older_id.clone(), EdgeKind::Supersedes, 1.0, now),
            )?;
            report.superseded_pairs.push((pair.newer_id, pair.older_id));
        }
    }

    if !cancelled(cancel) {
        let merges = phase5_entity_refine::refine(store, config, now)?;
        report.merged_entities = merges.into_iter().map(|m| (m.alias, m.canonical)).collect();
    }

    report.elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::info!(
        consolidated = report.consolidated_ids.len(),
        superseded = report.superseded_pairs.len(),
        merged_entities = report.merged_entities.len(),
        deferred = report.deferred_clusters,
        elapsed_ms = report.elapsed_ms,
        "consolidation pipeline complete"
    );
    Ok(report)
}

fn cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(|c| c.is_cancelled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::{MemoryStatus, MemoryType, Salience, Source};
    use engram_store::StoreEngine;
    use engram_test_support::FakeLlm;
    use std::collections::BTreeSet;

    fn old_episodic(id: &str, content: &str, entities: &[&str], days_ago: i64) -> Memory {
        let now = Utc::now();
        let valid_from = now - chrono::Duration::days(days_ago);
        Memory {
            id: id.to_string(),
            content: content.to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Salience::new(0.5),
            entities: entities.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            topics: BTreeSet::new(),
            source: Source::System { reference: None },
            created_at: valid_from,
            valid_from,
            valid_until: None,
            last_accessed_at: valid_from,
            reinforcement_count: 0,
            embedding: Some(vec![1.0, 1.0, 1.0]),
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(content),
        }
    }

    #[test]
    fn empty_candidate_set_produces_empty_report() {
        let store = StoreEngine::open_in_memory().unwrap();
        let mut graph = IndexedGraph::new();
        let config = ConsolidationConfig::default();
        let report = run_pipeline(&store, &mut graph, None, None, &config, &[], None).unwrap();
        assert!(report.consolidated_ids.is_empty());
    }

    #[test]
    fn clustered_candidates_produce_a_consolidated_memory_with_elaborates_edges() {
        let store = StoreEngine::open_in_memory().unwrap();
        let mut graph = IndexedGraph::new();
        let config = ConsolidationConfig { min_cluster_size: 2, ..Default::default() };

        let m1 = old_episodic("a", "Acme renewed the contract.", &["acme"], 10);
        let m2 = old_episodic("b", "Acme also added a new seat.", &["acme"], 9);
        store.insert(&m1).unwrap();
        store.insert(&m2).unwrap();

        let llm = FakeLlm::new();
        llm.when_contains("Acme renewed", "Acme renewed its contract and added a seat.");

        let report = run_pipeline(&store, &mut graph, None, Some(&llm), &config, &[m1, m2], None).unwrap();
        assert_eq!(report.consolidated_ids.len(), 1);
        let consolidated_id = &report.consolidated_ids[0];
        assert_eq!(graph.outgoing(consolidated_id).len(), 2);
    }

    #[test]
    fn cancellation_before_any_cluster_starts_aborts() {
        let store = StoreEngine::open_in_memory().unwrap();
        let mut graph = IndexedGraph::new();
        let config = ConsolidationConfig::default();
        let m1 = old_episodic("a", "Acme renewed.", &["acme"], 10);
        let m2 = old_episodic("b", "Acme added a seat.", &["acme"], 9);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run_pipeline(&store, &mut graph, None, None, &config, &[m1, m2], Some(&cancel)).unwrap_err();
        assert!(matches!(err, engram_core::EngramError::Consolidate(ConsolidateError::Cancelled)));
    }
}
