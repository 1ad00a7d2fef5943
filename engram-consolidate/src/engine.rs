//! `ConsolidationEngine`: single-execution orchestrator wrapping
//! [`pipeline::run_pipeline`]. Mirrors the teacher's `ConsolidationEngine`
//! guard against overlapping runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use engram_core::config::{ConsolidationConfig, LifecycleConfig};
use engram_core::errors::ConsolidateError;
use engram_core::{Embedder, EngramResult, Llm, MemoryStatus, Store};
use engram_graph::IndexedGraph;
use tokio_util::sync::CancellationToken;

use crate::pipeline::{self, ConsolidationReport};

/// Bounded page size for the `by_status` scan that gathers consolidation
/// candidates — generous enough for a single vault's active episodic set.
const CANDIDATE_SCAN_LIMIT: usize = 10_000;

pub struct ConsolidationEngine {
    store: Arc<dyn Store>,
    embedder: Option<Arc<dyn Embedder>>,
    llm: Option<Arc<dyn Llm>>,
    config: ConsolidationConfig,
    lifecycle_config: LifecycleConfig,
    running: AtomicBool,
}

impl ConsolidationEngine {
    pub fn new(
        store: Arc<dyn Store>,
        embedder: Option<Arc<dyn Embedder>>,
        llm: Option<Arc<dyn Llm>>,
        config: ConsolidationConfig,
        lifecycle_config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            llm,
            config,
            lifecycle_config,
            running: AtomicBool::new(false),
        }
    }

    /// Runs one consolidation pass: phases 1-5 over active episodic
    /// memories, then a decay sweep over the whole vault (spec §4.6 step
    /// 5). Refuses to run concurrently with itself — a second caller gets
    /// `ConsolidateError::AlreadyRunning` rather than racing the first.
    pub fn consolidate(
        &self,
        graph: &mut IndexedGraph,
        cancel: Option<&CancellationToken>,
    ) -> EngramResult<ConsolidationReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConsolidateError::AlreadyRunning.into());
        }
        let result = self.run_locked(graph, cancel);
        self.running.store(false, Ordering::SeqCst);
        result
    }

    fn run_locked(
        &self,
        graph: &mut IndexedGraph,
        cancel: Option<&CancellationToken>,
    ) -> EngramResult<ConsolidationReport> {
        let memories = self.store.by_status(MemoryStatus::Active, CANDIDATE_SCAN_LIMIT)?;
        let mut report = pipeline::run_pipeline(
            self.store.as_ref(),
            graph,
            self.embedder.as_deref(),
            self.llm.as_deref(),
            &self.config,
            &memories,
            cancel,
        )?;

        if cancel.is_some_and(|c| c.is_cancelled()) {
            return Ok(report);
        }
        let decayed = engram_lifecycle::decay::run(self.store.as_ref(), &self.lifecycle_config, chrono::Utc::now())?;
        report.decayed_count = decayed.decayed_ids.len();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use engram_core::{Memory, MemoryType, Salience, Source};
    use engram_store::StoreEngine;
    use std::collections::BTreeSet;

    fn old_episodic(id: &str, content: &str, entities: &[&str], days_ago: i64) -> Memory {
        let now = Utc::now();
        let valid_from = now - Duration::days(days_ago);
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
    fn overlapping_runs_are_rejected() {
        let store: Arc<dyn Store> = Arc::new(StoreEngine::open_in_memory().unwrap());
        let engine = ConsolidationEngine::new(
            store,
            None,
            None,
            ConsolidationConfig::default(),
            LifecycleConfig::default(),
        );
        engine.running.store(true, Ordering::SeqCst);
        let mut graph = IndexedGraph::new();
        let err = engine.consolidate(&mut graph, None).unwrap_err();
        assert!(matches!(
            err,
            engram_core::EngramError::Consolidate(ConsolidateError::AlreadyRunning)
        ));
        engine.running.store(false, Ordering::SeqCst);
    }

    #[test]
    fn consolidate_clusters_and_decays_in_one_pass() {
        let store: Arc<dyn Store> = Arc::new(StoreEngine::open_in_memory().unwrap());
        let m1 = old_episodic("a", "Acme renewed.", &["acme"], 30);
        let m2 = old_episodic("b", "Acme added a seat.", &["acme"], 29);
        store.insert(&m1).unwrap();
        store.insert(&m2).unwrap();

        let engine = ConsolidationEngine::new(
            store.clone(),
            None,
            None,
            ConsolidationConfig { min_cluster_size: 2, ..Default::default() },
            LifecycleConfig::default(),
        );
        let mut graph = IndexedGraph::new();
        let report = engine.consolidate(&mut graph, None).unwrap();
        assert_eq!(report.consolidated_ids.len(), 1);
    }
}
