//! `RecallEngine`: the 2-stage orchestrator (spec §4.5) — candidate
//! gathering (seed → RRF fusion → spread) then scoring (multi-factor
//! score → temporal dedup → truncation/stamping). Mirrors the teacher's
//! `RetrievalEngine::retrieve_with_embedding` phase shape.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use engram_core::config::RecallConfig;
use engram_core::errors::RecallError;
use engram_core::{Embedder, EngramError, EngramResult, Memory, Store};
use engram_graph::{IndexedGraph, SpreadConfig};
use tokio_util::sync::CancellationToken;

use crate::dedup;
use crate::fusion;
use crate::query::{self, RecallQuery};
use crate::scoring::{self, ScoredCandidate};
use crate::seed;

/// A single recall result: the memory, its final score, and any candidates
/// the dedup phase collapsed into it.
#[derive(Debug, Clone)]
pub struct RecallHit {
    pub memory: Memory,
    pub score: f64,
    pub absorbed_ids: Vec<String>,
}

pub struct RecallEngine {
    store: Arc<dyn Store>,
    embedder: Option<Arc<dyn Embedder>>,
    config: RecallConfig,
    aggregation_phrases: Vec<String>,
}

impl RecallEngine {
    pub fn new(
        store: Arc<dyn Store>,
        embedder: Option<Arc<dyn Embedder>>,
        config: RecallConfig,
        aggregation_phrases: Vec<String>,
    ) -> Self {
        Self { store, embedder, config, aggregation_phrases }
    }

    /// Runs the full recall pipeline. `graph` is the caller-owned in-memory
    /// graph view (kept in sync with storage by the caller); `cancel`, if
    /// supplied, is checked between phases — a cancellation observed there
    /// aborts the run and discards whatever was already materialized
    /// (spec §4.5 failure semantics), rather than returning partial results.
    pub fn recall(
        &self,
        query: &RecallQuery,
        graph: &IndexedGraph,
        cancel: Option<&CancellationToken>,
    ) -> EngramResult<Vec<RecallHit>> {
        let understanding = query::understand(query, self.embedder.as_deref(), &self.aggregation_phrases);
        if cancelled(cancel) {
            return Err(RecallError::Cancelled.into());
        }

        let cap = query.limit.saturating_mul(self.config.seed_expansion_factor.max(1)).max(query.limit);
        let seeds = seed::seed(self.store.as_ref(), &understanding, cap)?;
        let fused = fusion::fuse(seeds, self.config.rrf_k);
        if fused.is_empty() {
            return Ok(Vec::new());
        }
        if cancelled(cancel) {
            return Err(RecallError::Cancelled.into());
        }

        let spread_activation = if query.spread {
            let spread_config = SpreadConfig {
                decay: query.spread_decay.unwrap_or(self.config.spread.decay),
                max_hops: query
                    .spread_hops
                    .map(|h| h + query.spread_entity_hops.unwrap_or(0))
                    .unwrap_or(self.config.spread.max_hops),
                node_budget: self.config.spread.node_budget,
            };
            crate::spread::run(graph, &fused, &spread_config)
        } else {
            Default::default()
        };
        if cancelled(cancel) {
            return Err(RecallError::Cancelled.into());
        }

        let mut ids: HashSet<String> = fused.iter().map(|c| c.id.clone()).collect();
        ids.extend(spread_activation.keys().cloned());
        let ids: Vec<String> = ids.into_iter().collect();

        let mut memories = self.store.get_by_ids(&ids)?;
        memories.retain(|m| !m.is_archived());
        if let Some(at) = understanding.at {
            memories.retain(|m| m.valid_at(at));
        }
        if let Some(types) = &query.types {
            memories.retain(|m| types.contains(&m.memory_type));
        }

        let now = Utc::now();
        let scored: Vec<ScoredCandidate> =
            scoring::score_candidates(memories, &understanding, &spread_activation, &self.config, now);
        if cancelled(cancel) {
            return Err(RecallError::Cancelled.into());
        }

        let deduped = dedup::dedup(scored);
        let truncated: Vec<_> = deduped.into_iter().take(query.limit).collect();

        for hit in &truncated {
            if let Err(err) = self.store.stamp(&hit.candidate.memory.id, now) {
                tracing::warn!(id = %hit.candidate.memory.id, error = %err, "failed to stamp recall hit");
            }
        }

        Ok(truncated
            .into_iter()
            .map(|d| RecallHit {
                memory: d.candidate.memory,
                score: d.candidate.score,
                absorbed_ids: d.absorbed_ids,
            })
            .collect())
    }
}

fn cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(|c| c.is_cancelled())
}
