use serde::{Deserialize, Serialize};

use crate::constants;

/// Consolidation subsystem configuration (spec §4.6, §6.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Minimum cluster size for HDBSCAN.
    pub min_cluster_size: usize,
    /// Cosine-similarity merge threshold.
    pub merge_threshold: f64,
    /// Wall-clock budget for a single consolidation pass, in milliseconds.
    pub budget_ms: u64,
    /// Enable LLM-drafted merge summaries; falls back to concatenation
    /// when no `Llm` provider is configured (spec §4.6, §6.5).
    pub llm_polish: bool,
    /// Minimum normalized-surface-form similarity for two entities to be
    /// considered alias candidates (spec §4.6 step 4).
    pub alias_similarity_threshold: f64,
    /// Minimum cross-memory co-occurrence before an alias candidate pair
    /// is actually merged (spec §4.6 step 4).
    pub alias_min_cooccurrence: u64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 2,
            merge_threshold: constants::DEFAULT_MERGE_THRESHOLD,
            budget_ms: constants::DEFAULT_CONSOLIDATION_BUDGET_MS,
            llm_polish: true,
            alias_similarity_threshold: constants::DEFAULT_ENTITY_ALIAS_SIMILARITY,
            alias_min_cooccurrence: constants::DEFAULT_ENTITY_ALIAS_MIN_COOCCURRENCE,
        }
    }
}
