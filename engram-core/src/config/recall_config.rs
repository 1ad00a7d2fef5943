use serde::{Deserialize, Serialize};

use crate::constants;

/// Named relevance-scoring weights (spec §4.5.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub w_vec: f64,
    pub w_ent: f64,
    pub w_top: f64,
    pub w_type: f64,
    pub w_spread: f64,
    pub w_recency: f64,
    pub w_salience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            w_vec: 0.35,
            w_ent: 0.15,
            w_top: 0.10,
            w_type: 0.05,
            w_spread: 0.15,
            w_recency: 0.10,
            w_salience: 0.10,
        }
    }
}

/// Spreading-activation tuning (spec §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    pub decay: f64,
    pub max_hops: usize,
    pub node_budget: usize,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            decay: constants::DEFAULT_SPREAD_DECAY,
            max_hops: constants::DEFAULT_SPREAD_MAX_HOPS,
            node_budget: constants::DEFAULT_SPREAD_NODE_BUDGET,
        }
    }
}

/// Recall subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub weights: ScoringWeights,
    pub spread: SpreadConfig,
    /// Seed phase draws up to `limit * seed_expansion_factor` candidates
    /// before RRF fusion and rescoring (spec §4.5.1).
    pub seed_expansion_factor: usize,
    pub recency_half_life_days: f64,
    pub age_penalty_half_life_days: f64,
    pub rrf_k: f64,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            spread: SpreadConfig::default(),
            seed_expansion_factor: constants::DEFAULT_SEED_EXPANSION_FACTOR,
            recency_half_life_days: constants::DEFAULT_RECENCY_HALF_LIFE_DAYS,
            age_penalty_half_life_days: constants::DEFAULT_AGE_PENALTY_HALF_LIFE_DAYS,
            rrf_k: 60.0,
        }
    }
}
