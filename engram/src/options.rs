//! Caller-facing option structs for the `Vault` public surface (spec §6.1).
//! Thin builders over the lower subsystems' own option types — kept here
//! rather than re-exported so the facade can evolve its surface
//! independently of `engram-recall`/`engram-extract`.

use chrono::{DateTime, Utc};
use engram_core::{EdgeKind, MemoryStatus, MemoryType, Source};
use engram_recall::RecallQuery;

/// Options accepted by `Vault::remember`.
#[derive(Debug, Clone, Default)]
pub struct RememberOptions {
    pub memory_type: Option<MemoryType>,
    pub entities: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub salience: Option<f64>,
    pub status: Option<MemoryStatus>,
    pub source: Option<Source>,
    pub valid_from: Option<DateTime<Utc>>,
}

impl RememberOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options accepted by `Vault::recall`.
#[derive(Debug, Clone)]
pub struct RecallOptions {
    pub context: String,
    pub entities: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
    pub types: Option<Vec<MemoryType>>,
    pub limit: usize,
    pub spread: bool,
    pub spread_hops: Option<usize>,
    pub spread_decay: Option<f64>,
    pub at: Option<DateTime<Utc>>,
}

const DEFAULT_RECALL_LIMIT: usize = 10;

impl RecallOptions {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            entities: None,
            topics: None,
            types: None,
            limit: DEFAULT_RECALL_LIMIT,
            spread: false,
            spread_hops: None,
            spread_decay: None,
            at: None,
        }
    }

    pub(crate) fn into_query(self) -> RecallQuery {
        let mut query = RecallQuery::new(self.context, self.limit);
        query.entities = self.entities;
        query.topics = self.topics;
        query.types = self.types;
        query.spread = self.spread;
        query.spread_hops = self.spread_hops;
        query.spread_decay = self.spread_decay;
        query.at = self.at;
        query
    }
}

/// Options accepted by `Vault::surface`.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    pub context: String,
    pub active_entities: Option<Vec<String>>,
    pub active_topics: Option<Vec<String>>,
    pub limit: usize,
}

const DEFAULT_SURFACE_LIMIT: usize = 5;

impl SurfaceOptions {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            active_entities: None,
            active_topics: None,
            limit: DEFAULT_SURFACE_LIMIT,
        }
    }
}

/// Options accepted by `Vault::neighbors`.
#[derive(Debug, Clone, Default)]
pub struct NeighborOptions {
    pub depth: usize,
    pub kinds: Option<Vec<EdgeKind>>,
}

const DEFAULT_NEIGHBOR_DEPTH: usize = 1;

impl NeighborOptions {
    pub fn new() -> Self {
        Self { depth: DEFAULT_NEIGHBOR_DEPTH, kinds: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_options_translate_into_a_query() {
        let mut opts = RecallOptions::new("what happened with acme");
        opts.limit = 3;
        opts.spread = true;
        let query = opts.into_query();
        assert_eq!(query.context, "what happened with acme");
        assert_eq!(query.limit, 3);
        assert!(query.spread);
    }

    #[test]
    fn defaults_are_sane() {
        assert_eq!(RecallOptions::new("x").limit, DEFAULT_RECALL_LIMIT);
        assert_eq!(SurfaceOptions::new("x").limit, DEFAULT_SURFACE_LIMIT);
        assert_eq!(NeighborOptions::new().depth, DEFAULT_NEIGHBOR_DEPTH);
    }
}
