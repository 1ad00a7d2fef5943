use chrono::{DateTime, Utc};

use crate::errors::EngramResult;
use crate::memory::{Edge, EdgeKind, Entity, Memory, MemoryStatus};

/// A node reached by `Store::neighbors`, with the hop distance and which
/// edge kinds were traversed to reach it (spec §4.1).
#[derive(Debug, Clone)]
pub struct NeighborHit {
    pub id: String,
    pub hop: usize,
    pub traversed_kinds: Vec<EdgeKind>,
}

/// The only component that touches the on-disk format (spec §4.1).
/// Everything above speaks in domain terms; implementations own the
/// transaction boundary for every mutation.
pub trait Store: Send + Sync {
    /// Atomically commits the memory row, per-entity upserts, and initial
    /// `entity-shared` edges to other memories sharing an entity (capped).
    /// `InvalidPayload` on dimensionality mismatch, `Conflict` if id exists.
    fn insert(&self, memory: &Memory) -> EngramResult<()>;

    /// Sets the embedding and registers it with the vector index in the
    /// same transaction. Idempotent on equal vectors.
    fn update_embedding(&self, id: &str, vector: &[f32]) -> EngramResult<()>;

    /// Marks a row `embedding-failed` after the embedder adapter exhausts
    /// its retries (spec §4.3). The row stays recallable by entity/full-text
    /// but drops out of vector search.
    fn mark_embedding_failed(&self, id: &str) -> EngramResult<()>;

    /// Increments `reinforcement_count`, raises salience by a log-decaying
    /// increment. Must be callable concurrently.
    fn reinforce(&self, id: &str) -> EngramResult<()>;

    /// Subtracts `step` from salience, clamped at 0 (spec §4.6 step 5,
    /// §4.8 decay sweep). Leaves `last_accessed_at` untouched.
    fn decay_salience(&self, id: &str, step: f64) -> EngramResult<()>;

    /// Closes `old`'s validity at `at`, marks it superseded, and creates a
    /// `supersedes` edge `new -> old`. Atomic.
    fn supersede(&self, old_id: &str, new_id: &str, at: DateTime<Utc>) -> EngramResult<()>;

    /// Hard-removes row + edges + vector-index entry, or soft-archives.
    /// Archived rows never appear in recall seeds.
    fn forget(&self, id: &str, hard: bool) -> EngramResult<()>;

    /// Updates `last_accessed_at`; callers batch these.
    fn stamp(&self, id: &str, when: DateTime<Utc>) -> EngramResult<()>;

    /// Top-k (id, cosine similarity) over non-archived memories with a
    /// present embedding.
    fn vector_search(&self, query_vec: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>>;

    /// Ids ordered by descending count of entity matches.
    fn entity_seed(&self, entities: &[String], k: usize) -> EngramResult<Vec<String>>;

    /// Ids ordered by descending count of topic matches (spec §4.5.2
    /// topic-seed).
    fn topic_seed(&self, topics: &[String], k: usize) -> EngramResult<Vec<String>>;

    /// Most recent other memory sharing `session_id` (spec §4.4
    /// `temporal-next`), used to chain chronologically adjacent memories
    /// within the same conversation.
    fn latest_in_session(&self, session_id: &str, exclude_id: &str) -> EngramResult<Option<String>>;

    /// Materializes memories with the given lifecycle status.
    fn by_status(&self, status: MemoryStatus, k: usize) -> EngramResult<Vec<Memory>>;

    /// Bounded BFS over the edge graph from `id`, capped at a configurable
    /// edge-visit budget.
    fn neighbors(
        &self,
        id: &str,
        depth: usize,
        kinds: Option<&[EdgeKind]>,
    ) -> EngramResult<Vec<NeighborHit>>;

    /// Batched hydration preserving caller order; missing ids are omitted.
    fn get_by_ids(&self, ids: &[String]) -> EngramResult<Vec<Memory>>;

    fn get(&self, id: &str) -> EngramResult<Option<Memory>>;

    /// Raw edge list for a memory, optionally filtered by kind. Used by
    /// `engram-graph` to rebuild the in-memory graph on open.
    fn edges_for(&self, id: &str, kinds: Option<&[EdgeKind]>) -> EngramResult<Vec<Edge>>;

    /// All edges in the store, used for a full in-memory graph rebuild.
    fn all_edges(&self) -> EngramResult<Vec<Edge>>;

    fn add_edge(&self, edge: &Edge) -> EngramResult<()>;

    /// Removes a single typed edge, e.g. when consolidation resolves a
    /// `contradicts` pair (spec §4.6). No-op if the edge doesn't exist.
    fn remove_edge(&self, src_id: &str, dst_id: &str, kind: EdgeKind) -> EngramResult<()>;

    /// Entities ordered by descending `memory_count`, for `entities()`
    /// (spec §4.7) and consolidation's alias-merge candidate scan
    /// (spec §4.6 step 4).
    fn list_entities(&self, k: usize) -> EngramResult<Vec<Entity>>;

    /// Folds `alias` into `canonical`: repoints every `memory_entities`
    /// row and JSON-encoded `Memory.entities` mention from `alias` to
    /// `canonical`, merges the two `entities` rows (summed `memory_count`,
    /// earliest `created_at`, latest `last_seen_at`), and drops the alias
    /// row. Atomic; a no-op if `alias == canonical`.
    fn merge_entity_alias(&self, alias: &str, canonical: &str, at: DateTime<Utc>) -> EngramResult<()>;
}
