//! Edge synthesis triggered by a new write (spec §4.4). `entity-shared`
//! edges are created transactionally by `engram-store::insert` itself,
//! since they need the same-transaction entity index; `temporal-next` is
//! synthesized here, one step removed from the write, since it only needs
//! a single read (the session's prior memory) plus one edge insert.

use chrono::Utc;
use engram_core::{Edge, EdgeKind, EngramResult, Memory, Source, Store};

use crate::indexed_graph::persist_edge;
use crate::IndexedGraph;

/// Default weight for `temporal-next` edges (spec §4.4 spreading-activation
/// per-kind default — reused here as the synthesized edge's own weight,
/// since no stronger signal distinguishes one adjacent pair from another).
const TEMPORAL_NEXT_WEIGHT: f64 = 0.4;

/// Chains `memory` to the most recent other memory in the same
/// conversation session, if one exists. No-op for non-conversation
/// sources or memories with no `session_id`.
pub fn synthesize_temporal_next(
    store: &dyn Store,
    graph: &mut IndexedGraph,
    memory: &Memory,
) -> EngramResult<()> {
    let Source::Conversation { session_id: Some(session_id) } = &memory.source else {
        return Ok(());
    };
    let Some(prior_id) = store.latest_in_session(session_id, &memory.id)? else {
        return Ok(());
    };
    let edge = Edge::new(prior_id, memory.id.clone(), EdgeKind::TemporalNext, TEMPORAL_NEXT_WEIGHT, Utc::now());
    persist_edge(store, graph, edge)
}
