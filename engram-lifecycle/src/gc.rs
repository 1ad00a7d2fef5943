//! Dangling-edge garbage collection (spec §4.8): drops edges with at
//! least one archived endpoint. Archived memories never appear in recall
//! seeds or spreading activation, so edges touching them are dead weight
//! in the graph the moment either side archives.

use std::collections::HashMap;

use engram_core::{EngramResult, MemoryStatus, Store};

#[derive(Debug, Clone, Default)]
pub struct GcSummary {
    pub removed_edges: usize,
}

/// Scans every edge in the store and drops those with an archived
/// endpoint, mirroring the removal into `graph` as well.
pub fn run(store: &dyn Store, graph: &mut engram_graph::IndexedGraph) -> EngramResult<GcSummary> {
    let edges = store.all_edges()?;
    let mut status_cache: HashMap<String, MemoryStatus> = HashMap::new();
    let mut summary = GcSummary::default();

    for edge in edges {
        let src_archived = is_archived(store, &mut status_cache, &edge.src_id)?;
        let dst_archived = is_archived(store, &mut status_cache, &edge.dst_id)?;
        if !src_archived && !dst_archived {
            continue;
        }
        engram_graph::remove_persisted_edge(store, graph, &edge.src_id, &edge.dst_id, edge.kind)?;
        summary.removed_edges += 1;
    }

    tracing::info!(removed = summary.removed_edges, "edge gc pass complete");
    Ok(summary)
}

fn is_archived(store: &dyn Store, cache: &mut HashMap<String, MemoryStatus>, id: &str) -> EngramResult<bool> {
    if let Some(status) = cache.get(id) {
        return Ok(*status == MemoryStatus::Archived);
    }
    let status = store.get(id)?.map(|m| m.status).unwrap_or(MemoryStatus::Archived);
    cache.insert(id.to_string(), status);
    Ok(status == MemoryStatus::Archived)
}
