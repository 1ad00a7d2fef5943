//! In-memory adjacency view over the edge store: a `StableDiGraph` keyed by
//! memory id, rebuilt from storage on open and kept in sync with every
//! mutation (spec §4.4).

use std::collections::HashMap;

use engram_core::{Edge, EdgeKind, EngramResult, Store};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;

pub struct IndexedGraph {
    graph: StableDiGraph<String, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Rebuilds the full in-memory graph from every edge the store holds.
    pub fn rebuild_from_storage(store: &dyn Store) -> EngramResult<Self> {
        let mut g = Self::new();
        for edge in store.all_edges()? {
            g.upsert_edge(edge);
        }
        Ok(g)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Inserts an edge, or updates its weight if the `(src, dst, kind)` pair
    /// already exists — mirrors the store's `ON CONFLICT ... DO UPDATE`.
    pub fn upsert_edge(&mut self, edge: Edge) {
        let src = self.ensure_node(&edge.src_id);
        let dst = self.ensure_node(&edge.dst_id);
        if let Some(existing) = self
            .graph
            .edges_connecting(src, dst)
            .find(|e| e.weight().kind == edge.kind)
            .map(|e| e.id())
        {
            self.graph[existing] = edge;
        } else {
            self.graph.add_edge(src, dst, edge);
        }
    }

    pub fn remove_edge(&mut self, src_id: &str, dst_id: &str, kind: EdgeKind) {
        let (Some(&src), Some(&dst)) = (self.index.get(src_id), self.index.get(dst_id)) else {
            return;
        };
        if let Some(edge_id) = self
            .graph
            .edges_connecting(src, dst)
            .find(|e| e.weight().kind == kind)
            .map(|e| e.id())
        {
            self.graph.remove_edge(edge_id);
        }
    }

    /// Outgoing edges from `id`, following the store's directed convention.
    pub fn outgoing(&self, id: &str) -> Vec<&Edge> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight())
            .collect()
    }

    /// Incoming edges to `id`.
    pub fn incoming(&self, id: &str) -> Vec<&Edge> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.weight())
            .collect()
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Persists `edge` through the store and mirrors it into the in-memory
/// graph in the same call, so the two never drift within a process.
pub fn persist_edge(store: &dyn Store, graph: &mut IndexedGraph, edge: Edge) -> EngramResult<()> {
    store.add_edge(&edge)?;
    graph.upsert_edge(edge);
    Ok(())
}

/// Removes a persisted edge from both the store and the in-memory graph.
pub fn remove_persisted_edge(
    store: &dyn Store,
    graph: &mut IndexedGraph,
    src_id: &str,
    dst_id: &str,
    kind: EdgeKind,
) -> EngramResult<()> {
    store.remove_edge(src_id, dst_id, kind)?;
    graph.remove_edge(src_id, dst_id, kind);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn edge(src: &str, dst: &str, kind: EdgeKind, weight: f64) -> Edge {
        Edge::new(src, dst, kind, weight, Utc::now())
    }

    #[test]
    fn upsert_then_query_outgoing() {
        let mut g = IndexedGraph::new();
        g.upsert_edge(edge("a", "b", EdgeKind::Supports, 1.0));
        let out = g.outgoing("a");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].dst_id, "b");
    }

    #[test]
    fn upsert_updates_existing_weight_without_duplicating() {
        let mut g = IndexedGraph::new();
        g.upsert_edge(edge("a", "b", EdgeKind::Supports, 0.5));
        g.upsert_edge(edge("a", "b", EdgeKind::Supports, 0.9));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.outgoing("a")[0].weight, 0.9);
    }

    #[test]
    fn remove_edge_drops_it() {
        let mut g = IndexedGraph::new();
        g.upsert_edge(edge("a", "b", EdgeKind::Supports, 1.0));
        g.remove_edge("a", "b", EdgeKind::Supports);
        assert!(g.outgoing("a").is_empty());
    }

    #[test]
    fn distinct_kinds_between_same_pair_coexist() {
        let mut g = IndexedGraph::new();
        g.upsert_edge(edge("a", "b", EdgeKind::Supports, 1.0));
        g.upsert_edge(edge("a", "b", EdgeKind::Contradicts, 0.0));
        assert_eq!(g.edge_count(), 2);
    }
}
