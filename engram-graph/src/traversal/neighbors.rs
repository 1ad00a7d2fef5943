//! Bounded BFS over the in-memory graph (spec §4.1 `neighbors`, in-process
//! counterpart to `engram-store`'s SQL-backed default).

use std::collections::{HashSet, VecDeque};

use engram_core::traits::NeighborHit;
use engram_core::EdgeKind;

use crate::IndexedGraph;

fn both_edges<'a>(graph: &'a IndexedGraph, id: &str) -> Vec<&'a engram_core::Edge> {
    let mut edges = graph.outgoing(id);
    edges.extend(graph.incoming(id));
    edges
}

pub fn neighbors(
    graph: &IndexedGraph,
    id: &str,
    depth: usize,
    kinds: Option<&[EdgeKind]>,
    edge_visit_budget: usize,
) -> Vec<NeighborHit> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(id.to_string());
    let mut queue: VecDeque<(String, usize, Vec<EdgeKind>)> = VecDeque::new();
    queue.push_back((id.to_string(), 0, Vec::new()));

    let mut hits = Vec::new();
    let mut edges_visited = 0usize;

    while let Some((current, hop, path_kinds)) = queue.pop_front() {
        if hop >= depth || edges_visited >= edge_visit_budget {
            continue;
        }
        for edge in both_edges(graph, &current) {
            if let Some(kinds) = kinds {
                if !kinds.contains(&edge.kind) {
                    continue;
                }
            }
            edges_visited += 1;
            if edges_visited > edge_visit_budget {
                break;
            }
            let other = if edge.src_id == current {
                edge.dst_id.clone()
            } else {
                edge.src_id.clone()
            };
            if visited.contains(&other) {
                continue;
            }
            visited.insert(other.clone());
            let mut kinds_so_far = path_kinds.clone();
            kinds_so_far.push(edge.kind);
            hits.push(NeighborHit {
                id: other.clone(),
                hop: hop + 1,
                traversed_kinds: kinds_so_far.clone(),
            });
            queue.push_back((other, hop + 1, kinds_so_far));
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engram_core::Edge;

    #[test]
    fn respects_depth() {
        let mut g = IndexedGraph::new();
        g.upsert_edge(Edge::new("a", "b", EdgeKind::Supports, 1.0, Utc::now()));
        g.upsert_edge(Edge::new("b", "c", EdgeKind::Supports, 1.0, Utc::now()));
        let hits = neighbors(&g, "a", 1, None, 100);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
        let hits2 = neighbors(&g, "a", 2, None, 100);
        assert_eq!(hits2.len(), 2);
    }

    #[test]
    fn respects_edge_budget() {
        let mut g = IndexedGraph::new();
        for i in 0..10 {
            g.upsert_edge(Edge::new("a", format!("n{i}"), EdgeKind::Supports, 1.0, Utc::now()));
        }
        let hits = neighbors(&g, "a", 1, None, 3);
        assert!(hits.len() <= 3);
    }

    #[test]
    fn filters_by_kind() {
        let mut g = IndexedGraph::new();
        g.upsert_edge(Edge::new("a", "b", EdgeKind::Supports, 1.0, Utc::now()));
        g.upsert_edge(Edge::new("a", "c", EdgeKind::Contradicts, 1.0, Utc::now()));
        let hits = neighbors(&g, "a", 1, Some(&[EdgeKind::Supports]), 100);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");
    }
}
