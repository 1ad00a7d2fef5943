//! Bounded BFS over the edge graph (spec §4.1 `neighbors`).

use std::collections::{HashSet, VecDeque};

use engram_core::errors::StoreError;
use engram_core::traits::NeighborHit;
use engram_core::EdgeKind;
use rusqlite::Connection;

use super::edge_ops::edges_for;

pub fn neighbors(
    conn: &Connection,
    id: &str,
    depth: usize,
    kinds: Option<&[EdgeKind]>,
    edge_visit_budget: usize,
) -> Result<Vec<NeighborHit>, StoreError> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(id.to_string());
    let mut queue: VecDeque<(String, usize, Vec<EdgeKind>)> = VecDeque::new();
    queue.push_back((id.to_string(), 0, Vec::new()));

    let mut hits = Vec::new();
    let mut edges_visited = 0usize;

    while let Some((current, hop, path_kinds)) = queue.pop_front() {
        if hop >= depth {
            continue;
        }
        if edges_visited >= edge_visit_budget {
            break;
        }
        let edges = edges_for(conn, &current, kinds)?;
        for edge in edges {
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

    Ok(hits)
}
