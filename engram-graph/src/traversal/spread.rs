//! Spreading activation (spec §4.4): a manual breadth-first accumulation
//! over outbound edges, generalized from a single-chain causal trace to
//! summing contributions from every incoming path.

use std::collections::{HashMap, VecDeque};

use engram_core::constants::{DEFAULT_SPREAD_DECAY, DEFAULT_SPREAD_MAX_HOPS, DEFAULT_SPREAD_NODE_BUDGET};
use engram_core::EdgeKind;

use crate::IndexedGraph;

#[derive(Debug, Clone)]
pub struct SpreadConfig {
    /// Per-hop multiplicative decay `d ∈ (0, 1)`.
    pub decay: f64,
    pub max_hops: usize,
    pub node_budget: usize,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            decay: DEFAULT_SPREAD_DECAY,
            max_hops: DEFAULT_SPREAD_MAX_HOPS,
            node_budget: DEFAULT_SPREAD_NODE_BUDGET,
        }
    }
}

/// Propagates activation outward from `seeds` (memory id -> initial
/// activation), returning accumulated activation per reached memory id
/// (seeds themselves are not included — spread is a *contribution*, added
/// to whatever seed score the caller already has).
pub fn spread(
    graph: &IndexedGraph,
    seeds: &[(String, f64)],
    config: &SpreadConfig,
) -> HashMap<String, f64> {
    let mut accumulated: HashMap<String, f64> = HashMap::new();
    let mut queue: VecDeque<(String, usize, f64)> = VecDeque::new();
    let mut visited_nodes = std::collections::HashSet::new();

    for (id, activation) in seeds {
        queue.push_back((id.clone(), 0, *activation));
        visited_nodes.insert(id.clone());
    }

    while let Some((current, hop, activation)) = queue.pop_front() {
        if hop >= config.max_hops {
            continue;
        }
        if visited_nodes.len() >= config.node_budget {
            break;
        }
        for edge in graph.outgoing(&current) {
            if edge.kind == EdgeKind::Contradicts {
                continue;
            }
            if edge.kind == EdgeKind::Supersedes {
                // The target of a `supersedes` edge is the superseded
                // (now-inadmissible) memory; do not spread into it.
                continue;
            }
            let kind_weight = edge.kind.spread_weight();
            if kind_weight <= 0.0 {
                continue;
            }
            let next_activation = activation * config.decay * kind_weight * edge.weight;
            if next_activation <= f64::EPSILON {
                continue;
            }
            *accumulated.entry(edge.dst_id.clone()).or_insert(0.0) += next_activation;
            if visited_nodes.len() < config.node_budget {
                visited_nodes.insert(edge.dst_id.clone());
                queue.push_back((edge.dst_id.clone(), hop + 1, next_activation));
            }
        }
    }

    accumulated
}
