//! # engram-graph
//!
//! Typed-edge graph layer (spec §4.4): an in-memory `petgraph` adjacency
//! view rebuilt from storage, edge synthesis (`temporal-next`), bounded BFS
//! neighbor queries, and bounded multi-hop spreading activation.

mod indexed_graph;
mod synthesis;
mod traversal;

pub use indexed_graph::{persist_edge, remove_persisted_edge, IndexedGraph};
pub use synthesis::synthesize_temporal_next;
pub use traversal::{neighbors, spread, SpreadConfig};
