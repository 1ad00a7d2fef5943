//! Open user-asserted contradictions (spec §4.7). Consolidation resolves
//! a cluster-internal contradiction by superseding the loser, which flips
//! its status away from `Active` — so a pair stays "open" here only until
//! one side is superseded or archived, never by deleting the edge itself.

use engram_core::{EdgeKind, EngramResult, Memory, Store};

#[derive(Debug, Clone)]
pub struct ContradictionRecord {
    pub memory_a: Memory,
    pub memory_b: Memory,
}

pub fn run(store: &dyn Store, limit: usize) -> EngramResult<Vec<ContradictionRecord>> {
    let mut records = Vec::new();
    for edge in store.all_edges()? {
        if records.len() >= limit {
            break;
        }
        if edge.kind != EdgeKind::Contradicts {
            continue;
        }
        let (Some(a), Some(b)) = (store.get(&edge.src_id)?, store.get(&edge.dst_id)?) else {
            continue;
        };
        if a.is_superseded() || b.is_superseded() || a.is_archived() || b.is_archived() {
            continue;
        }
        records.push(ContradictionRecord { memory_a: a, memory_b: b });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engram_core::{Edge, MemoryStatus, MemoryType, Salience, Source};
    use engram_store::StoreEngine;
    use std::collections::BTreeSet;

    fn memory(id: &str, status: MemoryStatus) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            content: id.to_string(),
            memory_type: MemoryType::Semantic,
            status,
            salience: Salience::default(),
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            source: Source::System { reference: None },
            created_at: now,
            valid_from: now,
            valid_until: None,
            last_accessed_at: now,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(id),
        }
    }

    #[test]
    fn reports_a_pair_where_both_sides_remain_active() {
        let store = StoreEngine::open_in_memory().unwrap();
        store.insert(&memory("a", MemoryStatus::Active)).unwrap();
        store.insert(&memory("b", MemoryStatus::Active)).unwrap();
        store.add_edge(&Edge::new("a", "b", EdgeKind::Contradicts, 1.0, Utc::now())).unwrap();

        let records = run(&store, 10).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn a_superseded_side_closes_the_contradiction() {
        let store = StoreEngine::open_in_memory().unwrap();
        store.insert(&memory("a", MemoryStatus::Superseded)).unwrap();
        store.insert(&memory("b", MemoryStatus::Active)).unwrap();
        store.add_edge(&Edge::new("a", "b", EdgeKind::Contradicts, 1.0, Utc::now())).unwrap();

        let records = run(&store, 10).unwrap();
        assert!(records.is_empty());
    }
}
