//! Property: a consolidation pass never destroys a memory row (only
//! supersedes/archives in place or adds new synthesized ones) and never
//! leaves a salience value outside `[0.0, 1.0]` (spec §4.6 step 5 decay,
//! §3 salience invariant).

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use engram_core::config::{ConsolidationConfig, LifecycleConfig};
use engram_core::{Memory, MemoryStatus, MemoryType, Salience, Source, Store};
use engram_consolidate::ConsolidationEngine;
use engram_graph::IndexedGraph;
use engram_store::StoreEngine;
use proptest::prelude::*;

fn memory(id: &str, content: &str, salience: f64) -> Memory {
    let now = Utc::now();
    Memory {
        id: id.to_string(),
        content: content.to_string(),
        memory_type: MemoryType::Episodic,
        status: MemoryStatus::Active,
        salience: Salience::new(salience),
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
        content_hash: Memory::compute_content_hash(content),
    }
}

fn all_memories(store: &dyn Store) -> Vec<Memory> {
    let mut out = Vec::new();
    for status in [
        MemoryStatus::Active,
        MemoryStatus::Pending,
        MemoryStatus::Fulfilled,
        MemoryStatus::Superseded,
        MemoryStatus::Archived,
    ] {
        out.extend(store.by_status(status, 10_000).unwrap());
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn consolidation_never_loses_a_row_or_an_out_of_range_salience(
        saliences in prop::collection::vec(0.0f64..1.0, 0..6),
    ) {
        let store = Arc::new(StoreEngine::open_in_memory().unwrap());
        for (i, s) in saliences.iter().enumerate() {
            store
                .insert(&memory(&format!("m{i}"), "distinct unrelated planning note", *s))
                .unwrap();
        }
        let before = all_memories(store.as_ref()).len();

        let engine = ConsolidationEngine::new(
            Arc::clone(&store) as Arc<dyn Store>,
            None,
            None,
            ConsolidationConfig::default(),
            LifecycleConfig::default(),
        );
        let mut graph = IndexedGraph::rebuild_from_storage(store.as_ref()).unwrap();
        engine.consolidate(&mut graph, None).unwrap();

        let after = all_memories(store.as_ref());
        prop_assert!(after.len() >= before);
        for m in &after {
            prop_assert!(m.salience.value() >= 0.0 && m.salience.value() <= 1.0);
        }
    }
}
