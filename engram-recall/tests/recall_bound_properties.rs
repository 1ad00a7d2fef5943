//! Property: `RecallEngine::recall` never returns more hits than the
//! caller's requested limit, no matter how many matching memories exist
//! (spec §4.5: `limit` is a hard cap on the final result, not a hint).

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use engram_core::{config::RecallConfig, Memory, MemoryStatus, MemoryType, Salience, Source, Store};
use engram_graph::IndexedGraph;
use engram_recall::{RecallEngine, RecallQuery};
use engram_store::StoreEngine;
use proptest::prelude::*;

fn memory(id: &str, content: &str) -> Memory {
    let now = Utc::now();
    Memory {
        id: id.to_string(),
        content: content.to_string(),
        memory_type: MemoryType::Episodic,
        status: MemoryStatus::Active,
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
        content_hash: Memory::compute_content_hash(content),
    }
}

proptest! {
    #[test]
    fn recall_never_returns_more_than_the_requested_limit(
        memory_count in 0usize..20,
        limit in 1usize..10,
    ) {
        let store = Arc::new(StoreEngine::open_in_memory().unwrap());
        for i in 0..memory_count {
            store
                .insert(&memory(&format!("m{i}"), "quarterly planning notes about Acme Corp renewal"))
                .unwrap();
        }

        let engine = RecallEngine::new(
            Arc::clone(&store) as Arc<dyn Store>,
            None,
            RecallConfig::default(),
            Vec::new(),
        );
        let graph = IndexedGraph::rebuild_from_storage(store.as_ref()).unwrap();
        let query = RecallQuery::new("Acme Corp renewal", limit);

        let hits = engine.recall(&query, &graph, None).unwrap();
        prop_assert!(hits.len() <= limit);
    }
}
