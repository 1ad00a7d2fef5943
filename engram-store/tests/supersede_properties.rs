//! Property: whatever pair of distinct ids `supersede` is called with, the
//! result always satisfies the supersession law from spec §4.1 — the old
//! row closes and points at the new one, the new row stays active and
//! untouched, and a `supersedes` edge links them.

use chrono::{DateTime, TimeZone, Utc};
use engram_core::{EdgeKind, Memory, MemoryStatus, MemoryType, Salience, Source, Store};
use engram_store::StoreEngine;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn memory(id: &str, valid_from: DateTime<Utc>) -> Memory {
    Memory {
        id: id.to_string(),
        content: id.to_string(),
        memory_type: MemoryType::Semantic,
        status: MemoryStatus::Active,
        salience: Salience::default(),
        entities: BTreeSet::new(),
        topics: BTreeSet::new(),
        source: Source::System { reference: None },
        created_at: valid_from,
        valid_from,
        valid_until: None,
        last_accessed_at: valid_from,
        reinforcement_count: 0,
        embedding: None,
        embedding_failed: false,
        needs_review: false,
        superseded_by: None,
        content_hash: Memory::compute_content_hash(id),
    }
}

fn epoch_plus(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

proptest! {
    #[test]
    fn supersede_always_closes_the_old_and_links_the_new(
        old_offset in 0i64..10_000,
        new_offset in 0i64..10_000,
        at_offset in 0i64..20_000,
    ) {
        let store = StoreEngine::open_in_memory().unwrap();
        let old = memory("old", epoch_plus(old_offset));
        let new = memory("new", epoch_plus(new_offset));
        store.insert(&old).unwrap();
        store.insert(&new).unwrap();

        let at = epoch_plus(at_offset);
        store.supersede("old", "new", at).unwrap();

        let old_after = store.get("old").unwrap().unwrap();
        let new_after = store.get("new").unwrap().unwrap();

        prop_assert_eq!(old_after.status, MemoryStatus::Superseded);
        prop_assert_eq!(old_after.valid_until, Some(at));
        prop_assert_eq!(old_after.superseded_by.as_deref(), Some("new"));
        prop_assert_eq!(new_after.status, MemoryStatus::Active);
        prop_assert!(new_after.superseded_by.is_none());

        let edges = store.edges_for("new", Some(&[EdgeKind::Supersedes])).unwrap();
        prop_assert!(edges.iter().any(|e| e.src_id == "new" && e.dst_id == "old"));
    }
}
