//! Scenario (spec §8.5): an `at`-qualified recall returns whichever memory
//! was the current truth at that instant, even though the newer one has
//! since superseded it.

use chrono::{Duration, Utc};
use engram_core::config::VaultConfig;
use engram_core::{Memory, MemoryStatus, MemoryType, Salience, Source, Store};
use engram_store::StoreEngine;
use engram::{RecallOptions, Vault};
use std::collections::BTreeSet;

fn memory(id: &str, content: &str, valid_from: chrono::DateTime<Utc>) -> Memory {
    Memory {
        id: id.to_string(),
        content: content.to_string(),
        memory_type: MemoryType::Semantic,
        status: MemoryStatus::Active,
        salience: Salience::default(),
        entities: BTreeSet::new(),
        topics: BTreeSet::from(["framework".to_string()]),
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
        content_hash: Memory::compute_content_hash(content),
    }
}

#[tokio::test]
async fn at_qualified_recall_returns_the_truth_as_of_that_instant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");
    let t0 = Utc::now() - Duration::days(10);
    let t1 = Utc::now();

    {
        let store = StoreEngine::open(&path).unwrap();
        store.insert(&memory("x", "uses framework X", t0)).unwrap();
        store.insert(&memory("y", "uses framework Y", t1)).unwrap();
        store.supersede("x", "y", t1).unwrap();
    }

    let mut config = VaultConfig::default();
    config.db_path = path.to_string_lossy().to_string();
    let vault = Vault::open(config, None, None).await.unwrap();

    let mut before = RecallOptions::new("framework");
    before.topics = Some(vec!["framework".to_string()]);
    before.at = Some(t1 - Duration::hours(12));
    let hits = vault.recall(before).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].memory.id, "x");

    let mut after = RecallOptions::new("framework");
    after.topics = Some(vec!["framework".to_string()]);
    after.at = Some(t1 + Duration::hours(1));
    let hits = vault.recall(after).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].memory.id, "y");
}
