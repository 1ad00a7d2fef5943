//! Vault-wide aggregate counts (spec §4.7), for observability/dashboards.

use std::collections::BTreeMap;

use engram_core::{EngramResult, MemoryStatus, Store};

const STATS_MEMORY_SCAN_LIMIT: usize = 50_000;
const STATS_ENTITY_SCAN_LIMIT: usize = 50_000;

#[derive(Debug, Clone, Default)]
pub struct VaultStats {
    pub total_memories: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub entity_count: u64,
    pub average_salience: f64,
    pub needs_review_count: u64,
}

pub fn run(store: &dyn Store) -> EngramResult<VaultStats> {
    let mut stats = VaultStats::default();
    let mut salience_sum = 0.0;

    for status in [
        MemoryStatus::Active,
        MemoryStatus::Pending,
        MemoryStatus::Fulfilled,
        MemoryStatus::Superseded,
        MemoryStatus::Archived,
    ] {
        let memories = store.by_status(status, STATS_MEMORY_SCAN_LIMIT)?;
        stats.by_status.insert(status.as_str().to_string(), memories.len() as u64);
        for m in &memories {
            *stats.by_type.entry(m.memory_type.as_str().to_string()).or_insert(0) += 1;
            salience_sum += m.salience.value();
            if m.needs_review {
                stats.needs_review_count += 1;
            }
        }
        stats.total_memories += memories.len() as u64;
    }

    if stats.total_memories > 0 {
        stats.average_salience = salience_sum / stats.total_memories as f64;
    }
    stats.entity_count = store.list_entities(STATS_ENTITY_SCAN_LIMIT)?.len() as u64;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engram_core::{Memory, MemoryType, Salience, Source};
    use engram_store::StoreEngine;
    use std::collections::BTreeSet;

    fn memory(id: &str, status: MemoryStatus, salience: f64) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            content: id.to_string(),
            memory_type: MemoryType::Episodic,
            status,
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
            content_hash: Memory::compute_content_hash(id),
        }
    }

    #[test]
    fn aggregates_counts_and_average_salience() {
        let store = StoreEngine::open_in_memory().unwrap();
        store.insert(&memory("a", MemoryStatus::Active, 0.8)).unwrap();
        store.insert(&memory("b", MemoryStatus::Archived, 0.2)).unwrap();

        let stats = run(&store).unwrap();
        assert_eq!(stats.total_memories, 2);
        assert_eq!(stats.by_status["active"], 1);
        assert_eq!(stats.by_status["archived"], 1);
        assert!((stats.average_salience - 0.5).abs() < 1e-9);
    }
}
