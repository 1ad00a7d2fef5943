//! Phase 1: Selection — active episodic memories old enough to consolidate.

use chrono::{DateTime, Duration, Utc};
use engram_core::{Memory, MemoryStatus, MemoryType};

/// Minimum age, in days, for an episodic memory to become a consolidation
/// candidate — fresh conversation turns stay untouched so a consolidation
/// run never races an in-progress exchange.
pub const MIN_AGE_DAYS: i64 = 7;

/// Select memories eligible for consolidation (spec §4.6 step 1): active,
/// episodic, and older than `MIN_AGE_DAYS`.
pub fn select_candidates(memories: &[Memory], now: DateTime<Utc>) -> Vec<&Memory> {
    let cutoff = now - Duration::days(MIN_AGE_DAYS);
    memories
        .iter()
        .filter(|m| {
            m.memory_type == MemoryType::Episodic && m.status == MemoryStatus::Active && m.valid_from < cutoff
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn memory(id: &str, memory_type: MemoryType, status: MemoryStatus, age_days: i64, now: DateTime<Utc>) -> Memory {
        Memory {
            id: id.to_string(),
            content: "x".to_string(),
            memory_type,
            status,
            salience: Default::default(),
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            source: engram_core::Source::System { reference: None },
            created_at: now - Duration::days(age_days),
            valid_from: now - Duration::days(age_days),
            valid_until: None,
            last_accessed_at: now,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash("x"),
        }
    }

    #[test]
    fn selects_old_active_episodic_only() {
        let now = Utc::now();
        let memories = vec![
            memory("a", MemoryType::Episodic, MemoryStatus::Active, 10, now),
            memory("b", MemoryType::Episodic, MemoryStatus::Active, 1, now),
            memory("c", MemoryType::Semantic, MemoryStatus::Active, 10, now),
            memory("d", MemoryType::Episodic, MemoryStatus::Archived, 10, now),
        ];
        let selected = select_candidates(&memories, now);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "a");
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_candidates(&[], Utc::now()).is_empty());
    }
}
