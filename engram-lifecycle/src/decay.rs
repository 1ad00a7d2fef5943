//! Decay pass (spec §4.6 step 5, §4.8): subtracts the configured step from
//! salience for memories not accessed within the decay window, clamped
//! at 0 by the store. Superseded and archived memories are skipped —
//! their salience no longer drives recall or archival decisions.

use chrono::{DateTime, Duration, Utc};
use engram_core::config::LifecycleConfig;
use engram_core::errors::LifecycleError;
use engram_core::{EngramResult, MemoryStatus, Store};

/// Upper bound on memories scanned per status per sweep.
const SCAN_LIMIT: usize = 50_000;

#[derive(Debug, Clone, Default)]
pub struct DecaySummary {
    pub decayed_ids: Vec<String>,
}

/// Runs one decay pass over every non-terminal memory in the vault.
pub fn run(store: &dyn Store, config: &LifecycleConfig, now: DateTime<Utc>) -> EngramResult<DecaySummary> {
    let cutoff = now - Duration::days(config.decay_window_days);
    let mut summary = DecaySummary::default();

    for status in [MemoryStatus::Active, MemoryStatus::Pending, MemoryStatus::Fulfilled] {
        let memories = store.by_status(status, SCAN_LIMIT)?;
        for memory in memories {
            if memory.last_accessed_at >= cutoff {
                continue;
            }
            store.decay_salience(&memory.id, config.decay_step).map_err(|err| {
                LifecycleError::DecaySweepFailed { reason: err.to_string() }
            })?;
            summary.decayed_ids.push(memory.id);
        }
    }

    tracing::info!(decayed = summary.decayed_ids.len(), "decay pass complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::{Memory, MemoryType, Salience, Source};
    use engram_store::StoreEngine;
    use std::collections::BTreeSet;

    fn memory(id: &str, salience: f64, last_accessed_at: DateTime<Utc>) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            content: "x".to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Salience::new(salience),
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            source: Source::System { reference: None },
            created_at: now,
            valid_from: now,
            valid_until: None,
            last_accessed_at,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash("x"),
        }
    }

    #[test]
    fn stale_memory_decays_and_fresh_memory_does_not() {
        let store = StoreEngine::open_in_memory().unwrap();
        let now = Utc::now();
        let stale = memory("a", 0.5, now - Duration::days(30));
        let fresh = memory("b", 0.5, now);
        store.insert(&stale).unwrap();
        store.insert(&fresh).unwrap();

        let config = LifecycleConfig::default();
        let summary = run(&store, &config, now).unwrap();
        assert_eq!(summary.decayed_ids, vec!["a".to_string()]);

        let a = store.get("a").unwrap().unwrap();
        let b = store.get("b").unwrap().unwrap();
        assert!((a.salience.value() - (0.5 - config.decay_step)).abs() < 1e-9);
        assert_eq!(b.salience.value(), 0.5);
    }

    #[test]
    fn decay_clamps_at_zero() {
        let store = StoreEngine::open_in_memory().unwrap();
        let now = Utc::now();
        let nearly_gone = memory("a", 0.02, now - Duration::days(30));
        store.insert(&nearly_gone).unwrap();
        let config = LifecycleConfig { decay_step: 0.1, ..Default::default() };
        run(&store, &config, now).unwrap();
        let a = store.get("a").unwrap().unwrap();
        assert_eq!(a.salience.value(), 0.0);
    }
}
