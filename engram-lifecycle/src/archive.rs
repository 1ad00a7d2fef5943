//! Archival pass (spec §4.8): soft-forgets active memories whose salience
//! has fallen below `archive_threshold` and that have gone untouched for
//! `archive_after_days`. Archived rows stay in storage — constituents of a
//! consolidated summary or chain of supersession remain queryable — they
//! just drop out of recall seeding (spec §4.1 `forget`).

use chrono::{DateTime, Duration, Utc};
use engram_core::config::LifecycleConfig;
use engram_core::errors::LifecycleError;
use engram_core::{EngramResult, MemoryStatus, Store};

const SCAN_LIMIT: usize = 50_000;

#[derive(Debug, Clone, Default)]
pub struct ArchivalSummary {
    pub archived_ids: Vec<String>,
}

/// Archives active memories below the salience floor that have also been
/// untouched for `archive_after_days` — low salience alone isn't enough,
/// a recently-reinforced fact can dip under the floor transiently.
pub fn run(store: &dyn Store, config: &LifecycleConfig, now: DateTime<Utc>) -> EngramResult<ArchivalSummary> {
    let cutoff = now - Duration::days(config.archive_after_days);
    let mut summary = ArchivalSummary::default();

    for memory in store.by_status(MemoryStatus::Active, SCAN_LIMIT)? {
        if memory.salience.value() >= config.archive_threshold {
            continue;
        }
        if memory.last_accessed_at >= cutoff {
            continue;
        }
        store
            .forget(&memory.id, false)
            .map_err(|err| LifecycleError::ArchivalFailed { id: memory.id.clone(), reason: err.to_string() })?;
        summary.archived_ids.push(memory.id);
    }

    tracing::info!(archived = summary.archived_ids.len(), "archival pass complete");
    Ok(summary)
}
