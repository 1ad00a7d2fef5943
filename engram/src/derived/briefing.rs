//! Structured briefing (spec §4.7): top entities ranked by recency-weighted
//! mention count, outstanding pending commitments, and recall highlights
//! for the requested context.

use chrono::Utc;
use engram_core::{EngramResult, Memory, MemoryStatus, Store};
use engram_recall::RecallHit;

const BRIEFING_ENTITY_SCAN_LIMIT: usize = 500;
const BRIEFING_PENDING_SCAN_LIMIT: usize = 10_000;

#[derive(Debug, Clone)]
pub struct EntityBrief {
    pub name: String,
    pub memory_count: u64,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct Briefing {
    pub top_entities: Vec<EntityBrief>,
    pub pending_commitments: Vec<Memory>,
    pub highlights: Vec<RecallHit>,
}

/// `memory_count` scaled by an exponential recency kernel over
/// `last_seen_at` — an entity mentioned often but long ago is outranked by
/// one mentioned less often but recently.
fn entity_score(memory_count: u64, last_seen_days_ago: f64, half_life_days: f64) -> f64 {
    let recency = 0.5f64.powf(last_seen_days_ago.max(0.0) / half_life_days.max(1.0));
    memory_count as f64 * recency
}

pub fn run(
    store: &dyn Store,
    highlights: Vec<RecallHit>,
    limit: usize,
    recency_half_life_days: f64,
) -> EngramResult<Briefing> {
    let now = Utc::now();

    let mut entities: Vec<EntityBrief> = store
        .list_entities(BRIEFING_ENTITY_SCAN_LIMIT)?
        .into_iter()
        .map(|e| {
            let age_days = (now - e.last_seen_at).num_seconds() as f64 / 86_400.0;
            EntityBrief {
                score: entity_score(e.memory_count, age_days, recency_half_life_days),
                name: e.name,
                memory_count: e.memory_count,
            }
        })
        .collect();
    entities.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    entities.truncate(limit);

    let mut pending = store.by_status(MemoryStatus::Pending, BRIEFING_PENDING_SCAN_LIMIT)?;
    pending.sort_by_key(|m| m.valid_from);
    pending.truncate(limit);

    Ok(Briefing { top_entities: entities, pending_commitments: pending, highlights })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_score_decays_with_age() {
        let fresh = entity_score(5, 0.0, 30.0);
        let stale = entity_score(5, 60.0, 30.0);
        assert!(fresh > stale);
    }

    #[test]
    fn equal_age_favors_higher_mention_count() {
        let a = entity_score(10, 5.0, 30.0);
        let b = entity_score(2, 5.0, 30.0);
        assert!(a > b);
    }
}
