//! Proactive surfacing (spec §4.7): rescores a recall pass with a novelty
//! bias so long-idle-but-relevant memories compete with ones that were
//! just accessed, rather than recency alone dominating the ranking.

use chrono::Utc;
use engram_core::Memory;
use engram_recall::RecallHit;

/// Idle time, in days, at which novelty bias saturates.
const NOVELTY_SATURATION_DAYS: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct SurfaceHit {
    pub memory: Memory,
    pub score: f64,
    pub reason: String,
}

pub fn run(hits: Vec<RecallHit>, limit: usize) -> Vec<SurfaceHit> {
    let now = Utc::now();
    let mut rescored: Vec<SurfaceHit> = hits
        .into_iter()
        .map(|hit| {
            let idle_days = (now - hit.memory.last_accessed_at).num_seconds() as f64 / 86_400.0;
            let novelty = (idle_days / NOVELTY_SATURATION_DAYS).clamp(0.0, 1.0);
            let reason = if idle_days >= NOVELTY_SATURATION_DAYS {
                format!("resurfaced after {:.0} days without access", idle_days.max(0.0))
            } else {
                "relevant to current context".to_string()
            };
            SurfaceHit {
                score: hit.score * (1.0 + novelty),
                memory: hit.memory,
                reason,
            }
        })
        .collect();
    rescored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    rescored.truncate(limit);
    rescored
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::{MemoryStatus, MemoryType, Salience, Source};
    use std::collections::BTreeSet;

    fn hit(id: &str, last_accessed_at: chrono::DateTime<Utc>, score: f64) -> RecallHit {
        let now = Utc::now();
        RecallHit {
            memory: Memory {
                id: id.to_string(),
                content: id.to_string(),
                memory_type: MemoryType::Episodic,
                status: MemoryStatus::Active,
                salience: Salience::default(),
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
                content_hash: Memory::compute_content_hash(id),
            },
            score,
            absorbed_ids: Vec::new(),
        }
    }

    #[test]
    fn stale_memory_with_equal_base_score_outranks_a_fresh_one() {
        let now = Utc::now();
        let fresh = hit("a", now, 1.0);
        let stale = hit("b", now - chrono::Duration::days(10), 1.0);
        let out = run(vec![fresh, stale], 2);
        assert_eq!(out[0].memory.id, "b");
    }

    #[test]
    fn limit_is_respected() {
        let now = Utc::now();
        let hits = vec![hit("a", now, 1.0), hit("b", now, 0.9), hit("c", now, 0.8)];
        let out = run(hits, 2);
        assert_eq!(out.len(), 2);
    }
}
