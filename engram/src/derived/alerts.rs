//! Things needing the owner's attention (spec §4.7): memories degraded to
//! `needs-review` by best-effort extraction, long-overdue pending
//! commitments, and still-open contradictions.

use chrono::Utc;
use engram_core::{EngramResult, Memory, MemoryStatus, Store};

use super::contradictions;

/// A pending commitment whose `valid_from` is older than this many days is
/// considered overdue.
const OVERDUE_PENDING_DAYS: i64 = 7;

const ALERT_SCAN_LIMIT: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    NeedsReview,
    OverduePending,
    Contradiction,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub memory: Memory,
    pub related: Option<Memory>,
    pub message: String,
}

pub fn run(store: &dyn Store, limit: usize) -> EngramResult<Vec<Alert>> {
    let now = Utc::now();
    let mut alerts = Vec::new();

    for m in store.by_status(MemoryStatus::Active, ALERT_SCAN_LIMIT)? {
        if alerts.len() >= limit {
            return Ok(alerts);
        }
        if m.needs_review {
            alerts.push(Alert {
                kind: AlertKind::NeedsReview,
                message: format!("memory {} needs review", m.id),
                memory: m,
                related: None,
            });
        }
    }

    for m in store.by_status(MemoryStatus::Pending, ALERT_SCAN_LIMIT)? {
        if alerts.len() >= limit {
            return Ok(alerts);
        }
        let age_days = (now - m.valid_from).num_days();
        if age_days >= OVERDUE_PENDING_DAYS {
            alerts.push(Alert {
                kind: AlertKind::OverduePending,
                message: format!("pending {age_days} days: {}", m.content),
                memory: m,
                related: None,
            });
        }
    }

    for pair in contradictions::run(store, limit)? {
        if alerts.len() >= limit {
            break;
        }
        alerts.push(Alert {
            kind: AlertKind::Contradiction,
            message: format!(
                "unresolved contradiction between '{}' and '{}'",
                pair.memory_a.content, pair.memory_b.content
            ),
            memory: pair.memory_a,
            related: Some(pair.memory_b),
        });
    }

    Ok(alerts)
}
