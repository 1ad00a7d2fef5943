//! Invariant validation (spec §4.8, §7): checks the supersession
//! invariants hold after a sweep and logs any violation rather than
//! panicking — a sweep is maintenance, not a correctness gate, so a
//! violation here means something upstream already went wrong.

use engram_core::{EdgeKind, EngramResult, MemoryStatus, Store};

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub violations: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

const SCAN_LIMIT: usize = 50_000;

/// Checks spec §7's supersession invariants:
/// - `status = superseded` iff `superseded_by` is set, and `valid_until`
///   does not outlive the successor's `valid_from`.
/// - every `supersedes` edge `new -> old` agrees with `old.superseded_by`.
pub fn run(store: &dyn Store) -> EngramResult<ValidationReport> {
    let mut report = ValidationReport::default();

    for memory in store.by_status(MemoryStatus::Superseded, SCAN_LIMIT)? {
        let Some(successor_id) = &memory.superseded_by else {
            report.violations.push(format!("{} is superseded but has no superseded_by", memory.id));
            continue;
        };
        let Some(successor) = store.get(successor_id)? else {
            report.violations.push(format!("{} points to missing successor {}", memory.id, successor_id));
            continue;
        };
        if let Some(valid_until) = memory.valid_until {
            if valid_until > successor.valid_from {
                report.violations.push(format!(
                    "{} valid_until outlives successor {}'s valid_from",
                    memory.id, successor_id
                ));
            }
        } else {
            report.violations.push(format!("{} is superseded but valid_until is unset", memory.id));
        }

        let edges = store.edges_for(successor_id, Some(&[EdgeKind::Supersedes]))?;
        if !edges.iter().any(|e| e.src_id == *successor_id && e.dst_id == memory.id) {
            report.violations.push(format!("missing supersedes edge {} -> {}", successor_id, memory.id));
        }
    }

    if !report.is_clean() {
        for violation in &report.violations {
            tracing::warn!(violation = %violation, "lifecycle invariant violation");
        }
    }
    Ok(report)
}
