use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::salience::Salience;
use super::types::{MemoryStatus, MemoryType, Source};

/// The universal memory record (spec §3). Every stored fact is a `Memory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// Opaque stable identifier (UUIDv4), URL-safe.
    pub id: String,
    /// The single authoritative payload.
    pub content: String,
    pub memory_type: MemoryType,
    pub status: MemoryStatus,
    /// Confidence-weighted importance, `[0.0, 1.0]`.
    pub salience: Salience,
    /// Normalized entity names (case/diacritic-folded, trimmed).
    pub entities: BTreeSet<String>,
    /// Topic tags; closed set not required.
    pub topics: BTreeSet<String>,
    pub source: Source,
    /// When storage accepted the record.
    pub created_at: DateTime<Utc>,
    /// Start of the bi-temporal validity interval.
    pub valid_from: DateTime<Utc>,
    /// End of the validity interval; `None` means "current truth" (∞).
    pub valid_until: Option<DateTime<Utc>>,
    /// Updated on recall hits; used by decay and surfacing.
    pub last_accessed_at: DateTime<Utc>,
    pub reinforcement_count: u64,
    /// Present once `engram-embed` has flushed an embedding for this row.
    pub embedding: Option<Vec<f32>>,
    /// Set when embedding generation has permanently failed (spec §4.3).
    pub embedding_failed: bool,
    /// Set by auto-extraction when best-effort extraction degraded
    /// (spec §4.2 "never fails the write... best-effort... `needs-review`").
    pub needs_review: bool,
    /// Present iff `status == Superseded`.
    pub superseded_by: Option<String>,
    /// blake3 hash of `content`, used for embed-cache dedup and fast
    /// exact-duplicate detection during consolidation (spec §3 design notes).
    pub content_hash: String,
}

impl Memory {
    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Half-open bi-temporal containment check: `valid_from <= at < valid_until`.
    pub fn valid_at(&self, at: DateTime<Utc>) -> bool {
        if at < self.valid_from {
            return false;
        }
        match self.valid_until {
            Some(until) => at < until,
            None => true,
        }
    }

    pub fn is_archived(&self) -> bool {
        self.status == MemoryStatus::Archived
    }

    pub fn is_superseded(&self) -> bool {
        self.status == MemoryStatus::Superseded
    }
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Memory {}
