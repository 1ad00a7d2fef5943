use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named entity node in the memory graph (spec §3 `Entity`).
///
/// Entities are not independently created; they're derived from
/// `Memory::entities` during extraction and upserted by `engram-graph`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Normalized name — the graph's join key, not a surrogate id.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    /// Count of active memories currently mentioning this entity.
    pub memory_count: u64,
}

impl Entity {
    pub fn new(name: impl Into<String>, at: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            name,
            created_at: at,
            last_seen_at: at,
            memory_count: 1,
        }
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_seen_at = at;
        self.memory_count += 1;
    }
}
