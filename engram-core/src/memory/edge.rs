use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::EdgeKind;

/// Both endpoints are memory ids, for every `EdgeKind` including
/// `EntityShared` — that kind marks two memories that share an entity, it
/// does not point at the entity node itself (entities are tracked
/// separately, keyed by normalized name, not wired into the edge graph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src_id: String,
    pub dst_id: String,
    pub kind: EdgeKind,
    /// Edge strength in `[0.0, 1.0]`, independent of `EdgeKind::spread_weight`
    /// (this is a per-edge signal, that's a per-kind default).
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        src_id: impl Into<String>,
        dst_id: impl Into<String>,
        kind: EdgeKind,
        weight: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            src_id: src_id.into(),
            dst_id: dst_id.into(),
            kind,
            weight: weight.clamp(0.0, 1.0),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_is_clamped() {
        let e = Edge::new("a", "b", EdgeKind::Supports, 3.0, DateTime::UNIX_EPOCH);
        assert_eq!(e.weight, 1.0);
    }
}
