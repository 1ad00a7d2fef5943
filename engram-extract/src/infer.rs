//! Type, status and salience inference from marker matches (spec §3, §4.2).

use engram_core::{MemoryStatus, MemoryType, Salience};

use crate::markers::{COMMITMENT_RE, DECLARATIVE_RE, FULFILLMENT_RE, IMPERATIVE_RE};

/// Bump applied when content carries a commitment marker — commitments are
/// more worth remembering than a passing observation.
const COMMITMENT_SALIENCE_STEP: f64 = 0.15;

/// Bump applied when content names an entity the vault already knows about.
const KNOWN_ENTITY_SALIENCE_STEP: f64 = 0.1;

pub fn infer_type(content: &str) -> MemoryType {
    if DECLARATIVE_RE.is_match(content) {
        MemoryType::Semantic
    } else if IMPERATIVE_RE.is_match(content) {
        MemoryType::Procedural
    } else {
        MemoryType::Episodic
    }
}

pub fn infer_status(content: &str) -> MemoryStatus {
    let committed = COMMITMENT_RE.is_match(content);
    let fulfilled = FULFILLMENT_RE.is_match(content);
    if fulfilled {
        MemoryStatus::Fulfilled
    } else if committed {
        MemoryStatus::Pending
    } else {
        MemoryStatus::Active
    }
}

/// `known_entities_present` is true when this content's extracted entities
/// intersect the vault's existing entity set — declarative content about a
/// known person/project is more salient than one about a stranger.
pub fn infer_salience(content: &str, known_entities_present: bool) -> Salience {
    let mut salience = Salience::new(Salience::BASELINE);
    if COMMITMENT_RE.is_match(content) {
        salience = salience.reinforce(COMMITMENT_SALIENCE_STEP);
    }
    if known_entities_present {
        salience = salience.reinforce(KNOWN_ENTITY_SALIENCE_STEP);
    }
    salience
}
