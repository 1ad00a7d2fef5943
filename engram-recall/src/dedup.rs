//! Temporal dedup (spec §4.5.5): groups candidates by (primary-entity,
//! topic-signature), keeping the candidate with the latest `valid_from`
//! whose status is `active` within each group — newer fact wins.

use std::collections::HashMap;

use engram_core::MemoryStatus;

use crate::scoring::ScoredCandidate;

/// A retained candidate plus the ids of group members it absorbed.
#[derive(Debug, Clone)]
pub struct DedupedCandidate {
    pub candidate: ScoredCandidate,
    pub absorbed_ids: Vec<String>,
}

/// `(primary entity, sorted topic list)`. `Memory.entities` carries no
/// mention-order, so the lexicographically last normalized entity stands in
/// for "most-recent mention" — stable across calls, which is what matters
/// for grouping. Candidates with no entities fall back to a topic-only
/// signature so they still dedup against each other; candidates with
/// neither entities nor topics never group (each is its own singleton).
fn group_key(candidate: &ScoredCandidate) -> Option<String> {
    let m = &candidate.memory;
    let primary_entity = m.entities.iter().next_back().cloned();
    if primary_entity.is_none() && m.topics.is_empty() {
        return None;
    }
    let topic_signature: Vec<&str> = m.topics.iter().map(|s| s.as_str()).collect();
    Some(format!("{}::{}", primary_entity.unwrap_or_default(), topic_signature.join(",")))
}

pub fn dedup(scored: Vec<ScoredCandidate>) -> Vec<DedupedCandidate> {
    let mut groups: HashMap<String, Vec<ScoredCandidate>> = HashMap::new();
    let mut singletons: Vec<ScoredCandidate> = Vec::new();

    for candidate in scored {
        match group_key(&candidate) {
            Some(key) => groups.entry(key).or_default().push(candidate),
            None => singletons.push(candidate),
        }
    }

    let mut out: Vec<DedupedCandidate> = Vec::new();

    for (_, mut members) in groups {
        if members.len() == 1 {
            let only = members.pop().unwrap();
            out.push(DedupedCandidate { candidate: only, absorbed_ids: Vec::new() });
            continue;
        }
        let retained_idx = members
            .iter()
            .enumerate()
            .filter(|(_, c)| c.memory.status == MemoryStatus::Active)
            .max_by_key(|(_, c)| c.memory.valid_from)
            .map(|(idx, _)| idx);

        let retained_idx = retained_idx.unwrap_or_else(|| {
            members
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(idx, _)| idx)
                .unwrap_or(0)
        });

        let retained = members.remove(retained_idx);
        let absorbed_ids = members.into_iter().map(|c| c.memory.id).collect();
        out.push(DedupedCandidate { candidate: retained, absorbed_ids });
    }

    for candidate in singletons {
        out.push(DedupedCandidate { candidate, absorbed_ids: Vec::new() });
    }

    out.sort_by(|a, b| {
        b.candidate
            .score
            .partial_cmp(&a.candidate.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}
