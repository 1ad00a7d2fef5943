//! Phase 5: Entity graph refinement — merge entity aliases whose surface
//! forms are high-similarity once cross-memory co-occurrence clears a
//! floor (spec §4.6 step 4), e.g. "BambooHR" and "Bamboo HR".

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use engram_core::config::ConsolidationConfig;
use engram_core::{EngramResult, Entity, Store};

/// Cap on how many entities the alias scan considers per run — bounds the
/// pairwise comparison to the `n` most-mentioned entities.
const MAX_ENTITIES_SCANNED: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct EntityMerge {
    pub alias: String,
    pub canonical: String,
}

/// Scan for high-similarity entity surface forms and fold the
/// less-established one into the better-established one.
pub fn refine(store: &dyn Store, config: &ConsolidationConfig, at: DateTime<Utc>) -> EngramResult<Vec<EntityMerge>> {
    let entities = store.list_entities(MAX_ENTITIES_SCANNED)?;
    let mut absorbed: HashSet<String> = HashSet::new();
    let mut merges = Vec::new();

    for i in 0..entities.len() {
        if absorbed.contains(&entities[i].name) {
            continue;
        }
        for j in (i + 1)..entities.len() {
            if absorbed.contains(&entities[j].name) {
                continue;
            }
            if !is_alias_candidate(&entities[i], &entities[j], config) {
                continue;
            }
            let (canonical, alias) = pick_canonical(&entities[i], &entities[j]);
            store.merge_entity_alias(&alias.name, &canonical.name, at)?;
            absorbed.insert(alias.name.clone());
            merges.push(EntityMerge { alias: alias.name.clone(), canonical: canonical.name.clone() });
        }
    }
    Ok(merges)
}

fn is_alias_candidate(a: &Entity, b: &Entity, config: &ConsolidationConfig) -> bool {
    if a.name == b.name {
        return false;
    }
    let co_occurrence = a.memory_count.min(b.memory_count);
    if co_occurrence < config.alias_min_cooccurrence {
        return false;
    }
    surface_similarity(&a.name, &b.name) >= config.alias_similarity_threshold
}

fn pick_canonical<'a>(a: &'a Entity, b: &'a Entity) -> (&'a Entity, &'a Entity) {
    if a.memory_count > b.memory_count {
        (a, b)
    } else if b.memory_count > a.memory_count {
        (b, a)
    } else if a.name <= b.name {
        (a, b)
    } else {
        (b, a)
    }
}

/// Cosine similarity over character-bigram frequency vectors of the
/// whitespace/punctuation-stripped surface forms — catches "BambooHR" vs
/// "Bamboo HR" without pulling in a string-distance crate for one check.
fn surface_similarity(a: &str, b: &str) -> f64 {
    let a = strip_non_alnum(a);
    let b = strip_non_alnum(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let va = bigram_counts(&a);
    let vb = bigram_counts(&b);
    cosine(&va, &vb)
}

fn strip_non_alnum(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase()
}

fn bigram_counts(s: &str) -> HashMap<(char, char), u32> {
    let chars: Vec<char> = s.chars().collect();
    let mut counts = HashMap::new();
    for w in chars.windows(2) {
        *counts.entry((w[0], w[1])).or_insert(0) += 1;
    }
    counts
}

fn cosine(a: &HashMap<(char, char), u32>, b: &HashMap<(char, char), u32>) -> f64 {
    let dot: f64 = a.iter().map(|(k, v)| *v as f64 * *b.get(k).unwrap_or(&0) as f64).sum();
    let norm_a: f64 = a.values().map(|v| (*v as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|v| (*v as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}
