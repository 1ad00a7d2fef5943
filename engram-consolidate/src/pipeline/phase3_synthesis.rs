//! Phase 3: Synthesis — anchor selection, novel-sentence merge, LLM-drafted
//! summary with a deterministic rule-based fallback (spec §4.6 step 2).

use std::collections::BTreeSet;

use chrono::Utc;
use engram_core::{CompletionOptions, Llm, Memory, MemoryStatus, MemoryType, Salience, Source};

/// Cosine-similarity floor below which a constituent's content counts as
/// novel relative to the cluster anchor and is folded into the summary.
const NOVELTY_THRESHOLD: f64 = 0.85;

const SYNTHESIS_TIMEOUT_MS: u64 = 4_000;

pub struct SynthesisResult {
    pub memory: Memory,
    /// `true` when the summary was produced without LLM assistance.
    pub needs_review: bool,
}

/// Score a memory for anchor selection: salience weighted by a
/// log-decaying reinforcement bonus, so a frequently-reinforced memory
/// outranks an equally salient but never-revisited one.
fn anchor_score(memory: &Memory) -> f64 {
    memory.salience.value() * ((memory.reinforcement_count as f64) + 1.0).log2().max(1.0)
}

fn select_anchor<'a>(cluster: &[&'a Memory]) -> &'a Memory {
    cluster
        .iter()
        .max_by(|a, b| anchor_score(a).partial_cmp(&anchor_score(b)).unwrap_or(std::cmp::Ordering::Equal))
        .copied()
        .expect("cluster must not be empty")
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

/// Synthesize a consolidated memory from a cluster of constituents.
///
/// `cluster_embeddings` is parallel to `cluster`. Falls back to a
/// deterministic concatenation of novel constituent content when no `Llm`
/// is configured or the call fails — the cluster is never dropped.
pub fn synthesize(cluster: &[&Memory], cluster_embeddings: &[Option<Vec<f32>>], llm: Option<&dyn Llm>) -> SynthesisResult {
    let anchor = select_anchor(cluster);
    let anchor_idx = cluster.iter().position(|m| m.id == anchor.id).unwrap_or(0);
    let anchor_emb = cluster_embeddings.get(anchor_idx).and_then(|e| e.as_ref());

    let mut novel_parts = vec![anchor.content.clone()];
    for (i, mem) in cluster.iter().enumerate() {
        if i == anchor_idx {
            continue;
        }
        let is_novel = match (anchor_emb, cluster_embeddings.get(i).and_then(|e| e.as_ref())) {
            (Some(a), Some(b)) => cosine_similarity(a, b) < NOVELTY_THRESHOLD,
            _ => true,
        };
        if is_novel {
            novel_parts.push(mem.content.clone());
        }
    }

    let (content, needs_review) = match llm {
        Some(llm) => match draft_summary(llm, &novel_parts) {
            Some(summary) => (summary, false),
            None => (fallback_summary(&novel_parts), true),
        },
        None => (fallback_summary(&novel_parts), true),
    };

    let mut entities: BTreeSet<String> = BTreeSet::new();
    let mut topics: BTreeSet<String> = BTreeSet::new();
    for mem in cluster {
        entities.extend(mem.entities.iter().cloned());
        topics.extend(mem.topics.iter().cloned());
    }

    let avg_salience = cluster.iter().map(|m| m.salience.value()).sum::<f64>() / cluster.len() as f64;
    let cluster_boost = (cluster.len() as f64).ln().max(0.0) * 0.05;
    let salience = Salience::new(avg_salience + cluster_boost);

    let now = Utc::now();
    let memory = Memory {
        id: uuid::Uuid::new_v4().to_string(),
        content_hash: Memory::compute_content_hash(&content),
        content,
        memory_type: MemoryType::Consolidated,
        status: MemoryStatus::Active,
        salience,
        entities,
        topics,
        source: Source::System { reference: Some("consolidation".to_string()) },
        created_at: now,
        valid_from: now,
        valid_until: None,
        last_accessed_at: now,
        reinforcement_count: 0,
        embedding: None,
        embedding_failed: false,
        needs_review,
        superseded_by: None,
    };

    SynthesisResult { memory, needs_review }
}

fn draft_summary(llm: &dyn Llm, parts: &[String]) -> Option<String> {
    let prompt = format!(
        "Write one concise paragraph that summarizes the following related notes \
         as a single fact, preserving all distinct details:\n\n{}",
        parts.join("\n- ")
    );
    let options = CompletionOptions { max_tokens: Some(256), json_mode: false, timeout_ms: Some(SYNTHESIS_TIMEOUT_MS) };
    match llm.complete(&prompt, &options) {
        Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "consolidation synthesis llm call failed, degrading");
            None
        }
    }
}

fn fallback_summary(parts: &[String]) -> String {
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_support::FakeLlm;
    use std::collections::BTreeSet as Set;

    fn memory(id: &str, content: &str, salience: f64, reinforcement_count: u64) -> Memory {
        let now = Utc::now();
        Memory {
            id: id.to_string(),
            content: content.to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Salience::new(salience),
            entities: Set::new(),
            topics: Set::new(),
            source: Source::System { reference: None },
            created_at: now,
            valid_from: now,
            valid_until: None,
            last_accessed_at: now,
            reinforcement_count,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(content),
        }
    }

    #[test]
    fn anchor_favors_higher_salience_and_reinforcement() {
        let low = memory("a", "low", 0.3, 1);
        let high = memory("b", "high", 0.9, 10);
        assert_eq!(select_anchor(&[&low, &high]).id, "b");
    }

    #[test]
    fn no_llm_produces_needs_review_summary() {
        let m1 = memory("a", "Acme renewed the contract.", 0.6, 2);
        let m2 = memory("b", "Acme also added a new seat.", 0.5, 1);
        let cluster: Vec<&Memory> = vec![&m1, &m2];
        let embeddings = vec![Some(vec![1.0, 0.0]), Some(vec![0.0, 1.0])];
        let result = synthesize(&cluster, &embeddings, None);
        assert!(result.needs_review);
        assert_eq!(result.memory.memory_type, MemoryType::Consolidated);
        assert!(result.memory.content.contains("Acme renewed"));
        assert!(result.memory.content.contains("new seat"));
    }

    #[test]
    fn llm_summary_clears_needs_review() {
        let llm = FakeLlm::new();
        llm.when_contains("Acme renewed", "Acme renewed its contract and added a seat.");
        let m1 = memory("a", "Acme renewed the contract.", 0.6, 2);
        let m2 = memory("b", "Acme also added a new seat.", 0.5, 1);
        let cluster: Vec<&Memory> = vec![&m1, &m2];
        let embeddings = vec![Some(vec![1.0, 0.0]), Some(vec![0.0, 1.0])];
        let result = synthesize(&cluster, &embeddings, Some(&llm));
        assert!(!result.needs_review);
        assert_eq!(result.memory.content, "Acme renewed its contract and added a seat.");
    }

    #[test]
    fn near_duplicate_constituent_is_not_folded_in_twice() {
        let m1 = memory("a", "Acme renewed.", 0.6, 2);
        let m2 = memory("b", "Acme renewed.", 0.5, 1);
        let cluster: Vec<&Memory> = vec![&m1, &m2];
        let embeddings = vec![Some(vec![1.0, 0.0, 0.0]), Some(vec![1.0, 0.0, 0.0])];
        let result = synthesize(&cluster, &embeddings, None);
        assert_eq!(result.memory.content, "Acme renewed.");
    }
}
