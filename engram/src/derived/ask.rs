//! Question answering over recalled memories (spec §4.7): recall supplies
//! the evidence, an optional `Llm` synthesizes prose from it, and every
//! citation is drawn from the memories actually returned by recall — never
//! invented.

use engram_core::{CompletionOptions, Llm};
use engram_recall::RecallHit;

const ASK_TIMEOUT_MS: u64 = 5_000;
const ASK_EXCERPT_CHARS: usize = 400;

#[derive(Debug, Clone)]
pub struct AskResponse {
    pub answer: String,
    pub confidence: f64,
    pub citations: Vec<String>,
}

fn confidence_from_scores(hits: &[RecallHit]) -> f64 {
    if hits.is_empty() {
        return 0.0;
    }
    let avg = hits.iter().map(|h| h.score).sum::<f64>() / hits.len() as f64;
    1.0 - 1.0 / (1.0 + avg.max(0.0))
}

fn digest(hits: &[RecallHit]) -> String {
    hits.iter()
        .map(|h| h.memory.content.chars().take(ASK_EXCERPT_CHARS).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Degrades to a concatenation digest (and a discounted confidence) when no
/// `Llm` is configured, or the configured one fails — never fails the call.
pub fn run(llm: Option<&dyn Llm>, question: &str, hits: Vec<RecallHit>) -> AskResponse {
    if hits.is_empty() {
        return AskResponse {
            answer: "I don't have any memories relevant to that question.".to_string(),
            confidence: 0.0,
            citations: Vec::new(),
        };
    }

    let citations: Vec<String> = hits.iter().map(|h| h.memory.id.clone()).collect();
    let base_confidence = confidence_from_scores(&hits);

    let (answer, degraded) = match llm {
        Some(llm) => {
            let excerpts: String = hits
                .iter()
                .map(|h| format!("- {}", h.memory.content.chars().take(ASK_EXCERPT_CHARS).collect::<String>()))
                .collect::<Vec<_>>()
                .join("\n");
            let prompt = format!(
                "Answer the question using only the memories below. Be concise.\n\nQuestion: {question}\n\nMemories:\n{excerpts}"
            );
            let options = CompletionOptions {
                max_tokens: Some(512),
                json_mode: false,
                timeout_ms: Some(ASK_TIMEOUT_MS),
            };
            match llm.complete(&prompt, &options) {
                Ok(text) => (text, false),
                Err(err) => {
                    tracing::warn!(error = %err, "ask llm synthesis failed, degrading to digest");
                    (digest(&hits), true)
                }
            }
        }
        None => (digest(&hits), true),
    };

    let confidence = if degraded { base_confidence * 0.6 } else { base_confidence };
    AskResponse { answer, confidence, citations }
}
