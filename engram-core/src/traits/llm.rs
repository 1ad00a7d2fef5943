use crate::errors::EngramResult;

/// Options for a single `Llm::complete` call (spec §6.5).
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub max_tokens: Option<usize>,
    pub json_mode: bool,
    pub timeout_ms: Option<u64>,
}

/// Injected LLM provider, used by consolidation's optional merge-summary
/// polish step (spec §4.6) and `ask()` (spec §4.7). Optional at config
/// time; its absence degrades those features rather than failing them.
pub trait Llm: Send + Sync {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> EngramResult<String>;
}
