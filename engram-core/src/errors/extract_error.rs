/// Auto-extraction subsystem errors (entity/topic/type inference).
///
/// Extraction is best-effort by design (spec §4.2) — these variants
/// surface through `needs_review`, not through a failed write.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extraction rule failed: {reason}")]
    RuleFailed { reason: String },

    #[error("content too large to extract: {len} bytes")]
    ContentTooLarge { len: usize },
}
