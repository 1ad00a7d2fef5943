/// Recall (query/ranking) subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("recall timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("recall cancelled")]
    Cancelled,

    #[error("ranking failed: {reason}")]
    RankingFailed { reason: String },
}
