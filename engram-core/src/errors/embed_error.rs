/// Embedding subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("embedder unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("embedder returned wrong dimensionality: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embed request timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("embed queue is full: {capacity} pending")]
    QueueFull { capacity: usize },
}
