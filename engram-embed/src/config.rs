use std::time::Duration;

use engram_core::constants::{
    DEFAULT_EMBED_BACKOFF_BASE_MS, DEFAULT_EMBED_BATCH_AGE_MS, DEFAULT_EMBED_BATCH_SIZE,
    DEFAULT_EMBED_MAX_RETRIES,
};

/// Batching and retry policy for the embed queue (spec §4.3).
#[derive(Debug, Clone)]
pub struct EmbedQueueConfig {
    /// Flush once this many rows are pending.
    pub batch_size: usize,
    /// Flush once the oldest pending row has waited this long.
    pub batch_age: Duration,
    /// Retries attempted for a transiently-failing batch before the rows
    /// are marked `embedding-failed`.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub backoff_base: Duration,
}

impl Default for EmbedQueueConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
            batch_age: Duration::from_millis(DEFAULT_EMBED_BATCH_AGE_MS),
            max_retries: DEFAULT_EMBED_MAX_RETRIES,
            backoff_base: Duration::from_millis(DEFAULT_EMBED_BACKOFF_BASE_MS),
        }
    }
}
