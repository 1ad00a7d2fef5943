use serde::{Deserialize, Serialize};

/// Embedding subsystem configuration (spec §4.3, §6.4, §6.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Vector width the configured `Embedder` produces; used to validate
    /// provider output and size the vector index.
    pub dimensions: usize,
    /// Bound on the async embed queue before writes back-pressure
    /// (spec §4.3 "bounded queue").
    pub queue_capacity: usize,
    /// Max concurrent in-flight embed calls to the provider.
    pub max_concurrent_requests: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            dimensions: 384,
            queue_capacity: 1_000,
            max_concurrent_requests: 4,
        }
    }
}
