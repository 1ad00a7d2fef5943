/// Consolidation subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidateError {
    #[error("consolidation already running")]
    AlreadyRunning,

    #[error("consolidation timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("consolidation cancelled")]
    Cancelled,

    #[error("clustering failed: {reason}")]
    ClusteringFailed { reason: String },

    #[error("merge failed for cluster {cluster_id}: {reason}")]
    MergeFailed { cluster_id: String, reason: String },
}
