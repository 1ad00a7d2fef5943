/// In-memory graph subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    #[error("graph rebuild failed: {reason}")]
    RebuildFailed { reason: String },

    #[error("traversal budget exceeded: visited {visited} nodes")]
    BudgetExceeded { visited: usize },
}
