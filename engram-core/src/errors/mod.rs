mod consolidate_error;
mod embed_error;
mod extract_error;
mod graph_error;
mod lifecycle_error;
mod recall_error;
mod store_error;

pub use consolidate_error::ConsolidateError;
pub use embed_error::EmbedError;
pub use extract_error::ExtractError;
pub use graph_error::GraphError;
pub use lifecycle_error::LifecycleError;
pub use recall_error::RecallError;
pub use store_error::StoreError;

/// Top-level error type returned by the vault's public API (spec §6.2).
///
/// Every subsystem error folds into this via `#[from]`; callers at the
/// API boundary match on this type, not on the subsystem enums.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("not found: {id}")]
    NotFound { id: String },

    #[error("rate limited: {reason}")]
    RateLimited { reason: String },

    #[error("timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("cancelled")]
    Cancelled,

    #[error("unavailable: {reason}")]
    Unavailable { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Recall(#[from] RecallError),

    #[error(transparent)]
    Consolidate(#[from] ConsolidateError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

pub type EngramResult<T> = Result<T, EngramError>;

impl EngramError {
    /// Whether this error reflects caller input (4xx-like) vs. an
    /// internal/backend condition (5xx-like). Used by `engram`'s HTTP
    /// facade to pick a status code (spec §6.2).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngramError::InvalidPayload { .. }
                | EngramError::Conflict { .. }
                | EngramError::NotFound { .. }
                | EngramError::RateLimited { .. }
        )
    }
}
