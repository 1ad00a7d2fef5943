/// Lifecycle (decay/archival/expiry) subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("decay sweep failed: {reason}")]
    DecaySweepFailed { reason: String },

    #[error("archival failed for {id}: {reason}")]
    ArchivalFailed { id: String, reason: String },
}
