use crate::errors::EngramResult;

/// Injected embedding provider (spec §6.5).
///
/// Implementations are called from a background worker via
/// `tokio::task::spawn_blocking`; the trait itself stays synchronous so a
/// test double can implement it without pulling in an async runtime.
pub trait Embedder: Send + Sync {
    /// Embed a single text, returning a vector of `dimensions()` floats.
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>>;

    /// Embed a batch of texts in one provider round-trip.
    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>>;

    /// The dimensionality of vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Whether the provider is currently reachable.
    fn is_available(&self) -> bool;
}
