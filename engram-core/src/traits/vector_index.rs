use crate::errors::EngramResult;

/// Injected nearest-neighbor vector index (spec §6.5).
///
/// `engram-store` owns the on-disk lifecycle (`open`/`close`); `engram-embed`
/// calls `upsert`/`remove` as embeddings land or rows are deleted.
pub trait VectorIndex: Send + Sync {
    fn open(&mut self, path: &str, dims: usize) -> EngramResult<()>;
    fn close(&mut self) -> EngramResult<()>;
    fn upsert(&self, id: &str, vector: &[f32]) -> EngramResult<()>;
    fn remove(&self, id: &str) -> EngramResult<()>;
    /// Top-k nearest neighbors by similarity, highest score first.
    fn top_k(&self, vector: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>>;
}
