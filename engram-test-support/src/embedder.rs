//! Deterministic, dependency-free embedding provider for tests.
//!
//! Hashes terms into fixed-dimension buckets the same way a production
//! TF-IDF fallback would — no ML model, but similar texts still land
//! closer together than unrelated ones, which is enough for recall tests
//! to exercise real cosine-similarity ordering instead of fixed stubs.

use engram_core::{EngramResult, Embedder};

pub struct FakeEmbedder {
    dimensions: usize,
    available: std::sync::atomic::AtomicBool,
}

impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            available: std::sync::atomic::AtomicBool::new(true),
        }
    }

    /// Force subsequent calls to fail, to exercise degradation paths.
    pub fn set_available(&self, available: bool) {
        self.available
            .store(available, std::sync::atomic::Ordering::SeqCst);
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }
        let total = tokens.len() as f32;
        for tok in &tokens {
            let bucket = Self::hash_term(tok, self.dimensions);
            vec[bucket] += 1.0 / total;
        }
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl Embedder for FakeEmbedder {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        if !self.available.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(engram_core::EngramError::Unavailable {
                reason: "fake embedder disabled".to_string(),
            });
        }
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }
}
