//! In-process `VectorIndex` (spec §6.5), backed by a `HashMap` + brute-force
//! scan — exercises the injected-index contract without `engram-store`'s
//! SQLite-backed default.

use std::collections::HashMap;
use std::sync::Mutex;

use engram_core::{EngramError, EngramResult, VectorIndex};

pub struct InMemoryVectorIndex {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    open: std::sync::atomic::AtomicBool,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            open: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn not_open() -> EngramError {
        EngramError::Unavailable {
            reason: "vector index not open".to_string(),
        }
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

impl VectorIndex for InMemoryVectorIndex {
    fn open(&mut self, _path: &str, _dims: usize) -> EngramResult<()> {
        self.open.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> EngramResult<()> {
        self.open.store(false, std::sync::atomic::Ordering::SeqCst);
        self.vectors.lock().expect("vector lock").clear();
        Ok(())
    }

    fn upsert(&self, id: &str, vector: &[f32]) -> EngramResult<()> {
        if !self.open.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Self::not_open());
        }
        self.vectors
            .lock()
            .expect("vector lock")
            .insert(id.to_string(), vector.to_vec());
        Ok(())
    }

    fn remove(&self, id: &str) -> EngramResult<()> {
        if !self.open.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Self::not_open());
        }
        self.vectors.lock().expect("vector lock").remove(id);
        Ok(())
    }

    fn top_k(&self, vector: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>> {
        if !self.open.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(Self::not_open());
        }
        let guard = self.vectors.lock().expect("vector lock");
        let mut scored: Vec<(String, f64)> = guard
            .iter()
            .map(|(id, v)| (id.clone(), cosine(vector, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}
