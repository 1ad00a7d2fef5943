//! Brute-force cosine similarity search over stored embeddings.
//!
//! No ANN index crate is in the teacher's dependency stack, so this
//! mirrors the teacher's own fallback: scan embeddings, score in Rust.
//! Acceptable at vault scale (single-tenant, not web-scale).

use engram_core::errors::StoreError;
use rusqlite::{params, Connection};

use crate::row::blob_to_embedding;

pub fn vector_search(
    conn: &Connection,
    query_vec: &[f32],
    k: usize,
) -> Result<Vec<(String, f64)>, StoreError> {
    let query_norm_sq: f64 = query_vec.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(
        "SELECT id, embedding FROM memories
         WHERE embedding IS NOT NULL AND status != 'archived'",
    )?;
    let rows = stmt.query_map([], |row| {
        let id: String = row.get(0)?;
        let blob: Vec<u8> = row.get(1)?;
        Ok((id, blob))
    })?;

    let mut scored = Vec::new();
    for row in rows {
        let (id, blob) = row?;
        let stored = blob_to_embedding(&blob);
        if stored.len() != query_vec.len() {
            continue;
        }
        let sim = cosine_similarity(query_vec, &stored);
        if sim > 0.0 {
            scored.push((id, sim));
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    Ok(scored)
}

/// Look up a cached embedding by content hash (dedup, spec §3 design notes).
pub fn cached_embedding(conn: &Connection, content_hash: &str) -> Result<Option<Vec<f32>>, StoreError> {
    let blob: Option<Vec<u8>> = conn
        .query_row(
            "SELECT embedding FROM embed_cache WHERE content_hash = ?1",
            params![content_hash],
            |row| row.get(0),
        )
        .ok();
    Ok(blob.map(|b| blob_to_embedding(&b)))
}

pub fn cache_embedding(conn: &Connection, content_hash: &str, embedding: &[f32]) -> Result<(), StoreError> {
    let blob = crate::row::embedding_to_blob(embedding);
    conn.execute(
        "INSERT INTO embed_cache (content_hash, embedding, dimensions) VALUES (?1, ?2, ?3)
         ON CONFLICT(content_hash) DO UPDATE SET embedding = excluded.embedding, dimensions = excluded.dimensions",
        params![content_hash, blob, embedding.len() as i64],
    )?;
    Ok(())
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
