//! Default `VectorIndex` implementation (spec §6.5), backed by the same
//! SQLite file as the rest of the vault rather than a separate ANN
//! library — the teacher's own `cortex-storage` has no vector-index crate
//! dependency either, and falls back to the identical brute-force scan
//! (see `queries::vector_search`). Embedded, single-process scale makes
//! that an acceptable default; a different `VectorIndex` can be injected
//! per spec §6.5 for larger deployments.

use std::path::PathBuf;
use std::sync::Mutex;

use engram_core::errors::StoreError;
use engram_core::{EngramError, EngramResult, VectorIndex};
use rusqlite::{params, Connection};

use crate::pool::pragmas::apply_read_pragmas;
use crate::queries::vector_search;

pub struct SqliteVectorIndex {
    conn: Mutex<Option<Connection>>,
}

impl SqliteVectorIndex {
    pub fn new() -> Self {
        Self {
            conn: Mutex::new(None),
        }
    }

    fn not_open() -> EngramError {
        EngramError::Unavailable {
            reason: "vector index not open".to_string(),
        }
    }
}

impl Default for SqliteVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorIndex for SqliteVectorIndex {
    fn open(&mut self, path: &str, _dims: usize) -> EngramResult<()> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(PathBuf::from(path))
        }
        .map_err(StoreError::from)?;
        apply_read_pragmas(&conn)?;
        *self.conn.lock().expect("vector index lock") = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> EngramResult<()> {
        *self.conn.lock().expect("vector index lock") = None;
        Ok(())
    }

    fn upsert(&self, id: &str, vector: &[f32]) -> EngramResult<()> {
        let guard = self.conn.lock().expect("vector index lock");
        let conn = guard.as_ref().ok_or_else(Self::not_open)?;
        let blob = crate::row::embedding_to_blob(vector);
        conn.execute(
            "UPDATE memories SET embedding = ?2 WHERE id = ?1",
            params![id, blob],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    fn remove(&self, id: &str) -> EngramResult<()> {
        let guard = self.conn.lock().expect("vector index lock");
        let conn = guard.as_ref().ok_or_else(Self::not_open)?;
        conn.execute(
            "UPDATE memories SET embedding = NULL WHERE id = ?1",
            params![id],
        )
        .map_err(StoreError::from)?;
        Ok(())
    }

    fn top_k(&self, vector: &[f32], k: usize) -> EngramResult<Vec<(String, f64)>> {
        let guard = self.conn.lock().expect("vector index lock");
        let conn = guard.as_ref().ok_or_else(Self::not_open)?;
        let hits = vector_search::vector_search(conn, vector, k)?;
        Ok(hits)
    }
}
