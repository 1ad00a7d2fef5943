use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use engram_core::errors::StoreError;

use super::pragmas::apply_write_pragmas;

/// The single serialized write connection. Every mutation acquires this
/// lock for the duration of its transaction; readers never contend with it
/// because WAL lets them read the last-committed snapshot independently.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        apply_write_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        apply_write_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| StoreError::Corrupt {
                details: format!("write connection lock poisoned: {e}"),
            })?;
        f(&guard)
    }
}
