//! Connection pool managing the single writer and the read connection pool.

pub mod pragmas;
mod read_pool;
mod write_connection;

use std::path::{Path, PathBuf};

use engram_core::errors::StoreError;

pub use pragmas::verify_wal_mode;
pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, read_pool_size: usize) -> Result<Self, StoreError> {
        let writer = WriteConnection::open(path)?;
        let readers = ReadPool::open(path, read_pool_size)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory mode: writer and readers are separate in-process databases,
    /// so callers must route all reads through the writer (see
    /// `StoreEngine::use_read_pool`).
    pub fn open_in_memory(read_pool_size: usize) -> Result<Self, StoreError> {
        let writer = WriteConnection::open_in_memory()?;
        let readers = ReadPool::open_in_memory(read_pool_size)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
