//! # engram-store
//!
//! The only component that touches the on-disk format (spec §4.1). Owns
//! the SQLite connection pool, migrations, and the default `VectorIndex`.

mod engine;
mod migrations;
mod pool;
mod queries;
mod row;
mod vector_index;

pub use engine::StoreEngine;
pub use vector_index::SqliteVectorIndex;
