//! Forward-only numbered migrations, run under a lock at `open()`.

mod v001_initial;
mod v002_memory_topics;

use rusqlite::Connection;

use engram_core::errors::StoreError;

/// (version, migration fn) in ascending order. Never reorder or remove an
/// entry; add new migrations at the end with the next integer version.
const MIGRATIONS: &[(u32, fn(&Connection) -> Result<(), StoreError>)] = &[
    (1, v001_initial::migrate),
    (2, v002_memory_topics::migrate),
];

fn current_version(conn: &Connection) -> Result<u32, StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
    )?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))?;
    if count == 0 {
        conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
        return Ok(0);
    }
    let version: i64 = conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |r| {
        r.get(0)
    })?;
    Ok(version as u32)
}

/// Run every migration newer than the database's recorded version, each in
/// its own transaction, holding an exclusive lock for the whole pass so a
/// second process opening the same file can't race the schema forward.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("BEGIN EXCLUSIVE")?;
    let result = run_migrations_inner(conn);
    match &result {
        Ok(()) => conn.execute_batch("COMMIT")?,
        Err(_) => {
            let _ = conn.execute_batch("ROLLBACK");
        }
    }
    result
}

fn run_migrations_inner(conn: &Connection) -> Result<(), StoreError> {
    let mut version = current_version(conn)?;
    for (v, migrate) in MIGRATIONS {
        if *v <= version {
            continue;
        }
        migrate(conn).map_err(|e| StoreError::MigrationFailed {
            version: *v,
            reason: e.to_string(),
        })?;
        conn.execute("UPDATE schema_version SET version = ?1", [*v])?;
        version = *v;
    }
    Ok(())
}
