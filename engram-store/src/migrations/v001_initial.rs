//! v001: memories, entities, memory_entities, edges, embed_cache, fts.

use rusqlite::Connection;

use engram_core::errors::StoreError;

pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id                    TEXT PRIMARY KEY,
            content               TEXT NOT NULL,
            memory_type           TEXT NOT NULL,
            status                TEXT NOT NULL,
            salience              REAL NOT NULL,
            entities              TEXT NOT NULL,
            topics                TEXT NOT NULL,
            source_kind           TEXT NOT NULL,
            source_reference      TEXT,
            created_at            TEXT NOT NULL,
            valid_from            TEXT NOT NULL,
            valid_until           TEXT,
            last_accessed_at      TEXT NOT NULL,
            reinforcement_count   INTEGER NOT NULL DEFAULT 0,
            embedding             BLOB,
            embedding_failed      INTEGER NOT NULL DEFAULT 0,
            needs_review          INTEGER NOT NULL DEFAULT 0,
            superseded_by         TEXT,
            content_hash          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_memories_status ON memories(status);
        CREATE INDEX IF NOT EXISTS idx_memories_type ON memories(memory_type);
        CREATE INDEX IF NOT EXISTS idx_memories_valid ON memories(valid_from, valid_until);
        CREATE INDEX IF NOT EXISTS idx_memories_content_hash ON memories(content_hash);

        CREATE TABLE IF NOT EXISTS entities (
            name             TEXT PRIMARY KEY,
            created_at       TEXT NOT NULL,
            last_seen_at     TEXT NOT NULL,
            memory_count     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS memory_entities (
            memory_id   TEXT NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            entity_name TEXT NOT NULL REFERENCES entities(name) ON DELETE CASCADE,
            PRIMARY KEY (memory_id, entity_name)
        );

        CREATE INDEX IF NOT EXISTS idx_memory_entities_entity ON memory_entities(entity_name);

        CREATE TABLE IF NOT EXISTS edges (
            src_id     TEXT NOT NULL,
            dst_id     TEXT NOT NULL,
            kind       TEXT NOT NULL,
            weight     REAL NOT NULL DEFAULT 1.0,
            created_at TEXT NOT NULL,
            PRIMARY KEY (src_id, dst_id, kind)
        );

        CREATE INDEX IF NOT EXISTS idx_edges_src ON edges(src_id);
        CREATE INDEX IF NOT EXISTS idx_edges_dst ON edges(dst_id);

        CREATE TABLE IF NOT EXISTS embed_cache (
            content_hash TEXT PRIMARY KEY,
            embedding    BLOB NOT NULL,
            dimensions   INTEGER NOT NULL
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS memories_fts USING fts5(
            id UNINDEXED,
            content,
            content='memories',
            content_rowid='rowid'
        );

        CREATE TRIGGER IF NOT EXISTS memories_fts_ai AFTER INSERT ON memories BEGIN
            INSERT INTO memories_fts(rowid, id, content) VALUES (new.rowid, new.id, new.content);
        END;

        CREATE TRIGGER IF NOT EXISTS memories_fts_ad AFTER DELETE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, id, content) VALUES ('delete', old.rowid, old.id, old.content);
        END;

        CREATE TRIGGER IF NOT EXISTS memories_fts_au AFTER UPDATE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, id, content) VALUES ('delete', old.rowid, old.id, old.content);
            INSERT INTO memories_fts(rowid, id, content) VALUES (new.rowid, new.id, new.content);
        END;
        ",
    )?;
    Ok(())
}
