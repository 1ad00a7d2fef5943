//! v002: memory_topics, for topic-seed recall (spec §4.5.2). Topics have no
//! closed registry the way entities do (spec §3 "closed set not required"),
//! so unlike `entities`/`memory_entities` this is a single join table with
//! no parent row to maintain.

use rusqlite::Connection;

use engram_core::errors::StoreError;

pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_topics (
            memory_id  TEXT NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            topic      TEXT NOT NULL,
            PRIMARY KEY (memory_id, topic)
        );

        CREATE INDEX IF NOT EXISTS idx_memory_topics_topic ON memory_topics(topic);
        ",
    )?;
    Ok(())
}
