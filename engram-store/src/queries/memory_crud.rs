//! Insert, get, reinforce, supersede, forget, stamp, by-ids, by-status.

use chrono::{DateTime, Utc};
use engram_core::errors::StoreError;
use engram_core::{Memory, MemoryStatus};
use rusqlite::{params, Connection, OptionalExtension};

use crate::row::{self, memory_params, row_to_memory, MEMORY_COLUMNS};

const ENTITY_SHARED_SQL: &str = "
    SELECT DISTINCT me2.memory_id
    FROM memory_entities me1
    JOIN memory_entities me2 ON me2.entity_name = me1.entity_name AND me2.memory_id != me1.memory_id
    WHERE me1.memory_id = ?1
    LIMIT ?2
";

const OTHER_ENTITIES_SQL: &str = "SELECT entity_name FROM memory_entities WHERE memory_id = ?1";

/// Jaccard similarity of two entity sets, used as the `entity-shared` edge weight (spec §4.4).
fn entity_jaccard(a: &std::collections::BTreeSet<String>, b: &std::collections::BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    if intersection == 0 {
        return 0.0;
    }
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Insert the memory row, per-entity upserts, and `entity-shared` edges to
/// memories sharing an entity, capped at `entity_shared_cap` (spec §4.1).
/// Atomic: all-or-nothing in one transaction.
pub fn insert(conn: &Connection, memory: &Memory, entity_shared_cap: usize) -> Result<(), StoreError> {
    let exists: bool = conn
        .query_row(
            "SELECT 1 FROM memories WHERE id = ?1",
            params![memory.id],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if exists {
        return Err(StoreError::Conflict {
            reason: format!("memory {} already exists", memory.id),
        });
    }

    let tx = conn.unchecked_transaction()?;
    let p = memory_params(memory);
    tx.execute(
        &format!(
            "INSERT INTO memories ({MEMORY_COLUMNS}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19
            )"
        ),
        params![
            p.id,
            p.content,
            p.memory_type,
            p.status,
            p.salience,
            p.entities,
            p.topics,
            p.source_kind,
            p.source_reference,
            p.created_at,
            p.valid_from,
            p.valid_until,
            p.last_accessed_at,
            p.reinforcement_count,
            p.embedding,
            p.embedding_failed,
            p.needs_review,
            p.superseded_by,
            p.content_hash,
        ],
    )?;

    for name in &memory.entities {
        tx.execute(
            "INSERT INTO entities (name, created_at, last_seen_at, memory_count)
             VALUES (?1, ?2, ?2, 1)
             ON CONFLICT(name) DO UPDATE SET
                last_seen_at = excluded.last_seen_at,
                memory_count = memory_count + 1",
            params![name, memory.created_at.to_rfc3339()],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO memory_entities (memory_id, entity_name) VALUES (?1, ?2)",
            params![memory.id, name],
        )?;
    }

    for topic in &memory.topics {
        tx.execute(
            "INSERT OR IGNORE INTO memory_topics (memory_id, topic) VALUES (?1, ?2)",
            params![memory.id, topic],
        )?;
    }

    if !memory.entities.is_empty() {
        let shared_ids: Vec<String> = {
            let mut stmt = tx.prepare(ENTITY_SHARED_SQL)?;
            stmt.query_map(params![memory.id, entity_shared_cap as i64], |r| r.get(0))?
                .collect::<Result<Vec<_>, _>>()?
        };
        let mut other_entities_stmt = tx.prepare(OTHER_ENTITIES_SQL)?;
        for other_id in shared_ids {
            let other_entities: std::collections::BTreeSet<String> = other_entities_stmt
                .query_map(params![other_id], |r| r.get(0))?
                .collect::<Result<_, _>>()?;
            let weight = entity_jaccard(&memory.entities, &other_entities);
            tx.execute(
                "INSERT OR IGNORE INTO edges (src_id, dst_id, kind, weight, created_at)
                 VALUES (?1, ?2, 'entity-shared', ?3, ?4)",
                params![memory.id, other_id, weight, memory.created_at.to_rfc3339()],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Memory>, StoreError> {
    conn.query_row(
        &format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"),
        params![id],
        row_to_memory,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn get_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<Memory>, StoreError> {
    let mut found = std::collections::HashMap::with_capacity(ids.len());
    for id in ids {
        if let Some(m) = get(conn, id)? {
            found.insert(id.clone(), m);
        }
    }
    Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
}

pub fn update_embedding(conn: &Connection, id: &str, vector: &[f32]) -> Result<(), StoreError> {
    let blob = row::embedding_to_blob(vector);
    let rows = conn.execute(
        "UPDATE memories SET embedding = ?2, embedding_failed = 0 WHERE id = ?1",
        params![id, blob],
    )?;
    if rows == 0 {
        return Err(StoreError::NotFound { id: id.to_string() });
    }
    Ok(())
}

pub fn mark_embedding_failed(conn: &Connection, id: &str) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE memories SET embedding_failed = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(())
}

/// Raise salience by a log-decaying increment and bump `reinforcement_count`.
/// Single UPDATE statement so concurrent callers serialize through SQLite's
/// row lock rather than racing a read-modify-write in application code.
pub fn reinforce(conn: &Connection, id: &str, step: f64, now: DateTime<Utc>) -> Result<(), StoreError> {
    let rows = conn.execute(
        "UPDATE memories SET
            salience = MIN(1.0, MAX(0.0, salience + ?2 * (1.0 - salience))),
            reinforcement_count = reinforcement_count + 1,
            last_accessed_at = ?3
         WHERE id = ?1",
        params![id, step, now.to_rfc3339()],
    )?;
    if rows == 0 {
        return Err(StoreError::NotFound { id: id.to_string() });
    }
    Ok(())
}

/// Subtract `step` from salience, clamped at 0. Leaves `last_accessed_at`
/// and `reinforcement_count` untouched, unlike `reinforce`.
pub fn decay_salience(conn: &Connection, id: &str, step: f64) -> Result<(), StoreError> {
    let rows = conn.execute(
        "UPDATE memories SET salience = MAX(0.0, salience - ?2) WHERE id = ?1",
        params![id, step],
    )?;
    if rows == 0 {
        return Err(StoreError::NotFound { id: id.to_string() });
    }
    Ok(())
}

pub fn supersede(
    conn: &Connection,
    old_id: &str,
    new_id: &str,
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;
    let rows = tx.execute(
        "UPDATE memories SET valid_until = ?2, status = 'superseded', superseded_by = ?3 WHERE id = ?1",
        params![old_id, at.to_rfc3339(), new_id],
    )?;
    if rows == 0 {
        return Err(StoreError::NotFound {
            id: old_id.to_string(),
        });
    }
    tx.execute(
        "INSERT OR IGNORE INTO edges (src_id, dst_id, kind, weight, created_at)
         VALUES (?1, ?2, 'supersedes', 1.0, ?3)",
        params![new_id, old_id, at.to_rfc3339()],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn forget(conn: &Connection, id: &str, hard: bool) -> Result<(), StoreError> {
    if hard {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM edges WHERE src_id = ?1 OR dst_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM memory_entities WHERE memory_id = ?1", params![id])?;
        let rows = tx.execute("DELETE FROM memories WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        tx.commit()?;
    } else {
        let rows = conn.execute(
            "UPDATE memories SET status = 'archived' WHERE id = ?1",
            params![id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
    }
    Ok(())
}

pub fn stamp(conn: &Connection, id: &str, when: DateTime<Utc>) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE memories SET last_accessed_at = ?2 WHERE id = ?1",
        params![id, when.to_rfc3339()],
    )?;
    Ok(())
}

pub fn latest_in_session(
    conn: &Connection,
    session_id: &str,
    exclude_id: &str,
) -> Result<Option<String>, StoreError> {
    conn.query_row(
        "SELECT id FROM memories
         WHERE source_kind = 'conversation' AND source_reference = ?1 AND id != ?2
         ORDER BY created_at DESC LIMIT 1",
        params![session_id, exclude_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn by_status(conn: &Connection, status: MemoryStatus, k: usize) -> Result<Vec<Memory>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMORY_COLUMNS} FROM memories WHERE status = ?1 ORDER BY created_at DESC LIMIT ?2"
    ))?;
    let rows = stmt
        .query_map(params![status.as_str(), k as i64], row_to_memory)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn entity_seed(conn: &Connection, entities: &[String], k: usize) -> Result<Vec<String>, StoreError> {
    if entities.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = entities.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT me.memory_id, COUNT(*) as hits
         FROM memory_entities me
         JOIN memories m ON m.id = me.memory_id
         WHERE me.entity_name IN ({placeholders}) AND m.status != 'archived'
         GROUP BY me.memory_id
         ORDER BY hits DESC
         LIMIT ?"
    );
    let mut stmt = conn.prepare(&sql)?;
    let k = k as i64;
    let params: Vec<&dyn rusqlite::ToSql> = entities
        .iter()
        .map(|e| e as &dyn rusqlite::ToSql)
        .chain(std::iter::once(&k as &dyn rusqlite::ToSql))
        .collect();
    let ids = stmt
        .query_map(params.as_slice(), |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Ids ordered by descending count of topic matches (spec §4.5.2 topic-seed),
/// mirroring `entity_seed`.
pub fn topic_seed(conn: &Connection, topics: &[String], k: usize) -> Result<Vec<String>, StoreError> {
    if topics.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = topics.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT mt.memory_id, COUNT(*) as hits
         FROM memory_topics mt
         JOIN memories m ON m.id = mt.memory_id
         WHERE mt.topic IN ({placeholders}) AND m.status != 'archived'
         GROUP BY mt.memory_id
         ORDER BY hits DESC
         LIMIT ?"
    );
    let mut stmt = conn.prepare(&sql)?;
    let k = k as i64;
    let params: Vec<&dyn rusqlite::ToSql> = topics
        .iter()
        .map(|t| t as &dyn rusqlite::ToSql)
        .chain(std::iter::once(&k as &dyn rusqlite::ToSql))
        .collect();
    let ids = stmt
        .query_map(params.as_slice(), |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}
