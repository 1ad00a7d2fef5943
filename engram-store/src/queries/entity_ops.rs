//! Entity listing and alias merge (spec §4.6 step 4, §4.7 `entities()`).

use chrono::{DateTime, Utc};
use engram_core::errors::StoreError;
use engram_core::Entity;
use rusqlite::{params, Connection, OptionalExtension};

fn row_to_entity(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entity> {
    let created_at_str: String = row.get("created_at")?;
    let last_seen_at_str: String = row.get("last_seen_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    let last_seen_at = chrono::DateTime::parse_from_rfc3339(&last_seen_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    Ok(Entity {
        name: row.get("name")?,
        created_at,
        last_seen_at,
        memory_count: row.get::<_, i64>("memory_count")? as u64,
    })
}

pub fn list_entities(conn: &Connection, k: usize) -> Result<Vec<Entity>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name, created_at, last_seen_at, memory_count FROM entities
         ORDER BY memory_count DESC, last_seen_at DESC LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(params![k as i64], row_to_entity)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Folds `alias` into `canonical` across `entities`, `memory_entities`, and
/// every memory row's JSON-encoded `entities` set. A no-op if the alias row
/// doesn't exist or the two names are equal.
pub fn merge_entity_alias(
    conn: &Connection,
    alias: &str,
    canonical: &str,
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    if alias == canonical {
        return Ok(());
    }
    let tx = conn.unchecked_transaction()?;

    let alias_row: Option<(String, String, i64)> = tx
        .query_row(
            "SELECT created_at, last_seen_at, memory_count FROM entities WHERE name = ?1",
            params![alias],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((alias_created_at, alias_last_seen_at, alias_count)) = alias_row else {
        tx.commit()?;
        return Ok(());
    };

    let canonical_row: Option<(String, i64)> = tx
        .query_row(
            "SELECT created_at, memory_count FROM entities WHERE name = ?1",
            params![canonical],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    // Reassign memberships first so duplicate (memory_id, canonical) pairs
    // created by `INSERT OR IGNORE` below collapse instead of conflicting.
    tx.execute(
        "UPDATE OR IGNORE memory_entities SET entity_name = ?2 WHERE entity_name = ?1",
        params![alias, canonical],
    )?;
    tx.execute("DELETE FROM memory_entities WHERE entity_name = ?1", params![alias])?;

    let member_ids: Vec<String> = {
        let mut stmt = tx.prepare("SELECT memory_id FROM memory_entities WHERE entity_name = ?1")?;
        stmt.query_map(params![canonical], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?
    };
    for memory_id in &member_ids {
        let entities_json: String =
            tx.query_row("SELECT entities FROM memories WHERE id = ?1", params![memory_id], |r| r.get(0))?;
        let mut set = crate::row::json_to_set(&entities_json);
        if set.remove(alias) {
            set.insert(canonical.to_string());
            tx.execute(
                "UPDATE memories SET entities = ?2 WHERE id = ?1",
                params![memory_id, crate::row::set_to_json(&set)],
            )?;
        }
    }

    match canonical_row {
        Some((canonical_created_at, canonical_count)) => {
            let earliest_created_at = std::cmp::min(alias_created_at, canonical_created_at);
            let combined_count = canonical_count + alias_count;
            tx.execute(
                "UPDATE entities SET created_at = ?2, last_seen_at = ?3, memory_count = ?4 WHERE name = ?1",
                params![canonical, earliest_created_at, at.to_rfc3339(), combined_count],
            )?;
        }
        None => {
            tx.execute(
                "INSERT INTO entities (name, created_at, last_seen_at, memory_count) VALUES (?1, ?2, ?3, ?4)",
                params![canonical, alias_created_at, alias_last_seen_at, alias_count],
            )?;
        }
    }
    tx.execute("DELETE FROM entities WHERE name = ?1", params![alias])?;

    tx.commit()?;
    Ok(())
}
