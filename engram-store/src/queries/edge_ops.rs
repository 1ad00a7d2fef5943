use engram_core::errors::StoreError;
use engram_core::{Edge, EdgeKind};
use rusqlite::{params, Connection};

pub fn add_edge(conn: &Connection, edge: &Edge) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO edges (src_id, dst_id, kind, weight, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(src_id, dst_id, kind) DO UPDATE SET weight = excluded.weight",
        params![
            edge.src_id,
            edge.dst_id,
            edge.kind.as_str(),
            edge.weight,
            edge.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn remove_edge(conn: &Connection, src_id: &str, dst_id: &str, kind: EdgeKind) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM edges WHERE src_id = ?1 AND dst_id = ?2 AND kind = ?3",
        params![src_id, dst_id, kind.as_str()],
    )?;
    Ok(())
}

fn row_to_edge(row: &rusqlite::Row<'_>) -> rusqlite::Result<Edge> {
    let kind_str: String = row.get("kind")?;
    let created_at_str: String = row.get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now());
    Ok(Edge {
        src_id: row.get("src_id")?,
        dst_id: row.get("dst_id")?,
        kind: EdgeKind::parse(&kind_str).unwrap_or(EdgeKind::Supports),
        weight: row.get("weight")?,
        created_at,
    })
}

pub fn edges_for(
    conn: &Connection,
    id: &str,
    kinds: Option<&[EdgeKind]>,
) -> Result<Vec<Edge>, StoreError> {
    let mut sql = "SELECT src_id, dst_id, kind, weight, created_at FROM edges WHERE (src_id = ?1 OR dst_id = ?1)".to_string();
    if let Some(kinds) = kinds {
        if !kinds.is_empty() {
            let list = kinds
                .iter()
                .map(|k| format!("'{}'", k.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            sql.push_str(&format!(" AND kind IN ({list})"));
        }
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![id], row_to_edge)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn all_edges(conn: &Connection) -> Result<Vec<Edge>, StoreError> {
    let mut stmt = conn.prepare("SELECT src_id, dst_id, kind, weight, created_at FROM edges")?;
    let rows = stmt
        .query_map([], row_to_edge)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
