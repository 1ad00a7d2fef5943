//! Row <-> `Memory` (de)serialization shared by every query module.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use engram_core::{Memory, MemoryStatus, MemoryType, Source};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::Row;

/// Wrapper so a malformed timestamp surfaces as a `rusqlite::Error` (and so
/// `StoreError::from` turns it into `Corrupt`) instead of being swallowed.
struct Rfc3339(DateTime<Utc>);

impl FromSql for Rfc3339 {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Rfc3339(dt.with_timezone(&Utc)))
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

pub fn set_to_json(set: &BTreeSet<String>) -> String {
    serde_json::to_string(set).unwrap_or_else(|_| "[]".to_string())
}

pub fn json_to_set(s: &str) -> BTreeSet<String> {
    serde_json::from_str(s).unwrap_or_default()
}

pub fn embedding_to_blob(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn blob_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn source_from_parts(kind: &str, reference: Option<String>) -> Source {
    match kind {
        "conversation" => Source::Conversation {
            session_id: reference,
        },
        "document" => Source::Document { reference },
        "external" => Source::External { reference },
        _ => Source::System { reference },
    }
}

fn source_to_parts(source: &Source) -> (&'static str, Option<String>) {
    match source {
        Source::Conversation { session_id } => ("conversation", session_id.clone()),
        Source::Document { reference } => ("document", reference.clone()),
        Source::External { reference } => ("external", reference.clone()),
        Source::System { reference } => ("system", reference.clone()),
    }
}

pub fn memory_params(m: &Memory) -> MemoryParams {
    let (source_kind, source_reference) = source_to_parts(&m.source);
    MemoryParams {
        id: m.id.clone(),
        content: m.content.clone(),
        memory_type: m.memory_type.as_str(),
        status: m.status.as_str(),
        salience: m.salience.value(),
        entities: set_to_json(&m.entities),
        topics: set_to_json(&m.topics),
        source_kind,
        source_reference,
        created_at: m.created_at.to_rfc3339(),
        valid_from: m.valid_from.to_rfc3339(),
        valid_until: m.valid_until.map(|t| t.to_rfc3339()),
        last_accessed_at: m.last_accessed_at.to_rfc3339(),
        reinforcement_count: m.reinforcement_count as i64,
        embedding: m.embedding.as_deref().map(embedding_to_blob),
        embedding_failed: m.embedding_failed as i32,
        needs_review: m.needs_review as i32,
        superseded_by: m.superseded_by.clone(),
        content_hash: m.content_hash.clone(),
    }
}

/// Owned, DB-ready representation of a `Memory` row. Kept as a struct
/// (rather than inlining `params!` at each call site) since both insert
/// and update share every column.
pub struct MemoryParams {
    pub id: String,
    pub content: String,
    pub memory_type: &'static str,
    pub status: &'static str,
    pub salience: f64,
    pub entities: String,
    pub topics: String,
    pub source_kind: &'static str,
    pub source_reference: Option<String>,
    pub created_at: String,
    pub valid_from: String,
    pub valid_until: Option<String>,
    pub last_accessed_at: String,
    pub reinforcement_count: i64,
    pub embedding: Option<Vec<u8>>,
    pub embedding_failed: i32,
    pub needs_review: i32,
    pub superseded_by: Option<String>,
    pub content_hash: String,
}

pub fn row_to_memory(row: &Row<'_>) -> rusqlite::Result<Memory> {
    let memory_type_str: String = row.get("memory_type")?;
    let status_str: String = row.get("status")?;
    let entities_json: String = row.get("entities")?;
    let topics_json: String = row.get("topics")?;
    let source_kind: String = row.get("source_kind")?;
    let source_reference: Option<String> = row.get("source_reference")?;
    let created_at: Rfc3339 = row.get("created_at")?;
    let valid_from: Rfc3339 = row.get("valid_from")?;
    let valid_until: Option<Rfc3339> = row.get("valid_until")?;
    let last_accessed_at: Rfc3339 = row.get("last_accessed_at")?;
    let embedding_blob: Option<Vec<u8>> = row.get("embedding")?;

    Ok(Memory {
        id: row.get("id")?,
        content: row.get("content")?,
        memory_type: MemoryType::parse(&memory_type_str).unwrap_or(MemoryType::Episodic),
        status: MemoryStatus::parse(&status_str).unwrap_or(MemoryStatus::Active),
        salience: row.get::<_, f64>("salience")?.into(),
        entities: json_to_set(&entities_json),
        topics: json_to_set(&topics_json),
        source: source_from_parts(&source_kind, source_reference),
        created_at: created_at.0,
        valid_from: valid_from.0,
        valid_until: valid_until.map(|v| v.0),
        last_accessed_at: last_accessed_at.0,
        reinforcement_count: row.get::<_, i64>("reinforcement_count")? as u64,
        embedding: embedding_blob.map(|b| blob_to_embedding(&b)),
        embedding_failed: row.get::<_, i32>("embedding_failed")? != 0,
        needs_review: row.get::<_, i32>("needs_review")? != 0,
        superseded_by: row.get("superseded_by")?,
        content_hash: row.get("content_hash")?,
    })
}

pub const MEMORY_COLUMNS: &str = "id, content, memory_type, status, salience, entities, topics,
     source_kind, source_reference, created_at, valid_from, valid_until,
     last_accessed_at, reinforcement_count, embedding, embedding_failed,
     needs_review, superseded_by, content_hash";
