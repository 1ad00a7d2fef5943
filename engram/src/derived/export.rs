//! Full vault dump (spec §4.7), for backup/migration — every memory, edge,
//! and entity, serializable as-is since `Memory`/`Edge`/`Entity` already
//! carry `Serialize`/`Deserialize`.

use engram_core::{Edge, Entity, EngramResult, Memory, MemoryStatus, Store};
use serde::{Deserialize, Serialize};

const EXPORT_MEMORY_SCAN_LIMIT: usize = 100_000;
const EXPORT_ENTITY_SCAN_LIMIT: usize = 100_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultExport {
    pub memories: Vec<Memory>,
    pub edges: Vec<Edge>,
    pub entities: Vec<Entity>,
}

pub fn run(store: &dyn Store) -> EngramResult<VaultExport> {
    let mut memories = Vec::new();
    for status in [
        MemoryStatus::Active,
        MemoryStatus::Pending,
        MemoryStatus::Fulfilled,
        MemoryStatus::Superseded,
        MemoryStatus::Archived,
    ] {
        memories.extend(store.by_status(status, EXPORT_MEMORY_SCAN_LIMIT)?);
    }
    let edges = store.all_edges()?;
    let entities = store.list_entities(EXPORT_ENTITY_SCAN_LIMIT)?;
    Ok(VaultExport { memories, edges, entities })
}
