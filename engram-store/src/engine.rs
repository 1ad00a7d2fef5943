//! `StoreEngine` — owns the `ConnectionPool`, implements `Store`, runs
//! migrations and verifies pragmas on open.

use std::path::Path;

use chrono::{DateTime, Utc};
use engram_core::errors::StoreError;
use engram_core::traits::NeighborHit;
use engram_core::{Edge, EdgeKind, Entity, Memory, MemoryStatus};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

const DEFAULT_ENTITY_SHARED_CAP: usize = engram_core::constants::DEFAULT_ENTITY_SHARED_CAP;
const DEFAULT_NEIGHBOR_EDGE_BUDGET: usize = engram_core::constants::DEFAULT_NEIGHBOR_EDGE_BUDGET;

pub struct StoreEngine {
    pool: ConnectionPool,
    use_read_pool: bool,
    entity_shared_cap: usize,
    neighbor_edge_budget: usize,
}

impl StoreEngine {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let pool = ConnectionPool::open(path, 4)?;
        let engine = Self {
            pool,
            use_read_pool: true,
            entity_shared_cap: DEFAULT_ENTITY_SHARED_CAP,
            neighbor_edge_budget: DEFAULT_NEIGHBOR_EDGE_BUDGET,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// In-memory store, for tests. In-memory read pool connections are
    /// isolated databases, so all reads route through the writer.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
            entity_shared_cap: DEFAULT_ENTITY_SHARED_CAP,
            neighbor_edge_budget: DEFAULT_NEIGHBOR_EDGE_BUDGET,
        };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn with_entity_shared_cap(mut self, cap: usize) -> Self {
        self.entity_shared_cap = cap;
        self
    }

    pub fn with_neighbor_edge_budget(mut self, budget: usize) -> Self {
        self.neighbor_edge_budget = budget;
        self
    }

    fn initialize(&self) -> Result<(), StoreError> {
        self.pool
            .writer
            .with_conn(|conn| migrations::run_migrations(conn))
    }

    fn with_reader<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, StoreError>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl engram_core::Store for StoreEngine {
    fn insert(&self, memory: &Memory) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::insert(conn, memory, self.entity_shared_cap))?;
        Ok(())
    }

    fn update_embedding(&self, id: &str, vector: &[f32]) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::update_embedding(conn, id, vector))?;
        Ok(())
    }

    fn mark_embedding_failed(&self, id: &str) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::mark_embedding_failed(conn, id))?;
        Ok(())
    }

    fn reinforce(&self, id: &str) -> engram_core::EngramResult<()> {
        self.pool.writer.with_conn(|conn| {
            queries::memory_crud::reinforce(
                conn,
                id,
                engram_core::constants::DEFAULT_REINFORCE_STEP,
                Utc::now(),
            )
        })?;
        Ok(())
    }

    fn decay_salience(&self, id: &str, step: f64) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::decay_salience(conn, id, step))?;
        Ok(())
    }

    fn supersede(&self, old_id: &str, new_id: &str, at: DateTime<Utc>) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::supersede(conn, old_id, new_id, at))?;
        Ok(())
    }

    fn forget(&self, id: &str, hard: bool) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::forget(conn, id, hard))?;
        Ok(())
    }

    fn stamp(&self, id: &str, when: DateTime<Utc>) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::memory_crud::stamp(conn, id, when))?;
        Ok(())
    }

    fn vector_search(&self, query_vec: &[f32], k: usize) -> engram_core::EngramResult<Vec<(String, f64)>> {
        Ok(self.with_reader(|conn| queries::vector_search::vector_search(conn, query_vec, k))?)
    }

    fn entity_seed(&self, entities: &[String], k: usize) -> engram_core::EngramResult<Vec<String>> {
        Ok(self.with_reader(|conn| queries::memory_crud::entity_seed(conn, entities, k))?)
    }

    fn topic_seed(&self, topics: &[String], k: usize) -> engram_core::EngramResult<Vec<String>> {
        Ok(self.with_reader(|conn| queries::memory_crud::topic_seed(conn, topics, k))?)
    }

    fn latest_in_session(
        &self,
        session_id: &str,
        exclude_id: &str,
    ) -> engram_core::EngramResult<Option<String>> {
        Ok(self.with_reader(|conn| queries::memory_crud::latest_in_session(conn, session_id, exclude_id))?)
    }

    fn by_status(&self, status: MemoryStatus, k: usize) -> engram_core::EngramResult<Vec<Memory>> {
        Ok(self.with_reader(|conn| queries::memory_crud::by_status(conn, status, k))?)
    }

    fn neighbors(
        &self,
        id: &str,
        depth: usize,
        kinds: Option<&[EdgeKind]>,
    ) -> engram_core::EngramResult<Vec<NeighborHit>> {
        Ok(self.with_reader(|conn| {
            queries::neighbors::neighbors(conn, id, depth, kinds, self.neighbor_edge_budget)
        })?)
    }

    fn get_by_ids(&self, ids: &[String]) -> engram_core::EngramResult<Vec<Memory>> {
        Ok(self.with_reader(|conn| queries::memory_crud::get_by_ids(conn, ids))?)
    }

    fn get(&self, id: &str) -> engram_core::EngramResult<Option<Memory>> {
        Ok(self.with_reader(|conn| queries::memory_crud::get(conn, id))?)
    }

    fn edges_for(&self, id: &str, kinds: Option<&[EdgeKind]>) -> engram_core::EngramResult<Vec<Edge>> {
        Ok(self.with_reader(|conn| queries::edge_ops::edges_for(conn, id, kinds))?)
    }

    fn all_edges(&self) -> engram_core::EngramResult<Vec<Edge>> {
        Ok(self.with_reader(queries::edge_ops::all_edges)?)
    }

    fn add_edge(&self, edge: &Edge) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::edge_ops::add_edge(conn, edge))?;
        Ok(())
    }

    fn remove_edge(&self, src_id: &str, dst_id: &str, kind: EdgeKind) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::edge_ops::remove_edge(conn, src_id, dst_id, kind))?;
        Ok(())
    }

    fn list_entities(&self, k: usize) -> engram_core::EngramResult<Vec<Entity>> {
        Ok(self.with_reader(|conn| queries::entity_ops::list_entities(conn, k))?)
    }

    fn merge_entity_alias(&self, alias: &str, canonical: &str, at: DateTime<Utc>) -> engram_core::EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::entity_ops::merge_entity_alias(conn, alias, canonical, at))?;
        Ok(())
    }
}
