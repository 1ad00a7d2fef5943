//! `Vault`: the facade composing the write path, recall pipeline, typed
//! edge graph, consolidation cycle, and lifecycle sweep into the public
//! surface described by spec §6.1.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use engram_core::config::VaultConfig;
use engram_core::{
    constants, Edge, EdgeKind, Embedder, EngramError, EngramResult, Entity, Llm, Memory, NeighborHit, Source, Store,
};
use engram_consolidate::{ConsolidationEngine, ConsolidationReport};
use engram_embed::{EmbedQueue, EmbedQueueConfig, EmbedQueueHandle};
use engram_extract::{CallerOverrides, Extractor};
use engram_graph::IndexedGraph;
use engram_lifecycle::LifecycleSweep;
use engram_recall::{RecallEngine, RecallHit};
use engram_store::StoreEngine;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::derived::{self, Alert, AskResponse, Briefing, ContradictionRecord, SurfaceHit, VaultExport, VaultStats};
use crate::open_registry;
use crate::options::{NeighborOptions, RecallOptions, RememberOptions, SurfaceOptions};

/// A path of exactly this string opens an in-memory store instead of a
/// file, bypassing the same-process open guard (spec §5 only forbids
/// opening one *file* twice; in-memory vaults are test-only and disposable).
const IN_MEMORY_PATH: &str = ":memory:";

/// Bound on the known-entities scan `remember` uses to decide whether an
/// extracted entity is already established (spec §4.2 salience inference).
const KNOWN_ENTITIES_SCAN_LIMIT: usize = 10_000;

const ENTITIES_SCAN_LIMIT: usize = 50_000;

/// Soft wall-clock budget for recall/ask/briefing/surface (spec §5):
/// in-flight work is abandoned and `TimedOut` returned past this point,
/// same mechanism `consolidate` uses with its own `budgetMs`.
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 30_000;

pub struct Vault {
    store: Arc<dyn Store>,
    graph: Arc<Mutex<IndexedGraph>>,
    extractor: Extractor,
    embedder: Option<Arc<dyn Embedder>>,
    llm: Option<Arc<dyn Llm>>,
    recall: Arc<RecallEngine>,
    consolidation: Arc<ConsolidationEngine>,
    embed_queue: Option<EmbedQueueHandle>,
    lifecycle_sweep_cancel: CancellationToken,
    lifecycle_sweep_handle: Option<JoinHandle<()>>,
    config: VaultConfig,
    registry_key: Option<String>,
    closed: AtomicBool,
}

impl Vault {
    /// Opens the vault named by `config.db_path` (or an in-memory store for
    /// `":memory:"`), rebuilds the in-memory graph view, and starts the
    /// background embed queue and lifecycle sweep. Opening the same file
    /// twice in one process is rejected (spec §5); a second OS process
    /// doing so is caught by `rusqlite`'s own file locking instead.
    pub async fn open(
        config: VaultConfig,
        embedder: Option<Arc<dyn Embedder>>,
        llm: Option<Arc<dyn Llm>>,
    ) -> EngramResult<Self> {
        let registry_key = (config.db_path != IN_MEMORY_PATH).then(|| config.db_path.clone());
        if let Some(key) = &registry_key {
            if !open_registry::claim(key) {
                return Err(EngramError::Unavailable {
                    reason: format!("vault file '{key}' is already open in this process"),
                });
            }
        }

        match Self::open_inner(&config, embedder, llm).await {
            Ok(vault) => Ok(vault),
            Err(err) => {
                if let Some(key) = &registry_key {
                    open_registry::release(key);
                }
                Err(err)
            }
        }
    }

    async fn open_inner(
        config: &VaultConfig,
        embedder: Option<Arc<dyn Embedder>>,
        llm: Option<Arc<dyn Llm>>,
    ) -> EngramResult<Self> {
        let registry_key = (config.db_path != IN_MEMORY_PATH).then(|| config.db_path.clone());
        let config = config.clone();

        let store: Arc<dyn Store> = if config.db_path == IN_MEMORY_PATH {
            Arc::new(StoreEngine::open_in_memory().map_err(EngramError::from)?)
        } else {
            Arc::new(StoreEngine::open(Path::new(&config.db_path)).map_err(EngramError::from)?)
        };

        let graph = IndexedGraph::rebuild_from_storage(store.as_ref())?;
        let graph = Arc::new(Mutex::new(graph));

        let extractor = Extractor::new(llm.clone());
        let recall = Arc::new(RecallEngine::new(
            Arc::clone(&store),
            embedder.clone(),
            config.recall.clone(),
            config.extract.aggregation_phrases.clone(),
        ));
        let consolidation = Arc::new(ConsolidationEngine::new(
            Arc::clone(&store),
            embedder.clone(),
            llm.clone(),
            config.consolidation.clone(),
            config.lifecycle.clone(),
        ));

        let embed_queue = embedder
            .clone()
            .map(|e| EmbedQueue::spawn(Arc::clone(&store), e, EmbedQueueConfig::default()));

        let lifecycle_sweep_cancel = CancellationToken::new();
        let lifecycle_sweep_handle = Some(spawn_lifecycle_sweep(
            Arc::clone(&store),
            Arc::clone(&graph),
            config.lifecycle.clone(),
            lifecycle_sweep_cancel.clone(),
        ));

        Ok(Self {
            store,
            graph,
            extractor,
            embedder,
            llm,
            recall,
            consolidation,
            embed_queue,
            lifecycle_sweep_cancel,
            lifecycle_sweep_handle,
            config,
            registry_key,
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> EngramResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EngramError::Unavailable { reason: "vault is closed".to_string() });
        }
        Ok(())
    }

    /// Extracts structure from `content`, commits it, chains a
    /// `temporal-next` edge if it continues a conversation session, and
    /// enqueues it for background embedding. Returns the new memory's id.
    pub async fn remember(&self, content: impl Into<String>, options: RememberOptions) -> EngramResult<String> {
        self.ensure_open()?;
        let content = content.into();
        if content.trim().is_empty() {
            return Err(EngramError::InvalidPayload { reason: "content must not be empty".to_string() });
        }

        let known_entities: BTreeSet<String> = self
            .store
            .list_entities(KNOWN_ENTITIES_SCAN_LIMIT)?
            .into_iter()
            .map(|e| e.name)
            .collect();

        let overrides = CallerOverrides {
            entities: options.entities,
            topics: options.topics,
            salience: options.salience,
            status: options.status,
            memory_type: options.memory_type,
        };
        let extracted = self.extractor.extract(&content, &known_entities, overrides);

        let now = Utc::now();
        let valid_from = options.valid_from.unwrap_or(now);
        let memory = Memory {
            id: Uuid::new_v4().to_string(),
            content_hash: Memory::compute_content_hash(&content),
            content,
            memory_type: extracted.memory_type,
            status: extracted.status,
            salience: extracted.salience,
            entities: extracted.entities,
            topics: extracted.topics,
            source: options.source.unwrap_or(Source::System { reference: None }),
            created_at: now,
            valid_from,
            valid_until: None,
            last_accessed_at: valid_from,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: extracted.needs_review,
            superseded_by: None,
        };

        self.store.insert(&memory)?;
        {
            let mut graph = self.graph.lock().expect("graph lock poisoned");
            // `insert` writes `entity-shared` edges directly in the same
            // transaction (spec §4.1), bypassing `persist_edge` — pull them
            // into the in-memory view here so spreading activation sees
            // them without a full rebuild.
            for edge in self.store.edges_for(&memory.id, Some(&[EdgeKind::EntityShared]))? {
                graph.upsert_edge(edge);
            }
            engram_graph::synthesize_temporal_next(self.store.as_ref(), &mut graph, &memory)?;
        }
        if let Some(handle) = &self.embed_queue {
            handle.queue.enqueue(memory.id.clone(), memory.content.clone());
        }
        Ok(memory.id)
    }

    /// Runs the full recall pipeline: seed → RRF fusion → spreading
    /// activation → scoring → temporal dedup (spec §4.5).
    pub async fn recall(&self, options: RecallOptions) -> EngramResult<Vec<RecallHit>> {
        self.ensure_open()?;
        let query = options.into_query();
        let engine = Arc::clone(&self.recall);
        let graph = Arc::clone(&self.graph);
        run_cancellable(Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS), move |token| {
            let graph = graph.lock().expect("graph lock poisoned");
            engine.recall(&query, &graph, Some(&token))
        })
        .await
    }

    /// Recall plus LLM synthesis with source attribution; every citation
    /// names a memory actually present in the recall result (spec §4.7).
    pub async fn ask(&self, question: impl Into<String>, limit: Option<usize>) -> EngramResult<AskResponse> {
        self.ensure_open()?;
        let question = question.into();
        let mut options = RecallOptions::new(question.clone());
        options.limit = limit.unwrap_or(options.limit);
        let hits = self.recall(options).await?;
        let llm = self.llm.clone();
        Ok(derived::ask::run(llm.as_deref(), &question, hits))
    }

    /// Structured briefing: top entities by recency-weighted mention
    /// count, outstanding pending commitments, and recall highlights for
    /// `context` (spec §4.7).
    pub async fn briefing(&self, context: Option<String>, limit: Option<usize>) -> EngramResult<Briefing> {
        self.ensure_open()?;
        let limit = limit.unwrap_or(5);
        let context = context.unwrap_or_else(|| "recent activity".to_string());
        let mut options = RecallOptions::new(context);
        options.limit = limit;
        let highlights = self.recall(options).await?;
        derived::briefing::run(self.store.as_ref(), highlights, limit, self.config.recall.recency_half_life_days)
    }

    /// Proactive surfacing: a recall pass over `options.context` rescored
    /// with a novelty bias so idle-but-relevant memories compete with
    /// just-accessed ones (spec §4.7).
    pub async fn surface(&self, options: SurfaceOptions) -> EngramResult<Vec<SurfaceHit>> {
        self.ensure_open()?;
        let mut recall_options = RecallOptions::new(options.context);
        recall_options.entities = options.active_entities;
        recall_options.topics = options.active_topics;
        recall_options.limit = options.limit;
        recall_options.spread = true;
        let hits = self.recall(recall_options).await?;
        Ok(derived::surface::run(hits, options.limit))
    }

    /// Hard-removes the row, its edges, and its vector-index entry, or
    /// soft-archives it (spec §4.1).
    pub fn forget(&self, id: &str, hard: bool) -> EngramResult<()> {
        self.ensure_open()?;
        let edges = if hard { self.store.edges_for(id, None)? } else { Vec::new() };
        self.store.forget(id, hard)?;
        if hard {
            let mut graph = self.graph.lock().expect("graph lock poisoned");
            for edge in edges {
                graph.remove_edge(&edge.src_id, &edge.dst_id, edge.kind);
            }
        }
        Ok(())
    }

    /// Adds a typed edge between two memories, persisted through the store
    /// and mirrored into the in-memory graph in one call (spec §4.4).
    pub fn connect(&self, src_id: &str, dst_id: &str, kind: EdgeKind, weight: Option<f64>) -> EngramResult<()> {
        self.ensure_open()?;
        let edge = Edge::new(src_id, dst_id, kind, weight.unwrap_or(1.0), Utc::now());
        let mut graph = self.graph.lock().expect("graph lock poisoned");
        engram_graph::persist_edge(self.store.as_ref(), &mut graph, edge)
    }

    /// Bounded BFS over the in-memory graph from `id` (spec §4.1 `neighbors`).
    pub fn neighbors(&self, id: &str, options: NeighborOptions) -> EngramResult<Vec<NeighborHit>> {
        self.ensure_open()?;
        let graph = self.graph.lock().expect("graph lock poisoned");
        Ok(engram_graph::neighbors(
            &graph,
            id,
            options.depth,
            options.kinds.as_deref(),
            constants::DEFAULT_NEIGHBOR_EDGE_BUDGET,
        ))
    }

    /// Runs one consolidation pass (spec §4.6): clustering, synthesis,
    /// contradiction resolution, entity refinement, then a decay sweep.
    /// `budget_ms` overrides the engine's configured wall-clock budget for
    /// this call only, approximated as the outer abandon-on-timeout bound
    /// since the pipeline itself only reads its baked-in config.
    pub async fn consolidate(&self, budget_ms: Option<u64>) -> EngramResult<ConsolidationReport> {
        self.ensure_open()?;
        let timeout = Duration::from_millis(budget_ms.unwrap_or(self.config.consolidation.budget_ms));
        let engine = Arc::clone(&self.consolidation);
        let graph = Arc::clone(&self.graph);
        run_cancellable(timeout, move |token| {
            let mut graph = graph.lock().expect("graph lock poisoned");
            engine.consolidate(&mut graph, Some(&token))
        })
        .await
    }

    /// Still-open user-asserted contradictions (spec §4.7).
    pub fn contradictions(&self, limit: usize) -> EngramResult<Vec<ContradictionRecord>> {
        derived::contradictions::run(self.store.as_ref(), limit)
    }

    /// Memories needing review, overdue pending commitments, and open
    /// contradictions (spec §4.7).
    pub fn alerts(&self, limit: usize) -> EngramResult<Vec<Alert>> {
        derived::alerts::run(self.store.as_ref(), limit)
    }

    /// Entities ordered by descending mention count (spec §4.7).
    pub fn entities(&self) -> EngramResult<Vec<Entity>> {
        self.store.list_entities(ENTITIES_SCAN_LIMIT)
    }

    /// Vault-wide aggregate counts (spec §4.7).
    pub fn stats(&self) -> EngramResult<VaultStats> {
        derived::stats::run(self.store.as_ref())
    }

    /// Full dump of every memory, edge, and entity (spec §4.7).
    pub fn export(&self) -> EngramResult<VaultExport> {
        derived::export::run(self.store.as_ref())
    }

    /// Awaits drain of every write enqueued for embedding before this call
    /// (spec §4.3, §5).
    pub async fn flush(&self) -> EngramResult<()> {
        self.ensure_open()?;
        if let Some(handle) = &self.embed_queue {
            handle.queue.flush().await?;
        }
        Ok(())
    }

    /// Stops the background embed queue and lifecycle sweep and releases
    /// the same-process open guard. Idempotent (spec §3 "open()/close()
    /// must be idempotent").
    pub fn close(&self) -> EngramResult<()> {
        self.teardown();
        Ok(())
    }

    fn teardown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.lifecycle_sweep_cancel.cancel();
        if let Some(handle) = &self.embed_queue {
            handle.queue.cancel();
        }
        if let Some(key) = &self.registry_key {
            open_registry::release(key);
        }
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn spawn_lifecycle_sweep(
    store: Arc<dyn Store>,
    graph: Arc<Mutex<IndexedGraph>>,
    config: engram_core::config::LifecycleConfig,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(config.sweep_interval_secs.max(1));
    tokio::spawn(async move {
        let sweep = LifecycleSweep::new(store, config);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            let mut g = graph.lock().expect("graph lock poisoned");
            if let Err(err) = sweep.run(&mut g) {
                tracing::warn!(error = %err, "background lifecycle sweep failed");
            }
        }
    })
}

/// Runs `work` on a blocking thread, racing it against `timeout`. On
/// timeout, cancels the token passed to `work` (so the suspension-point
/// checks inside recall/consolidate can unwind) and returns `TimedOut`
/// without waiting for the abandoned task to finish (spec §5).
async fn run_cancellable<F, T>(timeout: Duration, work: F) -> EngramResult<T>
where
    F: FnOnce(CancellationToken) -> EngramResult<T> + Send + 'static,
    T: Send + 'static,
{
    let token = CancellationToken::new();
    let worker_token = token.clone();
    let handle = tokio::task::spawn_blocking(move || work(worker_token));

    tokio::select! {
        joined = handle => match joined {
            Ok(result) => result,
            Err(_) => Err(EngramError::Unavailable { reason: "worker task panicked".to_string() }),
        },
        _ = tokio::time::sleep(timeout) => {
            token.cancel();
            Err(EngramError::TimedOut { elapsed_ms: timeout.as_millis() as u64 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_support::{FakeEmbedder, FakeLlm};

    fn in_memory_config() -> VaultConfig {
        let mut config = VaultConfig::default();
        config.db_path = IN_MEMORY_PATH.to_string();
        config
    }

    #[tokio::test]
    async fn remember_then_recall_round_trips() {
        let vault = Vault::open(in_memory_config(), None, None).await.unwrap();
        let id = vault
            .remember("Alex promised to send the Acme Corp proposal", RememberOptions::new())
            .await
            .unwrap();

        let mut options = RecallOptions::new("what did Alex promise about Acme Corp");
        options.entities = Some(vec!["Alex".to_string()]);
        let hits = vault.recall(options).await.unwrap();
        assert!(hits.iter().any(|h| h.memory.id == id));
    }

    #[tokio::test]
    async fn remember_rejects_empty_content() {
        let vault = Vault::open(in_memory_config(), None, None).await.unwrap();
        let err = vault.remember("   ", RememberOptions::new()).await.unwrap_err();
        assert!(matches!(err, EngramError::InvalidPayload { .. }));
    }

    #[tokio::test]
    async fn forget_hard_removes_edges_from_the_graph() {
        let vault = Vault::open(in_memory_config(), None, None).await.unwrap();
        let a = vault.remember("first note", RememberOptions::new()).await.unwrap();
        let b = vault.remember("second note", RememberOptions::new()).await.unwrap();
        vault.connect(&a, &b, EdgeKind::Supports, None).unwrap();
        assert_eq!(vault.neighbors(&a, NeighborOptions::new()).unwrap().len(), 1);

        vault.forget(&a, true).unwrap();
        assert!(vault.neighbors(&a, NeighborOptions::new()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn opening_the_same_file_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let mut config = VaultConfig::default();
        config.db_path = path.to_string_lossy().to_string();

        let first = Vault::open(config.clone(), None, None).await.unwrap();
        let second = Vault::open(config, None, None).await;
        assert!(second.is_err());
        drop(first);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let vault = Vault::open(in_memory_config(), None, None).await.unwrap();
        vault.close().unwrap();
        vault.close().unwrap();
    }

    #[tokio::test]
    async fn ask_cites_only_returned_memories() {
        let vault = Vault::open(in_memory_config(), Some(Arc::new(FakeEmbedder::new(16))), Some(Arc::new(FakeLlm::new())))
            .await
            .unwrap();
        vault
            .remember("Acme Corp renewed the annual contract", RememberOptions::new())
            .await
            .unwrap();
        vault.flush().await.unwrap();

        let response = vault.ask("what happened with Acme Corp", None).await.unwrap();
        for citation in &response.citations {
            assert!(vault.store.get(citation).unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn consolidate_on_empty_vault_is_a_no_op() {
        let vault = Vault::open(in_memory_config(), None, None).await.unwrap();
        let report = vault.consolidate(None).await.unwrap();
        assert!(report.consolidated_ids.is_empty());
    }
}
