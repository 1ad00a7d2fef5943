//! `EmbedQueue` — the producer/consumer boundary between `remember` and
//! the embedder adapter's background worker (spec §4.3, §9).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use engram_core::{EngramError, EngramResult, Embedder, Store};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::EmbedQueueConfig;
use crate::worker::{self, Command};

/// Owns the channel producers send into; a background task owns the
/// receiver. Cloning shares the same queue (cheap: an `Arc`-backed handle).
#[derive(Clone)]
pub struct EmbedQueue {
    sender: UnboundedSender<Command>,
    pending: Arc<AtomicUsize>,
    drain_notify: Arc<Notify>,
    cancel: CancellationToken,
}

pub struct EmbedQueueHandle {
    pub queue: EmbedQueue,
    pub worker: JoinHandle<()>,
}

impl EmbedQueue {
    /// Spawns the background batching worker and returns a handle to both
    /// the queue and the worker's `JoinHandle`.
    pub fn spawn(
        store: Arc<dyn Store>,
        embedder: Arc<dyn Embedder>,
        config: EmbedQueueConfig,
    ) -> EmbedQueueHandle {
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let drain_notify = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(worker::run(
            receiver,
            store,
            embedder,
            config,
            Arc::clone(&pending),
            Arc::clone(&drain_notify),
            cancel.clone(),
        ));

        EmbedQueueHandle {
            queue: Self {
                sender,
                pending,
                drain_notify,
                cancel,
            },
            worker,
        }
    }

    /// Enqueues `(id, content)` for embedding. Returns immediately — the
    /// caller's write has already committed. A no-op once cancellation has
    /// been requested: "new work is dropped" (spec §4.3).
    pub fn enqueue(&self, id: impl Into<String>, content: impl Into<String>) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self
            .sender
            .send(Command::Enqueue(id.into(), content.into()))
            .is_err()
        {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Awaits drain of every item enqueued before this call. Honors
    /// cancellation: if the queue is cancelled while waiting, returns
    /// `Cancelled` rather than hanging forever.
    pub async fn flush(&self) -> EngramResult<()> {
        loop {
            let notified = self.drain_notify.notified();
            if self.pending.load(Ordering::SeqCst) == 0 {
                return Ok(());
            }
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(EngramError::Cancelled),
                _ = notified => {}
            }
        }
    }

    /// Requests cancellation: the in-flight batch completes, no further
    /// batches are started, and subsequent `enqueue` calls are dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_store::StoreEngine;
    use engram_test_support::FakeEmbedder;

    fn seed_memory(store: &StoreEngine, id: &str, content: &str) {
        use chrono::Utc;
        use engram_core::{Memory, MemoryStatus, MemoryType, Salience, Source};
        use std::collections::BTreeSet;

        let now = Utc::now();
        let memory = Memory {
            id: id.to_string(),
            content: content.to_string(),
            memory_type: MemoryType::Episodic,
            status: MemoryStatus::Active,
            salience: Salience::default(),
            entities: BTreeSet::new(),
            topics: BTreeSet::new(),
            source: Source::System { reference: None },
            created_at: now,
            valid_from: now,
            valid_until: None,
            last_accessed_at: now,
            reinforcement_count: 0,
            embedding: None,
            embedding_failed: false,
            needs_review: false,
            superseded_by: None,
            content_hash: Memory::compute_content_hash(content),
        };
        engram_core::Store::insert(store, &memory).unwrap();
    }

    #[tokio::test]
    async fn flush_drains_a_single_item() {
        let engine = StoreEngine::open_in_memory().unwrap();
        seed_memory(&engine, "m1", "hello world");
        let store: Arc<dyn Store> = Arc::new(engine);
        let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder::new(8));

        let handle = EmbedQueue::spawn(Arc::clone(&store), embedder, EmbedQueueConfig::default());
        handle.queue.enqueue("m1", "hello world");
        handle.queue.flush().await.unwrap();

        let stored = store.get("m1").unwrap().unwrap();
        assert!(stored.embedding.is_some());
        assert_eq!(handle.queue.pending_count(), 0);
        handle.queue.cancel();
        let _ = handle.worker.await;
    }

    #[tokio::test]
    async fn permanent_failure_marks_embedding_failed() {
        let engine = StoreEngine::open_in_memory().unwrap();
        seed_memory(&engine, "m1", "hello world");
        let store: Arc<dyn Store> = Arc::new(engine);
        let fake = Arc::new(FakeEmbedder::new(8));
        fake.set_available(false);
        let embedder: Arc<dyn Embedder> = fake;

        let mut config = EmbedQueueConfig::default();
        config.max_retries = 0;
        let handle = EmbedQueue::spawn(Arc::clone(&store), embedder, config);
        handle.queue.enqueue("m1", "hello world");
        handle.queue.flush().await.unwrap();

        let stored = store.get("m1").unwrap().unwrap();
        assert!(stored.embedding.is_none());
        assert!(stored.embedding_failed);
        handle.queue.cancel();
        let _ = handle.worker.await;
    }

    #[tokio::test]
    async fn cancel_drops_subsequent_enqueues() {
        let engine = StoreEngine::open_in_memory().unwrap();
        let store: Arc<dyn Store> = Arc::new(engine);
        let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder::new(8));
        let handle = EmbedQueue::spawn(store, embedder, EmbedQueueConfig::default());
        handle.queue.cancel();
        handle.queue.enqueue("ghost", "never embedded");
        assert_eq!(handle.queue.pending_count(), 0);
        let _ = handle.worker.await;
    }
}
