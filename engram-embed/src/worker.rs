//! Background batching worker: drains the queue, calls the embedder with
//! retry/backoff, and writes results back through `Store`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use engram_core::{EngramError, Embedder, Store};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::EmbedQueueConfig;

pub(crate) enum Command {
    Enqueue(String, String),
}

fn is_transient(err: &EngramError) -> bool {
    matches!(
        err,
        EngramError::Unavailable { .. } | EngramError::RateLimited { .. } | EngramError::TimedOut { .. }
    )
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1).min(16));
    base.saturating_mul(factor)
}

pub(crate) async fn run(
    mut receiver: UnboundedReceiver<Command>,
    store: Arc<dyn Store>,
    embedder: Arc<dyn Embedder>,
    config: EmbedQueueConfig,
    pending: Arc<AtomicUsize>,
    drain_notify: Arc<Notify>,
    cancel: CancellationToken,
) {
    let mut batch: Vec<(String, String)> = Vec::new();

    loop {
        if batch.is_empty() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                cmd = receiver.recv() => match cmd {
                    Some(Command::Enqueue(id, content)) => batch.push((id, content)),
                    None => break,
                },
            }
        }

        let deadline = Instant::now() + config.batch_age;
        while batch.len() < config.batch_size {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(remaining) => break,
                cmd = receiver.recv() => match cmd {
                    Some(Command::Enqueue(id, content)) => batch.push((id, content)),
                    None => break,
                },
            }
        }

        if !batch.is_empty() {
            process_batch(&mut batch, &store, &embedder, &config, &pending, &drain_notify).await;
        }

        if cancel.is_cancelled() {
            break;
        }
    }
}

async fn process_batch(
    batch: &mut Vec<(String, String)>,
    store: &Arc<dyn Store>,
    embedder: &Arc<dyn Embedder>,
    config: &EmbedQueueConfig,
    pending: &Arc<AtomicUsize>,
    drain_notify: &Arc<Notify>,
) {
    let ids: Vec<String> = batch.iter().map(|(id, _)| id.clone()).collect();
    let texts: Vec<String> = batch.iter().map(|(_, content)| content.clone()).collect();
    let expected_dims = embedder.dimensions();

    let mut attempt = 0u32;
    let outcome: Result<Vec<Vec<f32>>, EngramError> = loop {
        let embedder = Arc::clone(embedder);
        let texts = texts.clone();
        let call = tokio::task::spawn_blocking(move || embedder.embed_batch(&texts)).await;
        match call {
            Ok(Ok(vectors)) => {
                let malformed = vectors.len() != ids.len()
                    || vectors.iter().any(|v| v.len() != expected_dims);
                if malformed {
                    break Err(EngramError::InvalidPayload {
                        reason: "embedder returned malformed batch output".to_string(),
                    });
                }
                break Ok(vectors);
            }
            Ok(Err(err)) => {
                if attempt >= config.max_retries || !is_transient(&err) {
                    break Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(config.backoff_base, attempt);
                tracing::warn!(attempt, error = %err, "embed batch failed, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(join_err) => {
                tracing::error!(error = %join_err, "embed worker task panicked");
                break Err(EngramError::Unavailable {
                    reason: "embed worker task panicked".to_string(),
                });
            }
        }
    };

    match outcome {
        Ok(vectors) => {
            for (id, vector) in ids.iter().zip(vectors) {
                if let Err(err) = store.update_embedding(id, &vector) {
                    tracing::error!(id = %id, error = %err, "failed to persist embedding");
                }
            }
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                batch_size = ids.len(),
                "embed batch permanently failed, marking embedding-failed"
            );
            for id in &ids {
                if let Err(err) = store.mark_embedding_failed(id) {
                    tracing::error!(id = %id, error = %err, "failed to mark embedding-failed");
                }
            }
        }
    }

    pending.fetch_sub(ids.len(), Ordering::SeqCst);
    if pending.load(Ordering::SeqCst) == 0 {
        drain_notify.notify_waiters();
    }
    batch.clear();
}
