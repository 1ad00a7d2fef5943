//! # engram-embed
//!
//! Batched, cooperative pipeline between durable writes and vector-index
//! population (spec §4.3): an explicit `tokio::sync::mpsc` producer/consumer
//! channel between `remember` and a background batching worker, with
//! exponential backoff on transient provider failures and a drain barrier
//! for `flush()`.

mod config;
mod queue;
mod worker;

pub use config::EmbedQueueConfig;
pub use queue::{EmbedQueue, EmbedQueueHandle};
