//! # engram-test-support
//!
//! Dependency-free fakes for the injected-provider traits (spec §6.5),
//! shared by every crate's test suite: `FakeEmbedder`, `FakeLlm`,
//! `InMemoryVectorIndex`.

mod embedder;
mod llm;
mod vector_index;

pub use embedder::FakeEmbedder;
pub use llm::FakeLlm;
pub use vector_index::InMemoryVectorIndex;
