//! # engram-core
//!
//! Foundation crate for the Engram memory vault engine.
//! Defines the `Memory`/`Entity`/`Edge` data model, the error
//! taxonomy, vault configuration, and the injected-provider traits.
//! Every other crate in the workspace depends on this one.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod traits;

pub use config::VaultConfig;
pub use errors::{EngramError, EngramResult};
pub use memory::{Edge, EdgeKind, Entity, Memory, MemoryStatus, MemoryType, Salience, Source};
pub use traits::{CompletionOptions, Embedder, Llm, NeighborHit, Store, VectorIndex};
