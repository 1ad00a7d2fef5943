//! # engram
//!
//! Public facade for the Engram memory vault engine: a local-first,
//! bi-temporal long-term memory store for AI agents. `Vault` composes the
//! write path (`engram-extract`, `engram-embed`), the typed-edge graph
//! (`engram-graph`), the recall pipeline (`engram-recall`), the
//! consolidation cycle (`engram-consolidate`), and the lifecycle sweep
//! (`engram-lifecycle`) over a single embedded store (`engram-store`)
//! into the operations described by spec §6.1: `remember`, `recall`,
//! `ask`, `briefing`, `surface`, `forget`, `connect`, `neighbors`,
//! `consolidate`, `contradictions`, `alerts`, `entities`, `stats`,
//! `export`, `flush`, and `close`.

mod derived;
mod open_registry;
mod options;
mod vault;

pub use engram_core::{
    config::VaultConfig, CompletionOptions, Edge, EdgeKind, Embedder, EngramError, EngramResult, Entity, Llm, Memory,
    MemoryStatus, MemoryType, NeighborHit, Source,
};
pub use engram_recall::RecallHit;

pub use derived::{
    Alert, AlertKind, AskResponse, Briefing, ContradictionRecord, EntityBrief, SurfaceHit, VaultExport, VaultStats,
};
pub use options::{NeighborOptions, RecallOptions, RememberOptions, SurfaceOptions};
pub use vault::Vault;
