//! # engram-consolidate
//!
//! Periodic consolidation subsystem (spec §4.6): clusters similar active
//! episodic memories, synthesizes consolidated summaries, resolves
//! contradictions via supersession, and refines the entity graph. Never
//! deletes or mutates constituent memories — consolidated summaries link
//! to them via `elaborates` edges, and contradiction resolution always
//! goes through `Store::supersede` rather than `forget`.

mod engine;
mod pipeline;

pub use engine::ConsolidationEngine;
pub use pipeline::{phase1_selection, phase2_clustering, phase3_synthesis, phase4_contradiction, phase5_entity_refine};
pub use pipeline::{run_pipeline, ConsolidationReport};
