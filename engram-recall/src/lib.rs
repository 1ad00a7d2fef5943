//! # engram-recall
//!
//! The recall pipeline (spec §4.5): query understanding, seed gathering,
//! RRF fusion, optional spreading activation, multi-factor scoring,
//! temporal dedup, and truncation/stamping.

mod dedup;
mod engine;
mod fusion;
mod query;
mod scoring;
mod seed;
mod spread;

pub use engine::{RecallEngine, RecallHit};
pub use query::{understand, AggregationRoute, RecallQuery, Understanding};
pub use scoring::ScoredCandidate;
