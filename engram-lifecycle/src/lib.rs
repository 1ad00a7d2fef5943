//! # engram-lifecycle
//!
//! Decay, archival, and dangling-edge GC subsystem (spec §4.8). Runs as a
//! standalone periodic sweep via [`LifecycleSweep`], or the decay pass
//! alone can piggyback on a consolidation run through [`decay::run`].

pub mod archive;
pub mod decay;
pub mod gc;
pub mod sweep;
pub mod validate;

pub use sweep::{LifecycleSweep, SweepReport};
