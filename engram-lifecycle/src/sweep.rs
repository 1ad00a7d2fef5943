//! `LifecycleSweep`: the standalone periodic sweep (spec §4.8) — decay,
//! archival, dangling-edge GC, then invariant validation. Consolidation
//! (C6) can piggyback on the decay step alone via [`crate::decay::run`]
//! rather than running the full sweep.

use std::sync::Arc;

use chrono::Utc;
use engram_core::config::LifecycleConfig;
use engram_core::{EngramResult, Store};
use engram_graph::IndexedGraph;

use crate::archive::ArchivalSummary;
use crate::decay::DecaySummary;
use crate::gc::GcSummary;
use crate::validate::ValidationReport;

#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub decay: DecaySummary,
    pub archival: ArchivalSummary,
    pub gc: GcSummary,
    pub validation: ValidationReport,
}

pub struct LifecycleSweep {
    store: Arc<dyn Store>,
    config: LifecycleConfig,
}

impl LifecycleSweep {
    pub fn new(store: Arc<dyn Store>, config: LifecycleConfig) -> Self {
        Self { store, config }
    }

    /// Runs decay, archival, edge GC, and validation in sequence. `graph`
    /// is the caller-owned in-memory graph view, kept in sync with the
    /// edges GC drops.
    pub fn run(&self, graph: &mut IndexedGraph) -> EngramResult<SweepReport> {
        let now = Utc::now();
        let decay = crate::decay::run(self.store.as_ref(), &self.config, now)?;
        let archival = crate::archive::run(self.store.as_ref(), &self.config, now)?;
        let gc = crate::gc::run(self.store.as_ref(), graph)?;
        let validation = crate::validate::run(self.store.as_ref())?;
        Ok(SweepReport { decay, archival, gc, validation })
    }
}
