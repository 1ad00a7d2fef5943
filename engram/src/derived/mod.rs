//! Derived vault operations (spec §4.7), composed from the lower
//! subsystems rather than folded into `Vault` itself — one function per
//! file, mirroring `engram-lifecycle`'s `archive`/`decay`/`gc`/`validate`
//! shape.

pub mod alerts;
pub mod ask;
pub mod briefing;
pub mod contradictions;
pub mod export;
pub mod stats;
pub mod surface;

pub use alerts::{Alert, AlertKind};
pub use ask::AskResponse;
pub use briefing::{Briefing, EntityBrief};
pub use contradictions::ContradictionRecord;
pub use export::VaultExport;
pub use stats::VaultStats;
pub use surface::SurfaceHit;
