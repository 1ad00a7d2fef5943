/// Engram crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default in-neighborhood cap for `entity-shared` edge synthesis on insert
/// (spec §4.1 — "constrained to a configurable in-neighborhood cap").
pub const DEFAULT_ENTITY_SHARED_CAP: usize = 16;

/// Default bounded-BFS edge-visit budget for `neighbors()` (spec §4.1).
pub const DEFAULT_NEIGHBOR_EDGE_BUDGET: usize = 4_000;

/// Default spreading-activation hop decay `d` (spec §4.4).
pub const DEFAULT_SPREAD_DECAY: f64 = 0.6;

/// Default spreading-activation max hops (spec §4.4).
pub const DEFAULT_SPREAD_MAX_HOPS: usize = 2;

/// Default spreading-activation node-visit budget (spec §4.4).
pub const DEFAULT_SPREAD_NODE_BUDGET: usize = 4_000;

/// Default seed expansion factor: seed phase draws up to `limit * this` candidates.
pub const DEFAULT_SEED_EXPANSION_FACTOR: usize = 4;

/// Default recency-kernel half-life, in days (spec §4.5.4).
pub const DEFAULT_RECENCY_HALF_LIFE_DAYS: f64 = 30.0;

/// Default staleness-penalty half-life, in days (spec §4.5.4).
pub const DEFAULT_AGE_PENALTY_HALF_LIFE_DAYS: f64 = 180.0;

/// Default consolidation cosine-similarity merge threshold (spec §4.6).
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.85;

/// Default consolidation wall-clock budget, in milliseconds (spec §4.6).
pub const DEFAULT_CONSOLIDATION_BUDGET_MS: u64 = 30_000;

/// Default archival threshold for salience (spec §4.8, §6.4).
pub const DEFAULT_ARCHIVE_THRESHOLD: f64 = 0.08;

/// Default decay window, in days: memories not accessed within this many
/// days of a sweep are decayed (spec §4.6 step 5, §4.8).
pub const DEFAULT_DECAY_WINDOW_DAYS: i64 = 14;

/// Default amount subtracted from salience for memories outside the
/// decay window, clamped at 0 (spec §4.6 step 5, §4.8).
pub const DEFAULT_DECAY_STEP: f64 = 0.1;

/// Default cosine-similarity threshold over normalized entity surface
/// forms for alias-merge candidacy (spec §4.6 step 4).
pub const DEFAULT_ENTITY_ALIAS_SIMILARITY: f64 = 0.82;

/// Default minimum cross-memory co-occurrence count before two entity
/// surface forms are folded into one (spec §4.6 step 4).
pub const DEFAULT_ENTITY_ALIAS_MIN_COOCCURRENCE: u64 = 2;

/// Default step passed to `Salience::reinforce` on a `reinforce()` call
/// (spec §4.1, §4.5 scoring constants).
pub const DEFAULT_REINFORCE_STEP: f64 = 0.2;

/// Default embed-queue batch size: flush once this many rows are pending
/// (spec §4.3 "flush at N items or T milliseconds, whichever first").
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

/// Default embed-queue batch age, in milliseconds (spec §4.3).
pub const DEFAULT_EMBED_BATCH_AGE_MS: u64 = 200;

/// Default number of retries for a transiently-failing embed batch before
/// the rows are marked `embedding-failed` (spec §4.3).
pub const DEFAULT_EMBED_MAX_RETRIES: u32 = 4;

/// Default base delay for the embed queue's exponential backoff, in
/// milliseconds (spec §4.3).
pub const DEFAULT_EMBED_BACKOFF_BASE_MS: u64 = 100;
