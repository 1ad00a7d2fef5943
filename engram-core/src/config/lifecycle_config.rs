use serde::{Deserialize, Serialize};

use crate::constants;

/// Decay/archival subsystem configuration (spec §4.8, §6.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Salience threshold below which active memories become archival
    /// candidates.
    pub archive_threshold: f64,
    /// A memory not accessed within this many days, and below
    /// `archive_threshold`, is archived on sweep.
    pub archive_after_days: i64,
    /// A memory not accessed within this many days is decayed on sweep.
    pub decay_window_days: i64,
    /// Amount subtracted from salience outside the window, clamped at 0.
    pub decay_step: f64,
    /// Interval between background decay sweeps, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            archive_threshold: constants::DEFAULT_ARCHIVE_THRESHOLD,
            archive_after_days: constants::DEFAULT_DECAY_WINDOW_DAYS * 2,
            decay_window_days: constants::DEFAULT_DECAY_WINDOW_DAYS,
            decay_step: constants::DEFAULT_DECAY_STEP,
            sweep_interval_secs: 3600,
        }
    }
}
