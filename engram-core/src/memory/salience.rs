use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence-weighted importance, clamped to `[0.0, 1.0]`.
///
/// Converges upward under reinforcement, downward under decay (spec §3).
/// Not a probability — a scoring/decay weight.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Salience(f64);

impl Salience {
    /// Baseline salience assigned by auto-extraction absent other signals.
    pub const BASELINE: f64 = 0.5;
    /// Below this, a memory is a candidate for archival (spec §4.8, §6.4).
    pub const ARCHIVAL: f64 = 0.08;

    /// Create a new `Salience`, clamping to `[0.0, 1.0]`.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_archival_candidate(self) -> bool {
        self.0 < Self::ARCHIVAL
    }

    /// Raise salience by a log-decaying increment (spec §4.1 `reinforce`):
    /// the same absolute bump produces diminishing returns as salience
    /// approaches 1.0, via a multiplicative headroom factor.
    pub fn reinforce(self, step: f64) -> Self {
        let headroom = 1.0 - self.0;
        Self::new(self.0 + step * headroom)
    }

    /// Apply a multiplicative decay factor, clamped to `[0.0, 1.0]`.
    pub fn decay(self, factor: f64) -> Self {
        Self::new(self.0 * factor)
    }
}

impl Default for Salience {
    fn default() -> Self {
        Self(Self::BASELINE)
    }
}

impl fmt::Display for Salience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Salience {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Salience> for f64 {
    fn from(s: Salience) -> Self {
        s.0
    }
}
