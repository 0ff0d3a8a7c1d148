//! Per-pass statistics.

/// What one `process()` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Particles whose value was recomputed.
    pub filtered: usize,
    /// Particles that kept their previous value because the correction
    /// was ill-conditioned.
    pub fallbacks: usize,
}

impl FilterReport {
    /// Build a report.
    pub fn new(filtered: usize, fallbacks: usize) -> Self {
        Self {
            filtered,
            fallbacks,
        }
    }

    /// Total particles visited.
    pub fn visited(&self) -> usize {
        self.filtered + self.fallbacks
    }

    /// Fraction of visited particles that fell back, 0 for an empty pass.
    pub fn fallback_ratio(&self) -> f64 {
        match self.visited() {
            0 => 0.0,
            n => self.fallbacks as f64 / n as f64,
        }
    }
}
