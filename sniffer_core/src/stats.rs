//! Session counters shared by the detection and ingestion loops.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SessionStats {
    pub(crate) ticks: AtomicU64,
    pub(crate) skipped: AtomicU64,
    pub(crate) rejected_geometry: AtomicU64,
    pub(crate) positions: AtomicU64,
    pub(crate) warnings_entered: AtomicU64,
    pub(crate) samples_applied: AtomicU64,
    pub(crate) samples_malformed: AtomicU64,
}

/// Point-in-time copy of [`SessionStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ticks: u64,
    /// Ticks skipped because no signal was available yet.
    pub skipped: u64,
    pub rejected_geometry: u64,
    pub positions: u64,
    pub warnings_entered: u64,
    pub samples_applied: u64,
    pub samples_malformed: u64,
}

#[inline]
pub(crate) fn bump(c: &AtomicU64) {
    c.fetch_add(1, Ordering::Relaxed);
}

impl SessionStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        let g = |c: &AtomicU64| c.load(Ordering::Relaxed);
        StatsSnapshot {
            ticks: g(&self.ticks),
            skipped: g(&self.skipped),
            rejected_geometry: g(&self.rejected_geometry),
            positions: g(&self.positions),
            warnings_entered: g(&self.warnings_entered),
            samples_applied: g(&self.samples_applied),
            samples_malformed: g(&self.samples_malformed),
        }
    }
}
