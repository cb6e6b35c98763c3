//! Consecutive-count debounce for the collision decision.
//!
//! Same latch shape as an e-stop debounce: N consecutive "inside radius"
//! observations switch to `Warning`. The counter saturates upward and only
//! resets on an observation outside the radius while it is still below N,
//! so once `Warning` is reached it holds until the gate is reset.

use sniffer_traits::CollisionState;

/// Consecutive in-radius ticks needed to raise a warning.
pub const CONSECUTIVE_COUNTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct HysteresisGate {
    threshold: u32,
    count: u32,
}

impl Default for HysteresisGate {
    fn default() -> Self {
        Self::new()
    }
}

impl HysteresisGate {
    pub fn new() -> Self {
        Self::with_threshold(CONSECUTIVE_COUNTS)
    }

    /// Threshold is clamped to at least 1.
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            count: 0,
        }
    }

    /// Feed one predicted distance and return the debounced state. Only a
    /// distance strictly below the radius counts as inside.
    pub fn observe(&mut self, distance_m: f64, radius_m: f64) -> CollisionState {
        if distance_m < radius_m {
            self.count = self.count.saturating_add(1);
        } else if self.count < self.threshold {
            self.count = 0;
        }
        self.state()
    }

    pub fn state(&self) -> CollisionState {
        if self.count >= self.threshold {
            CollisionState::Warning
        } else {
            CollisionState::Safe
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
