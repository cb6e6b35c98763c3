//! Common time/period helpers for sniffer_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Tick period as a `Duration`, clamped to at least 1 ms.
#[inline]
pub fn tick_period(tick_ms: u64) -> Duration {
    Duration::from_millis(tick_ms.max(1))
}

/// Number of ticks covering `horizon_s` seconds (real-valued, not rounded).
/// `tick_ms` is clamped to at least 1 to avoid division by zero.
#[inline]
pub fn ticks_in(horizon_s: f64, tick_ms: u64) -> f64 {
    horizon_s * MILLIS_PER_SEC as f64 / tick_ms.max(1) as f64
}
