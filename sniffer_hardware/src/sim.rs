//! Simulated range sources: a scripted approaching object and CSV replay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use sniffer_traits::Transport;
use sniffer_traits::clock::Clock;
use tracing::trace;

use crate::error::HwError;
use crate::payload::{copy_into, format_payload};

/// Straight-line motion of a single object in front of the sensor pair.
///
/// Frame: origin at the baseline midpoint, sensor 1 at `(0, +w/2)`, sensor 2
/// at `(0, -w/2)`, the monitored side at negative `x`. The object halts once
/// it reaches `stop_x_m`.
#[derive(Debug, Clone)]
pub struct SimScenario {
    pub start_m: (f64, f64),
    pub velocity_mps: (f64, f64),
    pub stop_x_m: f64,
    pub rate_hz: u32,
    pub baseline_m: f64,
    pub sensor1_offset_m: f64,
    pub sensor2_offset_m: f64,
}

impl Default for SimScenario {
    fn default() -> Self {
        Self {
            start_m: (-4.0, 0.1),
            velocity_mps: (2.0, 0.0),
            stop_x_m: -0.3,
            rate_hz: 20,
            baseline_m: 0.5,
            sensor1_offset_m: -0.15,
            sensor2_offset_m: -0.15,
        }
    }
}

impl SimScenario {
    fn halt_after_s(&self) -> Option<f64> {
        let vx = self.velocity_mps.0;
        if vx == 0.0 {
            return None;
        }
        let t = (self.stop_x_m - self.start_m.0) / vx;
        (t >= 0.0).then_some(t)
    }

    /// Object position `t_s` seconds after the scenario started.
    pub fn position_at(&self, t_s: f64) -> (f64, f64) {
        let t = self.halt_after_s().map_or(t_s, |h| t_s.min(h));
        (
            self.start_m.0 + self.velocity_mps.0 * t,
            self.start_m.1 + self.velocity_mps.1 * t,
        )
    }

    /// Raw sensor readings (centimeters, offsets applied) for a position.
    pub fn ranges_cm(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let half = self.baseline_m / 2.0;
        let r1 = x.hypot(y - half);
        let r2 = x.hypot(y + half);
        (
            (r1 + self.sensor1_offset_m) * 100.0,
            (r2 + self.sensor2_offset_m) * 100.0,
        )
    }

    pub fn period(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.rate_hz.max(1)))
    }
}

/// Transport that emits one payload per period for a [`SimScenario`].
pub struct SimulatedTransport<C: Clock> {
    scenario: SimScenario,
    clock: C,
    epoch: Instant,
    closed: Arc<AtomicBool>,
    emitted: u64,
}

impl<C: Clock> SimulatedTransport<C> {
    pub fn new(scenario: SimScenario, clock: C) -> Self {
        let epoch = clock.now();
        Self {
            scenario,
            clock,
            epoch,
            closed: Arc::new(AtomicBool::new(false)),
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl<C: Clock> Transport for SimulatedTransport<C> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(Box::new(HwError::Closed));
        }
        if self.emitted > 0 {
            self.clock.sleep(self.scenario.period());
            if self.closed.load(Ordering::Relaxed) {
                return Err(Box::new(HwError::Closed));
            }
        }
        let t = self.clock.secs_since(self.epoch);
        let pos = self.scenario.position_at(t);
        let (r1_cm, r2_cm) = self.scenario.ranges_cm(pos);
        self.emitted += 1;
        trace!(t, x = pos.0, y = pos.1, r1_cm, r2_cm, "sim reading");
        Ok(copy_into(buf, &format_payload(r1_cm, r2_cm)))
    }

    fn closer(&self) -> Option<Box<dyn Fn() + Send + Sync>> {
        let closed = self.closed.clone();
        Some(Box::new(move || closed.store(true, Ordering::Relaxed)))
    }
}

/// Transport that plays back recorded `(r1_cm, r2_cm)` rows at a fixed rate
/// and reports end of stream when the recording is exhausted.
pub struct ReplayTransport<C: Clock> {
    rows: Vec<(f64, f64)>,
    next: usize,
    period: Duration,
    clock: C,
    closed: Arc<AtomicBool>,
}

impl<C: Clock> ReplayTransport<C> {
    pub fn new(rows: Vec<(f64, f64)>, rate_hz: u32, clock: C) -> Self {
        Self {
            rows,
            next: 0,
            period: Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1))),
            clock,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn remaining(&self) -> usize {
        self.rows.len().saturating_sub(self.next)
    }
}

impl<C: Clock> Transport for ReplayTransport<C> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(Box::new(HwError::Closed));
        }
        let Some(&(r1_cm, r2_cm)) = self.rows.get(self.next) else {
            return Ok(0);
        };
        if self.next > 0 {
            self.clock.sleep(self.period);
        }
        self.next += 1;
        Ok(copy_into(buf, &format_payload(r1_cm, r2_cm)))
    }

    fn closer(&self) -> Option<Box<dyn Fn() + Send + Sync>> {
        let closed = self.closed.clone();
        Some(Box::new(move || closed.store(true, Ordering::Relaxed)))
    }
}
