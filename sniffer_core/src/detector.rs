//! One detection tick, free of threads and collaborators.
//!
//! trilaterate -> plausibility filter -> history -> velocity -> predict -> gate.
//! The caller owns alarm and display side effects so the chain can be driven
//! deterministically from tests and benches.

use sniffer_traits::{CollisionState, StatusReport};

use crate::config::GeometryCfg;
use crate::hysteresis::HysteresisGate;
use crate::motion::PositionHistory;
use crate::predictor::predict;
use crate::settings::DetectionParams;
use crate::smoother::NO_SIGNAL_CM;
use crate::trilateration::{Position, locate};

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Either smoothed range still carries the no-signal marker.
    NoSignal,
    /// Ranges could not be placed; nothing was appended.
    InvalidGeometry { r1_cm: f64, r2_cm: f64, baseline_m: f64 },
    /// A position was appended. `state` is set once motion can be estimated.
    Tracked(StatusReport),
}

impl TickOutcome {
    pub fn report(&self) -> Option<&StatusReport> {
        match self {
            TickOutcome::Tracked(r) => Some(r),
            _ => None,
        }
    }

    pub fn decision(&self) -> Option<CollisionState> {
        self.report().and_then(|r| r.state)
    }
}

#[derive(Debug, Clone)]
pub struct Detector {
    history: PositionHistory,
    gate: HysteresisGate,
    geometry: GeometryCfg,
    tick_ms: u64,
}

impl Detector {
    pub fn new(geometry: GeometryCfg, tick_ms: u64) -> Self {
        Self {
            history: PositionHistory::new(),
            gate: HysteresisGate::new(),
            geometry,
            tick_ms: tick_ms.max(1),
        }
    }

    pub fn tick(&mut self, (r1_cm, r2_cm): (f64, f64), params: &DetectionParams) -> TickOutcome {
        if !(r1_cm < NO_SIGNAL_CM && r2_cm < NO_SIGNAL_CM) {
            return TickOutcome::NoSignal;
        }

        let pos = locate(
            r1_cm,
            r2_cm,
            params.baseline_m,
            self.geometry.sensor1_offset_m,
            self.geometry.sensor2_offset_m,
        );
        if !pos.is_plausible() {
            return TickOutcome::InvalidGeometry {
                r1_cm,
                r2_cm,
                baseline_m: params.baseline_m,
            };
        }
        self.history.append(pos);

        let mut report = StatusReport {
            r1_cm,
            r2_cm,
            x_m: pos.x,
            y_m: pos.y,
            distance_m: None,
            state: None,
        };
        if let Some(velocity) = self.history.velocity() {
            let prediction = predict(pos, velocity, params.horizon_s, self.tick_ms);
            let state = self.gate.observe(prediction.distance_m, params.safety_radius_m);
            tracing::trace!(
                x = pos.x,
                y = pos.y,
                dx = velocity.dx,
                dy = velocity.dy,
                distance_m = prediction.distance_m,
                count = self.gate.count(),
                "tick decision"
            );
            report.distance_m = Some(prediction.distance_m);
            report.state = Some(state);
        }
        TickOutcome::Tracked(report)
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn latest(&self) -> Option<Position> {
        self.history.latest()
    }

    pub fn gate(&self) -> &HysteresisGate {
        &self.gate
    }

    /// Forget positions and the hysteresis count.
    pub fn reset(&mut self) {
        self.history.clear();
        self.gate.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingDefaults;

    fn params() -> DetectionParams {
        DetectionParams::from(SettingDefaults::default())
    }

    #[test]
    fn marker_skips_the_tick() {
        let mut d = Detector::new(GeometryCfg::default(), 50);
        assert_eq!(d.tick((NO_SIGNAL_CM, 50.0), &params()), TickOutcome::NoSignal);
        assert!(d.history().is_empty());
    }

    #[test]
    fn infeasible_ranges_are_not_appended() {
        let mut d = Detector::new(GeometryCfg::default(), 50);
        let out = d.tick((1000.0, 1.0), &params());
        assert!(matches!(out, TickOutcome::InvalidGeometry { .. }));
        assert!(d.history().is_empty());
    }

    #[test]
    fn first_position_has_no_decision() {
        let mut d = Detector::new(GeometryCfg::default(), 50);
        let out = d.tick((63.4, 59.1), &params());
        let r = out.report().unwrap();
        assert!(r.state.is_none());
        assert!(r.distance_m.is_none());
        assert_eq!(d.history().len(), 1);
    }

    #[test]
    fn stationary_object_far_away_stays_safe() {
        let mut d = Detector::new(GeometryCfg::default(), 50);
        // About 3.9 m out, well beyond the 2 m radius.
        let mut last = None;
        for _ in 0..5 {
            last = d.tick((385.3, 385.3), &params()).decision();
        }
        assert_eq!(last, Some(CollisionState::Safe));
    }
}
