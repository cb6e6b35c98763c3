//! Linear extrapolation and closest approach of the predicted path.

use crate::motion::StepVector;
use crate::trilateration::Position;
use crate::util::ticks_in;

/// `latest + velocity * steps`
pub fn extrapolate(latest: Position, velocity: StepVector, steps: f64) -> Position {
    Position {
        x: latest.x + velocity.dx * steps,
        y: latest.y + velocity.dy * steps,
    }
}

/// Distance from the origin to the line through `a` and `b`, evaluated at
/// the foot of the perpendicular.
///
/// The parameter is not clamped to the segment, so a point behind `a` or
/// past `b` may be chosen. When `a == b` the distance is `|a|`.
pub fn distance_to_origin_from_path(a: Position, b: Position) -> f64 {
    let px = b.x - a.x;
    let py = b.y - a.y;
    let norm = px * px + py * py;
    let u = if norm == 0.0 {
        0.0
    } else {
        -(a.x * px + a.y * py) / norm
    };
    let cx = a.x + u * px;
    let cy = a.y + u * py;
    cx.hypot(cy)
}

/// Outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Position expected `horizon_s` seconds from now.
    pub future: Position,
    /// Closest approach of the path `latest -> future` to the origin.
    pub distance_m: f64,
}

/// Project `horizon_s` seconds ahead, measured in ticks of `tick_ms`.
pub fn predict(latest: Position, velocity: StepVector, horizon_s: f64, tick_ms: u64) -> Prediction {
    let future = extrapolate(latest, velocity, ticks_in(horizon_s, tick_ms));
    Prediction {
        future,
        distance_m: distance_to_origin_from_path(latest, future),
    }
}
