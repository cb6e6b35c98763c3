//! Two-range trilateration.
//!
//! Frame: origin at the baseline midpoint, baseline along `y` with sensor 1
//! at `(0, +w/2)` and sensor 2 at `(0, -w/2)`. The object is placed on the
//! `x < 0` side, at the apex of the triangle (r1, r2, w).

/// Planar position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Returned by [`locate`] when the ranges cannot form a triangle.
pub const INVALID_POSITION: Position = Position {
    x: -500.0,
    y: -500.0,
};

/// Positions with a coordinate below this are discarded.
pub const PLAUSIBLE_FLOOR_M: f64 = -100.0;

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Finite and not below [`PLAUSIBLE_FLOOR_M`] on either axis. Filters
    /// [`INVALID_POSITION`] too.
    pub fn is_plausible(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.x >= PLAUSIBLE_FLOOR_M
            && self.y >= PLAUSIBLE_FLOOR_M
    }

    /// Euclidean distance from the origin.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Place the object from two ranges (centimeters) and the baseline (meters).
///
/// Offsets are subtracted from each range after conversion to meters. A
/// corrected range may come out negative and is still placed when the
/// triangle closes. Any undefined step (non-positive baseline, zero
/// corrected range, arccosine argument outside [-1, 1], non-finite result)
/// yields [`INVALID_POSITION`].
pub fn locate(r1_cm: f64, r2_cm: f64, baseline_m: f64, offset1_m: f64, offset2_m: f64) -> Position {
    let w = baseline_m;
    let r1 = r1_cm / 100.0 - offset1_m;
    let r2 = r2_cm / 100.0 - offset2_m;

    if !(w.is_finite() && w > 0.0) || r1 == 0.0 || r2 == 0.0 {
        return INVALID_POSITION;
    }

    let cos_alpha = (r1 * r1 + w * w - r2 * r2) / (2.0 * r1 * w);
    let cos_beta = (r2 * r2 + w * w - r1 * r1) / (2.0 * r2 * w);
    if !(-1.0..=1.0).contains(&cos_alpha) || !(-1.0..=1.0).contains(&cos_beta) {
        return INVALID_POSITION;
    }
    let alpha = cos_alpha.acos();
    let beta = cos_beta.acos();

    let cot_sum = 1.0 / alpha.tan() + 1.0 / beta.tan();
    if cot_sum == 0.0 {
        return INVALID_POSITION;
    }
    let x = -w / cot_sum;
    let y = (r2 * r2 - x * x).max(0.0).sqrt() - w / 2.0;

    if x.is_finite() && y.is_finite() {
        Position { x, y }
    } else {
        INVALID_POSITION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFF: f64 = -0.15;

    #[test]
    fn reference_reading() {
        let p = locate(63.4, 59.1, 0.5, OFF, OFF);
        assert!((p.x + 0.7177).abs() < 1e-3, "{p:?}");
        assert!((p.y + 0.0655).abs() < 1e-3, "{p:?}");
        assert!(p.is_plausible());
    }

    #[test]
    fn equal_ranges_sit_on_the_axis() {
        let p = locate(200.0, 200.0, 0.5, 0.0, 0.0);
        assert!(p.y.abs() < 1e-9);
        let expected_x = -(2.0f64 * 2.0 - 0.25 * 0.25).sqrt();
        assert!((p.x - expected_x).abs() < 1e-9);
    }

    #[test]
    fn infeasible_triangle_returns_sentinel() {
        assert_eq!(locate(1000.0, 1.0, 0.5, OFF, OFF), INVALID_POSITION);
        assert_eq!(locate(1000.0, 1.0, 0.5, 0.1, 0.1), INVALID_POSITION);
        assert!(!INVALID_POSITION.is_plausible());
    }

    #[test]
    fn degenerate_baseline_returns_sentinel() {
        assert_eq!(locate(100.0, 100.0, 0.0, OFF, OFF), INVALID_POSITION);
        assert_eq!(locate(100.0, 100.0, -0.5, OFF, OFF), INVALID_POSITION);
        assert_eq!(locate(100.0, 100.0, f64::NAN, OFF, OFF), INVALID_POSITION);
    }

    #[test]
    fn zero_or_nan_corrected_range_returns_sentinel() {
        // 10 cm - 0.1 m offset = 0 m
        assert_eq!(locate(10.0, 60.0, 0.5, 0.1, 0.1), INVALID_POSITION);
        assert_eq!(locate(60.0, 10.0, 0.5, 0.1, 0.1), INVALID_POSITION);
        assert_eq!(locate(f64::NAN, 60.0, 0.5, 0.1, 0.1), INVALID_POSITION);
    }

    #[test]
    fn negative_corrected_range_is_still_placed() {
        // 5 cm - 0.1 m offset = -0.05 m; the triangle still closes.
        let p = locate(5.0, 60.0, 0.5, 0.1, 0.1);
        assert_ne!(p, INVALID_POSITION);
        assert!((p.x + 0.050_44).abs() < 1e-4, "{p:?}");
        assert!((p.y - 0.247_45).abs() < 1e-4, "{p:?}");
    }

    #[test]
    fn plausibility_floor() {
        assert!(Position::new(-100.0, 0.0).is_plausible());
        assert!(!Position::new(-100.01, 0.0).is_plausible());
        assert!(!Position::new(0.0, f64::INFINITY).is_plausible());
        assert!(!Position::new(f64::NAN, 0.0).is_plausible());
    }
}
