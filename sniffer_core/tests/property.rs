use proptest::prelude::*;
use sniffer_core::motion::{HISTORY_CAPACITY, PositionHistory};
use sniffer_core::{NO_SIGNAL_CM, Position, RangeSample, RangeSmoother, locate};

proptest! {
    // Repeating one sample walks the smoothed pair toward it, never away.
    #[test]
    fn smoothing_converges_monotonically(a in 0.0f64..59_999.0, b in 0.0f64..59_999.0) {
        let s = RangeSmoother::new();
        let mut prev = (NO_SIGNAL_CM - a).abs().max((NO_SIGNAL_CM - b).abs());
        for _ in 0..80 {
            let accepted = s.update(RangeSample { r1_cm: a, r2_cm: b });
            prop_assert!(accepted);
            let (r1, r2) = s.latest();
            let gap = (r1 - a).abs().max((r2 - b).abs());
            prop_assert!(gap <= prev + 1e-9);
            prev = gap;
        }
        let (r1, r2) = s.latest();
        prop_assert!((r1 - a).abs() < 1e-6);
        prop_assert!((r2 - b).abs() < 1e-6);
    }

    #[test]
    fn marker_samples_leave_state_unchanged(
        seed in 0.0f64..500.0,
        good in 0.0f64..59_999.0,
        bad in 60_000.0f64..1e9,
        first_is_bad in any::<bool>(),
    ) {
        let s = RangeSmoother::new();
        s.update(RangeSample { r1_cm: seed, r2_cm: seed });
        let before = s.latest();
        let sample = if first_is_bad {
            RangeSample { r1_cm: bad, r2_cm: good }
        } else {
            RangeSample { r1_cm: good, r2_cm: bad }
        };
        prop_assert!(!s.update(sample));
        prop_assert_eq!(s.latest(), before);
    }

    #[test]
    fn history_keeps_the_newest_ten_in_order(n in 0usize..40) {
        let mut h = PositionHistory::new();
        for i in 0..n {
            h.append(Position::new(-(i as f64), 0.0));
        }
        prop_assert_eq!(h.len(), n.min(HISTORY_CAPACITY));
        let xs: Vec<f64> = h.iter().map(|p| p.x).collect();
        let expected: Vec<f64> = (n.saturating_sub(HISTORY_CAPACITY)..n).map(|i| -(i as f64)).collect();
        prop_assert_eq!(xs, expected);
    }

    // Swapping the two ranges reflects the point across the x axis.
    #[test]
    fn swapped_ranges_mirror_across_the_axis(x in -5.0f64..-0.3, y in -0.24f64..0.24) {
        let w = 0.5;
        let r1_cm = x.hypot(y - w / 2.0) * 100.0;
        let r2_cm = x.hypot(y + w / 2.0) * 100.0;
        let p = locate(r1_cm, r2_cm, w, 0.0, 0.0);
        let q = locate(r2_cm, r1_cm, w, 0.0, 0.0);
        prop_assert!((p.x - x).abs() < 1e-6, "{:?} vs ({}, {})", p, x, y);
        prop_assert!((p.y - y).abs() < 1e-6, "{:?} vs ({}, {})", p, x, y);
        prop_assert!((q.x - p.x).abs() < 1e-6);
        prop_assert!((q.y + p.y).abs() < 1e-6);
    }
}
