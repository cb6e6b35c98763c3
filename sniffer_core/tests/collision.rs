use rstest::rstest;
use sniffer_core::motion::StepVector;
use sniffer_core::{
    CollisionState, DetectionParams, Detector, GeometryCfg, HysteresisGate, INVALID_POSITION,
    Position, SettingDefaults, TickOutcome, distance_to_origin_from_path, locate, predict,
};
use sniffer_hardware::SimScenario;

use CollisionState::{Safe, Warning};

#[rstest]
fn reference_reading_mirrors_in_y_when_ranges_swap() {
    let p = locate(63.4, 59.1, 0.5, -0.15, -0.15);
    let q = locate(59.1, 63.4, 0.5, -0.15, -0.15);
    assert!((p.x + 0.7177).abs() < 1e-3, "{p:?}");
    assert!((q.x - p.x).abs() < 1e-9, "{p:?} {q:?}");
    assert!((q.y + p.y).abs() < 1e-9, "{p:?} {q:?}");
}

#[rstest]
#[case(1000.0, 1.0, 0.5)]
#[case(1.0, 1000.0, 0.5)]
#[case(100.0, 100.0, 0.0)]
#[case(100.0, 100.0, -1.0)]
fn degenerate_geometry_returns_sentinel(#[case] r1: f64, #[case] r2: f64, #[case] w: f64) {
    assert_eq!(locate(r1, r2, w, -0.15, -0.15), INVALID_POSITION);
}

#[rstest]
fn gate_trips_on_third_close_pass_and_latches() {
    let mut g = HysteresisGate::new();
    let got: Vec<_> = [3.0, 3.0, 1.0, 1.0, 1.0, 3.0]
        .iter()
        .map(|d| g.observe(*d, 2.0))
        .collect();
    assert_eq!(got, vec![Safe, Safe, Safe, Safe, Warning, Warning]);
}

#[rstest]
fn head_on_path_reports_zero_distance() {
    let p = predict(
        Position::new(0.0, 1.0),
        StepVector { dx: 0.0, dy: -0.5 },
        2.0,
        50,
    );
    assert!((p.future.x).abs() < 1e-12);
    assert!((p.future.y + 19.0).abs() < 1e-9);
    assert!(p.distance_m.abs() < 1e-12);
    assert!(
        (distance_to_origin_from_path(Position::new(0.0, 1.0), p.future)).abs() < 1e-12
    );
}

fn default_params() -> DetectionParams {
    DetectionParams::from(SettingDefaults::default())
}

/// Feed the detector the exact ranges the simulator would report, one per tick.
fn run_scenario(scenario: &SimScenario, ticks: usize, params: &DetectionParams) -> Vec<TickOutcome> {
    let mut d = Detector::new(
        GeometryCfg {
            sensor1_offset_m: scenario.sensor1_offset_m,
            sensor2_offset_m: scenario.sensor2_offset_m,
        },
        50,
    );
    (0..ticks)
        .map(|i| {
            let t = i as f64 * 0.05;
            d.tick(scenario.ranges_cm(scenario.position_at(t)), params)
        })
        .collect()
}

#[rstest]
fn approaching_object_raises_warning_on_fourth_tick() {
    let scenario = SimScenario {
        start_m: (-3.0, 0.1),
        velocity_mps: (1.0, 0.0),
        ..SimScenario::default()
    };
    let outcomes = run_scenario(&scenario, 6, &default_params());
    let decisions: Vec<_> = outcomes.iter().map(TickOutcome::decision).collect();
    assert_eq!(
        decisions,
        vec![None, Some(Safe), Some(Safe), Some(Warning), Some(Warning), Some(Warning)]
    );
    let first = outcomes[0].report().unwrap();
    assert!((first.x_m + 3.0).abs() < 1e-6);
    assert!((first.y_m - 0.1).abs() < 1e-6);
}

#[rstest]
fn object_passing_wide_stays_safe() {
    // Moving parallel to the baseline 3 m out never comes within 2 m.
    let scenario = SimScenario {
        start_m: (-3.0, 0.0),
        velocity_mps: (0.0, 0.2),
        ..SimScenario::default()
    };
    let outcomes = run_scenario(&scenario, 10, &default_params());
    assert!(outcomes.iter().all(|o| o.decision() != Some(Warning)));
}

#[rstest]
fn zero_radius_never_warns() {
    let scenario = SimScenario {
        start_m: (-1.0, 0.0),
        velocity_mps: (1.0, 0.0),
        stop_x_m: -0.2,
        ..SimScenario::default()
    };
    let params = DetectionParams {
        safety_radius_m: 0.0,
        ..default_params()
    };
    let outcomes = run_scenario(&scenario, 20, &params);
    assert!(outcomes.iter().all(|o| o.decision() != Some(Warning)));
}

#[rstest]
fn live_baseline_feeds_trilateration() {
    let mut d = Detector::new(GeometryCfg::default(), 50);
    let wide = DetectionParams {
        baseline_m: 100.0,
        ..default_params()
    };
    // A 100 m baseline cannot close a triangle with ~60 cm ranges.
    assert!(matches!(
        d.tick((63.4, 59.1), &wide),
        TickOutcome::InvalidGeometry { baseline_m, .. } if (baseline_m - 100.0).abs() < 1e-12
    ));
    assert!(matches!(
        d.tick((63.4, 59.1), &default_params()),
        TickOutcome::Tracked(_)
    ));
}
