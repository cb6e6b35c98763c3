use rstest::rstest;
use sniffer_config::load_toml;

#[rstest]
#[case("[geometry]\nbaseline_m = 0.0\n", "baseline_m must be")]
#[case("[geometry]\nbaseline_m = -0.5\n", "baseline_m must be")]
#[case("[geometry]\nsensor1_offset_m = nan\n", "offsets must be finite")]
#[case("[detection]\nsafety_radius_m = -1.0\n", "safety_radius_m must be")]
#[case("[detection]\nhorizon_s = inf\n", "horizon_s must be")]
#[case("[detection]\ntick_ms = 0\n", "tick_ms must be >= 1")]
#[case("[detection]\ntick_ms = 5000\n", "unreasonably large")]
#[case("[alarm]\ntone_ms = 0\n", "tone_ms must be >= 1")]
#[case("[alarm]\nrepeat_ms = 0\n", "repeat_ms must be >= 1")]
#[case("[ingest]\nread_buf_bytes = 4\n", "read_buf_bytes must be >= 16")]
#[case("[transport]\nconnect_timeout_ms = 0\n", "connect_timeout_ms")]
#[case("[sim]\nrate_hz = 0\n", "sim.rate_hz must be > 0")]
#[case("[logging]\nrotation = \"weekly\"\n", "never|daily|hourly")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn accepts_full_document() {
    let toml = r#"
[geometry]
baseline_m = 0.6
sensor1_offset_m = -0.1
sensor2_offset_m = -0.12

[detection]
safety_radius_m = 1.5
horizon_s = 2.0
tick_ms = 50

[alarm]
tone_ms = 300
repeat_ms = 1000

[ingest]
read_buf_bytes = 512

[transport]
connect_timeout_ms = 2000

[sim]
start_x_m = -5.0
start_y_m = 0.0
velocity_x_mps = 1.0
velocity_y_mps = 0.0
stop_x_m = -0.5
rate_hz = 25

[logging]
level = "debug"
rotation = "daily"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.sim.rate_hz, 25);
    assert!((cfg.geometry.sensor2_offset_m + 0.12).abs() < 1e-12);
}

#[test]
fn unknown_types_fail_to_parse() {
    assert!(load_toml("[detection]\ntick_ms = \"fast\"\n").is_err());
}
