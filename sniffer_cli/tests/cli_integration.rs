use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tempfile::tempdir;

// Defaults everywhere except a short alarm cadence so runs end quickly.
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[geometry]
baseline_m = 0.5
sensor1_offset_m = -0.15
sensor2_offset_m = -0.15

[detection]
safety_radius_m = 2.0
horizon_s = 1.0
tick_ms = 50

[alarm]
tone_ms = 5
repeat_ms = 100

[sim]
start_x_m = -4.0
start_y_m = 0.1
velocity_x_mps = 2.0
stop_x_m = -0.3
rate_hz = 20
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["locate", "--r1", "63.4", "--r2", "59.1"], 0, "x: -0.7177", "stdout")]
#[case(&["locate", "--r1", "59.1", "--r2", "63.4"], 0, "y: 0.0656", "stdout")]
#[case(&["locate", "--r1", "1000", "--r2", "1"], 3, "cannot form a triangle", "stderr")]
#[case(&["locate", "--r1", "63.4", "--r2", "59.1", "--baseline", "0"], 3, "invalid geometry", "stderr")]
#[case(&["run"], 2, "required", "stderr")]
#[case(&["run", "--sim", "--replay", "x.csv"], 2, "cannot be used with", "stderr")]
#[case(&["self-check"], 0, "config ok", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("sniffer_cli").unwrap();
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        _ => {
            assert.stderr(predicate::str::contains(needle));
        }
    }
}

#[rstest]
#[case("[geometry]\nbaseline_m = 0.0\n", "baseline_m")]
#[case("[detection]\ntick_ms = 0\n", "tick_ms")]
#[case("[alarm]\nrepeat_ms = 0\n", "repeat_ms")]
#[case("[detection]\nhorizon_s = \"soon\"\n", "Configuration is invalid")]
fn invalid_config_exits_5(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("self-check")
        .assert()
        .code(5)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn missing_config_file_exits_5() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check")
        .assert()
        .code(5);
}

#[test]
fn replay_with_bad_headers_exits_5() {
    let dir = tempdir().unwrap();
    let rec = dir.path().join("rec.csv");
    fs::write(&rec, "r1,r2\n100,100\n").unwrap();

    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .args(["run", "--no-stdin", "--mute", "--replay"])
        .arg(&rec)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid headers in recording CSV"));
}

#[test]
fn refused_connection_exits_4() {
    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .args([
            "run",
            "--no-stdin",
            "--mute",
            "--connect",
            "127.0.0.1:1",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("sensor link"));
}

#[test]
fn negative_radius_override_is_rejected() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--sim", "--mute", "--no-stdin", "--radius=-1"])
        .assert()
        .code(5);
}

#[test]
fn simulated_approach_raises_warning() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args([
            "run",
            "--sim",
            "--mute",
            "--no-stdin",
            "--stats",
            "--duration-ms",
            "3000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: Collision Likely!"))
        .stdout(predicate::str::contains("-- monitoring stopped --"))
        .stderr(predicate::str::contains("Sniffer Stats"));
}

#[test]
fn wide_radius_zero_never_warns() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    Command::cargo_bin("sniffer_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args([
            "run",
            "--sim",
            "--mute",
            "--no-stdin",
            "--radius",
            "0",
            "--duration-ms",
            "1500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("| SAFE |"))
        .stdout(predicate::str::contains("WARNING").not());
}

#[test]
fn quit_on_stdin_ends_the_run_early() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    assert_cmd::Command::cargo_bin("sniffer_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .args(["run", "--sim", "--mute", "--duration-ms", "60000"])
        .write_stdin("stats\nw 0.6\nquit\n")
        .timeout(Duration::from_secs(20))
        .assert()
        .success()
        .stderr(predicate::str::contains("Sniffer Stats"));
}
