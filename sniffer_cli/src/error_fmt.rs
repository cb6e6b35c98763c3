//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use sniffer_core::error::{BuildError, SnifferError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingDisplay => {
                "What happened: No status display was provided to the detection session.\nLikely causes: The front-end did not wire a display into the builder.\nHow to fix: Pass a display via with_display(...).".to_string()
            }
            BuildError::MissingTone => {
                "What happened: No tone emitter was provided to the detection session.\nLikely causes: The front-end did not wire an alarm output into the builder.\nHow to fix: Pass a tone emitter via with_tone(...), or run with --mute.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Fix the value, then rerun. `sniffer_cli self-check` prints the effective settings."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SnifferError>() {
        return match se {
            SnifferError::InvalidGeometry { baseline_m, .. } => format!(
                "What happened: {se}.\nLikely causes: The two ranges and the {baseline_m:.2} m baseline cannot form a triangle (one range much longer than the other plus the baseline), or the baseline is not positive.\nHow to fix: Check the sensor readings and the configured baseline (geometry.baseline_m / --baseline)."
            ),
            SnifferError::Transport(_) | SnifferError::Disconnected => format!(
                "What happened: {se}.\nLikely causes: The sensor link is down, the address or device path is wrong, or the peer closed the connection.\nHow to fix: Check that the sensor bridge is powered and reachable, then start again."
            ),
            SnifferError::Config(msg) if msg.contains("recording CSV must have headers") => {
                "Invalid headers in recording CSV. Expected 'r1_cm,r2_cm'.".to_string()
            }
            SnifferError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: A value in the TOML is out of range or has the wrong type.\nHow to fix: Edit the config file and rerun `sniffer_cli self-check`."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("recording csv must have headers") {
        return "Invalid headers in recording CSV. Expected 'r1_cm,r2_cm'.".to_string();
    }

    if lower.contains("logging setup") || lower.contains("log level") {
        return format!(
            "What happened: Logging could not be set up ({msg}).\nLikely causes: Unknown --log-level / RUST_LOG directive or an unwritable log file.\nHow to fix: Use one of error|warn|info|debug|trace and check [logging] file."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable process exit codes: 3 invalid geometry, 4 transport, 5 config, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use sniffer_core::error::{BuildError, SnifferError};
    if let Some(se) = err.downcast_ref::<SnifferError>() {
        return match se {
            SnifferError::InvalidGeometry { .. } => 3,
            SnifferError::Transport(_) | SnifferError::Disconnected => 4,
            SnifferError::Config(_) => 5,
            SnifferError::State(_) | SnifferError::Io(_) => 1,
        };
    }
    if let Some(BuildError::InvalidConfig(_)) = err.downcast_ref::<BuildError>() {
        return 5;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use sniffer_core::error::{BuildError, SnifferError};
    if let Some(se) = err.downcast_ref::<SnifferError>() {
        return match se {
            SnifferError::InvalidGeometry { .. } => "InvalidGeometry",
            SnifferError::Transport(_) => "Transport",
            SnifferError::Disconnected => "Disconnected",
            SnifferError::Config(_) => "Config",
            SnifferError::State(_) => "State",
            SnifferError::Io(_) => "Io",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "event": "error",
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_core::error::SnifferError;

    #[test]
    fn exit_codes_follow_error_kind() {
        let geo = eyre::Report::new(SnifferError::InvalidGeometry {
            r1_cm: 1000.0,
            r2_cm: 1.0,
            baseline_m: 0.5,
        });
        assert_eq!(exit_code_for_error(&geo), 3);
        let t = eyre::Report::new(SnifferError::Transport("refused".into()));
        assert_eq!(exit_code_for_error(&t), 4);
        let c = eyre::Report::new(SnifferError::Config("x".into()));
        assert_eq!(exit_code_for_error(&c), 5);
        assert_eq!(exit_code_for_error(&eyre::eyre!("boom")), 1);
    }

    #[test]
    fn wrapped_errors_keep_their_code() {
        use eyre::WrapErr;
        let r: eyre::Result<()> = Err(eyre::Report::new(SnifferError::Disconnected));
        let err = r.wrap_err("connect to 127.0.0.1:9").unwrap_err();
        assert_eq!(exit_code_for_error(&err), 4);
    }

    #[test]
    fn bad_recording_headers_get_a_short_hint() {
        let err = eyre::Report::new(SnifferError::Config(
            "recording CSV must have headers 'r1_cm,r2_cm', got: r1,r2".into(),
        ));
        assert!(humanize(&err).starts_with("Invalid headers in recording CSV"));
        assert_eq!(exit_code_for_error(&err), 5);
    }

    #[test]
    fn json_error_is_one_object() {
        let err = eyre::Report::new(SnifferError::Config("detection.tick_ms must be >= 1".into()));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Config");
        assert_eq!(v["exit_code"], 5);
        assert!(v["message"].as_str().unwrap().contains("tick_ms"));
    }
}
