//! Console status display: one line per detection tick on stdout.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use sniffer_traits::{ColorHint, StatusDisplay, StatusReport};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Text line for a report, e.g.
/// `r1:46.85, r2:54.46, x:-0.60, y:0.10 | WARNING: Collision Likely! | d=0.61 m`.
pub fn status_line(report: &StatusReport) -> String {
    match (report.state, report.distance_m) {
        (Some(state), Some(d)) => format!("{report} | {} | d={d:.2} m", state.headline()),
        _ => report.to_string(),
    }
}

/// JSON object for a report; `state`, `headline`, `color` and `distance_m`
/// are null until a decision exists.
pub fn status_json(report: &StatusReport) -> serde_json::Value {
    json!({
        "event": "status",
        "timestamp": unix_ms(),
        "r1_cm": report.r1_cm,
        "r2_cm": report.r2_cm,
        "x_m": report.x_m,
        "y_m": report.y_m,
        "distance_m": report.distance_m,
        "state": report.state.map(|s| s.as_str()),
        "headline": report.state.map(|s| s.headline()),
        "color": report.state.map(|s| s.color_hint().as_str()),
    })
}

#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    json: bool,
}

impl ConsoleDisplay {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn emit(&self, line: &str) -> Result<(), BoxError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

impl StatusDisplay for ConsoleDisplay {
    fn show(&mut self, report: &StatusReport) -> Result<(), BoxError> {
        if self.json {
            self.emit(&status_json(report).to_string())
        } else {
            self.emit(&status_line(report))
        }
    }

    fn clear(&mut self) -> Result<(), BoxError> {
        if self.json {
            let idle = json!({
                "event": "idle",
                "timestamp": unix_ms(),
                "color": ColorHint::Grey.as_str(),
            });
            self.emit(&idle.to_string())
        } else {
            self.emit("-- monitoring stopped --")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_traits::CollisionState;

    fn report(state: Option<CollisionState>) -> StatusReport {
        StatusReport {
            r1_cm: 46.851,
            r2_cm: 54.459,
            x_m: -0.6,
            y_m: 0.1,
            distance_m: state.map(|_| 0.6083),
            state,
        }
    }

    #[test]
    fn text_line_carries_headline_once_decided() {
        assert_eq!(
            status_line(&report(None)),
            "r1:46.85, r2:54.46, x:-0.60, y:0.10"
        );
        assert_eq!(
            status_line(&report(Some(CollisionState::Warning))),
            "r1:46.85, r2:54.46, x:-0.60, y:0.10 | WARNING: Collision Likely! | d=0.61 m"
        );
    }

    #[test]
    fn json_nulls_before_decision() {
        let v = status_json(&report(None));
        assert!(v["state"].is_null());
        assert!(v["color"].is_null());
        let v = status_json(&report(Some(CollisionState::Safe)));
        assert_eq!(v["state"], "SAFE");
        assert_eq!(v["color"], "green");
    }
}
