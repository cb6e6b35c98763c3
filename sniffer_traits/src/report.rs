//! Vocabulary shared between the core and its display/settings collaborators.

use std::fmt;

/// Debounced collision decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionState {
    #[default]
    Safe,
    Warning,
}

/// Background color suggested to a display for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorHint {
    Green,
    Red,
    Grey,
}

impl ColorHint {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorHint::Green => "green",
            ColorHint::Red => "red",
            ColorHint::Grey => "grey",
        }
    }
}

impl CollisionState {
    pub fn is_warning(self) -> bool {
        matches!(self, CollisionState::Warning)
    }

    /// Human-facing headline.
    pub fn headline(self) -> &'static str {
        match self {
            CollisionState::Safe => "SAFE",
            CollisionState::Warning => "WARNING: Collision Likely!",
        }
    }

    pub fn color_hint(self) -> ColorHint {
        match self {
            CollisionState::Safe => ColorHint::Green,
            CollisionState::Warning => ColorHint::Red,
        }
    }

    /// Stable machine name used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            CollisionState::Safe => "SAFE",
            CollisionState::Warning => "WARNING",
        }
    }
}

impl fmt::Display for CollisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detection tick worth of output.
///
/// `state` and `distance_m` are `None` until the history holds enough
/// positions to estimate motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    pub r1_cm: f64,
    pub r2_cm: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub distance_m: Option<f64>,
    pub state: Option<CollisionState>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r1:{:.2}, r2:{:.2}, x:{:.2}, y:{:.2}",
            self.r1_cm, self.r2_cm, self.x_m, self.y_m
        )
    }
}

/// The three live inputs re-read on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Sensor baseline separation `w`, meters.
    Baseline,
    /// Safety radius `r`, meters.
    SafetyRadius,
    /// Prediction horizon `t`, seconds.
    Horizon,
}

impl Setting {
    pub const ALL: [Setting; 3] = [Setting::Baseline, Setting::SafetyRadius, Setting::Horizon];

    /// Short key used by interactive front-ends (`w`, `r`, `t`).
    pub fn key(self) -> &'static str {
        match self {
            Setting::Baseline => "w",
            Setting::SafetyRadius => "r",
            Setting::Horizon => "t",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(key.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_has_two_decimals() {
        let r = StatusReport {
            r1_cm: 63.4,
            r2_cm: 59.126,
            x_m: -0.717_67,
            y_m: -0.066_1,
            distance_m: None,
            state: None,
        };
        assert_eq!(r.to_string(), "r1:63.40, r2:59.13, x:-0.72, y:-0.07");
    }

    #[test]
    fn setting_keys_round_trip() {
        for s in Setting::ALL {
            assert_eq!(Setting::from_key(s.key()), Some(s));
        }
        assert_eq!(Setting::from_key(" R "), Some(Setting::SafetyRadius));
        assert_eq!(Setting::from_key("x"), None);
    }

    #[test]
    fn warning_headline_and_color() {
        assert_eq!(CollisionState::Warning.color_hint(), ColorHint::Red);
        assert!(CollisionState::Warning.headline().contains("Collision Likely"));
        assert_eq!(CollisionState::Safe.headline(), "SAFE");
    }
}
