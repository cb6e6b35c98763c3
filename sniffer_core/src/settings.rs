//! Live detection parameters (w, r, t) and an in-memory settings store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use sniffer_traits::{Setting, SettingsSource};

use crate::config::SettingDefaults;

/// Parameters resolved fresh for one detection tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    pub baseline_m: f64,
    pub safety_radius_m: f64,
    pub horizon_s: f64,
}

impl From<SettingDefaults> for DetectionParams {
    fn from(d: SettingDefaults) -> Self {
        Self {
            baseline_m: d.baseline_m,
            safety_radius_m: d.safety_radius_m,
            horizon_s: d.horizon_s,
        }
    }
}

/// Parse one raw value; absent, unparsable or non-finite text yields `None`.
fn parse_value(raw: Option<String>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl DetectionParams {
    /// Read all three settings, falling back to `defaults` per value.
    pub fn resolve(source: &dyn SettingsSource, defaults: &SettingDefaults) -> Self {
        let get = |s: Setting, fallback: f64| parse_value(source.raw(s)).unwrap_or(fallback);
        Self {
            baseline_m: get(Setting::Baseline, defaults.baseline_m),
            safety_radius_m: get(Setting::SafetyRadius, defaults.safety_radius_m),
            horizon_s: get(Setting::Horizon, defaults.horizon_s),
        }
    }
}

/// Shared text store for the three live settings. Clones see the same values.
#[derive(Debug, Clone, Default)]
pub struct LiveSettings {
    values: Arc<RwLock<HashMap<Setting, String>>>,
}

impl LiveSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text; validity is decided when the value is read.
    pub fn set(&self, setting: Setting, raw: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(setting, raw.into());
    }

    /// Forget a value so the default applies again.
    pub fn clear(&self, setting: Setting) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&setting);
    }
}

impl SettingsSource for LiveSettings {
    fn raw(&self, setting: Setting) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&setting)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_defaults() {
        let p = DetectionParams::resolve(&LiveSettings::new(), &SettingDefaults::default());
        assert_eq!(p, DetectionParams::from(SettingDefaults::default()));
    }

    #[test]
    fn bad_text_falls_back_per_value() {
        let s = LiveSettings::new();
        s.set(Setting::Baseline, " 0.75 ");
        s.set(Setting::SafetyRadius, "abc");
        s.set(Setting::Horizon, "NaN");
        let p = DetectionParams::resolve(&s, &SettingDefaults::default());
        assert!((p.baseline_m - 0.75).abs() < 1e-12);
        assert!((p.safety_radius_m - 2.0).abs() < 1e-12);
        assert!((p.horizon_s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clones_share_values() {
        let a = LiveSettings::new();
        let b = a.clone();
        a.set(Setting::Horizon, "3");
        assert_eq!(b.raw(Setting::Horizon).as_deref(), Some("3"));
        b.clear(Setting::Horizon);
        assert_eq!(a.raw(Setting::Horizon), None);
    }
}
