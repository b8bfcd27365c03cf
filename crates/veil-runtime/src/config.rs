#![forbid(unsafe_code)]

//! Runtime tunables and their loading layers.
//!
//! Resolution order: [`VeilConfig::default`], then environment variables
//! ([`VeilConfig::from_env`]), then an optional TOML document
//! ([`VeilConfig::from_toml_str`], `policy-config` feature). Every layer ends
//! in [`VeilConfig::validate`].
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `VEIL_REDUCED_MOTION` | `1`/`true`/`yes`/`on` makes every transition snap |
//! | `VEIL_ENTER_MS` | enter animation duration in milliseconds |
//! | `VEIL_EXIT_MS` | exit animation duration in milliseconds |

use std::fmt;
use std::time::Duration;

/// Env var enabling reduced motion.
pub const REDUCED_MOTION_ENV: &str = "VEIL_REDUCED_MOTION";
/// Env var overriding the enter duration (ms).
pub const ENTER_MS_ENV: &str = "VEIL_ENTER_MS";
/// Env var overriding the exit duration (ms).
pub const EXIT_MS_ENV: &str = "VEIL_EXIT_MS";

/// Errors from configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A document or variable could not be parsed.
    Parse(String),
    /// A value parsed but is out of range.
    InvalidValue { key: String, reason: String },
    /// A configuration file could not be read.
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::InvalidValue { key, reason } => write!(f, "invalid value for '{key}': {reason}"),
            Self::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Tunable constants shared by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct VeilConfig {
    /// Enter (open) animation length.
    pub enter_duration: Duration,
    /// Exit (close) animation length.
    pub exit_duration: Duration,
    /// Scale at the closed end of a zoom transition.
    pub min_scale: f32,
    /// Gap between an anchor and its floating content, in px.
    pub anchor_offset: f32,
    /// Drag distance past which a released sheet dismisses, in px.
    pub drag_dismiss_distance: f32,
    /// Release velocity past which a sheet dismisses, in px/ms.
    pub drag_dismiss_velocity: f32,
    /// Delay before a tooltip or hover card opens.
    pub tooltip_delay: Duration,
    /// Delay before a hover card closes after the pointer leaves.
    pub hover_close_delay: Duration,
    /// Maximum number of visible toasts.
    pub toast_limit: usize,
    /// Default toast lifetime before auto-dismiss.
    pub toast_duration: Duration,
    /// Skip animations and apply end states directly.
    pub reduced_motion: bool,
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            enter_duration: Duration::from_millis(200),
            exit_duration: Duration::from_millis(150),
            min_scale: 0.95,
            anchor_offset: 6.0,
            drag_dismiss_distance: 100.0,
            drag_dismiss_velocity: 0.5,
            tooltip_delay: Duration::from_millis(700),
            hover_close_delay: Duration::from_millis(300),
            toast_limit: 3,
            toast_duration: Duration::from_millis(5000),
            reduced_motion: false,
        }
    }
}

impl VeilConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with variables from `lookup`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(REDUCED_MOTION_ENV) {
            config.reduced_motion = parse_flag(REDUCED_MOTION_ENV, &raw)?;
        }
        if let Some(raw) = lookup(ENTER_MS_ENV) {
            config.enter_duration = parse_millis(ENTER_MS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(EXIT_MS_ENV) {
            config.exit_duration = parse_millis(EXIT_MS_ENV, &raw)?;
        }
        config.validate()?;
        tracing::debug!(
            reduced_motion = config.reduced_motion,
            enter_ms = config.enter_duration.as_millis() as u64,
            exit_ms = config.exit_duration.as_millis() as u64,
            "config loaded from environment"
        );
        Ok(config)
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_scale.is_finite() || !(0.5..=1.0).contains(&self.min_scale) {
            return Err(ConfigError::invalid("min_scale", "must be within [0.5, 1.0]"));
        }
        for (key, value) in [
            ("anchor_offset", self.anchor_offset),
            ("drag_dismiss_distance", self.drag_dismiss_distance),
            ("drag_dismiss_velocity", self.drag_dismiss_velocity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(key, "must be finite and non-negative"));
            }
        }
        Ok(())
    }

    /// Builder: set reduced motion.
    #[must_use]
    pub fn reduced_motion(mut self, on: bool) -> Self {
        self.reduced_motion = on;
        self
    }

    /// Builder: set both animation durations.
    #[must_use]
    pub fn durations(mut self, enter: Duration, exit: Duration) -> Self {
        self.enter_duration = enter;
        self.exit_duration = exit;
        self
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("expected a boolean, got '{other}'"))),
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::Parse(format!("{key}: {e}")))
}

#[cfg(feature = "policy-config")]
mod policy {
    use super::{ConfigError, VeilConfig};
    use serde::Deserialize;
    use std::path::Path;
    use std::time::Duration;

    /// On-disk shape; every key is optional and overlays the defaults.
    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PolicyFile {
        enter_ms: Option<u64>,
        exit_ms: Option<u64>,
        min_scale: Option<f32>,
        anchor_offset: Option<f32>,
        drag_dismiss_distance: Option<f32>,
        drag_dismiss_velocity: Option<f32>,
        tooltip_delay_ms: Option<u64>,
        hover_close_delay_ms: Option<u64>,
        toast_limit: Option<usize>,
        toast_duration_ms: Option<u64>,
        reduced_motion: Option<bool>,
    }

    impl VeilConfig {
        /// Overlay a TOML policy document on `self`.
        pub fn merge_toml_str(mut self, source: &str) -> Result<Self, ConfigError> {
            let file: PolicyFile =
                toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
            let ms = Duration::from_millis;
            if let Some(v) = file.enter_ms {
                self.enter_duration = ms(v);
            }
            if let Some(v) = file.exit_ms {
                self.exit_duration = ms(v);
            }
            if let Some(v) = file.min_scale {
                self.min_scale = v;
            }
            if let Some(v) = file.anchor_offset {
                self.anchor_offset = v;
            }
            if let Some(v) = file.drag_dismiss_distance {
                self.drag_dismiss_distance = v;
            }
            if let Some(v) = file.drag_dismiss_velocity {
                self.drag_dismiss_velocity = v;
            }
            if let Some(v) = file.tooltip_delay_ms {
                self.tooltip_delay = ms(v);
            }
            if let Some(v) = file.hover_close_delay_ms {
                self.hover_close_delay = ms(v);
            }
            if let Some(v) = file.toast_limit {
                self.toast_limit = v;
            }
            if let Some(v) = file.toast_duration_ms {
                self.toast_duration = ms(v);
            }
            if let Some(v) = file.reduced_motion {
                self.reduced_motion = v;
            }
            self.validate()?;
            Ok(self)
        }

        /// Defaults overlaid with a TOML policy document.
        pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
            Self::default().merge_toml_str(source)
        }

        /// Defaults overlaid with a TOML policy file.
        pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let source = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
            Self::from_toml_str(&source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = VeilConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enter_duration, Duration::from_millis(200));
        assert_eq!(config.toast_limit, 3);
    }

    #[test]
    fn env_overrides_durations_and_motion() {
        let config = VeilConfig::from_env_with(env(&[
            (REDUCED_MOTION_ENV, "yes"),
            (ENTER_MS_ENV, " 120 "),
            (EXIT_MS_ENV, "80"),
        ]))
        .expect("valid env");
        assert!(config.reduced_motion);
        assert_eq!(config.enter_duration, Duration::from_millis(120));
        assert_eq!(config.exit_duration, Duration::from_millis(80));
    }

    #[test]
    fn empty_env_keeps_defaults() {
        let config = VeilConfig::from_env_with(env(&[])).expect("valid env");
        assert_eq!(config, VeilConfig::default());
    }

    #[test]
    fn bad_env_values_are_errors() {
        let err = VeilConfig::from_env_with(env(&[(ENTER_MS_ENV, "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = VeilConfig::from_env_with(env(&[(REDUCED_MOTION_ENV, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == REDUCED_MOTION_ENV));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut config = VeilConfig::default();
        config.min_scale = 0.2;
        assert!(config.validate().is_err());

        let mut config = VeilConfig::default();
        config.drag_dismiss_velocity = f32::NAN;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for 'drag_dismiss_velocity': must be finite and non-negative"
        );
    }

    #[test]
    fn builders() {
        let config = VeilConfig::default()
            .reduced_motion(true)
            .durations(Duration::ZERO, Duration::from_millis(10));
        assert!(config.reduced_motion);
        assert_eq!(config.enter_duration, Duration::ZERO);
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn toml_overlays_defaults() {
        let config = VeilConfig::from_toml_str(
            "enter_ms = 250\ntoast_limit = 5\nreduced_motion = true\n",
        )
        .expect("valid toml");
        assert_eq!(config.enter_duration, Duration::from_millis(250));
        assert_eq!(config.toast_limit, 5);
        assert!(config.reduced_motion);
        assert_eq!(config.exit_duration, Duration::from_millis(150));
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn toml_rejects_unknown_keys_and_bad_ranges() {
        assert!(matches!(
            VeilConfig::from_toml_str("bogus = 1"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            VeilConfig::from_toml_str("min_scale = 2.0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            VeilConfig::from_toml_file("/nonexistent/veil.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
