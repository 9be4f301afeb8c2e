//! TOML-based dashboard configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::dataset::ChannelLimits;
use crate::forecast::{ForecastGenerator, VariationRange};
use crate::summary::{AlertThresholds, CategoryThresholds};

/// Top-level configuration parsed from TOML.
///
/// All fields default to the built-in demo values. Load from TOML with
/// [`DashboardConfig::from_toml_file`] or start from `Default`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Forecast model parameters.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// History window parameters.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Per-channel valid ranges and perturbation steps.
    #[serde(default)]
    pub channels: ChannelLimits,
    /// Severity band cut points.
    #[serde(default)]
    pub categories: CategoryThresholds,
    /// Alert cut points, independent of the severity bands.
    #[serde(default)]
    pub alerts: AlertThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig::default(),
            history: HistoryConfig::default(),
            channels: ChannelLimits::default(),
            categories: CategoryThresholds::default(),
            alerts: AlertThresholds::default(),
        }
    }
}

/// Forecast model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Number of hourly steps to forecast (must be > 0).
    pub horizon: usize,
    /// Hour of day the forecast starts from (0..=23).
    pub start_hour: u8,
    /// Master random seed.
    pub seed: u64,
    /// Instrument range floor for generated values.
    pub floor: f64,
    /// Instrument range ceiling for generated values.
    pub ceiling: f64,
    /// Morning rush variation range.
    pub morning: VariationRange,
    /// Evening rush variation range.
    pub evening: VariationRange,
    /// Night variation range (net negative).
    pub night: VariationRange,
    /// Daytime baseline variation range.
    pub daytime: VariationRange,
    /// Center offset of the drift term as a fraction of `drift_span`.
    pub drift_bias: f64,
    /// Full width of the uniform drift term.
    pub drift_span: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let g = ForecastGenerator::default();
        Self {
            horizon: 24,
            start_hour: 8,
            seed: 42,
            floor: g.floor,
            ceiling: g.ceiling,
            morning: g.morning,
            evening: g.evening,
            night: g.night,
            daytime: g.daytime,
            drift_bias: g.drift_bias,
            drift_span: g.drift_span,
        }
    }
}

impl ForecastConfig {
    /// Builds the generator configured by this section.
    ///
    /// Band hour windows are fixed model constants; only ranges, drift,
    /// and bounds are tunable here.
    pub fn generator(&self) -> ForecastGenerator {
        ForecastGenerator {
            morning: self.morning,
            evening: self.evening,
            night: self.night,
            daytime: self.daytime,
            drift_bias: self.drift_bias,
            drift_span: self.drift_span,
            floor: self.floor,
            ceiling: self.ceiling,
            ..ForecastGenerator::default()
        }
    }
}

/// History window parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Number of past index values retained (must be > 0).
    pub window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { window: 7 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"forecast.horizon"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl DashboardConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let f = &self.forecast;

        if f.horizon == 0 {
            errors.push(ConfigError {
                field: "forecast.horizon".into(),
                message: "must be > 0".into(),
            });
        }
        if f.start_hour > 23 {
            errors.push(ConfigError {
                field: "forecast.start_hour".into(),
                message: "must be in 0..=23".into(),
            });
        }
        if f.floor >= f.ceiling {
            errors.push(ConfigError {
                field: "forecast.floor".into(),
                message: "must be < forecast.ceiling".into(),
            });
        }
        if f.drift_span < 0.0 {
            errors.push(ConfigError {
                field: "forecast.drift_span".into(),
                message: "must be >= 0".into(),
            });
        }
        for (name, range) in [
            ("forecast.morning", f.morning),
            ("forecast.evening", f.evening),
            ("forecast.night", f.night),
            ("forecast.daytime", f.daytime),
        ] {
            if range.low > range.high {
                errors.push(ConfigError {
                    field: name.into(),
                    message: format!("low {} must be <= high {}", range.low, range.high),
                });
            }
        }

        if self.history.window == 0 {
            errors.push(ConfigError {
                field: "history.window".into(),
                message: "must be > 0".into(),
            });
        }

        let ch = &self.channels;
        for (name, bounds) in [
            ("channels.aqi", ch.aqi),
            ("channels.pm25", ch.pm25),
            ("channels.pm10", ch.pm10),
            ("channels.no2", ch.no2),
            ("channels.o3", ch.o3),
            ("channels.so2", ch.so2),
            ("channels.co", ch.co),
        ] {
            if bounds.min > bounds.max {
                errors.push(ConfigError {
                    field: name.into(),
                    message: format!("min {} must be <= max {}", bounds.min, bounds.max),
                });
            }
            if bounds.step < 0.0 {
                errors.push(ConfigError {
                    field: name.into(),
                    message: "step must be >= 0".into(),
                });
            }
        }

        let c = &self.categories;
        let bands = [
            c.good_max,
            c.moderate_max,
            c.sensitive_max,
            c.unhealthy_max,
            c.very_unhealthy_max,
        ];
        if bands.windows(2).any(|w| w[0] >= w[1]) {
            errors.push(ConfigError {
                field: "categories".into(),
                message: "band upper bounds must be strictly increasing".into(),
            });
        }

        if self.alerts.caution_above > self.alerts.severe_above {
            errors.push(ConfigError {
                field: "alerts.caution_above".into(),
                message: "must be <= alerts.severe_above".into(),
            });
        }

        errors
    }
}
