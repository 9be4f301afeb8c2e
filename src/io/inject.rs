//! External dataset injection, bypassing the forecast generator.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::dataset::{ChannelLimits, DatasetRegistry, ForecastSeries, HistorySeries, ReadingSet};

/// Externally sourced replacement data for one city.
///
/// `current` is required; `history` and `forecast` replace the stored
/// series only when present. Channel values are clamped to their
/// declared ranges on ingest, and the summary functions treat injected
/// series exactly like generated ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InjectionPayload {
    /// City identifier the payload targets.
    pub city: String,
    /// Replacement readings.
    pub current: ReadingSet,
    /// Replacement index history, oldest first.
    #[serde(default)]
    pub history: Option<Vec<f64>>,
    /// Replacement forecast values.
    #[serde(default)]
    pub forecast: Option<Vec<i64>>,
    /// Hour of day the injected forecast starts from (defaults to the
    /// stored forecast's start hour).
    #[serde(default)]
    pub forecast_start_hour: Option<u8>,
}

/// Injection failure: unreadable file, malformed JSON, or a payload that
/// does not fit the registry.
#[derive(Debug)]
pub struct InjectError {
    pub message: String,
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injection error: {}", self.message)
    }
}

impl InjectionPayload {
    /// Parses a payload from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an `InjectError` if the file cannot be read or the JSON
    /// is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, InjectError> {
        let content = fs::read_to_string(path).map_err(|e| InjectError {
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_json_str(&content)
    }

    /// Parses a payload from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an `InjectError` if the JSON is invalid or contains
    /// unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, InjectError> {
        serde_json::from_str(s).map_err(|e| InjectError {
            message: e.to_string(),
        })
    }

    /// Applies the payload to the registry, replacing the city's data
    /// wholesale.
    ///
    /// # Errors
    ///
    /// Returns an `InjectError` if the city is unknown or the forecast
    /// start hour is out of range.
    pub fn apply(
        &self,
        registry: &mut DatasetRegistry,
        limits: &ChannelLimits,
    ) -> Result<(), InjectError> {
        if let Some(h) = self.forecast_start_hour {
            if h > 23 {
                return Err(InjectError {
                    message: format!("forecast_start_hour must be in 0..=23, got {h}"),
                });
            }
        }
        let Some(dataset) = registry.get_mut(&self.city) else {
            return Err(InjectError {
                message: format!("unknown city \"{}\"", self.city),
            });
        };

        dataset.current = self.current.clamped(limits);
        if let Some(history) = &self.history {
            dataset.history = HistorySeries::from_values(history, dataset.history.window());
        }
        if let Some(forecast) = &self.forecast {
            let start = self
                .forecast_start_hour
                .unwrap_or_else(|| dataset.forecast.start_hour());
            dataset.forecast = ForecastSeries::new(forecast.clone(), start);
        }
        Ok(())
    }
}
