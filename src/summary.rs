//! Scalar summaries derived from a forecast or history series.
//!
//! Everything here is a pure function over an already-produced sequence.
//! Generated and externally injected series go through the same code
//! paths; nothing special-cases provenance.

use serde::Deserialize;

use crate::error::CoreError;

/// Returns the final element of the series, rounded half away from zero.
///
/// Generated series are already integral, but external feeds may supply
/// real-valued elements, so rounding is applied unconditionally.
///
/// # Errors
///
/// Returns `CoreError::EmptyInput` if the series is empty.
pub fn next_horizon_value(series: &[f64]) -> Result<i64, CoreError> {
    match series.last() {
        Some(v) => Ok(v.round() as i64),
        None => Err(CoreError::EmptyInput("next_horizon_value")),
    }
}

/// Arithmetic mean of the series, rounded half away from zero.
///
/// # Errors
///
/// Returns `CoreError::EmptyInput` if the series is empty; the division
/// by zero never reaches the caller as an arithmetic fault.
pub fn rolling_average(series: &[f64]) -> Result<i64, CoreError> {
    if series.is_empty() {
        return Err(CoreError::EmptyInput("rolling_average"));
    }
    let sum: f64 = series.iter().sum();
    Ok((sum / series.len() as f64).round() as i64)
}

/// Ordered AQI severity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Display label for the band.
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Severity rank, 0 (Good) through 5 (Hazardous).
    pub fn severity(&self) -> u8 {
        match self {
            AqiCategory::Good => 0,
            AqiCategory::Moderate => 1,
            AqiCategory::UnhealthyForSensitiveGroups => 2,
            AqiCategory::Unhealthy => 3,
            AqiCategory::VeryUnhealthy => 4,
            AqiCategory::Hazardous => 5,
        }
    }
}

/// Inclusive upper bounds for the first five severity bands.
///
/// Everything above `very_unhealthy_max` is Hazardous. Boundaries belong
/// to the lower band.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryThresholds {
    pub good_max: f64,
    pub moderate_max: f64,
    pub sensitive_max: f64,
    pub unhealthy_max: f64,
    pub very_unhealthy_max: f64,
}

impl Default for CategoryThresholds {
    fn default() -> Self {
        Self {
            good_max: 50.0,
            moderate_max: 100.0,
            sensitive_max: 150.0,
            unhealthy_max: 200.0,
            very_unhealthy_max: 300.0,
        }
    }
}

impl CategoryThresholds {
    /// Maps an index value to its severity band.
    ///
    /// Total over f64: every value lands in exactly one band.
    pub fn classify(&self, value: f64) -> AqiCategory {
        if value <= self.good_max {
            AqiCategory::Good
        } else if value <= self.moderate_max {
            AqiCategory::Moderate
        } else if value <= self.sensitive_max {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if value <= self.unhealthy_max {
            AqiCategory::Unhealthy
        } else if value <= self.very_unhealthy_max {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }
}

/// Classifies with the standard band thresholds.
pub fn classify(value: f64) -> AqiCategory {
    CategoryThresholds::default().classify(value)
}

/// Forecast-driven alert levels consumed by banner UIs.
///
/// A tagged value only; mapping levels to messages or notifications is
/// the consumer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    None,
    Caution,
    Severe,
}

impl AlertLevel {
    /// Short lowercase label for export and logs.
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::None => "none",
            AlertLevel::Caution => "caution",
            AlertLevel::Severe => "severe",
        }
    }
}

/// Cut points for forecast alerting.
///
/// Deliberately independent of [`CategoryThresholds`]: the two sets
/// overlap but are tuned separately.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertThresholds {
    /// Values strictly above this raise at least a caution.
    pub caution_above: f64,
    /// Values strictly above this raise a severe alert.
    pub severe_above: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            caution_above: 100.0,
            severe_above: 150.0,
        }
    }
}

impl AlertThresholds {
    /// Derives the alert level for a next-horizon index value.
    pub fn alert_level(&self, next_value: f64) -> AlertLevel {
        if next_value > self.severe_above {
            AlertLevel::Severe
        } else if next_value > self.caution_above {
            AlertLevel::Caution
        } else {
            AlertLevel::None
        }
    }
}

/// Derives the alert level with the standard cut points.
pub fn alert_level(next_value: f64) -> AlertLevel {
    AlertThresholds::default().alert_level(next_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_horizon_value_takes_last_element() {
        assert_eq!(next_horizon_value(&[152.0, 168.0, 187.0]), Ok(187));
    }

    #[test]
    fn next_horizon_value_rounds_real_input() {
        assert_eq!(next_horizon_value(&[101.4]), Ok(101));
        assert_eq!(next_horizon_value(&[101.5]), Ok(102));
    }

    #[test]
    fn next_horizon_value_rejects_empty_series() {
        let err = next_horizon_value(&[]).unwrap_err();
        assert_eq!(err, CoreError::EmptyInput("next_horizon_value"));
    }

    #[test]
    fn rolling_average_rounds_mean() {
        let week = [152.0, 168.0, 175.0, 182.0, 178.0, 191.0, 187.0];
        assert_eq!(rolling_average(&week), Ok(176));
    }

    #[test]
    fn rolling_average_rejects_empty_series() {
        let err = rolling_average(&[]).unwrap_err();
        assert_eq!(err, CoreError::EmptyInput("rolling_average"));
    }

    #[test]
    fn classify_boundaries_belong_to_lower_band() {
        assert_eq!(classify(50.0), AqiCategory::Good);
        assert_eq!(classify(51.0), AqiCategory::Moderate);
        assert_eq!(classify(100.0), AqiCategory::Moderate);
        assert_eq!(classify(150.0), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(classify(200.0), AqiCategory::Unhealthy);
        assert_eq!(classify(300.0), AqiCategory::VeryUnhealthy);
        assert_eq!(classify(301.0), AqiCategory::Hazardous);
    }

    #[test]
    fn classify_is_total_over_extremes() {
        assert_eq!(classify(-10.0), AqiCategory::Good);
        assert_eq!(classify(0.0), AqiCategory::Good);
        assert_eq!(classify(10_000.0), AqiCategory::Hazardous);
    }

    #[test]
    fn severity_ranks_are_ordered() {
        let bands = [
            AqiCategory::Good,
            AqiCategory::Moderate,
            AqiCategory::UnhealthyForSensitiveGroups,
            AqiCategory::Unhealthy,
            AqiCategory::VeryUnhealthy,
            AqiCategory::Hazardous,
        ];
        for (rank, band) in bands.iter().enumerate() {
            assert_eq!(band.severity() as usize, rank);
        }
    }

    #[test]
    fn alert_level_cut_points() {
        assert_eq!(alert_level(100.0), AlertLevel::None);
        assert_eq!(alert_level(101.0), AlertLevel::Caution);
        assert_eq!(alert_level(150.0), AlertLevel::Caution);
        assert_eq!(alert_level(151.0), AlertLevel::Severe);
    }

    #[test]
    fn classify_and_alert_are_idempotent() {
        assert_eq!(classify(142.0), classify(142.0));
        assert_eq!(alert_level(142.0), alert_level(142.0));
    }

    #[test]
    fn custom_thresholds_shift_bands() {
        let strict = CategoryThresholds {
            good_max: 25.0,
            ..CategoryThresholds::default()
        };
        assert_eq!(strict.classify(30.0), AqiCategory::Moderate);
        assert_eq!(classify(30.0), AqiCategory::Good);
    }
}
