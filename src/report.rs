//! Human-readable dashboard summary for one city.

use std::fmt;

use crate::dataset::{CityDataset, ReadingSet};
use crate::error::CoreError;
use crate::summary::{self, AlertLevel, AlertThresholds, AqiCategory, CategoryThresholds};

/// Scalar dashboard summary derived from one city dataset.
///
/// Computed post-hoc from the stored series so the displayed numbers
/// always agree with the data they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// City identifier.
    pub city: String,
    /// Current readings at derivation time.
    pub current: ReadingSet,
    /// Severity band of the current index.
    pub category: AqiCategory,
    /// Rounded mean of the history window.
    pub history_average: i64,
    /// Forecast value at the end of the horizon.
    pub next_horizon_aqi: i64,
    /// Rounded mean over the whole forecast.
    pub forecast_average: i64,
    /// Alert level derived from the next-horizon value.
    pub alert: AlertLevel,
}

impl DashboardReport {
    /// Derives the report for one city.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyInput` if the forecast or history series
    /// is empty.
    pub fn from_dataset(
        city: &str,
        dataset: &CityDataset,
        categories: &CategoryThresholds,
        alerts: &AlertThresholds,
    ) -> Result<Self, CoreError> {
        let forecast = dataset.forecast.values_f64();
        let next = summary::next_horizon_value(&forecast)?;
        Ok(Self {
            city: city.to_string(),
            current: dataset.current,
            category: categories.classify(dataset.current.aqi),
            history_average: summary::rolling_average(dataset.history.values())?,
            next_horizon_aqi: next,
            forecast_average: summary::rolling_average(&forecast)?,
            alert: alerts.alert_level(next as f64),
        })
    }

    /// Advisory text for the current alert level, if any.
    pub fn advisory(&self) -> Option<String> {
        match self.alert {
            AlertLevel::Severe => Some(format!(
                "Alert: unhealthy air quality expected tomorrow (AQI {}). \
                 Consider staying indoors and wearing a mask outside.",
                self.next_horizon_aqi
            )),
            AlertLevel::Caution => Some(format!(
                "Warning: air quality tomorrow may be unhealthy for sensitive \
                 groups (AQI {}). Take precautions if you are at risk.",
                self.next_horizon_aqi
            )),
            AlertLevel::None => None,
        }
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.city)?;
        writeln!(
            f,
            "Current AQI:       {:.0} ({})",
            self.current.aqi,
            self.category.label()
        )?;
        writeln!(f, "PM2.5:             {:.1} µg/m³", self.current.pm25)?;
        writeln!(f, "PM10:              {:.1} µg/m³", self.current.pm10)?;
        writeln!(f, "NO2:               {:.1} ppb", self.current.no2)?;
        writeln!(f, "O3:                {:.1} ppb", self.current.o3)?;
        writeln!(f, "SO2:               {:.1} ppb", self.current.so2)?;
        writeln!(f, "CO:                {:.1} ppm", self.current.co)?;
        writeln!(f, "History average:   {}", self.history_average)?;
        writeln!(f, "Tomorrow AQI:      {}", self.next_horizon_aqi)?;
        writeln!(f, "Forecast average:  {}", self.forecast_average)?;
        match self.advisory() {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "No alert."),
        }
    }
}
