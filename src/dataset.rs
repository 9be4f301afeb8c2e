//! City dataset model: current readings, history window, and forecast.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::CoreError;
use crate::forecast::{ForecastGenerator, RandomSource};

/// Valid range and perturbation step width for one measurement channel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelBounds {
    /// Lowest valid reading.
    pub min: f64,
    /// Highest valid reading.
    pub max: f64,
    /// Full width of the zero-centered uniform perturbation step.
    pub step: f64,
}

impl ChannelBounds {
    /// Clamps a value into the channel's valid range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Per-channel bounds for the overall index and each concentration channel.
///
/// Defaults carry the realistic instrument ranges of the demo feed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelLimits {
    pub aqi: ChannelBounds,
    pub pm25: ChannelBounds,
    pub pm10: ChannelBounds,
    pub no2: ChannelBounds,
    pub o3: ChannelBounds,
    pub so2: ChannelBounds,
    pub co: ChannelBounds,
}

impl Default for ChannelLimits {
    fn default() -> Self {
        Self {
            aqi: ChannelBounds {
                min: 20.0,
                max: 500.0,
                step: 10.0,
            },
            pm25: ChannelBounds {
                min: 10.0,
                max: 250.0,
                step: 5.0,
            },
            pm10: ChannelBounds {
                min: 20.0,
                max: 400.0,
                step: 8.0,
            },
            no2: ChannelBounds {
                min: 5.0,
                max: 100.0,
                step: 3.0,
            },
            o3: ChannelBounds {
                min: 10.0,
                max: 80.0,
                step: 2.0,
            },
            so2: ChannelBounds {
                min: 5.0,
                max: 50.0,
                step: 2.0,
            },
            co: ChannelBounds {
                min: 0.3,
                max: 5.0,
                step: 0.1,
            },
        }
    }
}

/// Current pollutant readings for one city.
///
/// `aqi` is the overall index; the remaining channels are concentrations
/// in their native units (µg/m³ for particulates, ppb for gases, ppm
/// for CO).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingSet {
    pub aqi: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub co: f64,
}

impl ReadingSet {
    /// Returns a copy with every channel clamped to its declared range.
    pub fn clamped(&self, limits: &ChannelLimits) -> Self {
        Self {
            aqi: limits.aqi.clamp(self.aqi),
            pm25: limits.pm25.clamp(self.pm25),
            pm10: limits.pm10.clamp(self.pm10),
            no2: limits.no2.clamp(self.no2),
            o3: limits.o3.clamp(self.o3),
            so2: limits.so2.clamp(self.so2),
            co: limits.co.clamp(self.co),
        }
    }
}

/// Fixed-length sliding window of past index values, oldest first.
///
/// Once the window is full, each push evicts the oldest element before
/// appending the newest.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySeries {
    values: Vec<f64>,
    window: usize,
}

impl HistorySeries {
    /// Creates an empty window holding at most `window` values.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "history window must be > 0");
        Self {
            values: Vec::with_capacity(window),
            window,
        }
    }

    /// Seeds a window from existing values, keeping the newest `window`
    /// of them.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    pub fn from_values(values: &[f64], window: usize) -> Self {
        let mut series = Self::new(window);
        let start = values.len().saturating_sub(window);
        series.values.extend_from_slice(&values[start..]);
        series
    }

    /// Appends the newest value, evicting the oldest once full.
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.window {
            self.values.remove(0);
        }
        self.values.push(value);
    }

    /// The stored values, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Maximum number of values retained.
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An hourly forecast of index values, labeled in hours from generation
/// time.
///
/// Immutable once produced; regeneration replaces the series wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    values: Vec<i64>,
    start_hour: u8,
}

impl ForecastSeries {
    /// Wraps generated (or injected) forecast values.
    ///
    /// # Panics
    ///
    /// Panics if `start_hour` is not in `0..=23`.
    pub fn new(values: Vec<i64>, start_hour: u8) -> Self {
        assert!(start_hour <= 23, "start_hour must be in 0..=23");
        Self { values, start_hour }
    }

    /// The forecast values, earliest step first.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// The values widened to f64 for the summary functions.
    pub fn values_f64(&self) -> Vec<f64> {
        self.values.iter().map(|&v| v as f64).collect()
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Hour of day of the first step.
    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    /// Hour of day of the i-th step.
    pub fn hour_of_day(&self, i: usize) -> u8 {
        ((self.start_hour as usize + i) % 24) as u8
    }

    /// Display label of the i-th step ("0h", "1h", ...).
    pub fn label(&self, i: usize) -> String {
        format!("{i}h")
    }
}

/// One city's readings, history window, and forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct CityDataset {
    pub current: ReadingSet,
    pub history: HistorySeries,
    pub forecast: ForecastSeries,
}

/// Owns every city dataset, keyed by city identifier.
///
/// Iteration order is deterministic (sorted by id). Which city is
/// "active" is the caller's concern; the registry only stores data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, CityDataset>,
}

/// Demo city seed data: id, current readings, and a week of index history.
const SEED_CITIES: &[(&str, ReadingSet, [f64; 7])] = &[
    (
        "delhi",
        ReadingSet {
            aqi: 187.0,
            pm25: 95.0,
            pm10: 167.0,
            no2: 45.0,
            o3: 32.0,
            so2: 18.0,
            co: 1.2,
        },
        [152.0, 168.0, 175.0, 182.0, 178.0, 191.0, 187.0],
    ),
    (
        "mumbai",
        ReadingSet {
            aqi: 142.0,
            pm25: 72.0,
            pm10: 128.0,
            no2: 38.0,
            o3: 28.0,
            so2: 15.0,
            co: 0.9,
        },
        [128.0, 135.0, 138.0, 145.0, 139.0, 148.0, 142.0],
    ),
    (
        "bangalore",
        ReadingSet {
            aqi: 98.0,
            pm25: 48.0,
            pm10: 88.0,
            no2: 28.0,
            o3: 22.0,
            so2: 12.0,
            co: 0.6,
        },
        [85.0, 92.0, 88.0, 95.0, 91.0, 102.0, 98.0],
    ),
    (
        "kolkata",
        ReadingSet {
            aqi: 164.0,
            pm25: 82.0,
            pm10: 145.0,
            no2: 42.0,
            o3: 30.0,
            so2: 16.0,
            co: 1.0,
        },
        [145.0, 158.0, 162.0, 168.0, 155.0, 171.0, 164.0],
    ),
    (
        "chennai",
        ReadingSet {
            aqi: 115.0,
            pm25: 58.0,
            pm10: 102.0,
            no2: 32.0,
            o3: 25.0,
            so2: 13.0,
            co: 0.7,
        },
        [102.0, 108.0, 112.0, 118.0, 110.0, 122.0, 115.0],
    ),
    (
        "lucknow",
        ReadingSet {
            aqi: 195.0,
            pm25: 102.0,
            pm10: 175.0,
            no2: 48.0,
            o3: 35.0,
            so2: 20.0,
            co: 1.3,
        },
        [168.0, 182.0, 188.0, 192.0, 185.0, 198.0, 195.0],
    ),
];

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the built-in demo registry, generating each city's forecast
    /// from its current index value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if `horizon` is zero or
    /// `start_hour` is out of range (propagated from the generator).
    ///
    /// # Panics
    ///
    /// Panics if `history_window` is zero.
    pub fn seeded(
        generator: &ForecastGenerator,
        horizon: usize,
        start_hour: u8,
        history_window: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, CoreError> {
        let mut registry = Self::new();
        for (id, current, history) in SEED_CITIES {
            let values = generator.generate(current.aqi, horizon, start_hour, rng)?;
            registry.insert(
                *id,
                CityDataset {
                    current: *current,
                    history: HistorySeries::from_values(history, history_window),
                    forecast: ForecastSeries::new(values, start_hour),
                },
            );
        }
        Ok(registry)
    }

    pub fn insert(&mut self, id: impl Into<String>, dataset: CityDataset) {
        self.datasets.insert(id.into(), dataset);
    }

    pub fn get(&self, id: &str) -> Option<&CityDataset> {
        self.datasets.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CityDataset> {
        self.datasets.get_mut(id)
    }

    /// City identifiers in sorted order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
