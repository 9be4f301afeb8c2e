//! Forecast generation: a bounded random walk with diurnal traffic peaks.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::error::CoreError;

/// Capability for producing uniform random values in `[0, 1)`.
///
/// The generator draws all of its randomness through this trait so that
/// tests can inject deterministic sources and assert exact output
/// sequences.
pub trait RandomSource {
    /// Returns the next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Seeded random source backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Creates a source that replays the same sequence for the same seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Uniform variation range for one time-of-day band.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariationRange {
    /// Lower end of the band.
    pub low: f64,
    /// Upper end of the band.
    pub high: f64,
}

impl VariationRange {
    /// Draws one value uniformly from the range.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> f64 {
        self.low + rng.next_unit() * (self.high - self.low)
    }
}

/// Synthetic hourly forecast model for an air quality index.
///
/// Models diurnal pollution cycles: morning and evening traffic peaks
/// push the index up, night hours pull it down, and a slightly negative
/// drift term offsets the peak pressure over long horizons. The running
/// base is clamped to the instrument range every step; rounding applies
/// to emitted values only, never to the carried state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastGenerator {
    /// Morning rush window, inclusive hour bounds.
    pub morning_hours: (u8, u8),
    /// Evening rush window, inclusive hour bounds.
    pub evening_hours: (u8, u8),
    /// Night starts at this hour (inclusive, wrapping past midnight).
    pub night_from: u8,
    /// Night ends at this hour (inclusive).
    pub night_until: u8,
    /// Variation drawn during the morning rush.
    pub morning: VariationRange,
    /// Variation drawn during the evening rush.
    pub evening: VariationRange,
    /// Variation drawn at night (net negative).
    pub night: VariationRange,
    /// Variation drawn during the daytime baseline.
    pub daytime: VariationRange,
    /// Center offset of the drift term as a fraction of `drift_span`.
    pub drift_bias: f64,
    /// Full width of the uniform drift term.
    pub drift_span: f64,
    /// Instrument range floor for generated values.
    pub floor: f64,
    /// Instrument range ceiling for generated values.
    pub ceiling: f64,
}

impl Default for ForecastGenerator {
    fn default() -> Self {
        Self {
            morning_hours: (7, 9),
            evening_hours: (18, 20),
            night_from: 23,
            night_until: 5,
            morning: VariationRange {
                low: 10.0,
                high: 25.0,
            },
            evening: VariationRange {
                low: 8.0,
                high: 20.0,
            },
            night: VariationRange {
                low: -15.0,
                high: -5.0,
            },
            daytime: VariationRange {
                low: -5.0,
                high: 5.0,
            },
            drift_bias: 0.48,
            drift_span: 5.0,
            floor: 30.0,
            ceiling: 400.0,
        }
    }
}

impl ForecastGenerator {
    /// Generates a bounded forecast of `horizon` hourly steps.
    ///
    /// `seed` is the current index value the walk starts from; values
    /// outside the clamp bounds are pulled back on the first step rather
    /// than rejected. Each step draws a band variation for its hour of
    /// day plus an independent drift term, advances the unrounded base,
    /// clamps it, and emits the rounded value.
    ///
    /// # Arguments
    ///
    /// * `seed` - Current index value the walk starts from
    /// * `horizon` - Number of hourly steps to produce (must be >= 1)
    /// * `start_hour` - Hour of day of the first step (0..=23)
    /// * `rng` - Random source driving both perturbation terms
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if `horizon` is zero or
    /// `start_hour` is not in `0..=23`.
    pub fn generate(
        &self,
        seed: f64,
        horizon: usize,
        start_hour: u8,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<i64>, CoreError> {
        if horizon == 0 {
            return Err(CoreError::InvalidArgument(
                "horizon must be >= 1".to_string(),
            ));
        }
        if start_hour > 23 {
            return Err(CoreError::InvalidArgument(format!(
                "start_hour must be in 0..=23, got {start_hour}"
            )));
        }

        let mut base = seed;
        let mut series = Vec::with_capacity(horizon);
        for i in 0..horizon {
            let hour = ((start_hour as usize + i) % 24) as u8;
            let variation = self.band_for(hour).sample(rng);
            let drift = (rng.next_unit() - self.drift_bias) * self.drift_span;
            base = (base + variation + drift).clamp(self.floor, self.ceiling);
            series.push(base.round() as i64);
        }
        Ok(series)
    }

    /// Selects the variation range in effect at the given hour of day.
    ///
    /// Rush windows take precedence over the night window.
    pub fn band_for(&self, hour: u8) -> VariationRange {
        if hour >= self.morning_hours.0 && hour <= self.morning_hours.1 {
            self.morning
        } else if hour >= self.evening_hours.0 && hour <= self.evening_hours.1 {
            self.evening
        } else if hour >= self.night_from || hour <= self.night_until {
            self.night
        } else {
            self.daytime
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that returns the same value forever.
    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn length_matches_horizon() {
        let g = ForecastGenerator::default();
        for horizon in [1, 7, 24, 48] {
            let mut rng = SeededSource::new(42);
            let series = g.generate(100.0, horizon, 0, &mut rng);
            assert_eq!(series.map(|s| s.len()), Ok(horizon));
        }
    }

    #[test]
    fn every_element_within_instrument_range() {
        let g = ForecastGenerator::default();
        let mut rng = SeededSource::new(7);
        let series = g.generate(187.0, 200, 8, &mut rng).unwrap();
        for (i, &v) in series.iter().enumerate() {
            assert!((30..=400).contains(&v), "series[{i}] = {v} out of range");
        }
    }

    #[test]
    fn exact_sequence_with_fixed_source() {
        // Midpoint draws: morning variation 17.5, daytime variation 0.0,
        // drift (0.5 - 0.48) * 5 = 0.1 every step.
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.5);
        let series = g.generate(100.0, 3, 8, &mut rng).unwrap();
        assert_eq!(series, vec![118, 135, 135]);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.5);
        let err = g.generate(100.0, 0, 8, &mut rng).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn out_of_range_start_hour_is_rejected() {
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.5);
        let err = g.generate(100.0, 24, 24, &mut rng).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn seed_above_ceiling_is_clamped_not_rejected() {
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.5);
        let series = g.generate(1000.0, 1, 12, &mut rng).unwrap();
        assert_eq!(series, vec![400]);
    }

    #[test]
    fn seed_below_floor_is_clamped_not_rejected() {
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.0);
        let series = g.generate(0.0, 1, 12, &mut rng).unwrap();
        assert_eq!(series, vec![30]);
    }

    #[test]
    fn sustained_upward_pressure_pins_at_ceiling() {
        // Near-maximal draws through morning, daytime, and evening bands
        // keep pushing the base past the ceiling for hours on end.
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.999);
        let series = g.generate(390.0, 24, 7, &mut rng).unwrap();
        assert!(series[..16].iter().all(|&v| v == 400), "{series:?}");
        assert!(series.iter().all(|&v| (30..=400).contains(&v)));
    }

    #[test]
    fn sustained_downward_pressure_pins_at_floor() {
        let g = ForecastGenerator::default();
        let mut rng = Fixed(0.0);
        let series = g.generate(50.0, 7, 23, &mut rng).unwrap();
        // Night draws of -15 plus drift -2.4 reach the floor by step 2.
        assert!(series[2..].iter().all(|&v| v == 30), "{series:?}");
    }

    #[test]
    fn same_seed_replays_same_sequence() {
        let g = ForecastGenerator::default();
        let mut a = SeededSource::new(42);
        let mut b = SeededSource::new(42);
        assert_eq!(
            g.generate(142.0, 24, 8, &mut a).unwrap(),
            g.generate(142.0, 24, 8, &mut b).unwrap()
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let g = ForecastGenerator::default();
        let mut a = SeededSource::new(42);
        let mut b = SeededSource::new(43);
        assert_ne!(
            g.generate(142.0, 24, 8, &mut a).unwrap(),
            g.generate(142.0, 24, 8, &mut b).unwrap()
        );
    }

    #[test]
    fn band_selection_by_hour() {
        let g = ForecastGenerator::default();
        assert_eq!(g.band_for(7), g.morning);
        assert_eq!(g.band_for(9), g.morning);
        assert_eq!(g.band_for(18), g.evening);
        assert_eq!(g.band_for(20), g.evening);
        assert_eq!(g.band_for(23), g.night);
        assert_eq!(g.band_for(0), g.night);
        assert_eq!(g.band_for(5), g.night);
        assert_eq!(g.band_for(6), g.daytime);
        assert_eq!(g.band_for(10), g.daytime);
        assert_eq!(g.band_for(17), g.daytime);
        assert_eq!(g.band_for(21), g.daytime);
        assert_eq!(g.band_for(22), g.daytime);
    }

    #[test]
    fn variation_range_endpoints() {
        let r = VariationRange {
            low: -15.0,
            high: -5.0,
        };
        let mut lo = Fixed(0.0);
        assert_eq!(r.sample(&mut lo), -15.0);
        let mut mid = Fixed(0.5);
        assert_eq!(r.sample(&mut mid), -10.0);
    }
}
