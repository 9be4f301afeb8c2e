//! Simulated telemetry refresh for a city dataset.

use crate::dataset::{ChannelLimits, CityDataset, ForecastSeries};
use crate::error::CoreError;
use crate::forecast::{ForecastGenerator, RandomSource};

/// One simulated refresh cycle over a city dataset.
///
/// Mirrors a periodic telemetry update in three steps: every channel
/// takes a small zero-centered uniform step and is clamped to its valid
/// range, the rounded index rolls into the history window, and the
/// forecast is regenerated wholesale from the new index. Each
/// invocation is independent and synchronous; overlap prevention is the
/// caller's concern if real I/O is ever wrapped around this.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshCycle {
    pub limits: ChannelLimits,
    pub generator: ForecastGenerator,
    pub horizon: usize,
    pub start_hour: u8,
}

impl RefreshCycle {
    pub fn new(
        limits: ChannelLimits,
        generator: ForecastGenerator,
        horizon: usize,
        start_hour: u8,
    ) -> Self {
        Self {
            limits,
            generator,
            horizon,
            start_hour,
        }
    }

    /// Applies one refresh cycle in place.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the configured horizon or
    /// start hour is out of range (propagated from the generator).
    pub fn apply(
        &self,
        dataset: &mut CityDataset,
        rng: &mut dyn RandomSource,
    ) -> Result<(), CoreError> {
        let c = &mut dataset.current;
        c.aqi = self.limits.aqi.clamp(c.aqi + step(rng, self.limits.aqi.step));
        c.pm25 = self
            .limits
            .pm25
            .clamp(c.pm25 + step(rng, self.limits.pm25.step));
        c.pm10 = self
            .limits
            .pm10
            .clamp(c.pm10 + step(rng, self.limits.pm10.step));
        c.no2 = self.limits.no2.clamp(c.no2 + step(rng, self.limits.no2.step));
        c.o3 = self.limits.o3.clamp(c.o3 + step(rng, self.limits.o3.step));
        c.so2 = self.limits.so2.clamp(c.so2 + step(rng, self.limits.so2.step));
        c.co = self.limits.co.clamp(c.co + step(rng, self.limits.co.step));

        dataset.history.push(c.aqi.round());

        let values = self
            .generator
            .generate(c.aqi, self.horizon, self.start_hour, rng)?;
        dataset.forecast = ForecastSeries::new(values, self.start_hour);
        Ok(())
    }
}

/// Zero-centered uniform step of the given full width.
fn step(rng: &mut dyn RandomSource, width: f64) -> f64 {
    (rng.next_unit() - 0.5) * width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetRegistry, HistorySeries};
    use crate::forecast::SeededSource;

    fn delhi() -> CityDataset {
        let g = ForecastGenerator::default();
        let mut rng = SeededSource::new(42);
        let registry = DatasetRegistry::seeded(&g, 24, 8, 7, &mut rng).unwrap();
        registry.get("delhi").unwrap().clone()
    }

    fn cycle() -> RefreshCycle {
        RefreshCycle::new(ChannelLimits::default(), ForecastGenerator::default(), 24, 8)
    }

    #[test]
    fn refresh_rolls_history_fifo() {
        let mut d = delhi();
        let oldest = d.history.values()[0];
        let second = d.history.values()[1];
        let mut rng = SeededSource::new(1);
        cycle().apply(&mut d, &mut rng).unwrap();
        assert_eq!(d.history.len(), 7);
        assert_eq!(d.history.values()[0], second);
        assert!(!d.history.values().contains(&oldest) || oldest == second);
        assert_eq!(*d.history.values().last().unwrap(), d.current.aqi.round());
    }

    #[test]
    fn refresh_replaces_forecast_wholesale() {
        let mut d = delhi();
        let before = d.forecast.clone();
        let mut rng = SeededSource::new(1);
        cycle().apply(&mut d, &mut rng).unwrap();
        assert_eq!(d.forecast.horizon(), 24);
        assert_ne!(d.forecast, before);
    }

    #[test]
    fn channels_stay_within_bounds_under_many_cycles() {
        let limits = ChannelLimits::default();
        let mut d = delhi();
        let c = cycle();
        let mut rng = SeededSource::new(9);
        for _ in 0..500 {
            c.apply(&mut d, &mut rng).unwrap();
            let r = d.current;
            assert!(r.aqi >= limits.aqi.min && r.aqi <= limits.aqi.max);
            assert!(r.pm25 >= limits.pm25.min && r.pm25 <= limits.pm25.max);
            assert!(r.pm10 >= limits.pm10.min && r.pm10 <= limits.pm10.max);
            assert!(r.no2 >= limits.no2.min && r.no2 <= limits.no2.max);
            assert!(r.o3 >= limits.o3.min && r.o3 <= limits.o3.max);
            assert!(r.so2 >= limits.so2.min && r.so2 <= limits.so2.max);
            assert!(r.co >= limits.co.min && r.co <= limits.co.max);
        }
    }

    #[test]
    fn refresh_is_deterministic_for_fixed_seed() {
        let mut a = delhi();
        let mut b = delhi();
        let c = cycle();
        let mut rng_a = SeededSource::new(5);
        let mut rng_b = SeededSource::new(5);
        c.apply(&mut a, &mut rng_a).unwrap();
        c.apply(&mut b, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn refresh_with_partial_history_grows_window() {
        let mut d = delhi();
        d.history = HistorySeries::new(7);
        let mut rng = SeededSource::new(3);
        cycle().apply(&mut d, &mut rng).unwrap();
        assert_eq!(d.history.len(), 1);
    }
}
