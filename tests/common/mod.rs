//! Shared test fixtures for integration tests.

use aqi_sim::config::DashboardConfig;
use aqi_sim::dataset::DatasetRegistry;
use aqi_sim::forecast::{ForecastGenerator, RandomSource, SeededSource};

/// Source that returns the same value forever.
pub struct ConstSource(pub f64);

impl RandomSource for ConstSource {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Source that cycles through a scripted sequence of values.
pub struct ScriptedSource {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "script must not be empty");
        Self { values, next: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

/// Default configuration (horizon 24, start hour 8, seed 42, window 7).
pub fn default_config() -> DashboardConfig {
    DashboardConfig::default()
}

/// Demo registry built with the default generator and a fixed seed.
pub fn seeded_registry() -> DatasetRegistry {
    let cfg = default_config();
    let mut rng = SeededSource::new(cfg.forecast.seed);
    DatasetRegistry::seeded(
        &ForecastGenerator::default(),
        cfg.forecast.horizon,
        cfg.forecast.start_hour,
        cfg.history.window,
        &mut rng,
    )
    .expect("default config should build the demo registry")
}
