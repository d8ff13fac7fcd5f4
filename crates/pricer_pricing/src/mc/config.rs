//! Monte Carlo simulation configuration.
//!
//! This module provides [`MonteCarloConfig`] and its builder. A configuration
//! fixes the number of paths, the simulated days per year, an optional seed
//! and whether paths are simulated in parallel.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::rng::PricerRng;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Default number of paths for a quick evaluation.
pub const DEFAULT_PATHS: usize = 5_000;

/// Default number of simulated trading days per year.
pub const DEFAULT_DAYS_PER_YEAR: u32 = 252;

/// Monte Carlo simulation configuration.
///
/// Use [`MonteCarloConfigBuilder`] to construct validated instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.days_per_year(), 252);
/// assert!(!config.parallel());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of simulation paths.
    n_paths: usize,
    /// Simulated days per year; one step per day.
    days_per_year: u32,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Simulate paths on the rayon thread pool.
    parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_paths: DEFAULT_PATHS,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
            seed: None,
            parallel: false,
        }
    }
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of simulated days per year.
    #[inline]
    pub fn days_per_year(&self) -> u32 {
        self.days_per_year
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns `true` if paths are simulated in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Number of daily steps spanning `maturity` years.
    #[inline]
    pub fn steps_for(&self, maturity: f64) -> usize {
        (f64::from(self.days_per_year) * maturity).floor() as usize
    }

    /// Creates the run generator: seeded when a seed is configured,
    /// otherwise from operating system entropy.
    pub fn rng(&self) -> PricerRng {
        match self.seed {
            Some(seed) => PricerRng::from_seed(seed),
            None => PricerRng::from_entropy(),
        }
    }

    /// Returns a copy with a different path count, validated.
    pub fn with_n_paths(&self, n_paths: usize) -> Result<Self, ConfigError> {
        let config = Self {
            n_paths,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than [`MAX_PATHS`]
    /// - `days_per_year` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.days_per_year == 0 {
            return Err(ConfigError::InvalidDaysPerYear(self.days_per_year));
        }
        Ok(())
    }

    /// Validates a product duration against this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the maturity is not positive or spans no
    /// whole simulated day.
    pub fn validate_maturity(&self, maturity: f64) -> Result<usize, ConfigError> {
        if !maturity.is_finite() || maturity <= 0.0 {
            return Err(ConfigError::InvalidMaturity(maturity));
        }
        let steps = self.steps_for(maturity);
        if steps == 0 {
            return Err(ConfigError::NoSteps {
                maturity,
                days_per_year: self.days_per_year,
            });
        }
        Ok(steps)
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(50_000)
///     .days_per_year(365)
///     .parallel(true)
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.steps_for(1.0), 365);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    days_per_year: Option<u32>,
    seed: Option<u64>,
    parallel: bool,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths, in [1, MAX_PATHS].
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the simulated days per year (default 252).
    #[inline]
    pub fn days_per_year(mut self, days_per_year: u32) -> Self {
        self.days_per_year = Some(days_per_year);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enables parallel path simulation.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the path count or days per year is invalid.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let config = MonteCarloConfig {
            n_paths: self.n_paths.unwrap_or(DEFAULT_PATHS),
            days_per_year: self.days_per_year.unwrap_or(DEFAULT_DAYS_PER_YEAR),
            seed: self.seed,
            parallel: self.parallel,
        };

        config.validate()?;
        Ok(config)
    }
}
