//! Greeks calculation settings.

use serde::{Deserialize, Serialize};

use crate::mc::{ConfigError, MonteCarloConfig};

/// Source of vega, theta and rho for non-vanilla products.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreeksMode {
    /// Indicative proxies:
    /// vega = expected return × 0.1, theta = -V(S)·0.01 / (maturity·365),
    /// rho = S·0.01.
    #[default]
    Proxy,
    /// Monte Carlo reprice under bumped volatility, maturity and rate,
    /// sharing one seed across all bumps.
    BumpReprice,
}

/// Greeks calculation settings.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::{GreeksConfig, GreeksMode};
///
/// let config = GreeksConfig::builder()
///     .mode(GreeksMode::BumpReprice)
///     .vol_bump(0.005)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.spot_bump, 0.001);
/// assert_eq!(config.vol_bump, 0.005);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreeksConfig {
    /// Vega/theta/rho source for non-vanilla products.
    pub mode: GreeksMode,
    /// Relative spot bump for delta and gamma.
    pub spot_bump: f64,
    /// Absolute volatility bump.
    pub vol_bump: f64,
    /// Maturity shortening for theta, in years.
    pub time_bump: f64,
    /// Absolute rate bump.
    pub rate_bump: f64,
    /// Simulation used by [`GreeksMode::BumpReprice`].
    pub simulation: MonteCarloConfig,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            mode: GreeksMode::Proxy,
            spot_bump: 0.001,
            vol_bump: 0.01,
            time_bump: 1.0 / 365.0,
            rate_bump: 0.0001,
            simulation: MonteCarloConfig::default(),
        }
    }
}

impl GreeksConfig {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> GreeksConfigBuilder {
        GreeksConfigBuilder::default()
    }

    /// Checks that every bump is positive and finite and the spot bump
    /// below 100%.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bumps = [
            ("spot_bump", self.spot_bump),
            ("vol_bump", self.vol_bump),
            ("time_bump", self.time_bump),
            ("rate_bump", self.rate_bump),
        ];
        for (name, value) in bumps {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value: format!("must be positive and finite, got {}", value),
                });
            }
        }
        if self.spot_bump >= 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "spot_bump",
                value: format!("must be below 1, got {}", self.spot_bump),
            });
        }
        self.simulation.validate()
    }
}

/// Builder for [`GreeksConfig`].
#[derive(Clone, Debug, Default)]
pub struct GreeksConfigBuilder {
    config: GreeksConfig,
}

impl GreeksConfigBuilder {
    /// Sets the mode.
    pub fn mode(mut self, mode: GreeksMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Sets the relative spot bump.
    pub fn spot_bump(mut self, bump: f64) -> Self {
        self.config.spot_bump = bump;
        self
    }

    /// Sets the absolute volatility bump.
    pub fn vol_bump(mut self, bump: f64) -> Self {
        self.config.vol_bump = bump;
        self
    }

    /// Sets the maturity shortening for theta.
    pub fn time_bump(mut self, bump: f64) -> Self {
        self.config.time_bump = bump;
        self
    }

    /// Sets the absolute rate bump.
    pub fn rate_bump(mut self, bump: f64) -> Self {
        self.config.rate_bump = bump;
        self
    }

    /// Sets the repricing simulation.
    pub fn simulation(mut self, simulation: MonteCarloConfig) -> Self {
        self.config.simulation = simulation;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<GreeksConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
