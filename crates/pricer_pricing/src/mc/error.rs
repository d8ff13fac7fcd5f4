//! Error types for the Monte Carlo engine.
//!
//! [`ConfigError`] covers malformed run parameters; it is raised before any
//! random draw and converts into `PricingError::Configuration`.

use pricer_core::types::PricingError;
use thiserror::Error;

use super::config::MAX_PATHS;

/// Configuration error for a Monte Carlo run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Path count outside [1, MAX_PATHS].
    #[error("Invalid path count {0}: must be in range [1, {max}]", max = MAX_PATHS)]
    InvalidPathCount(usize),

    /// Zero simulated days per year.
    #[error("Invalid days per year {0}: must be positive")]
    InvalidDaysPerYear(u32),

    /// Non-positive or non-finite product duration.
    #[error("Invalid maturity {0}: must be positive and finite")]
    InvalidMaturity(f64),

    /// Maturity shorter than a single simulated day.
    #[error("Maturity {maturity} spans no simulation steps at {days_per_year} days per year")]
    NoSteps {
        /// Product duration in years.
        maturity: f64,
        /// Simulated days per year.
        days_per_year: u32,
    },

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::Configuration(err.to_string())
    }
}
