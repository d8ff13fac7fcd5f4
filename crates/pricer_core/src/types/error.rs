//! Error types for structured error handling.
//!
//! This module provides `PricingError`, the error taxonomy shared by every
//! layer of the pricer:
//!
//! - `Configuration`: the run itself is malformed (path count, duration,
//!   mismatched schedule arrays). Raised before any simulation starts.
//! - `Validation`: a contract or market snapshot is missing required data or
//!   holds out-of-range values. Raised before evaluation; never defaulted.
//! - `NumericDegeneracy`: a statistic is undefined for the given sample
//!   (zero variance, empty tail). Reported instead of NaN or infinity.
//! - `UnsupportedInstrument`: the operation is not defined for the variant.

use thiserror::Error;

/// Categorised pricing errors.
///
/// Provides structured error handling for pricing operations with
/// descriptive context for each failure mode.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::configuration("n_paths must be positive");
/// assert_eq!(format!("{}", err), "Configuration error: n_paths must be positive");
/// assert!(err.is_configuration());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid run configuration (path count, duration, schedule shape).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or invalid contract/market data.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Statistic undefined for the supplied sample.
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// Operation not defined for this product variant.
    #[error("Unsupported instrument: {0}")]
    UnsupportedInstrument(String),
}

impl PricingError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a numeric degeneracy error.
    pub fn degeneracy(msg: impl Into<String>) -> Self {
        Self::NumericDegeneracy(msg.into())
    }

    /// Create an unsupported instrument error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedInstrument(msg.into())
    }

    /// Returns `true` for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` for validation errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` for numeric degeneracy errors.
    pub fn is_degeneracy(&self) -> bool {
        matches!(self, Self::NumericDegeneracy(_))
    }
}
