//! Risk metric errors.

use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a risk statistic is undefined for a sample.
///
/// Every variant converts into [`PricingError::NumericDegeneracy`].
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
pub enum RiskError {
    /// No payoffs were supplied.
    #[error("payoff sample is empty")]
    EmptySample,

    /// The 5% tail holds no observations.
    #[error("95% tail is empty for {n_samples} samples")]
    EmptyTail {
        /// Sample size
        n_samples: usize,
    },

    /// Returns have no dispersion.
    #[error("return standard deviation is zero")]
    ZeroVariance,

    /// Returns cannot be measured against this reference spot.
    #[error("reference spot must be positive and finite, got {0}")]
    InvalidReferenceSpot(f64),
}

impl From<RiskError> for PricingError {
    fn from(err: RiskError) -> Self {
        PricingError::NumericDegeneracy(err.to_string())
    }
}
