//! Error types for closed-form pricing.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Closed-form pricing errors.
///
/// # Variants
/// - `InvalidVolatility`: non-positive volatility (the formulas divide by σ√T)
/// - `InvalidSpot`: non-positive spot
/// - `InvalidExpiry`: non-positive time to maturity
/// - `UnsupportedVariant`: no closed form exists for the product family
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
/// use pricer_core::types::PricingError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: 0.0 };
/// assert!(format!("{}", err).contains("volatility"));
///
/// let pricing: PricingError = err.into();
/// assert!(pricing.is_validation());
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility (non-positive).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Invalid spot price (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid time to maturity (non-positive).
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// No closed form for this product family.
    #[error("No closed form for {variant}")]
    UnsupportedVariant {
        /// Family name of the product
        variant: String,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { .. }
            | AnalyticalError::InvalidSpot { .. }
            | AnalyticalError::InvalidExpiry { .. } => PricingError::Validation(err.to_string()),
            AnalyticalError::UnsupportedVariant { .. } => {
                PricingError::UnsupportedInstrument(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            AnalyticalError::InvalidSpot { spot: -100.0 }.to_string(),
            "Invalid spot price: S = -100"
        );
        assert_eq!(
            AnalyticalError::InvalidExpiry { expiry: 0.0 }.to_string(),
            "Invalid expiry: T = 0"
        );
        assert_eq!(
            AnalyticalError::UnsupportedVariant {
                variant: "twin_win".to_string()
            }
            .to_string(),
            "No closed form for twin_win"
        );
    }

    #[test]
    fn test_conversion_to_pricing_error() {
        let err: PricingError = AnalyticalError::InvalidSpot { spot: 0.0 }.into();
        assert!(err.is_validation());

        let err: PricingError = AnalyticalError::UnsupportedVariant {
            variant: "digital".to_string(),
        }
        .into();
        match err {
            PricingError::UnsupportedInstrument(msg) => assert!(msg.contains("digital")),
            other => panic!("Expected UnsupportedInstrument, got {:?}", other),
        }
    }
}
