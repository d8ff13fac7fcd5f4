//! Product contract: catalog metadata plus payoff terms.

use std::fmt;

use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};

use super::payoff::PayoffSpec;

/// Indicative risk classification of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBand {
    /// Capital mostly protected.
    Low,
    /// Conditional protection.
    Medium,
    /// Full capital at risk or leveraged.
    High,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
        };
        f.write_str(s)
    }
}

/// A structured product as held in the catalog.
///
/// `min_duration` doubles as the simulated maturity in years.
/// `expected_return` and `max_loss_pct` are indicative catalog figures in
/// percent; they feed the proxy Greeks but never the payoff.
///
/// # Examples
///
/// ```
/// use pricer_models::instruments::{PayoffSpec, ProductContract, RiskBand};
///
/// let contract = ProductContract {
///     id: "digital_barrier".to_string(),
///     display_name: "Barrier Digital".to_string(),
///     description: "Fixed coupon while the barrier holds".to_string(),
///     risk_band: RiskBand::High,
///     min_duration: 0.5,
///     max_duration: 3.0,
///     expected_return: 12.0,
///     max_loss_pct: 100.0,
///     payoff: PayoffSpec::Digital { barrier: 70.0, coupon: 12.0 },
/// };
///
/// assert!(contract.validate().is_ok());
/// assert_eq!(contract.variant_tag(), "digital");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContract {
    /// Unique catalog identifier.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Indicative risk classification.
    pub risk_band: RiskBand,
    /// Shortest tenor in years; the simulated maturity.
    pub min_duration: f64,
    /// Longest tenor in years.
    pub max_duration: f64,
    /// Indicative annual return in percent.
    pub expected_return: f64,
    /// Indicative maximum loss in percent of capital.
    pub max_loss_pct: f64,
    /// Variant-specific terms.
    pub payoff: PayoffSpec,
}

impl ProductContract {
    /// Checks contract-level and payoff-level invariants.
    ///
    /// # Errors
    ///
    /// - `PricingError::Configuration` for bad durations or schedules
    /// - `PricingError::Validation` for missing or out-of-range payoff terms
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.id.trim().is_empty() {
            return Err(PricingError::validation("contract id must not be empty"));
        }
        if !self.min_duration.is_finite() || self.min_duration <= 0.0 {
            return Err(PricingError::configuration(format!(
                "{}: min_duration must be positive, got {}",
                self.id, self.min_duration
            )));
        }
        if !self.max_duration.is_finite() || self.min_duration > self.max_duration {
            return Err(PricingError::configuration(format!(
                "{}: min_duration {} exceeds max_duration {}",
                self.id, self.min_duration, self.max_duration
            )));
        }
        if !self.expected_return.is_finite() || !self.max_loss_pct.is_finite() {
            return Err(PricingError::validation(format!(
                "{}: indicative figures must be finite",
                self.id
            )));
        }
        self.payoff.validate().map_err(|e| match e {
            PricingError::Configuration(msg) => {
                PricingError::configuration(format!("{}: {}", self.id, msg))
            }
            PricingError::Validation(msg) => {
                PricingError::validation(format!("{}: {}", self.id, msg))
            }
            other => other,
        })
    }

    /// Simulated maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.min_duration
    }

    /// Family name of the payoff.
    #[inline]
    pub fn variant_tag(&self) -> &'static str {
        self.payoff.variant_tag()
    }

    /// Returns `true` for autocall families.
    #[inline]
    pub fn is_autocall(&self) -> bool {
        self.payoff.is_autocall()
    }

    /// Returns `true` for vanilla options and spreads.
    #[inline]
    pub fn is_vanilla(&self) -> bool {
        self.payoff.is_vanilla()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::VanillaKind;

    fn twin_win() -> ProductContract {
        ProductContract {
            id: "twin_win".to_string(),
            display_name: "Twin Win".to_string(),
            description: String::new(),
            risk_band: RiskBand::Medium,
            min_duration: 1.0,
            max_duration: 4.0,
            expected_return: 10.0,
            max_loss_pct: 100.0,
            payoff: PayoffSpec::TwinWin {
                barrier: 60.0,
                strike: 100.0,
            },
        }
    }

    #[test]
    fn test_valid_contract() {
        let c = twin_win();
        assert!(c.validate().is_ok());
        assert_eq!(c.maturity(), 1.0);
        assert!(!c.is_autocall());
    }

    #[test]
    fn test_duration_bounds() {
        let mut c = twin_win();
        c.min_duration = 5.0;
        let err = c.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("twin_win"));

        c.min_duration = 0.0;
        assert!(c.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_payoff_errors_carry_contract_id() {
        let mut c = twin_win();
        c.payoff = PayoffSpec::Vanilla {
            option: Some(VanillaKind::Call),
            strike: None,
            second_strike: None,
            time_to_maturity: Some(1.0),
            notional: None,
        };
        let err = c.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("twin_win: vanilla strike is missing"));
    }

    #[test]
    fn test_risk_band_display_and_order() {
        assert_eq!(RiskBand::High.to_string(), "High");
        assert!(RiskBand::Low < RiskBand::High);
    }
}
