//! Closed-form approximation for single-trigger autocalls.
//!
//! Treats the autocall level as a digital strike at maturity `T =
//! min_duration`:
//!
//! - d₁ = (ln(S/L) + (r - q + σ²/2)T) / (σ√T), d₂ = d₁ - σ√T
//! - trigger probability p = 1 - N(-d₁)
//! - autocall value = p·(S + coupon)·e^(-rT)
//! - protection value = N(-d₂)·S·e^(-rT) when a barrier is present
//!
//! This is a quick indicative value; Monte Carlo remains the reference.

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};

use super::distributions::norm_cdf;
use super::error::AnalyticalError;
use super::vanilla::model;
use crate::instruments::{PayoffSpec, ProductContract};

/// Components of the closed-form autocall approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutocallApproximation {
    /// Probability of finishing at or above the autocall level.
    pub trigger_probability: f64,
    /// Discounted value of the early-redemption leg.
    pub autocall_value: f64,
    /// Discounted value of the capital-protection leg.
    pub protection_value: f64,
    /// `autocall_value + protection_value`.
    pub total: f64,
}

/// Approximates a single-level autocall in closed form.
///
/// # Errors
///
/// - `PricingError::UnsupportedInstrument` unless the contract is an
///   `AutocallClassic`
/// - `PricingError::Validation` for a zero-volatility market
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::analytical::autocall_approximation;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
///
/// let catalog = standard_catalog().unwrap();
/// let classic = catalog.get("autocall_classic").unwrap();
///
/// let approx = autocall_approximation(classic, &MarketEnvironment::default()).unwrap();
/// assert!(approx.trigger_probability > 0.5 && approx.trigger_probability < 0.6);
/// assert!((approx.total - approx.autocall_value - approx.protection_value).abs() < 1e-12);
/// ```
pub fn autocall_approximation(
    contract: &ProductContract,
    market: &MarketEnvironment,
) -> Result<AutocallApproximation, PricingError> {
    let spot = market.spot();
    let normalised = contract.payoff.normalised(spot);

    let PayoffSpec::AutocallClassic {
        autocall_level,
        coupon,
        barrier,
        ..
    } = *normalised.spec()
    else {
        return Err(AnalyticalError::UnsupportedVariant {
            variant: contract.variant_tag().to_string(),
        }
        .into());
    };

    let maturity = contract.maturity();
    if autocall_level <= 0.0 {
        return Err(PricingError::validation(format!(
            "{}: autocall level must be positive for the closed form",
            contract.id
        )));
    }

    let bs = model(market)?;
    let d1 = bs.d1(autocall_level, maturity);
    let d2 = bs.d2(autocall_level, maturity);
    let discount = market.discount_factor(maturity);

    let trigger_probability = 1.0 - norm_cdf(-d1);
    let autocall_value = trigger_probability * (spot + coupon) * discount;
    let protection_value = if barrier > 0.0 {
        norm_cdf(-d2) * spot * discount
    } else {
        0.0
    };

    Ok(AutocallApproximation {
        trigger_probability,
        autocall_value,
        protection_value,
        total: autocall_value + protection_value,
    })
}
