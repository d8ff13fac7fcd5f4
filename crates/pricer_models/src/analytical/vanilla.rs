//! Closed-form valuation of vanilla options and spreads.

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};

use super::black_scholes::{BlackScholes, Greeks};
use super::error::AnalyticalError;
use crate::instruments::{ProductContract, VanillaKind, VanillaTerms};

/// Closed-form valuation summary of a vanilla contract.
///
/// Prices are per unit of underlying; notional is not applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanillaValuation {
    /// Black-Scholes-Merton value.
    pub theoretical_price: f64,
    /// Analytical sensitivities (spreads as leg combinations).
    pub greeks: Greeks<f64>,
    /// Volatility used for pricing; no market quote is inverted.
    pub implied_volatility: f64,
    /// Payoff if exercised at the current spot.
    pub intrinsic_value: f64,
    /// `theoretical_price - intrinsic_value`.
    pub time_value: f64,
}

/// Builds the closed-form model for `market`.
pub(crate) fn model(market: &MarketEnvironment) -> Result<BlackScholes<f64>, AnalyticalError> {
    BlackScholes::new(
        market.spot(),
        market.risk_free_rate(),
        market.dividend_yield(),
        market.volatility(),
    )
}

/// Resolves the contract's vanilla terms with strikes in spot units.
pub(crate) fn resolved_terms(
    contract: &ProductContract,
    market: &MarketEnvironment,
) -> Result<VanillaTerms, PricingError> {
    if !contract.is_vanilla() {
        return Err(AnalyticalError::UnsupportedVariant {
            variant: contract.variant_tag().to_string(),
        }
        .into());
    }
    contract.payoff.normalised(market.spot()).spec().vanilla_terms()
}

/// Price and Greeks of the resolved terms, legs combined for spreads.
pub(crate) fn price_and_greeks(bs: &BlackScholes<f64>, terms: &VanillaTerms) -> (f64, Greeks<f64>) {
    let t = terms.time_to_maturity;
    let k1 = terms.strike;
    let leg = |strike: f64, is_call: bool| (bs.price(strike, t, is_call), bs.greeks(strike, t, is_call));

    match (terms.kind, terms.second_strike) {
        (VanillaKind::CallSpread, Some(k2)) | (VanillaKind::PutSpread, Some(k2)) => {
            let is_call = terms.kind.is_call();
            let (long_price, long_greeks) = leg(k1, is_call);
            let (short_price, short_greeks) = leg(k2, is_call);
            (
                long_price - short_price,
                long_greeks.add(short_greeks.scale(-1.0)),
            )
        }
        (kind, _) => leg(k1, kind.is_call()),
    }
}

/// Values a vanilla option or spread with Black-Scholes-Merton.
///
/// The strike is quoted as a percentage of spot and rescaled against
/// `market.spot()`; `time_to_maturity` comes from the contract terms.
///
/// # Errors
///
/// - `PricingError::UnsupportedInstrument` for non-vanilla contracts
/// - `PricingError::Validation` for incomplete terms or a zero-volatility market
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::analytical::price_vanilla;
/// use pricer_models::instruments::{PayoffSpec, ProductContract, RiskBand, VanillaKind};
///
/// let contract = ProductContract {
///     id: "vanilla_call".to_string(),
///     display_name: "Vanilla Call".to_string(),
///     description: String::new(),
///     risk_band: RiskBand::High,
///     min_duration: 0.25,
///     max_duration: 2.0,
///     expected_return: 25.0,
///     max_loss_pct: 100.0,
///     payoff: PayoffSpec::Vanilla {
///         option: Some(VanillaKind::Call),
///         strike: Some(100.0),
///         second_strike: None,
///         time_to_maturity: Some(1.0),
///         notional: Some(100_000.0),
///     },
/// };
///
/// let valuation = price_vanilla(&contract, &MarketEnvironment::default()).unwrap();
/// assert!((valuation.theoretical_price - 8.27).abs() < 0.01);
/// assert!((valuation.greeks.delta - 0.55).abs() < 0.01);
/// assert_eq!(valuation.intrinsic_value, 0.0);
/// ```
pub fn price_vanilla(
    contract: &ProductContract,
    market: &MarketEnvironment,
) -> Result<VanillaValuation, PricingError> {
    let terms = resolved_terms(contract, market)?;
    let bs = model(market)?;
    let (theoretical_price, greeks) = price_and_greeks(&bs, &terms);
    let intrinsic_value = terms.intrinsic(market.spot());

    Ok(VanillaValuation {
        theoretical_price,
        greeks,
        implied_volatility: market.volatility(),
        intrinsic_value,
        time_value: theoretical_price - intrinsic_value,
    })
}

/// Closed-form Greeks of a vanilla contract.
///
/// # Errors
///
/// Same as [`price_vanilla`].
pub fn vanilla_greeks(
    contract: &ProductContract,
    market: &MarketEnvironment,
) -> Result<Greeks<f64>, PricingError> {
    let terms = resolved_terms(contract, market)?;
    let bs = model(market)?;
    Ok(price_and_greeks(&bs, &terms).1)
}
