//! Fair-value summary for autocallable products.
//!
//! One simulation run is decomposed into:
//!
//! - fair value: mean undiscounted payout
//! - autocall value: `Σ p_d · c̄_d`, first-call probability times the mean
//!   coupon of the paths called on date `d`
//! - protection value: share of payouts of at least 90% of the initial
//!   spot, scaled to 100
//! - expected life: `Σ p_d · t_d + (1 - Σ p_d) · T`
//!
//! Legacy figures differ on two points. Their autocall value weights each
//! date's coupon total over all paths (`Σ p_d · Σ c / N`), which counts the
//! call probability twice. Their expected life is `T - Σ p_d · t_d` floored
//! at half a year. Neither carries over.

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use pricer_models::instruments::ProductContract;
use pricer_pricing::mc::{simulate_payoffs, MonteCarloConfig};
use pricer_pricing::result::{AutocallDateStat, ProbabilityStats};
use pricer_pricing::rng::PricerRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decomposed value of an autocall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutocallFairValue {
    /// Mean undiscounted payout.
    pub fair_value: f64,
    /// Fair value discounted from the simulated maturity.
    pub discounted_fair_value: f64,
    /// Probability-weighted early-redemption coupons.
    pub autocall_value: f64,
    /// Protected share of payouts, scaled to 100.
    pub protection_value: f64,
    /// Expected life in years.
    pub expected_life: f64,
    /// Probability of being called on any date.
    pub total_autocall_probability: f64,
    /// Per-date call statistics (empty without a schedule).
    pub by_date: Vec<AutocallDateStat>,
}

/// Simulates an autocall and decomposes its value.
///
/// A classic autocall carries no observation schedule: it is never
/// called early and its expected life is the full maturity.
///
/// # Errors
///
/// - `PricingError::UnsupportedInstrument` for non-autocall contracts
/// - `PricingError::Configuration` for an invalid run configuration
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::MonteCarloConfig;
/// use pricer_pricing::rng::PricerRng;
/// use pricer_risk::fair_value::autocall_fair_value;
///
/// let catalog = standard_catalog().unwrap();
/// let memory = catalog.get("autocall_memory").unwrap();
/// let config = MonteCarloConfig::builder().n_paths(2000).build().unwrap();
///
/// let value = autocall_fair_value(
///     memory,
///     &MarketEnvironment::default(),
///     &config,
///     &mut PricerRng::from_seed(5),
/// )
/// .unwrap();
///
/// assert_eq!(value.by_date.len(), 3);
/// assert!(value.expected_life > 0.0 && value.expected_life <= 3.0);
/// ```
pub fn autocall_fair_value(
    contract: &ProductContract,
    market: &MarketEnvironment,
    config: &MonteCarloConfig,
    rng: &mut PricerRng,
) -> Result<AutocallFairValue, PricingError> {
    if !contract.is_autocall() {
        return Err(PricingError::unsupported(format!(
            "{}: fair-value decomposition needs an autocall, got {}",
            contract.id,
            contract.variant_tag()
        )));
    }

    let sample = simulate_payoffs(contract, market, config, rng)?;
    let by_date = contract
        .payoff
        .schedule()
        .map(|schedule| AutocallDateStat::from_paths(&sample.paths, schedule))
        .unwrap_or_default();

    let total_autocall_probability: f64 = by_date.iter().map(|d| d.probability).sum();
    let autocall_value = by_date
        .iter()
        .map(|d| d.probability * d.expected_coupon)
        .sum();
    let expected_life = by_date
        .iter()
        .map(|d| d.probability * d.date)
        .sum::<f64>()
        + (1.0 - total_autocall_probability) * sample.maturity;

    let probabilities = ProbabilityStats::from_payoffs(&sample.payoffs, sample.initial_spot);
    let fair_value = sample.mean();

    debug!(
        product = %contract.id,
        fair_value,
        total_autocall_probability,
        expected_life,
        "autocall fair value"
    );

    Ok(AutocallFairValue {
        fair_value,
        discounted_fair_value: fair_value * market.discount_factor(sample.maturity),
        autocall_value,
        protection_value: probabilities.protection_at_90_pct * 100.0,
        expected_life,
        total_autocall_probability,
        by_date,
    })
}
