//! Risk metrics for vanilla options and spreads.

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use pricer_models::instruments::ProductContract;
use pricer_pricing::mc::{simulate_payoffs, MonteCarloConfig};
use pricer_pricing::payoff::PayoffEvaluator;
use pricer_pricing::result::{break_even_spot, spot_range};
use pricer_pricing::rng::PricerRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics::{risk_metrics, MetricResult};

/// Simulated risk profile of a vanilla contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VanillaRiskMetrics {
    /// 95% value at risk of the payout return.
    pub var95: f64,
    /// 95% conditional value at risk.
    pub cvar95: MetricResult,
    /// Spread between the best and worst simulated payouts.
    pub max_loss: f64,
    /// Spot at which the payout returns the initial spot.
    pub break_even: f64,
    /// Share of paths finishing in the money.
    pub probability_itm: f64,
    /// Share of paths finishing out of the money.
    pub probability_otm: f64,
}

/// Simulates a vanilla contract and summarises its risk.
///
/// Moneyness is judged on each path's final spot against the first strike
/// rescaled to the market spot.
///
/// # Errors
///
/// - `PricingError::UnsupportedInstrument` for non-vanilla contracts
/// - `PricingError::Validation` for incomplete vanilla terms
/// - `PricingError::Configuration` for an invalid run configuration
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::MonteCarloConfig;
/// use pricer_pricing::rng::PricerRng;
/// use pricer_risk::vanilla::vanilla_risk_metrics;
///
/// let catalog = standard_catalog().unwrap();
/// let config = MonteCarloConfig::builder().n_paths(2000).build().unwrap();
/// let metrics = vanilla_risk_metrics(
///     catalog.get("vanilla_put").unwrap(),
///     &MarketEnvironment::default(),
///     &config,
///     &mut PricerRng::from_seed(3),
/// )
/// .unwrap();
///
/// assert!((metrics.probability_itm + metrics.probability_otm - 1.0).abs() < 1e-12);
/// ```
pub fn vanilla_risk_metrics(
    contract: &ProductContract,
    market: &MarketEnvironment,
    config: &MonteCarloConfig,
    rng: &mut PricerRng,
) -> Result<VanillaRiskMetrics, PricingError> {
    if !contract.is_vanilla() {
        return Err(PricingError::unsupported(format!(
            "{}: vanilla risk metrics need a vanilla contract, got {}",
            contract.id,
            contract.variant_tag()
        )));
    }

    let sample = simulate_payoffs(contract, market, config, rng)?;
    let evaluator = PayoffEvaluator::new(contract, sample.initial_spot)?;
    let terms = evaluator.payoff().spec().vanilla_terms()?;
    let metrics = risk_metrics(&sample.payoffs, sample.initial_spot)?;

    let (lo, hi) = sample
        .payoffs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });

    let itm = sample
        .paths
        .iter()
        .filter(|p| terms.is_in_the_money(p.final_spot))
        .count();
    let probability_itm = itm as f64 / sample.len() as f64;

    debug!(
        product = %contract.id,
        strike = terms.strike,
        probability_itm,
        "vanilla risk computed"
    );

    Ok(VanillaRiskMetrics {
        var95: metrics.var95,
        cvar95: metrics.cvar95,
        max_loss: hi - lo,
        break_even: break_even_spot(&evaluator, &spot_range(sample.initial_spot)),
        probability_itm,
        probability_otm: 1.0 - probability_itm,
    })
}
