//! Monte Carlo pricer for structured products.
//!
//! [`simulate_payoffs`] is the shared building block: one simulation run
//! and the payout of every path. [`MonteCarloPricer`] turns a run into a
//! full [`CalculationResult`].

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use pricer_models::instruments::ProductContract;
use tracing::{debug, warn};

use super::config::MonteCarloConfig;
use super::error::ConfigError;
use super::paths::PathStatistics;
use super::simulator::PathSimulator;
use crate::greeks::{GreeksConfig, GreeksEngine};
use crate::payoff::PayoffEvaluator;
use crate::result::{
    break_even_spot, payoff_curve, spot_range, AutocallDateStat, CalculationResult,
    PricingSummary, ProbabilityStats,
};
use crate::rng::PricerRng;

/// Simulated paths with their payouts, in path order.
#[derive(Clone, Debug, PartialEq)]
pub struct PayoffSample {
    /// Spot at inception.
    pub initial_spot: f64,
    /// Simulated maturity in years.
    pub maturity: f64,
    /// Per-path statistics.
    pub paths: Vec<PathStatistics>,
    /// Per-path payouts.
    pub payoffs: Vec<f64>,
}

impl PayoffSample {
    /// Number of paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.payoffs.len()
    }

    /// Returns `true` if the sample holds no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payoffs.is_empty()
    }

    /// Mean undiscounted payout (0 for an empty sample).
    pub fn mean(&self) -> f64 {
        if self.payoffs.is_empty() {
            return 0.0;
        }
        self.payoffs.iter().sum::<f64>() / self.payoffs.len() as f64
    }
}

/// Simulates `contract` and evaluates every path.
///
/// # Errors
///
/// - `PricingError::Configuration` for an invalid run configuration or
///   product duration
/// - `PricingError::Validation` for incomplete contract terms
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::{simulate_payoffs, MonteCarloConfig};
/// use pricer_pricing::rng::PricerRng;
///
/// let catalog = standard_catalog().unwrap();
/// let config = MonteCarloConfig::builder().n_paths(1000).build().unwrap();
/// let sample = simulate_payoffs(
///     catalog.get("autocall_classic").unwrap(),
///     &MarketEnvironment::default(),
///     &config,
///     &mut PricerRng::from_seed(1),
/// )
/// .unwrap();
///
/// assert_eq!(sample.len(), 1000);
/// assert!(sample.payoffs.iter().all(|&p| p <= 108.5));
/// ```
pub fn simulate_payoffs(
    contract: &ProductContract,
    market: &MarketEnvironment,
    config: &MonteCarloConfig,
    rng: &mut PricerRng,
) -> Result<PayoffSample, PricingError> {
    evaluate_run(contract, market, config, rng).map(|(_, sample)| sample)
}

fn evaluate_run(
    contract: &ProductContract,
    market: &MarketEnvironment,
    config: &MonteCarloConfig,
    rng: &mut PricerRng,
) -> Result<(PayoffEvaluator, PayoffSample), PricingError> {
    let paths = PathSimulator::simulate(contract, market, config, rng)?;
    let evaluator = PayoffEvaluator::new(contract, market.spot())?;
    let payoffs = evaluator.evaluate_paths(&paths);
    let sample = PayoffSample {
        initial_spot: market.spot(),
        maturity: contract.maturity(),
        paths,
        payoffs,
    };
    Ok((evaluator, sample))
}

/// Monte Carlo pricing engine.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
/// use pricer_pricing::rng::PricerRng;
///
/// let catalog = standard_catalog().unwrap();
/// let config = MonteCarloConfig::builder().n_paths(2000).build().unwrap();
/// let pricer = MonteCarloPricer::new(config).unwrap();
///
/// let result = pricer
///     .price(
///         catalog.get("autocall_stepup").unwrap(),
///         &MarketEnvironment::default(),
///         &mut PricerRng::from_seed(42),
///     )
///     .unwrap();
///
/// let p = &result.probabilities;
/// assert_eq!(p.positive_count + p.negative_count + p.at_par_count, 2000);
/// assert_eq!(result.spot_range.len(), 101);
/// assert!(result.autocall_by_date.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    config: MonteCarloConfig,
    greeks: GreeksEngine,
}

impl MonteCarloPricer {
    /// Creates a pricer with default Greeks settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: MonteCarloConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            greeks: GreeksEngine::default(),
        })
    }

    /// Replaces the Greeks settings.
    pub fn with_greeks(mut self, greeks: GreeksConfig) -> Result<Self, ConfigError> {
        greeks.validate()?;
        self.greeks = GreeksEngine::new(greeks);
        Ok(self)
    }

    /// Simulation settings.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Greeks engine.
    #[inline]
    pub fn greeks_engine(&self) -> &GreeksEngine {
        &self.greeks
    }

    /// Prices `contract` in `market`, drawing from `rng`.
    ///
    /// A Greeks failure (for example a vanilla in a zero-volatility market)
    /// is logged and leaves `greeks` empty; the rest of the report stands.
    pub fn price(
        &self,
        contract: &ProductContract,
        market: &MarketEnvironment,
        rng: &mut PricerRng,
    ) -> Result<CalculationResult, PricingError> {
        let (evaluator, sample) = evaluate_run(contract, market, &self.config, rng)?;
        let s0 = sample.initial_spot;

        let spots = spot_range(s0);
        let curve = payoff_curve(&evaluator, &spots);
        let break_even = break_even_spot(&evaluator, &spots);

        let (min_payoff, max_payoff) = sample
            .payoffs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });

        let greeks = match self.greeks.greeks(contract, market) {
            Ok(greeks) => Some(greeks),
            Err(e) => {
                warn!(product = %contract.id, error = %e, "greeks unavailable");
                None
            }
        };

        let autocall_by_date = contract
            .payoff
            .schedule()
            .map(|schedule| AutocallDateStat::from_paths(&sample.paths, schedule));

        let summary =
            PricingSummary::from_payoffs(&sample.payoffs, market.discount_factor(sample.maturity));

        debug!(
            product = %contract.id,
            n_paths = sample.len(),
            mean_payoff = summary.mean_payoff,
            std_error = summary.std_error,
            "priced"
        );

        Ok(CalculationResult {
            payoff_curve: curve,
            spot_range: spots,
            break_even_spot: break_even,
            max_gain: max_payoff - s0,
            max_loss: s0 - min_payoff,
            probabilities: ProbabilityStats::from_payoffs(&sample.payoffs, s0),
            greeks,
            autocall_by_date,
            summary,
        })
    }
}

/// Quick indicative evaluation: 5,000 paths in the default market
/// (spot 100, rate 3%, dividend 2%, volatility 20%), unseeded.
pub fn quick_evaluation(contract: &ProductContract) -> Result<CalculationResult, PricingError> {
    let config = MonteCarloConfig::default();
    let mut rng = config.rng();
    MonteCarloPricer::new(config)?.price(contract, &MarketEnvironment::default(), &mut rng)
}
