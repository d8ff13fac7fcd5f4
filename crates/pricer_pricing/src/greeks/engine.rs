//! Greeks engine.

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use pricer_models::analytical::vanilla_greeks;
use pricer_models::instruments::ProductContract;
use tracing::debug;

use super::config::{GreeksConfig, GreeksMode};
use super::result::{GreeksMethod, GreeksResult};
use crate::mc::simulate_payoffs;
use crate::payoff::PayoffEvaluator;
use crate::rng::PricerRng;

/// Computes [`GreeksResult`]s for contracts.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::greeks::{GreeksConfig, GreeksEngine, GreeksMethod};
///
/// let catalog = standard_catalog().unwrap();
/// let engine = GreeksEngine::new(GreeksConfig::default());
///
/// let call = engine
///     .greeks(catalog.get("vanilla_call").unwrap(), &MarketEnvironment::default())
///     .unwrap();
/// assert_eq!(call.method, GreeksMethod::ClosedForm);
/// assert!((call.delta - 0.5485).abs() < 1e-3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GreeksEngine {
    config: GreeksConfig,
}

impl GreeksEngine {
    /// Creates an engine with the given settings.
    pub fn new(config: GreeksConfig) -> Self {
        Self { config }
    }

    /// Engine settings.
    pub fn config(&self) -> &GreeksConfig {
        &self.config
    }

    /// Greeks of `contract` in `market`.
    ///
    /// # Errors
    ///
    /// - `PricingError::Configuration` for invalid bumps or a repricing
    ///   maturity that spans no simulated day
    /// - `PricingError::Validation` for incomplete contract terms, or a
    ///   vanilla in a zero-volatility market
    pub fn greeks(
        &self,
        contract: &ProductContract,
        market: &MarketEnvironment,
    ) -> Result<GreeksResult, PricingError> {
        self.config.validate()?;

        if contract.is_vanilla() {
            return Ok(GreeksResult::closed_form(vanilla_greeks(contract, market)?));
        }

        let evaluator = PayoffEvaluator::new(contract, market.spot())?;
        let spot = market.spot();
        let h = spot * self.config.spot_bump;

        let up = evaluator.evaluate_at(spot + h);
        let centre = evaluator.evaluate_at(spot);
        let down = evaluator.evaluate_at(spot - h);
        let delta = (up - down) / (2.0 * h);
        let gamma = (up - 2.0 * centre + down) / (h * h);

        debug!(product = %contract.id, mode = ?self.config.mode, "computing greeks");

        match self.config.mode {
            GreeksMode::Proxy => Ok(GreeksResult {
                delta,
                gamma,
                vega: contract.expected_return * 0.1,
                theta: -centre * 0.01 / (contract.min_duration * 365.0),
                rho: spot * 0.01,
                method: GreeksMethod::Proxy,
            }),
            GreeksMode::BumpReprice => {
                let (vega, theta, rho) = self.reprice_sensitivities(contract, market)?;
                Ok(GreeksResult {
                    delta,
                    gamma,
                    vega,
                    theta,
                    rho,
                    method: GreeksMethod::BumpReprice,
                })
            }
        }
    }

    /// Vega, theta and rho by Monte Carlo reprice on common random numbers.
    ///
    /// Theta shortens the maturity by `time_bump` rounded to whole simulated
    /// days (at least one) and differences over the simulated horizons.
    fn reprice_sensitivities(
        &self,
        contract: &ProductContract,
        market: &MarketEnvironment,
    ) -> Result<(f64, f64, f64), PricingError> {
        let seed = self
            .config
            .simulation
            .seed()
            .unwrap_or_else(|| PricerRng::from_entropy().seed());
        let simulation = &self.config.simulation;
        let days = f64::from(simulation.days_per_year());
        // Discount over the horizon actually simulated, a whole number of days
        let horizon =
            |contract: &ProductContract| simulation.steps_for(contract.maturity()) as f64 / days;
        let value = |contract: &ProductContract, market: &MarketEnvironment| {
            let mut rng = PricerRng::from_seed(seed);
            let sample = simulate_payoffs(contract, market, simulation, &mut rng)?;
            Ok::<f64, PricingError>(sample.mean() * market.discount_factor(horizon(contract)))
        };

        let base = value(contract, market)?;

        let sigma = market.volatility();
        let dv = self.config.vol_bump;
        let vol_up = value(contract, &market.with_volatility(sigma + dv)?)?;
        let vega = if sigma - dv >= 0.0 {
            let vol_down = value(contract, &market.with_volatility(sigma - dv)?)?;
            (vol_up - vol_down) / (2.0 * dv)
        } else {
            (vol_up - base) / dv
        };

        // Shorten by whole simulated days; the mid-day offset keeps the floor exact
        let base_steps = simulation.steps_for(contract.maturity());
        let bump_steps = ((self.config.time_bump * days).round() as usize).max(1);
        if base_steps <= bump_steps {
            return Err(PricingError::configuration(format!(
                "{}: maturity of {} simulated days is too short for a {} day theta bump",
                contract.id, base_steps, bump_steps
            )));
        }
        let mut shorter = contract.clone();
        shorter.min_duration = ((base_steps - bump_steps) as f64 + 0.5) / days;
        let dt = horizon(contract) - horizon(&shorter);
        let theta = (value(&shorter, market)? - base) / dt;

        let r = market.risk_free_rate();
        let dr = self.config.rate_bump;
        let rate_up = value(contract, &market.with_rate(r + dr)?)?;
        let rate_down = value(contract, &market.with_rate(r - dr)?)?;
        let rho = (rate_up - rate_down) / (2.0 * dr);

        Ok((vega, theta, rho))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greeks::GreeksMode;
    use crate::mc::MonteCarloConfig;
    use approx::assert_relative_eq;
    use pricer_models::catalog::{standard_catalog, ProductCatalog};
    use pricer_models::instruments::{PayoffSpec, RiskBand};

    fn participation() -> ProductContract {
        ProductContract {
            id: "participation_note".to_string(),
            display_name: "Participation".to_string(),
            description: String::new(),
            risk_band: RiskBand::Medium,
            min_duration: 1.0,
            max_duration: 5.0,
            expected_return: 15.0,
            max_loss_pct: 100.0,
            payoff: PayoffSpec::Participation {
                participation: 150.0,
                protection: 90.0,
                strike: 95.0,
            },
        }
    }

    #[test]
    fn test_proxy_values() {
        let market = MarketEnvironment::default();
        let greeks = GreeksEngine::default().greeks(&participation(), &market).unwrap();

        // Above the strike the payoff slope is the participation rate
        assert_relative_eq!(greeks.delta, 1.5, epsilon = 1e-9);
        assert_relative_eq!(greeks.gamma, 0.0, epsilon = 1e-6);
        assert_relative_eq!(greeks.vega, 1.5, epsilon = 1e-12);
        // V(S) = 100 + 5 × 1.5
        assert_relative_eq!(greeks.theta, -107.5 * 0.01 / 365.0, epsilon = 1e-12);
        assert_relative_eq!(greeks.rho, 1.0, epsilon = 1e-12);
        assert_eq!(greeks.method, GreeksMethod::Proxy);
    }

    #[test]
    fn test_flat_payoff_has_zero_delta() {
        let catalog = standard_catalog().unwrap();
        let digital = catalog.require("digital_barrier").unwrap();
        let greeks = GreeksEngine::default()
            .greeks(digital, &MarketEnvironment::default())
            .unwrap();
        assert_eq!(greeks.delta, 0.0);
        assert_eq!(greeks.gamma, 0.0);
    }

    #[test]
    fn test_vanilla_closed_form() {
        let catalog = standard_catalog().unwrap();
        let put = catalog.require("vanilla_put").unwrap();
        let greeks = GreeksEngine::default()
            .greeks(put, &MarketEnvironment::default())
            .unwrap();
        assert_eq!(greeks.method, GreeksMethod::ClosedForm);
        assert!(greeks.delta < 0.0 && greeks.delta > -1.0);
        assert!(greeks.gamma > 0.0);
        assert!(greeks.vega > 0.0);
    }

    #[test]
    fn test_vanilla_zero_vol_is_validation_error() {
        let catalog = standard_catalog().unwrap();
        let call = catalog.require("vanilla_call").unwrap();
        let market = MarketEnvironment::default().with_volatility(0.0).unwrap();
        let err = GreeksEngine::default().greeks(call, &market).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_bump_reprice_is_reproducible() {
        let config = GreeksConfig::builder()
            .mode(GreeksMode::BumpReprice)
            .simulation(MonteCarloConfig::builder().n_paths(400).seed(17).build().unwrap())
            .build()
            .unwrap();
        let engine = GreeksEngine::new(config);
        let market = MarketEnvironment::default();

        let a = engine.greeks(&participation(), &market).unwrap();
        let b = engine.greeks(&participation(), &market).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.method, GreeksMethod::BumpReprice);
        assert!(a.is_finite());
        // Long convex upside: positive vega
        assert!(a.vega > 0.0, "vega = {}", a.vega);
    }

    #[test]
    fn test_bump_reprice_theta_matches_zero_vol_forward() {
        let mut contract = participation();
        contract.payoff = PayoffSpec::Participation {
            participation: 150.0,
            protection: 90.0,
            strike: 100.0,
        };
        let config = GreeksConfig::builder()
            .mode(GreeksMode::BumpReprice)
            .simulation(MonteCarloConfig::builder().n_paths(10).seed(3).build().unwrap())
            .build()
            .unwrap();
        let market = MarketEnvironment::new(100.0, 0.05, 0.0, 0.0).unwrap();
        let greeks = GreeksEngine::new(config).greeks(&contract, &market).unwrap();

        // V(T) = e^{-rT}(100 + 150(e^{rT} - 1)) = 150 - 50 e^{-rT}
        let analytic = -50.0 * 0.05 * (-0.05_f64).exp();
        assert_relative_eq!(greeks.theta, analytic, max_relative = 1e-3);
    }

    #[test]
    fn test_theta_bump_longer_than_maturity_rejected() {
        let mut contract = participation();
        contract.min_duration = 2.0 / 252.0;
        let config = GreeksConfig::builder()
            .mode(GreeksMode::BumpReprice)
            .time_bump(5.0 / 252.0)
            .simulation(MonteCarloConfig::builder().n_paths(10).seed(3).build().unwrap())
            .build()
            .unwrap();
        let err = GreeksEngine::new(config)
            .greeks(&contract, &MarketEnvironment::default())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GreeksConfig::default();
        config.spot_bump = -0.1;
        let err = GreeksEngine::new(config)
            .greeks(&participation(), &MarketEnvironment::default())
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
