//! Daily GBM path simulator with autocall observation.
//!
//! A run is prepared once per contract and market ([`PathSimulator::new`])
//! and then produces one [`PathStatistics`] per path. Autocall observations
//! are mapped to the simulated day nearest `date × days_per_year` (never
//! before day 1); observations beyond the last simulated day are never
//! checked.
//!
//! # Reproducibility
//!
//! The injected generator is advanced exactly once per run to draw a base
//! seed; path `i` then draws from `PricerRng::stream(base, i)`. Sequential
//! and parallel runs therefore return identical statistics in path order.

use pricer_core::market_data::MarketEnvironment;
use pricer_core::types::PricingError;
use pricer_models::instruments::{AutocallObservation, ProductContract};
use rayon::prelude::*;
use tracing::debug;

use super::config::MonteCarloConfig;
use super::paths::{AutocallTrigger, GbmStep, PathObserver, PathStatistics};
use crate::rng::PricerRng;

/// Autocall observation pinned to a simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScheduledObservation {
    step: usize,
    observation: AutocallObservation,
}

/// Prepared path simulation for one contract and market.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
/// use pricer_pricing::rng::PricerRng;
///
/// let catalog = standard_catalog().unwrap();
/// let product = catalog.get("autocall_stepup").unwrap();
/// let config = MonteCarloConfig::builder().n_paths(500).build().unwrap();
/// let mut rng = PricerRng::from_seed(42);
///
/// let paths = PathSimulator::simulate(product, &MarketEnvironment::default(), &config, &mut rng)
///     .unwrap();
/// assert_eq!(paths.len(), 500);
/// assert!(paths.iter().all(|p| p.min_spot <= p.final_spot && p.final_spot <= p.max_spot));
/// ```
#[derive(Clone, Debug)]
pub struct PathSimulator {
    initial_spot: f64,
    step: GbmStep,
    n_steps: usize,
    n_paths: usize,
    parallel: bool,
    observations: Vec<ScheduledObservation>,
}

impl PathSimulator {
    /// Prepares a run, validating the configuration and the contract.
    ///
    /// # Errors
    ///
    /// - `PricingError::Configuration` for an invalid path count, days per
    ///   year or product duration, or a malformed schedule
    /// - `PricingError::Validation` for incomplete contract terms
    pub fn new(
        contract: &ProductContract,
        market: &MarketEnvironment,
        config: &MonteCarloConfig,
    ) -> Result<Self, PricingError> {
        config.validate()?;
        let n_steps = config.validate_maturity(contract.maturity())?;
        contract.validate()?;

        let initial_spot = market.spot();
        let days = f64::from(config.days_per_year());
        let normalised = contract.payoff.normalised(initial_spot);

        let observations = normalised
            .spec()
            .schedule()
            .map(|schedule| {
                schedule
                    .observations()
                    .map(|observation| ScheduledObservation {
                        step: ((observation.date * days).round() as usize).max(1),
                        observation,
                    })
                    .filter(|o| o.step <= n_steps)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            initial_spot,
            step: GbmStep::new(market, config.days_per_year()),
            n_steps,
            n_paths: config.n_paths(),
            parallel: config.parallel(),
            observations,
        })
    }

    /// Prepares and runs a simulation in one call.
    pub fn simulate(
        contract: &ProductContract,
        market: &MarketEnvironment,
        config: &MonteCarloConfig,
        rng: &mut PricerRng,
    ) -> Result<Vec<PathStatistics>, PricingError> {
        let simulator = Self::new(contract, market, config)?;
        debug!(
            product = %contract.id,
            n_paths = simulator.n_paths,
            n_steps = simulator.n_steps,
            observations = simulator.observations.len(),
            parallel = simulator.parallel,
            "simulating paths"
        );
        Ok(simulator.run(rng))
    }

    /// Number of simulated days per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Number of paths per run.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Per-step GBM increments.
    #[inline]
    pub fn gbm_step(&self) -> GbmStep {
        self.step
    }

    /// Runs every path, advancing `rng` once for the base seed.
    pub fn run(&self, rng: &mut PricerRng) -> Vec<PathStatistics> {
        let base_seed = rng.next_seed();
        let simulate = |index: usize| {
            let mut stream = PricerRng::stream(base_seed, index as u64);
            self.simulate_path(&mut stream)
        };

        if self.parallel {
            (0..self.n_paths).into_par_iter().map(simulate).collect()
        } else {
            (0..self.n_paths).map(simulate).collect()
        }
    }

    /// Simulates a single path from `rng`.
    pub fn simulate_path(&self, rng: &mut PricerRng) -> PathStatistics {
        let mut observer = PathObserver::new(self.initial_spot);
        let mut next_observation = 0;

        for day in 1..=self.n_steps {
            let spot = self.step.advance(observer.current(), rng.gen_normal());
            observer.observe(spot);

            while !observer.is_triggered()
                && next_observation < self.observations.len()
                && self.observations[next_observation].step == day
            {
                let o = self.observations[next_observation].observation;
                if spot >= o.level {
                    observer.trigger(AutocallTrigger {
                        date: o.date,
                        level: o.level,
                        coupon: o.coupon,
                        observation_index: o.index,
                    });
                }
                next_observation += 1;
            }
        }

        observer.finish()
    }
}
