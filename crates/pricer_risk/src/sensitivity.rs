//! Market parameter sensitivity sweeps.
//!
//! A sweep scales one [`MarketParameter`] by evenly spaced multipliers in
//! `[1 - range_pct, 1 + range_pct]` and runs a full, smaller Monte Carlo
//! pass at each point. With a fixed seed every point reuses the same
//! random numbers, so the curve is free of simulation noise between
//! neighbouring points.
//!
//! Sweeps can be cancelled through a shared flag, checked between steps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pricer_core::market_data::{MarketEnvironment, MarketParameter};
use pricer_core::types::PricingError;
use pricer_models::instruments::ProductContract;
use pricer_pricing::mc::{simulate_payoffs, MonteCarloConfig, DEFAULT_DAYS_PER_YEAR};
use pricer_pricing::result::AutocallDateStat;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

/// Sweep settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// Half-width of the multiplier range.
    pub range_pct: f64,
    /// Number of sweep points.
    pub steps: usize,
    /// Paths per point.
    pub n_paths: usize,
    /// Simulation steps per year.
    pub days_per_year: u32,
    /// Seed shared by every point; entropy per point when absent.
    pub seed: Option<u64>,
    /// Simulate each point's paths in parallel.
    pub parallel: bool,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            range_pct: 0.2,
            steps: 21,
            n_paths: 2000,
            days_per_year: DEFAULT_DAYS_PER_YEAR,
            seed: None,
            parallel: false,
        }
    }
}

impl SensitivityConfig {
    /// Checks the sweep shape.
    ///
    /// # Errors
    ///
    /// `PricingError::Configuration` for zero steps or a range outside
    /// `[0, 1)`.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.steps == 0 {
            return Err(PricingError::configuration(
                "sensitivity sweep needs at least one step",
            ));
        }
        if !(self.range_pct >= 0.0 && self.range_pct < 1.0) {
            return Err(PricingError::configuration(format!(
                "sensitivity range must be in [0, 1), got {}",
                self.range_pct
            )));
        }
        Ok(())
    }

    /// Multipliers applied to the swept parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_risk::sensitivity::SensitivityConfig;
    ///
    /// let config = SensitivityConfig { steps: 5, ..Default::default() };
    /// let m = config.multipliers();
    /// assert_eq!(m.len(), 5);
    /// assert!((m[0] - 0.8).abs() < 1e-12);
    /// assert!((m[2] - 1.0).abs() < 1e-12);
    /// assert!((m[4] - 1.2).abs() < 1e-12);
    ///
    /// let single = SensitivityConfig { steps: 1, ..Default::default() };
    /// assert_eq!(single.multipliers(), vec![1.0]);
    /// ```
    pub fn multipliers(&self) -> Vec<f64> {
        match self.steps {
            0 => Vec::new(),
            1 => vec![1.0],
            n => {
                let low = 1.0 - self.range_pct;
                let step = 2.0 * self.range_pct / (n - 1) as f64;
                (0..n).map(|i| low + i as f64 * step).collect()
            }
        }
    }
}

/// One point of a sensitivity curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Multiplier applied to the base value.
    pub multiplier: f64,
    /// Bumped parameter value.
    pub parameter_value: f64,
    /// Mean undiscounted payout.
    pub fair_value: f64,
    /// Probability of being called on any observation date.
    pub trigger_probability: f64,
}

/// Result of a sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCurve {
    /// Swept parameter.
    pub parameter: MarketParameter,
    /// Completed points in multiplier order.
    pub points: Vec<SensitivityPoint>,
    /// `true` if the sweep stopped early on request.
    pub cancelled: bool,
}

/// Runs sensitivity sweeps.
#[derive(Clone, Debug)]
pub struct SensitivityAnalyzer {
    config: SensitivityConfig,
    simulation: MonteCarloConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl SensitivityAnalyzer {
    /// Creates an analyzer.
    ///
    /// # Errors
    ///
    /// `PricingError::Configuration` for an invalid sweep shape, path
    /// count or day count.
    pub fn new(config: SensitivityConfig) -> Result<Self, PricingError> {
        config.validate()?;
        let simulation = MonteCarloConfig::builder()
            .n_paths(config.n_paths)
            .days_per_year(config.days_per_year)
            .maybe_seed(config.seed)
            .parallel(config.parallel)
            .build()?;
        Ok(Self {
            config,
            simulation,
            cancel: None,
        })
    }

    /// Attaches a cancellation flag, checked before each point.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Sweep settings.
    #[inline]
    pub fn config(&self) -> &SensitivityConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Sweeps `parameter` around its value in `market`.
    ///
    /// On cancellation the points completed so far are returned with
    /// `cancelled` set.
    ///
    /// # Errors
    ///
    /// - `PricingError::Validation` if a bumped market is invalid or the
    ///   contract terms are incomplete
    /// - `PricingError::Configuration` for an invalid product duration
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::market_data::{MarketEnvironment, MarketParameter};
    /// use pricer_models::catalog::{standard_catalog, ProductCatalog};
    /// use pricer_risk::sensitivity::{SensitivityAnalyzer, SensitivityConfig};
    ///
    /// let catalog = standard_catalog().unwrap();
    /// let analyzer = SensitivityAnalyzer::new(SensitivityConfig {
    ///     steps: 5,
    ///     n_paths: 500,
    ///     seed: Some(9),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    ///
    /// let curve = analyzer
    ///     .sweep(
    ///         catalog.get("autocall_stepup").unwrap(),
    ///         &MarketEnvironment::default(),
    ///         MarketParameter::Volatility,
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(curve.points.len(), 5);
    /// assert!(!curve.cancelled);
    /// assert!((curve.points[0].parameter_value - 0.16).abs() < 1e-12);
    /// ```
    pub fn sweep(
        &self,
        contract: &ProductContract,
        market: &MarketEnvironment,
        parameter: MarketParameter,
    ) -> Result<SensitivityCurve, PricingError> {
        let _span = debug_span!("sweep", product = %contract.id, %parameter).entered();
        let schedule = contract.payoff.schedule();
        let multipliers = self.config.multipliers();

        let mut points = Vec::with_capacity(multipliers.len());
        let mut cancelled = false;
        for multiplier in multipliers {
            if self.is_cancelled() {
                warn!(completed = points.len(), "sensitivity sweep cancelled");
                cancelled = true;
                break;
            }

            let bumped = market.bumped(parameter, multiplier)?;
            let mut rng = self.simulation.rng();
            let sample = simulate_payoffs(contract, &bumped, &self.simulation, &mut rng)?;

            let trigger_probability = schedule
                .map(|s| {
                    AutocallDateStat::from_paths(&sample.paths, s)
                        .iter()
                        .map(|d| d.probability)
                        .sum::<f64>()
                })
                .unwrap_or(0.0);

            let point = SensitivityPoint {
                multiplier,
                parameter_value: bumped.get(parameter),
                fair_value: sample.mean(),
                trigger_probability,
            };
            debug!(
                multiplier,
                fair_value = point.fair_value,
                trigger_probability,
                "sweep point"
            );
            points.push(point);
        }

        Ok(SensitivityCurve {
            parameter,
            points,
            cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::catalog::{standard_catalog, ProductCatalog};

    fn analyzer(steps: usize) -> SensitivityAnalyzer {
        SensitivityAnalyzer::new(SensitivityConfig {
            steps,
            n_paths: 400,
            seed: Some(17),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_multipliers() {
        let m = SensitivityConfig::default().multipliers();
        assert_eq!(m.len(), 21);
        assert_relative_eq!(m[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(m[10], 1.0, epsilon = 1e-12);
        assert_relative_eq!(m[20], 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_shape() {
        let zero = SensitivityConfig {
            steps: 0,
            ..Default::default()
        };
        assert!(SensitivityAnalyzer::new(zero).unwrap_err().is_configuration());

        let wide = SensitivityConfig {
            range_pct: 1.0,
            ..Default::default()
        };
        assert!(SensitivityAnalyzer::new(wide).unwrap_err().is_configuration());

        let no_paths = SensitivityConfig {
            n_paths: 0,
            ..Default::default()
        };
        assert!(SensitivityAnalyzer::new(no_paths).unwrap_err().is_configuration());
    }

    #[test]
    fn test_spot_sweep_scales_payout() {
        // Levels follow the spot, so with common random numbers the payout
        // is proportional to the spot
        let catalog = standard_catalog().unwrap();
        let curve = analyzer(5)
            .sweep(
                catalog.require("participation_note").unwrap(),
                &MarketEnvironment::default(),
                MarketParameter::Spot,
            )
            .unwrap();

        let ratio = curve.points[0].fair_value / curve.points[0].parameter_value;
        for point in &curve.points {
            assert_relative_eq!(
                point.fair_value / point.parameter_value,
                ratio,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_trigger_probability_only_for_scheduled_products() {
        let catalog = standard_catalog().unwrap();
        let market = MarketEnvironment::default();

        let stepup = analyzer(3)
            .sweep(catalog.require("autocall_stepup").unwrap(), &market, MarketParameter::Volatility)
            .unwrap();
        assert!(stepup.points.iter().any(|p| p.trigger_probability > 0.0));
        assert!(stepup
            .points
            .iter()
            .all(|p| (0.0..=1.0 + 1e-12).contains(&p.trigger_probability)));

        let twin = analyzer(3)
            .sweep(catalog.require("twin_win").unwrap(), &market, MarketParameter::Volatility)
            .unwrap();
        assert!(twin.points.iter().all(|p| p.trigger_probability == 0.0));
    }

    #[test]
    fn test_zero_base_value_stays_zero() {
        let market = MarketEnvironment::new(100.0, 0.0, 0.02, 0.2).unwrap();
        let catalog = standard_catalog().unwrap();
        let curve = analyzer(3)
            .sweep(catalog.require("digital_barrier").unwrap(), &market, MarketParameter::RiskFreeRate)
            .unwrap();
        assert!(curve.points.iter().all(|p| p.parameter_value == 0.0));
        // Identical markets and seeds give identical points
        assert_eq!(curve.points[0].fair_value, curve.points[2].fair_value);
    }

    #[test]
    fn test_cancelled_before_start() {
        let flag = Arc::new(AtomicBool::new(true));
        let catalog = standard_catalog().unwrap();
        let curve = analyzer(21)
            .with_cancel_flag(Arc::clone(&flag))
            .sweep(
                catalog.require("autocall_classic").unwrap(),
                &MarketEnvironment::default(),
                MarketParameter::Volatility,
            )
            .unwrap();
        assert!(curve.cancelled);
        assert!(curve.points.is_empty());
    }

    #[test]
    fn test_single_step_is_base_market() {
        let catalog = standard_catalog().unwrap();
        let curve = analyzer(1)
            .sweep(
                catalog.require("autocall_memory").unwrap(),
                &MarketEnvironment::default(),
                MarketParameter::DividendYield,
            )
            .unwrap();
        assert_eq!(curve.points.len(), 1);
        assert_eq!(curve.points[0].multiplier, 1.0);
        assert_relative_eq!(curve.points[0].parameter_value, 0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_curve_serialises() {
        let curve = SensitivityCurve {
            parameter: MarketParameter::Volatility,
            points: vec![],
            cancelled: true,
        };
        let json = serde_json::to_string(&curve).unwrap();
        assert!(json.contains("\"volatility\""));
    }
}
