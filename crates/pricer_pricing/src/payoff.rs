//! Payoff evaluation for structured products.
//!
//! Every product family pays out in spot units against the initial spot
//! `S0` of the path. Levels are rescaled to spot units first (see
//! [`PayoffSpec::normalised`]); coupons are added as quoted.
//!
//! | Family        | Path statistics used           |
//! |---------------|--------------------------------|
//! | Autocalls     | running maximum, final spot    |
//! | Knock-in      | running minimum and maximum    |
//! | Digital       | running minimum                |
//! | Twin-win      | running minimum, final spot    |
//! | Participation | final spot                     |
//! | Vanilla       | final spot                     |
//!
//! Batch callers build a [`PayoffEvaluator`] once per run; it validates the
//! contract up front so the per-path call cannot fail.

use pricer_core::types::PricingError;
use pricer_models::instruments::{
    AutocallSchedule, NormalisedPayoff, PayoffSpec, ProductContract, VanillaTerms,
};

use crate::mc::PathStatistics;

/// Validated payoff, normalised against one initial spot.
///
/// # Examples
///
/// ```rust
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::PathStatistics;
/// use pricer_pricing::payoff::PayoffEvaluator;
///
/// let catalog = standard_catalog().unwrap();
/// let digital = catalog.get("digital_barrier").unwrap();
/// let evaluator = PayoffEvaluator::new(digital, 100.0).unwrap();
///
/// // Barrier at 70 held: coupon of 12 on top of capital
/// assert_eq!(evaluator.evaluate(95.0, &PathStatistics::degenerate(100.0, 95.0)), 112.0);
/// // Barrier breached: final spot
/// let breached = PathStatistics { min_spot: 65.0, ..PathStatistics::degenerate(100.0, 90.0) };
/// assert_eq!(evaluator.evaluate(90.0, &breached), 90.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PayoffEvaluator {
    payoff: NormalisedPayoff,
    vanilla: Option<VanillaTerms>,
}

impl PayoffEvaluator {
    /// Validates `contract` and normalises its levels against `initial_spot`.
    ///
    /// # Errors
    ///
    /// - `PricingError::Validation` for missing or invalid terms
    /// - `PricingError::Configuration` for a malformed schedule
    pub fn new(contract: &ProductContract, initial_spot: f64) -> Result<Self, PricingError> {
        contract.validate()?;
        let payoff = contract.payoff.normalised(initial_spot);
        let vanilla = if payoff.spec().is_vanilla() {
            Some(payoff.spec().vanilla_terms()?)
        } else {
            None
        };
        Ok(Self { payoff, vanilla })
    }

    /// Initial spot the levels were normalised against.
    #[inline]
    pub fn initial_spot(&self) -> f64 {
        self.payoff.initial_spot()
    }

    /// Normalised terms.
    #[inline]
    pub fn payoff(&self) -> &NormalisedPayoff {
        &self.payoff
    }

    /// Payout of one path.
    #[inline]
    pub fn evaluate(&self, final_spot: f64, stats: &PathStatistics) -> f64 {
        match &self.vanilla {
            Some(terms) => self.initial_spot() + terms.intrinsic(final_spot),
            None => evaluate_normalised(&self.payoff, final_spot, stats),
        }
    }

    /// Payout of a zero-variance path sitting at `spot`.
    #[inline]
    pub fn evaluate_at(&self, spot: f64) -> f64 {
        self.evaluate(spot, &PathStatistics::degenerate(self.initial_spot(), spot))
    }

    /// Payouts of a batch of paths, in order.
    pub fn evaluate_paths(&self, paths: &[PathStatistics]) -> Vec<f64> {
        paths.iter().map(|p| self.evaluate(p.final_spot, p)).collect()
    }
}

/// Validates the contract, then evaluates one path.
///
/// Levels are normalised against `stats.initial_spot`.
///
/// # Errors
///
/// Returns the validation error of an incomplete contract, e.g. a vanilla
/// without a strike.
pub fn try_evaluate(
    contract: &ProductContract,
    final_spot: f64,
    stats: &PathStatistics,
) -> Result<f64, PricingError> {
    Ok(PayoffEvaluator::new(contract, stats.initial_spot)?.evaluate(final_spot, stats))
}

/// Evaluates one path of a contract assumed valid.
///
/// A contract that fails validation evaluates to `NaN`; use
/// [`try_evaluate`] to get the reason instead.
///
/// # Examples
///
/// ```rust
/// use pricer_models::catalog::{standard_catalog, ProductCatalog};
/// use pricer_pricing::mc::PathStatistics;
/// use pricer_pricing::payoff::evaluate;
///
/// let catalog = standard_catalog().unwrap();
/// let classic = catalog.get("autocall_classic").unwrap();
///
/// // Running maximum reached the 100% autocall level: capital plus 8.5
/// let stats = PathStatistics {
///     max_spot: 104.0,
///     ..PathStatistics::degenerate(100.0, 40.0)
/// };
/// assert_eq!(evaluate(classic, 40.0, &stats), 108.5);
/// ```
pub fn evaluate(contract: &ProductContract, final_spot: f64, stats: &PathStatistics) -> f64 {
    try_evaluate(contract, final_spot, stats).unwrap_or(f64::NAN)
}

/// Evaluates one path of an already normalised payoff.
///
/// Vanilla terms are resolved on every call; an incomplete vanilla yields
/// `NaN`.
pub fn evaluate_normalised(payoff: &NormalisedPayoff, final_spot: f64, stats: &PathStatistics) -> f64 {
    let s0 = payoff.initial_spot();
    match payoff.spec() {
        PayoffSpec::AutocallClassic {
            autocall_level,
            coupon,
            barrier,
            protection,
        } => {
            if stats.max_spot >= *autocall_level || final_spot >= *protection {
                s0 + coupon
            } else {
                capital_at_risk(s0, final_spot, *barrier)
            }
        }
        PayoffSpec::AutocallStepUp {
            schedule,
            barrier,
            final_barrier,
        } => step_up(schedule, *barrier, *final_barrier, s0, final_spot, stats.max_spot),
        PayoffSpec::AutocallMemory {
            schedule,
            barrier,
            final_barrier,
        } => {
            let first_met = schedule.levels.iter().position(|l| stats.max_spot >= *l);
            match first_met {
                // Coupons of the unmet earlier observations are remembered
                Some(i) => s0 + schedule.coupons[..=i].iter().sum::<f64>(),
                None if final_spot >= *final_barrier => s0 + schedule.total_coupons(),
                None => capital_at_risk(s0, final_spot, *barrier),
            }
        }
        PayoffSpec::AutocallKnockIn {
            schedule,
            barrier,
            knock_in,
            final_barrier,
        } => {
            if stats.min_spot <= *knock_in {
                step_up(schedule, *barrier, *final_barrier, s0, final_spot, stats.max_spot)
            } else {
                capital_at_risk(s0, final_spot, *barrier)
            }
        }
        PayoffSpec::Digital { barrier, coupon } => {
            if stats.min_spot >= *barrier {
                s0 + coupon
            } else {
                final_spot
            }
        }
        PayoffSpec::Participation {
            participation,
            protection,
            strike,
        } => {
            if final_spot >= *protection {
                s0 + (final_spot - strike).max(0.0) * participation / 100.0
            } else {
                final_spot
            }
        }
        PayoffSpec::TwinWin { barrier, strike } => {
            if stats.min_spot >= *barrier {
                s0 + (final_spot - strike).abs()
            } else {
                final_spot
            }
        }
        PayoffSpec::Vanilla { .. } => match payoff.spec().vanilla_terms() {
            Ok(terms) => s0 + terms.intrinsic(final_spot),
            Err(_) => f64::NAN,
        },
    }
}

/// Capital returned above the barrier, final spot below it.
#[inline]
fn capital_at_risk(s0: f64, final_spot: f64, barrier: f64) -> f64 {
    if final_spot >= barrier {
        s0
    } else {
        final_spot
    }
}

fn step_up(
    schedule: &AutocallSchedule,
    barrier: f64,
    final_barrier: f64,
    s0: f64,
    final_spot: f64,
    max_spot: f64,
) -> f64 {
    if let Some(o) = schedule.observations().find(|o| max_spot >= o.level) {
        return s0 + o.coupon;
    }
    if final_spot >= final_barrier {
        s0 + schedule.last_coupon()
    } else {
        capital_at_risk(s0, final_spot, barrier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::catalog::{standard_catalog, InMemoryCatalog, ProductCatalog};
    use pricer_models::instruments::{AutocallSchedule, RiskBand, VanillaKind};

    fn catalog() -> InMemoryCatalog {
        standard_catalog().unwrap()
    }

    fn path(s0: f64, final_spot: f64, min: f64, max: f64) -> PathStatistics {
        PathStatistics {
            initial_spot: s0,
            final_spot,
            min_spot: min,
            max_spot: max,
            max_drawdown: 0.0,
            trigger: None,
        }
    }

    fn eval(id: &str, final_spot: f64, min: f64, max: f64) -> f64 {
        let catalog = catalog();
        let contract = catalog.require(id).unwrap();
        PayoffEvaluator::new(contract, 100.0)
            .unwrap()
            .evaluate(final_spot, &path(100.0, final_spot, min, max))
    }

    fn vanilla(kind: VanillaKind, strike: Option<f64>, second: Option<f64>) -> ProductContract {
        ProductContract {
            id: "v".to_string(),
            display_name: "Vanilla".to_string(),
            description: String::new(),
            risk_band: RiskBand::High,
            min_duration: 1.0,
            max_duration: 1.0,
            expected_return: 0.0,
            max_loss_pct: 100.0,
            payoff: PayoffSpec::Vanilla {
                option: Some(kind),
                strike,
                second_strike: second,
                time_to_maturity: Some(1.0),
                notional: None,
            },
        }
    }

    // ========================================
    // Autocalls
    // ========================================

    #[test]
    fn test_classic_called_regardless_of_final() {
        assert_eq!(eval("autocall_classic", 30.0, 30.0, 100.0), 108.5);
        assert_eq!(eval("autocall_classic", 130.0, 95.0, 130.0), 108.5);
    }

    #[test]
    fn test_classic_not_called() {
        // Below 100 throughout: protection 100 not reached at maturity
        assert_eq!(eval("autocall_classic", 80.0, 70.0, 99.0), 100.0);
        assert_eq!(eval("autocall_classic", 60.0, 55.0, 99.0), 60.0);
        assert_eq!(eval("autocall_classic", 65.0, 60.0, 99.0), 100.0);
    }

    #[test]
    fn test_step_up() {
        // Levels 105/110/115/120, coupons 8/10/12/15
        assert_eq!(eval("autocall_stepup", 90.0, 90.0, 106.0), 108.0);
        assert_eq!(eval("autocall_stepup", 90.0, 90.0, 112.0), 108.0);
        let catalog = catalog();
        let contract = catalog.require("autocall_stepup").unwrap();
        let PayoffSpec::AutocallStepUp { barrier, final_barrier, .. } = contract.payoff else {
            panic!("step-up expected");
        };
        let below_all = 104.0_f64.min(final_barrier - 1.0);
        assert_eq!(
            eval("autocall_stepup", below_all, below_all, below_all),
            if below_all >= barrier { 100.0 } else { below_all }
        );
        assert_eq!(eval("autocall_stepup", final_barrier, 90.0, 104.0), 115.0);
    }

    fn memory(levels: Vec<f64>, final_barrier: f64) -> ProductContract {
        ProductContract {
            id: "memory".to_string(),
            display_name: "Memory".to_string(),
            description: String::new(),
            risk_band: RiskBand::High,
            min_duration: 3.0,
            max_duration: 3.0,
            expected_return: 15.0,
            max_loss_pct: 100.0,
            payoff: PayoffSpec::AutocallMemory {
                schedule: AutocallSchedule::new(vec![1.0, 2.0, 3.0], levels, vec![6.0, 8.0, 10.0])
                    .unwrap(),
                barrier: 50.0,
                final_barrier,
            },
        }
    }

    #[test]
    fn test_memory_accumulates_earlier_coupons() {
        // Falling levels: the first level met is the third observation
        let contract = memory(vec![120.0, 110.0, 100.0], 100.0);
        let evaluator = PayoffEvaluator::new(&contract, 100.0).unwrap();

        assert_eq!(evaluator.evaluate(60.0, &path(100.0, 60.0, 60.0, 105.0)), 124.0);
        assert_eq!(evaluator.evaluate(60.0, &path(100.0, 60.0, 60.0, 112.0)), 114.0);
        assert_eq!(evaluator.evaluate(60.0, &path(100.0, 60.0, 60.0, 125.0)), 106.0);
    }

    #[test]
    fn test_memory_final_pays_all_coupons() {
        let contract = memory(vec![100.0, 105.0, 110.0], 90.0);
        let evaluator = PayoffEvaluator::new(&contract, 100.0).unwrap();

        // No level met, final above the final barrier: every coupon remembered
        assert_eq!(evaluator.evaluate(95.0, &path(100.0, 95.0, 80.0, 99.0)), 124.0);
        // Between barrier and final barrier: capital back
        assert_eq!(evaluator.evaluate(70.0, &path(100.0, 70.0, 60.0, 99.0)), 100.0);
        // Below barrier: final spot
        assert_eq!(evaluator.evaluate(40.0, &path(100.0, 40.0, 40.0, 99.0)), 40.0);
    }

    #[test]
    fn test_memory_catalog_first_level() {
        // Catalog levels rise from 100, so the first observation is always the one met
        assert_eq!(eval("autocall_memory", 50.0, 50.0, 107.0), 106.0);
        assert_eq!(eval("autocall_memory", 100.0, 80.0, 99.0), 124.0);
        assert_eq!(eval("autocall_memory", 45.0, 45.0, 99.0), 45.0);
    }

    #[test]
    fn test_knock_in() {
        // Knock-in 80, barrier 70, levels 110/120, coupons 10/15, final barrier 100
        // Never knocked in: upside capped at capital
        assert_eq!(eval("autocall_knockin", 130.0, 81.0, 130.0), 100.0);
        // Knocked in and above the first level: first coupon
        assert_eq!(eval("autocall_knockin", 130.0, 79.0, 130.0), 110.0);
        // Knocked in, no level met, final at the final barrier: last coupon
        assert_eq!(eval("autocall_knockin", 100.0, 75.0, 105.0), 115.0);
        // Knocked in and finishing below the barrier
        assert_eq!(eval("autocall_knockin", 65.0, 65.0, 100.0), 65.0);
    }

    // ========================================
    // Other families
    // ========================================

    #[test]
    fn test_digital() {
        assert_eq!(eval("digital_barrier", 75.0, 70.0, 100.0), 112.0);
        assert_eq!(eval("digital_barrier", 75.0, 69.9, 100.0), 75.0);
    }

    #[test]
    fn test_participation() {
        let catalog = catalog();
        let contract = catalog.require("participation_note").unwrap();
        let PayoffSpec::Participation { participation, protection, strike } = contract.payoff else {
            panic!("participation expected");
        };
        let up = strike + 20.0;
        assert_relative_eq!(
            eval("participation_note", up, 90.0, up),
            100.0 + 20.0 * participation / 100.0,
            epsilon = 1e-12
        );
        let below = protection - 5.0;
        assert_eq!(eval("participation_note", below, below, 100.0), below);
    }

    #[test]
    fn test_twin_win() {
        let catalog = catalog();
        let contract = catalog.require("twin_win").unwrap();
        let PayoffSpec::TwinWin { barrier, strike } = contract.payoff else {
            panic!("twin win expected");
        };
        let down = strike - 10.0;
        assert_relative_eq!(eval("twin_win", down, down, 100.0), 110.0, epsilon = 1e-12);
        let breached = barrier - 1.0;
        assert_eq!(eval("twin_win", 90.0, breached, 100.0), 90.0);
    }

    #[test]
    fn test_vanilla_intrinsic() {
        let stats = |s: f64| path(100.0, s, s, s);
        let call = vanilla(VanillaKind::Call, Some(100.0), None);
        assert_eq!(try_evaluate(&call, 120.0, &stats(120.0)).unwrap(), 120.0);
        assert_eq!(try_evaluate(&call, 80.0, &stats(80.0)).unwrap(), 100.0);

        let put = vanilla(VanillaKind::Put, Some(100.0), None);
        assert_eq!(try_evaluate(&put, 80.0, &stats(80.0)).unwrap(), 120.0);

        let call_spread = vanilla(VanillaKind::CallSpread, Some(100.0), Some(110.0));
        assert_eq!(try_evaluate(&call_spread, 150.0, &stats(150.0)).unwrap(), 110.0);

        let put_spread = vanilla(VanillaKind::PutSpread, Some(100.0), Some(90.0));
        assert_eq!(try_evaluate(&put_spread, 50.0, &stats(50.0)).unwrap(), 110.0);
    }

    #[test]
    fn test_vanilla_strike_rescaled() {
        let call = vanilla(VanillaKind::Call, Some(100.0), None);
        let stats = path(200.0, 220.0, 220.0, 220.0);
        // Strike 100% of 200
        assert_eq!(try_evaluate(&call, 220.0, &stats).unwrap(), 220.0);
    }

    #[test]
    fn test_incomplete_vanilla() {
        let call = vanilla(VanillaKind::Call, None, None);
        let stats = PathStatistics::degenerate(100.0, 100.0);
        let err = try_evaluate(&call, 100.0, &stats).unwrap_err();
        assert!(err.is_validation());
        assert!(evaluate(&call, 100.0, &stats).is_nan());
        assert!(PayoffEvaluator::new(&call, 100.0).is_err());
    }

    #[test]
    fn test_normalised_matches_evaluator() {
        let catalog = catalog();
        for contract in catalog.products() {
            let evaluator = PayoffEvaluator::new(contract, 120.0).unwrap();
            for spot in [50.0, 100.0, 130.0, 170.0] {
                let stats = PathStatistics::degenerate(120.0, spot);
                assert_eq!(
                    evaluator.evaluate(spot, &stats),
                    evaluate_normalised(evaluator.payoff(), spot, &stats),
                    "{}",
                    contract.id
                );
            }
        }
    }
}
