//! Tail and dispersion metrics over a payoff sample.
//!
//! Payoffs are turned into simple returns against the reference spot,
//! `r_i = (p_i - S0) / S0`, and summarised as:
//!
//! - **VaR 95%**: `|r_(k)|` with `k = ⌊0.05·n⌋` on the ascending returns
//! - **CVaR 95%**: mean of `|r|` over the `k` worst returns
//! - **Max drawdown**: peak-to-trough fall of the payoff sequence taken in
//!   simulation order
//! - **Sharpe ratio**: mean return over population standard deviation
//!
//! CVaR and the Sharpe ratio can be undefined for a given sample; each
//! carries its own `Result` so one degenerate statistic does not hide
//! the others.

use pricer_models::instruments::AutocallSchedule;
use pricer_pricing::mc::PayoffSample;
use pricer_pricing::result::AutocallDateStat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RiskError;

/// Share of the sample in the VaR/CVaR tail.
pub const TAIL_FRACTION: f64 = 0.05;

/// Standard deviations at or below this are treated as zero.
pub const MIN_STD_DEV: f64 = 1e-12;

/// A statistic that may be undefined for the sample.
pub type MetricResult = Result<f64, RiskError>;

/// Probability of still being alive after an observation date.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPoint {
    /// Observation date in years.
    pub date: f64,
    /// Share of paths not called on or before `date`.
    pub survival: f64,
}

/// Risk summary of one payoff sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Number of payoffs.
    pub n_samples: usize,
    /// Mean return.
    pub mean_return: f64,
    /// 95% value at risk, as a positive return magnitude.
    pub var95: f64,
    /// 95% conditional value at risk.
    pub cvar95: MetricResult,
    /// Largest fall of the payoff sequence from its running peak.
    pub max_drawdown: f64,
    /// Mean return over its population standard deviation.
    pub sharpe_ratio: MetricResult,
    /// Largest drawdown along any simulated price path.
    pub worst_path_drawdown: Option<f64>,
    /// Survival probability after each autocall observation.
    pub survival_by_date: Option<Vec<SurvivalPoint>>,
    /// Probability of never being called.
    pub autocall_risk: Option<f64>,
}

/// Simple returns of `payoffs` against `reference_spot`.
///
/// # Examples
///
/// ```
/// use pricer_risk::metrics::returns;
///
/// assert_eq!(returns(&[90.0, 125.0], 100.0), vec![-0.1, 0.25]);
/// ```
pub fn returns(payoffs: &[f64], reference_spot: f64) -> Vec<f64> {
    payoffs
        .iter()
        .map(|p| (p - reference_spot) / reference_spot)
        .collect()
}

/// Peak-to-trough fall of `values` in the order given.
///
/// The running peak starts at zero; points seen while it is not positive
/// contribute nothing.
///
/// # Examples
///
/// ```
/// use pricer_risk::metrics::sequence_drawdown;
///
/// let dd = sequence_drawdown(&[100.0, 120.0, 90.0, 130.0, 65.0]);
/// assert!((dd - 0.5).abs() < 1e-12);
/// ```
pub fn sequence_drawdown(values: &[f64]) -> f64 {
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;
    for &v in values {
        if v > peak {
            peak = v;
        }
        if peak > 0.0 {
            max_drawdown = max_drawdown.max((peak - v) / peak);
        }
    }
    max_drawdown
}

/// Survival curve from per-date first-call probabilities.
pub fn survival_curve(by_date: &[AutocallDateStat]) -> Vec<SurvivalPoint> {
    let mut called = 0.0;
    by_date
        .iter()
        .map(|stat| {
            called += stat.probability;
            SurvivalPoint {
                date: stat.date,
                survival: (1.0 - called).max(0.0),
            }
        })
        .collect()
}

/// Computes payoff-level risk metrics.
///
/// # Errors
///
/// - `RiskError::EmptySample` if `payoffs` is empty
/// - `RiskError::InvalidReferenceSpot` unless `reference_spot` is positive
///   and finite
///
/// # Examples
///
/// ```
/// use pricer_risk::metrics::risk_metrics;
/// use pricer_risk::RiskError;
///
/// let payoffs: Vec<f64> = (1..=100).map(f64::from).collect();
/// let metrics = risk_metrics(&payoffs, 100.0).unwrap();
///
/// assert!((metrics.var95 - 0.94).abs() < 1e-12);
/// assert!((metrics.cvar95.unwrap() - 0.97).abs() < 1e-12);
///
/// // Nineteen samples leave the 5% tail empty
/// let small = risk_metrics(&payoffs[..19], 100.0).unwrap();
/// assert_eq!(small.cvar95, Err(RiskError::EmptyTail { n_samples: 19 }));
/// ```
pub fn risk_metrics(payoffs: &[f64], reference_spot: f64) -> Result<RiskMetrics, RiskError> {
    if payoffs.is_empty() {
        return Err(RiskError::EmptySample);
    }
    if !(reference_spot > 0.0 && reference_spot.is_finite()) {
        return Err(RiskError::InvalidReferenceSpot(reference_spot));
    }

    let n = payoffs.len();
    let mut sorted = returns(payoffs, reference_spot);
    let mean_return = sorted.iter().sum::<f64>() / n as f64;
    let std_dev =
        (sorted.iter().map(|r| (r - mean_return).powi(2)).sum::<f64>() / n as f64).sqrt();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let k = (TAIL_FRACTION * n as f64).floor() as usize;
    let var95 = sorted[k.min(n - 1)].abs();

    let cvar95 = if k == 0 {
        warn!(n_samples = n, "cvar95 undefined: tail is empty");
        Err(RiskError::EmptyTail { n_samples: n })
    } else {
        Ok(sorted[..k].iter().map(|r| r.abs()).sum::<f64>() / k as f64)
    };

    let sharpe_ratio = if std_dev <= MIN_STD_DEV {
        warn!(n_samples = n, "sharpe ratio undefined: zero return dispersion");
        Err(RiskError::ZeroVariance)
    } else {
        Ok(mean_return / std_dev)
    };

    let metrics = RiskMetrics {
        n_samples: n,
        mean_return,
        var95,
        cvar95,
        max_drawdown: sequence_drawdown(payoffs),
        sharpe_ratio,
        worst_path_drawdown: None,
        survival_by_date: None,
        autocall_risk: None,
    };
    debug!(
        n_samples = n,
        var95 = metrics.var95,
        max_drawdown = metrics.max_drawdown,
        "risk metrics computed"
    );
    Ok(metrics)
}

/// Computes [`risk_metrics`] plus the path-level statistics of `sample`.
///
/// With a `schedule`, survival is read from the first trigger of each
/// path; without one no path is ever called and `autocall_risk` is 1.
pub fn risk_metrics_for_paths(
    sample: &PayoffSample,
    schedule: Option<&AutocallSchedule>,
) -> Result<RiskMetrics, RiskError> {
    let mut metrics = risk_metrics(&sample.payoffs, sample.initial_spot)?;

    metrics.worst_path_drawdown = sample
        .paths
        .iter()
        .map(|p| p.max_drawdown)
        .reduce(f64::max);

    match schedule {
        Some(schedule) => {
            let by_date = AutocallDateStat::from_paths(&sample.paths, schedule);
            let survival = survival_curve(&by_date);
            metrics.autocall_risk = Some(survival.last().map_or(1.0, |p| p.survival));
            metrics.survival_by_date = Some(survival);
        }
        None => metrics.autocall_risk = Some(1.0),
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_pricing::mc::{AutocallTrigger, PathStatistics};
    use proptest::prelude::*;

    fn called_path(drawdown: f64, index: usize, date: f64) -> PathStatistics {
        PathStatistics {
            max_drawdown: drawdown,
            trigger: Some(AutocallTrigger {
                date,
                level: 100.0,
                coupon: 8.0,
                observation_index: index,
            }),
            ..PathStatistics::degenerate(100.0, 108.0)
        }
    }

    fn alive_path(drawdown: f64, final_spot: f64) -> PathStatistics {
        PathStatistics {
            max_drawdown: drawdown,
            ..PathStatistics::degenerate(100.0, final_spot)
        }
    }

    // ========================================
    // Payoff metrics
    // ========================================

    #[test]
    fn test_var_and_cvar_on_uniform_grid() {
        let payoffs: Vec<f64> = (1..=100).map(f64::from).collect();
        let m = risk_metrics(&payoffs, 100.0).unwrap();
        assert_eq!(m.n_samples, 100);
        assert_relative_eq!(m.var95, 0.94, epsilon = 1e-12);
        assert_relative_eq!(m.cvar95.unwrap(), 0.97, epsilon = 1e-12);
    }

    #[test]
    fn test_order_does_not_change_tail_metrics() {
        let mut payoffs: Vec<f64> = (1..=100).map(f64::from).collect();
        let a = risk_metrics(&payoffs, 100.0).unwrap();
        payoffs.reverse();
        let b = risk_metrics(&payoffs, 100.0).unwrap();
        assert_eq!(a.var95, b.var95);
        assert_eq!(a.cvar95, b.cvar95);
        // Drawdown follows sequence order
        assert_eq!(a.max_drawdown, 0.0);
        assert_relative_eq!(b.max_drawdown, 0.99, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_tail() {
        let payoffs = vec![95.0; 19];
        let m = risk_metrics(&payoffs, 100.0).unwrap();
        assert_eq!(m.cvar95, Err(RiskError::EmptyTail { n_samples: 19 }));
        assert_relative_eq!(m.var95, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_ratio() {
        let m = risk_metrics(&[100.0, 120.0], 100.0).unwrap();
        assert_relative_eq!(m.mean_return, 0.1, epsilon = 1e-12);
        assert_relative_eq!(m.sharpe_ratio.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_reported_independently() {
        let m = risk_metrics(&[108.5; 40], 100.0).unwrap();
        assert_eq!(m.sharpe_ratio, Err(RiskError::ZeroVariance));
        assert_relative_eq!(m.var95, 0.085, epsilon = 1e-12);
        assert_relative_eq!(m.cvar95.unwrap(), 0.085, epsilon = 1e-12);
        assert_eq!(m.max_drawdown, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(risk_metrics(&[], 100.0), Err(RiskError::EmptySample));
        assert_eq!(
            risk_metrics(&[100.0], 0.0),
            Err(RiskError::InvalidReferenceSpot(0.0))
        );
        assert!(risk_metrics(&[100.0], f64::NAN).is_err());
    }

    #[test]
    fn test_sequence_drawdown_guards_non_positive_peak() {
        assert_eq!(sequence_drawdown(&[0.0, 0.0, -5.0]), 0.0);
        assert_relative_eq!(sequence_drawdown(&[-5.0, 10.0, 5.0]), 0.5, epsilon = 1e-12);
        assert_eq!(sequence_drawdown(&[]), 0.0);
    }

    // ========================================
    // Path metrics
    // ========================================

    #[test]
    fn test_survival_and_worst_path_drawdown() {
        let schedule =
            AutocallSchedule::new(vec![1.0, 2.0], vec![105.0, 110.0], vec![8.0, 10.0]).unwrap();
        let paths = vec![
            called_path(0.05, 0, 1.0),
            called_path(0.10, 1, 2.0),
            called_path(0.02, 0, 1.0),
            alive_path(0.45, 60.0),
        ];
        let sample = PayoffSample {
            initial_spot: 100.0,
            maturity: 2.0,
            payoffs: vec![108.0, 110.0, 108.0, 60.0],
            paths,
        };

        let m = risk_metrics_for_paths(&sample, Some(&schedule)).unwrap();
        assert_eq!(m.worst_path_drawdown, Some(0.45));

        let survival = m.survival_by_date.unwrap();
        assert_eq!(survival.len(), 2);
        assert_relative_eq!(survival[0].survival, 0.5, epsilon = 1e-12);
        assert_relative_eq!(survival[1].survival, 0.25, epsilon = 1e-12);
        assert_relative_eq!(m.autocall_risk.unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_unscheduled_product_is_never_called() {
        let sample = PayoffSample {
            initial_spot: 100.0,
            maturity: 1.0,
            payoffs: vec![100.0, 80.0],
            paths: vec![alive_path(0.0, 100.0), alive_path(0.2, 80.0)],
        };
        let m = risk_metrics_for_paths(&sample, None).unwrap();
        assert_eq!(m.autocall_risk, Some(1.0));
        assert!(m.survival_by_date.is_none());
        assert_eq!(m.worst_path_drawdown, Some(0.2));
    }

    #[test]
    fn test_metrics_serialise() {
        let m = risk_metrics(&[100.0; 5], 100.0).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("ZeroVariance"));
        assert!(json.contains("EmptyTail"));
    }

    proptest! {
        #[test]
        fn prop_cvar_dominates_var_for_losses(
            payoffs in prop::collection::vec(1.0f64..100.0, 20..200)
        ) {
            let m = risk_metrics(&payoffs, 100.0).unwrap();
            let cvar = m.cvar95.unwrap();
            prop_assert!(cvar + 1e-12 >= m.var95);
            prop_assert!(m.var95 <= 1.0);
        }

        #[test]
        fn prop_drawdown_is_a_fraction(
            payoffs in prop::collection::vec(0.0f64..200.0, 1..100)
        ) {
            let dd = sequence_drawdown(&payoffs);
            prop_assert!((0.0..=1.0).contains(&dd));
        }
    }
}
