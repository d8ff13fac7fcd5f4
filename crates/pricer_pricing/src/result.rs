//! Pricing outputs.
//!
//! [`CalculationResult`] is the full report of one Monte Carlo run: payoff
//! curve, break-even, gain/loss extremes, outcome probabilities, Greeks,
//! per-date autocall statistics and the price summary. Values are raw
//! `f64`s; formatting and rounding are left to the caller.

use pricer_models::instruments::AutocallSchedule;
use serde::{Deserialize, Serialize};

use crate::greeks::GreeksResult;
use crate::mc::PathStatistics;
use crate::payoff::PayoffEvaluator;

/// Number of points on the payoff curve.
pub const CURVE_POINTS: usize = 101;

/// Lowest curve spot as a fraction of the initial spot.
pub const CURVE_LOW: f64 = 0.3;

/// Highest curve spot as a fraction of the initial spot.
pub const CURVE_HIGH: f64 = 1.7;

/// Half-width of the at-par band as a fraction of the initial spot.
pub const PAR_BAND: f64 = 0.01;

/// Payout level counted as protected, as a fraction of the initial spot.
pub const PROTECTION_LEVEL: f64 = 0.9;

/// Outcome probabilities over the simulated payoffs.
///
/// `positive`, `negative` and `at_par` partition the paths: a payoff
/// within [`PAR_BAND`] of the initial spot is at par, otherwise it is
/// positive above the initial spot and negative below it.
/// `protection_at_90_pct` counts payoffs of at least 90% of the initial
/// spot and overlaps the other buckets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityStats {
    /// Share of paths paying more than the initial spot.
    pub positive: f64,
    /// Share of paths paying less than the initial spot.
    pub negative: f64,
    /// Share of paths paying back the initial spot.
    pub at_par: f64,
    /// Share of paths paying at least 90% of the initial spot.
    pub protection_at_90_pct: f64,
    /// Paths in the positive bucket.
    pub positive_count: usize,
    /// Paths in the negative bucket.
    pub negative_count: usize,
    /// Paths in the at-par bucket.
    pub at_par_count: usize,
    /// Paths simulated.
    pub n_paths: usize,
}

impl ProbabilityStats {
    /// Buckets `payoffs` against `initial_spot`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::result::ProbabilityStats;
    ///
    /// let stats = ProbabilityStats::from_payoffs(&[120.0, 100.5, 95.0, 80.0], 100.0);
    /// assert_eq!(stats.positive_count, 1);
    /// assert_eq!(stats.at_par_count, 1);
    /// assert_eq!(stats.negative_count, 2);
    /// assert_eq!(stats.protection_at_90_pct, 0.75);
    /// ```
    pub fn from_payoffs(payoffs: &[f64], initial_spot: f64) -> Self {
        let band = PAR_BAND * initial_spot;
        let floor = PROTECTION_LEVEL * initial_spot;

        let mut stats = Self {
            n_paths: payoffs.len(),
            ..Self::default()
        };
        let mut protected = 0usize;
        for &p in payoffs {
            if (p - initial_spot).abs() < band {
                stats.at_par_count += 1;
            } else if p > initial_spot {
                stats.positive_count += 1;
            } else {
                stats.negative_count += 1;
            }
            if p >= floor {
                protected += 1;
            }
        }

        if stats.n_paths > 0 {
            let n = stats.n_paths as f64;
            stats.positive = stats.positive_count as f64 / n;
            stats.negative = stats.negative_count as f64 / n;
            stats.at_par = stats.at_par_count as f64 / n;
            stats.protection_at_90_pct = protected as f64 / n;
        }
        stats
    }
}

/// Autocall statistics for one observation date.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutocallDateStat {
    /// Observation date in years.
    pub date: f64,
    /// Share of paths first called on this date.
    pub probability: f64,
    /// Mean coupon of the paths called on this date (0 if none).
    pub expected_coupon: f64,
}

impl AutocallDateStat {
    /// Collects first-trigger statistics per observation of `schedule`.
    pub fn from_paths(paths: &[PathStatistics], schedule: &AutocallSchedule) -> Vec<Self> {
        let mut counts = vec![0usize; schedule.len()];
        let mut coupons = vec![0.0; schedule.len()];
        for trigger in paths.iter().filter_map(|p| p.trigger) {
            if let Some(count) = counts.get_mut(trigger.observation_index) {
                *count += 1;
                coupons[trigger.observation_index] += trigger.coupon;
            }
        }

        let n = paths.len().max(1) as f64;
        schedule
            .dates
            .iter()
            .zip(counts.iter().zip(&coupons))
            .map(|(&date, (&count, &coupon_sum))| Self {
                date,
                probability: count as f64 / n,
                expected_coupon: if count > 0 {
                    coupon_sum / count as f64
                } else {
                    0.0
                },
            })
            .collect()
    }
}

/// Mean payout and its discounted value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSummary {
    /// Mean undiscounted payoff.
    pub mean_payoff: f64,
    /// Standard error of the mean.
    pub std_error: f64,
    /// exp(-rT) at the simulated maturity.
    pub discount_factor: f64,
    /// `mean_payoff × discount_factor`.
    pub discounted_value: f64,
}

impl PricingSummary {
    /// Summarises `payoffs` with discount factor `discount_factor`.
    pub fn from_payoffs(payoffs: &[f64], discount_factor: f64) -> Self {
        let n = payoffs.len();
        if n == 0 {
            return Self {
                discount_factor,
                ..Self::default()
            };
        }
        let mean = payoffs.iter().sum::<f64>() / n as f64;
        let std_error = if n > 1 {
            let variance =
                payoffs.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            (variance / n as f64).sqrt()
        } else {
            0.0
        };

        Self {
            mean_payoff: mean,
            std_error,
            discount_factor,
            discounted_value: mean * discount_factor,
        }
    }

    /// 95% confidence half-width of the mean payoff.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.std_error
    }
}

/// Full report of one Monte Carlo pricing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Payoff on a zero-variance path at each spot of `spot_range`.
    pub payoff_curve: Vec<f64>,
    /// Spots from 30% to 170% of the initial spot.
    pub spot_range: Vec<f64>,
    /// First curve spot paying back the initial spot within 1%.
    pub break_even_spot: f64,
    /// Best simulated payoff less the initial spot.
    pub max_gain: f64,
    /// Initial spot less the worst simulated payoff.
    pub max_loss: f64,
    /// Outcome probabilities.
    pub probabilities: ProbabilityStats,
    /// Greeks, when they could be computed.
    pub greeks: Option<GreeksResult>,
    /// Per-date autocall statistics for scheduled autocalls.
    pub autocall_by_date: Option<Vec<AutocallDateStat>>,
    /// Price summary.
    pub summary: PricingSummary,
}

impl CalculationResult {
    /// Probability of being called on any observation date.
    pub fn total_autocall_probability(&self) -> f64 {
        self.autocall_by_date
            .as_ref()
            .map(|dates| dates.iter().map(|d| d.probability).sum())
            .unwrap_or(0.0)
    }
}

/// Curve spots: [`CURVE_POINTS`] evenly spaced points from 30% to 170% of
/// `initial_spot`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::result::spot_range;
///
/// let range = spot_range(100.0);
/// assert_eq!(range.len(), 101);
/// assert!((range[0] - 30.0).abs() < 1e-12);
/// assert!((range[50] - 100.0).abs() < 1e-12);
/// assert!((range[100] - 170.0).abs() < 1e-12);
/// ```
pub fn spot_range(initial_spot: f64) -> Vec<f64> {
    let low = CURVE_LOW * initial_spot;
    let step = (CURVE_HIGH - CURVE_LOW) * initial_spot / (CURVE_POINTS - 1) as f64;
    (0..CURVE_POINTS).map(|i| low + i as f64 * step).collect()
}

/// Payoff on a zero-variance path at every spot of `spots`.
pub fn payoff_curve(evaluator: &PayoffEvaluator, spots: &[f64]) -> Vec<f64> {
    spots.iter().map(|&s| evaluator.evaluate_at(s)).collect()
}

/// First spot of `spots` whose zero-variance payoff is within 1% of the
/// initial spot; the initial spot itself if there is none.
pub fn break_even_spot(evaluator: &PayoffEvaluator, spots: &[f64]) -> f64 {
    let s0 = evaluator.initial_spot();
    spots
        .iter()
        .copied()
        .find(|&s| (evaluator.evaluate_at(s) - s0).abs() < PAR_BAND * s0)
        .unwrap_or(s0)
}
