//! Autocall observation schedules.

use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};

/// Ordered autocall observation schedule.
///
/// Three parallel arrays: observation `dates` in years from inception,
/// trigger `levels` as a percentage of the initial spot, and `coupons` in
/// percentage points paid when the corresponding level triggers.
///
/// # Invariants
///
/// Checked by [`AutocallSchedule::validate`]:
/// - all three arrays are non-empty and of equal length
/// - dates are positive, finite and strictly increasing
/// - levels and coupons are finite, levels non-negative
///
/// # Examples
///
/// ```
/// use pricer_models::instruments::AutocallSchedule;
///
/// let schedule = AutocallSchedule::new(
///     vec![1.0, 2.0, 3.0],
///     vec![100.0, 105.0, 110.0],
///     vec![6.0, 8.0, 10.0],
/// )
/// .unwrap();
///
/// assert_eq!(schedule.len(), 3);
/// assert_eq!(schedule.last_coupon(), 10.0);
/// assert_eq!(schedule.total_coupons(), 24.0);
///
/// // Mismatched array lengths are rejected
/// assert!(AutocallSchedule::new(vec![1.0], vec![100.0, 105.0], vec![6.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocallSchedule {
    /// Observation dates in years.
    pub dates: Vec<f64>,
    /// Trigger levels (% of initial spot before normalisation).
    pub levels: Vec<f64>,
    /// Coupons paid on trigger (percentage points).
    pub coupons: Vec<f64>,
}

/// One observation of an [`AutocallSchedule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutocallObservation {
    /// Position in the schedule.
    pub index: usize,
    /// Observation date in years.
    pub date: f64,
    /// Trigger level.
    pub level: f64,
    /// Coupon paid on trigger.
    pub coupon: f64,
}

impl AutocallSchedule {
    /// Creates a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Configuration` if the arrays are empty,
    /// mismatched, or the dates are not strictly increasing.
    pub fn new(dates: Vec<f64>, levels: Vec<f64>, coupons: Vec<f64>) -> Result<Self, PricingError> {
        let schedule = Self {
            dates,
            levels,
            coupons,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Checks the structural invariants.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.dates.is_empty() {
            return Err(PricingError::configuration(
                "autocall schedule must have at least one observation",
            ));
        }
        if self.dates.len() != self.levels.len() || self.dates.len() != self.coupons.len() {
            return Err(PricingError::configuration(format!(
                "autocall schedule arrays differ in length: {} dates, {} levels, {} coupons",
                self.dates.len(),
                self.levels.len(),
                self.coupons.len()
            )));
        }
        if self
            .dates
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(PricingError::configuration(
                "autocall observation dates must be positive and finite",
            ));
        }
        if self.dates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PricingError::configuration(
                "autocall observation dates must be strictly increasing",
            ));
        }
        if self.levels.iter().any(|l| !l.is_finite() || *l < 0.0) {
            return Err(PricingError::configuration(
                "autocall levels must be non-negative and finite",
            ));
        }
        if self.coupons.iter().any(|c| !c.is_finite()) {
            return Err(PricingError::configuration("autocall coupons must be finite"));
        }
        Ok(())
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` if the schedule has no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates over observations in date order.
    pub fn observations(&self) -> impl Iterator<Item = AutocallObservation> + '_ {
        self.dates
            .iter()
            .zip(&self.levels)
            .zip(&self.coupons)
            .enumerate()
            .map(|(index, ((&date, &level), &coupon))| AutocallObservation {
                index,
                date,
                level,
                coupon,
            })
    }

    /// Coupon of the final observation (0 for an empty schedule).
    pub fn last_coupon(&self) -> f64 {
        self.coupons.last().copied().unwrap_or(0.0)
    }

    /// Sum of all coupons.
    pub fn total_coupons(&self) -> f64 {
        self.coupons.iter().sum()
    }

    /// Largest coupon (0 for an empty schedule).
    pub fn max_coupon(&self) -> f64 {
        self.coupons.iter().copied().fold(0.0, f64::max)
    }

    /// Returns a copy with every level multiplied by `factor`.
    pub(crate) fn scaled_levels(&self, factor: f64) -> Self {
        Self {
            dates: self.dates.clone(),
            levels: self.levels.iter().map(|l| l * factor).collect(),
            coupons: self.coupons.clone(),
        }
    }
}
