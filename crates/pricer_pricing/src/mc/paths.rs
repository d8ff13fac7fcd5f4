//! Path dynamics and per-path statistics.
//!
//! Paths follow Geometric Brownian Motion under the risk-neutral measure,
//! stepped one simulated day at a time in log space:
//!
//! ```text
//! S(t + dt) = S(t) · exp((r - q - σ²/2)·dt + σ·√dt·Z),   Z ~ N(0, 1)
//! ```
//!
//! Nothing but the summary of each path is kept. [`PathObserver`] folds the
//! spots into running statistics as they are produced and
//! [`PathObserver::finish`] freezes them into an immutable
//! [`PathStatistics`].

use pricer_core::market_data::MarketEnvironment;
use serde::{Deserialize, Serialize};

/// Per-step GBM increments for one market and day count.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::MarketEnvironment;
/// use pricer_pricing::mc::GbmStep;
///
/// let step = GbmStep::new(&MarketEnvironment::default(), 252);
/// assert!((step.dt - 1.0 / 252.0).abs() < 1e-15);
/// assert!(step.drift < 0.0); // r - q - σ²/2 = -0.01
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmStep {
    /// Step length in years.
    pub dt: f64,
    /// Log drift per step, (r - q - σ²/2)·dt.
    pub drift: f64,
    /// Log diffusion per step, σ·√dt.
    pub diffusion: f64,
}

impl GbmStep {
    /// Daily step for `market` at `days_per_year` steps per year.
    pub fn new(market: &MarketEnvironment, days_per_year: u32) -> Self {
        let dt = 1.0 / f64::from(days_per_year);
        let sigma = market.volatility();
        Self {
            dt,
            drift: (market.carry() - 0.5 * sigma * sigma) * dt,
            diffusion: sigma * dt.sqrt(),
        }
    }

    /// Advances `spot` by one step with normal shock `z`.
    #[inline]
    pub fn advance(&self, spot: f64, z: f64) -> f64 {
        spot * (self.drift + self.diffusion * z).exp()
    }
}

/// First autocall observation a path triggered at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutocallTrigger {
    /// Observation date in years.
    pub date: f64,
    /// Autocall level in spot units.
    pub level: f64,
    /// Coupon paid at this observation, in percentage points.
    pub coupon: f64,
    /// Position of the observation in the schedule.
    pub observation_index: usize,
}

/// Summary of one simulated path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStatistics {
    /// Spot at inception.
    pub initial_spot: f64,
    /// Spot at maturity.
    pub final_spot: f64,
    /// Lowest spot on the path, inception included.
    pub min_spot: f64,
    /// Highest spot on the path, inception included.
    pub max_spot: f64,
    /// Largest peak-to-trough fall as a fraction of the peak.
    pub max_drawdown: f64,
    /// First autocall observation met, if any.
    pub trigger: Option<AutocallTrigger>,
}

impl PathStatistics {
    /// Zero-variance path that sits at `spot` throughout.
    ///
    /// Used for the payoff curve and spot Greeks, where a payoff is read
    /// off as a function of a single spot level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::mc::PathStatistics;
    ///
    /// let stats = PathStatistics::degenerate(100.0, 80.0);
    /// assert_eq!(stats.min_spot, 80.0);
    /// assert_eq!(stats.max_spot, 80.0);
    /// assert_eq!(stats.final_spot, 80.0);
    /// assert!(stats.trigger.is_none());
    /// ```
    pub fn degenerate(initial_spot: f64, spot: f64) -> Self {
        Self {
            initial_spot,
            final_spot: spot,
            min_spot: spot,
            max_spot: spot,
            max_drawdown: 0.0,
            trigger: None,
        }
    }

    /// Returns `true` if the path was called early.
    #[inline]
    pub fn is_called(&self) -> bool {
        self.trigger.is_some()
    }
}

/// Streaming accumulator for one path.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::PathObserver;
///
/// let mut observer = PathObserver::new(100.0);
/// observer.observe(110.0);
/// observer.observe(88.0);
/// observer.observe(95.0);
///
/// let stats = observer.finish();
/// assert_eq!(stats.max_spot, 110.0);
/// assert_eq!(stats.min_spot, 88.0);
/// assert_eq!(stats.final_spot, 95.0);
/// assert!((stats.max_drawdown - 0.2).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct PathObserver {
    initial: f64,
    current: f64,
    running_min: f64,
    running_max: f64,
    max_drawdown: f64,
    trigger: Option<AutocallTrigger>,
}

impl PathObserver {
    /// Starts a path at `initial_spot`.
    #[inline]
    pub fn new(initial_spot: f64) -> Self {
        Self {
            initial: initial_spot,
            current: initial_spot,
            running_min: initial_spot,
            running_max: initial_spot,
            max_drawdown: 0.0,
            trigger: None,
        }
    }

    /// Records the next spot.
    #[inline]
    pub fn observe(&mut self, spot: f64) {
        self.current = spot;
        self.running_min = self.running_min.min(spot);
        self.running_max = self.running_max.max(spot);
        if self.running_max > 0.0 {
            let drawdown = (self.running_max - spot) / self.running_max;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }
    }

    /// Records an autocall trigger; only the first one is kept.
    #[inline]
    pub fn trigger(&mut self, trigger: AutocallTrigger) {
        if self.trigger.is_none() {
            self.trigger = Some(trigger);
        }
    }

    /// Returns `true` once a trigger has been recorded.
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.trigger.is_some()
    }

    /// Latest observed spot.
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Freezes the accumulated statistics.
    #[inline]
    pub fn finish(self) -> PathStatistics {
        PathStatistics {
            initial_spot: self.initial,
            final_spot: self.current,
            min_spot: self.running_min,
            max_spot: self.running_max,
            max_drawdown: self.max_drawdown,
            trigger: self.trigger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_observer_without_steps_is_degenerate() {
        let stats = PathObserver::new(100.0).finish();
        assert_eq!(stats, PathStatistics::degenerate(100.0, 100.0));
    }

    #[test]
    fn test_drawdown_uses_running_peak() {
        let mut observer = PathObserver::new(100.0);
        for spot in [90.0, 120.0, 108.0, 130.0, 117.0] {
            observer.observe(spot);
        }
        let stats = observer.finish();
        // 100 -> 90 is 10%, 120 -> 108 is 10%, 130 -> 117 is 10%
        assert_relative_eq!(stats.max_drawdown, 0.1, epsilon = 1e-12);
        assert_eq!(stats.min_spot, 90.0);
        assert_eq!(stats.max_spot, 130.0);
    }

    #[test]
    fn test_first_trigger_kept() {
        let mut observer = PathObserver::new(100.0);
        let first = AutocallTrigger {
            date: 1.0,
            level: 105.0,
            coupon: 8.0,
            observation_index: 0,
        };
        observer.trigger(first);
        observer.trigger(AutocallTrigger {
            date: 2.0,
            level: 110.0,
            coupon: 10.0,
            observation_index: 1,
        });
        assert!(observer.is_triggered());
        assert_eq!(observer.finish().trigger, Some(first));
    }

    #[test]
    fn test_zero_vol_step_is_forward_drift() {
        let market = MarketEnvironment::new(100.0, 0.05, 0.01, 0.0).unwrap();
        let step = GbmStep::new(&market, 252);
        assert_eq!(step.diffusion, 0.0);

        let mut spot = 100.0;
        for _ in 0..252 {
            spot = step.advance(spot, 1.0);
        }
        assert_relative_eq!(spot, 100.0 * 0.04_f64.exp(), max_relative = 1e-12);
    }
}
