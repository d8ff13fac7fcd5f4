//! Greeks calculation result type.

use pricer_models::analytical::Greeks;
use serde::{Deserialize, Serialize};

/// How a [`GreeksResult`] was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreeksMethod {
    /// Black-Scholes closed form (vanilla options and spreads).
    ClosedForm,
    /// Payoff finite differences for delta and gamma, indicative proxies
    /// for vega, theta and rho.
    Proxy,
    /// Payoff finite differences for delta and gamma, Monte Carlo
    /// bump-and-reprice for vega, theta and rho.
    BumpReprice,
}

impl GreeksMethod {
    /// Stable lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GreeksMethod::ClosedForm => "closed_form",
            GreeksMethod::Proxy => "proxy",
            GreeksMethod::BumpReprice => "bump_reprice",
        }
    }
}

/// First and second order sensitivities of one product.
///
/// - `delta`: ∂V/∂S
/// - `gamma`: ∂²V/∂S²
/// - `vega`: ∂V/∂σ
/// - `theta`: ∂V/∂t per year (proxy mode: per day of the simulated maturity)
/// - `rho`: ∂V/∂r
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::{GreeksMethod, GreeksResult};
///
/// let result = GreeksResult {
///     delta: 0.55,
///     gamma: 0.02,
///     vega: 38.0,
///     theta: -4.0,
///     rho: 50.0,
///     method: GreeksMethod::ClosedForm,
/// };
/// assert!(result.is_finite());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// Delta: ∂V/∂S.
    pub delta: f64,
    /// Gamma: ∂²V/∂S².
    pub gamma: f64,
    /// Vega: ∂V/∂σ.
    pub vega: f64,
    /// Theta: ∂V/∂t.
    pub theta: f64,
    /// Rho: ∂V/∂r.
    pub rho: f64,
    /// Calculation method.
    pub method: GreeksMethod,
}

impl GreeksResult {
    /// Wraps closed-form Greeks.
    pub fn closed_form(greeks: Greeks<f64>) -> Self {
        Self {
            delta: greeks.delta,
            gamma: greeks.gamma,
            vega: greeks.vega,
            theta: greeks.theta,
            rho: greeks.rho,
            method: GreeksMethod::ClosedForm,
        }
    }

    /// Returns `true` if every sensitivity is finite.
    pub fn is_finite(&self) -> bool {
        [self.delta, self.gamma, self.vega, self.theta, self.rho]
            .iter()
            .all(|g| g.is_finite())
    }
}
