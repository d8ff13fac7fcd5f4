//! Black-Scholes-Merton pricing for European options on a dividend-paying
//! underlying.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use num_traits::Float;
use serde::{Deserialize, Serialize};

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Expiries at or below this are treated as expired (intrinsic value).
const EXPIRY_EPSILON: f64 = 1e-10;

/// Black-Scholes-Merton model with continuous dividend yield.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (`f64` or `f32`)
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.03, 0.02, 0.2).unwrap();
/// let call = bs.price_call(100.0, 1.0);
/// let put = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S·e^(-qT) - K·e^(-rT)
/// let parity = call - put - (100.0 * (-0.02_f64).exp() - 100.0 * (-0.03_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// assert!((call - 8.27).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes<T: Float> {
    spot: T,
    rate: T,
    dividend_yield: T,
    volatility: T,
}

/// Analytical sensitivities of a single option position.
///
/// Theta is per year of calendar time (negative for time decay); vega and
/// rho are per unit (1.00 = 100%) change in volatility and rate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks<T> {
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// ∂V/∂σ
    pub vega: T,
    /// ∂V/∂t
    pub theta: T,
    /// ∂V/∂r
    pub rho: T,
}

impl<T: Float> Greeks<T> {
    /// Scales every sensitivity by `w` (position weight).
    pub fn scale(self, w: T) -> Self {
        Self {
            delta: self.delta * w,
            gamma: self.gamma * w,
            vega: self.vega * w,
            theta: self.theta * w,
            rho: self.rho * w,
        }
    }

    /// Adds two positions' sensitivities.
    pub fn add(self, other: Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            vega: self.vega + other.vega,
            theta: self.theta + other.theta,
            rho: self.rho + other.rho,
        }
    }
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes-Merton model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free rate (annualised, continuous)
    /// * `dividend_yield` - Dividend yield (annualised, continuous)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0_f64, 0.03, 0.02, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0_f64, 0.03, 0.02, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.03, 0.02, 0.0).is_err());
    /// ```
    pub fn new(spot: T, rate: T, dividend_yield: T, volatility: T) -> Result<Self, AnalyticalError> {
        let zero = T::zero();

        if !(spot > zero) || !spot.is_finite() {
            return Err(AnalyticalError::InvalidSpot {
                spot: spot.to_f64().unwrap_or(f64::NAN),
            });
        }

        if !(volatility > zero) || !volatility.is_finite() {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Self {
            spot,
            rate,
            dividend_yield,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> T {
        self.dividend_yield
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    #[inline]
    fn expired(expiry: T) -> bool {
        expiry <= T::from(EXPIRY_EPSILON).unwrap()
    }

    /// Computes d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T).
    ///
    /// At expiry returns ±100 (or 0 at the money) so that N(d₁) collapses to
    /// the exercise indicator.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            let large = T::from(100.0).unwrap();
            return if self.spot > strike {
                large
            } else if self.spot < strike {
                -large
            } else {
                T::zero()
            };
        }

        let half = T::from(0.5).unwrap();
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift =
            (self.rate - self.dividend_yield + half * self.volatility * self.volatility) * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes d₂ = d₁ - σ√T.
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    #[inline]
    fn discount(&self, expiry: T) -> T {
        (-self.rate * expiry).exp()
    }

    #[inline]
    fn dividend_discount(&self, expiry: T) -> T {
        (-self.dividend_yield * expiry).exp()
    }

    /// European call price; intrinsic value at expiry.
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return (self.spot - strike).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);

        self.spot * self.dividend_discount(expiry) * norm_cdf(d1)
            - strike * self.discount(expiry) * norm_cdf(d2)
    }

    /// European put price; intrinsic value at expiry.
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return (strike - self.spot).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);

        strike * self.discount(expiry) * norm_cdf(-d2)
            - self.spot * self.dividend_discount(expiry) * norm_cdf(-d1)
    }

    /// Price of a call (`is_call`) or put.
    #[inline]
    pub fn price(&self, strike: T, expiry: T, is_call: bool) -> T {
        if is_call {
            self.price_call(strike, expiry)
        } else {
            self.price_put(strike, expiry)
        }
    }

    /// Delta: e^(-qT)·N(d₁) for calls, e^(-qT)·(N(d₁) - 1) for puts.
    #[inline]
    pub fn delta(&self, strike: T, expiry: T, is_call: bool) -> T {
        let one = T::one();
        let zero = T::zero();

        if Self::expired(expiry) {
            return if is_call {
                if self.spot > strike {
                    one
                } else {
                    zero
                }
            } else if self.spot < strike {
                -one
            } else {
                zero
            };
        }

        let n_d1 = norm_cdf(self.d1(strike, expiry));
        let df_q = self.dividend_discount(expiry);

        if is_call {
            df_q * n_d1
        } else {
            df_q * (n_d1 - one)
        }
    }

    /// Gamma: e^(-qT)·φ(d₁) / (S·σ·√T), identical for calls and puts.
    #[inline]
    pub fn gamma(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let d1 = self.d1(strike, expiry);
        self.dividend_discount(expiry) * norm_pdf(d1)
            / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Vega: S·e^(-qT)·√T·φ(d₁), identical for calls and puts.
    #[inline]
    pub fn vega(&self, strike: T, expiry: T) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let d1 = self.d1(strike, expiry);
        self.spot * self.dividend_discount(expiry) * expiry.sqrt() * norm_pdf(d1)
    }

    /// Theta (∂V/∂t, per year).
    ///
    /// - Call: -S·e^(-qT)·φ(d₁)·σ/(2√T) - r·K·e^(-rT)·N(d₂) + q·S·e^(-qT)·N(d₁)
    /// - Put: -S·e^(-qT)·φ(d₁)·σ/(2√T) + r·K·e^(-rT)·N(-d₂) - q·S·e^(-qT)·N(-d₁)
    #[inline]
    pub fn theta(&self, strike: T, expiry: T, is_call: bool) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let two = T::from(2.0).unwrap();
        let df_r = self.discount(expiry);
        let s_q = self.spot * self.dividend_discount(expiry);

        let decay = -(s_q * norm_pdf(d1) * self.volatility) / (two * expiry.sqrt());

        if is_call {
            decay - self.rate * strike * df_r * norm_cdf(d2)
                + self.dividend_yield * s_q * norm_cdf(d1)
        } else {
            decay + self.rate * strike * df_r * norm_cdf(-d2)
                - self.dividend_yield * s_q * norm_cdf(-d1)
        }
    }

    /// Rho: K·T·e^(-rT)·N(d₂) for calls, -K·T·e^(-rT)·N(-d₂) for puts.
    #[inline]
    pub fn rho(&self, strike: T, expiry: T, is_call: bool) -> T {
        if Self::expired(expiry) {
            return T::zero();
        }

        let d2 = self.d2(strike, expiry);
        let k_t_df = strike * expiry * self.discount(expiry);

        if is_call {
            k_t_df * norm_cdf(d2)
        } else {
            -k_t_df * norm_cdf(-d2)
        }
    }

    /// All five sensitivities at once.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0_f64, 0.03, 0.02, 0.2).unwrap();
    /// let g = bs.greeks(100.0, 1.0, true);
    /// assert!((g.delta - 0.5485).abs() < 1e-3);
    /// assert!(g.gamma > 0.0 && g.vega > 0.0);
    /// ```
    pub fn greeks(&self, strike: T, expiry: T, is_call: bool) -> Greeks<T> {
        Greeks {
            delta: self.delta(strike, expiry, is_call),
            gamma: self.gamma(strike, expiry),
            vega: self.vega(strike, expiry),
            theta: self.theta(strike, expiry, is_call),
            rho: self.rho(strike, expiry, is_call),
        }
    }
}
