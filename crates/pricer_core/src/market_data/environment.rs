//! Immutable market snapshot and parameter selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::PricingError;

/// Market snapshot for a single underlying.
///
/// Holds spot, continuously-compounded risk-free rate, continuous dividend
/// yield and lognormal volatility. Fields are private; every constructor
/// validates, and every "modification" returns a new snapshot.
///
/// # Invariants
///
/// - `spot > 0` and finite
/// - `volatility >= 0` and finite (zero volatility gives deterministic paths)
/// - rate and dividend yield finite (zero or negative allowed)
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketEnvironment;
///
/// let market = MarketEnvironment::new(100.0, 0.03, 0.02, 0.20).unwrap();
/// assert!((market.forward(1.0) - 100.0 * 0.01_f64.exp()).abs() < 1e-12);
///
/// assert!(MarketEnvironment::new(-1.0, 0.03, 0.02, 0.20).is_err());
/// assert!(MarketEnvironment::new(100.0, 0.03, 0.02, -0.1).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMarketEnvironment")]
pub struct MarketEnvironment {
    spot: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    volatility: f64,
}

/// Unvalidated wire form; converted through [`MarketEnvironment::new`].
#[derive(Deserialize)]
struct RawMarketEnvironment {
    spot: f64,
    risk_free_rate: f64,
    #[serde(default)]
    dividend_yield: f64,
    volatility: f64,
}

impl TryFrom<RawMarketEnvironment> for MarketEnvironment {
    type Error = PricingError;

    fn try_from(raw: RawMarketEnvironment) -> Result<Self, Self::Error> {
        Self::new(
            raw.spot,
            raw.risk_free_rate,
            raw.dividend_yield,
            raw.volatility,
        )
    }
}

impl Default for MarketEnvironment {
    /// Reference market used for quick evaluations: S=100, r=3%, q=2%, σ=20%.
    fn default() -> Self {
        Self {
            spot: 100.0,
            risk_free_rate: 0.03,
            dividend_yield: 0.02,
            volatility: 0.20,
        }
    }
}

impl MarketEnvironment {
    /// Creates a validated market snapshot.
    ///
    /// # Arguments
    ///
    /// * `spot` - Current underlying price (must be positive)
    /// * `risk_free_rate` - Annualised continuously-compounded rate
    /// * `dividend_yield` - Annualised continuous dividend yield
    /// * `volatility` - Annualised lognormal volatility (must be non-negative)
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` if any invariant is violated.
    pub fn new(
        spot: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Result<Self, PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::validation(format!(
                "spot must be positive and finite, got {}",
                spot
            )));
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(PricingError::validation(format!(
                "volatility must be non-negative and finite, got {}",
                volatility
            )));
        }
        if !risk_free_rate.is_finite() {
            return Err(PricingError::validation(format!(
                "risk-free rate must be finite, got {}",
                risk_free_rate
            )));
        }
        if !dividend_yield.is_finite() {
            return Err(PricingError::validation(format!(
                "dividend yield must be finite, got {}",
                dividend_yield
            )));
        }

        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
        })
    }

    /// Returns the current spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Risk-neutral drift of the log-price excluding the convexity term: `r - q`.
    #[inline]
    pub fn carry(&self) -> f64 {
        self.risk_free_rate - self.dividend_yield
    }

    /// Discount factor `exp(-rT)`.
    #[inline]
    pub fn discount_factor(&self, maturity: f64) -> f64 {
        (-self.risk_free_rate * maturity).exp()
    }

    /// Forward price `S·exp((r - q)T)`.
    #[inline]
    pub fn forward(&self, maturity: f64) -> f64 {
        self.spot * (self.carry() * maturity).exp()
    }

    /// Returns the value of the selected parameter.
    pub fn get(&self, parameter: MarketParameter) -> f64 {
        match parameter {
            MarketParameter::Spot => self.spot,
            MarketParameter::RiskFreeRate => self.risk_free_rate,
            MarketParameter::DividendYield => self.dividend_yield,
            MarketParameter::Volatility => self.volatility,
        }
    }

    /// Returns a copy with the selected parameter replaced.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` if the new value breaks an invariant.
    pub fn with_parameter(&self, parameter: MarketParameter, value: f64) -> Result<Self, PricingError> {
        let mut next = *self;
        match parameter {
            MarketParameter::Spot => next.spot = value,
            MarketParameter::RiskFreeRate => next.risk_free_rate = value,
            MarketParameter::DividendYield => next.dividend_yield = value,
            MarketParameter::Volatility => next.volatility = value,
        }
        Self::new(
            next.spot,
            next.risk_free_rate,
            next.dividend_yield,
            next.volatility,
        )
    }

    /// Returns a copy with the selected parameter multiplied by `multiplier`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::market_data::{MarketEnvironment, MarketParameter};
    ///
    /// let market = MarketEnvironment::default();
    /// let down = market.bumped(MarketParameter::Spot, 0.8).unwrap();
    /// assert!((down.spot() - 80.0).abs() < 1e-12);
    /// ```
    pub fn bumped(&self, parameter: MarketParameter, multiplier: f64) -> Result<Self, PricingError> {
        self.with_parameter(parameter, self.get(parameter) * multiplier)
    }

    /// Returns a copy with a new spot.
    pub fn with_spot(&self, spot: f64) -> Result<Self, PricingError> {
        self.with_parameter(MarketParameter::Spot, spot)
    }

    /// Returns a copy with a new volatility.
    pub fn with_volatility(&self, volatility: f64) -> Result<Self, PricingError> {
        self.with_parameter(MarketParameter::Volatility, volatility)
    }

    /// Returns a copy with a new risk-free rate.
    pub fn with_rate(&self, rate: f64) -> Result<Self, PricingError> {
        self.with_parameter(MarketParameter::RiskFreeRate, rate)
    }

    /// Returns a copy with a new dividend yield.
    pub fn with_dividend_yield(&self, dividend_yield: f64) -> Result<Self, PricingError> {
        self.with_parameter(MarketParameter::DividendYield, dividend_yield)
    }
}

/// Selector for one bumpable market field.
///
/// Parses from the collaborator-facing names (`"volatility"`,
/// `"riskFreeRate"`, `"dividendYield"`, `"currentSpot"`) as well as the short
/// snake-case forms.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketParameter;
///
/// let p: MarketParameter = "riskFreeRate".parse().unwrap();
/// assert_eq!(p, MarketParameter::RiskFreeRate);
/// assert!("gamma".parse::<MarketParameter>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketParameter {
    /// Underlying spot price.
    Spot,
    /// Risk-free rate.
    RiskFreeRate,
    /// Dividend yield.
    DividendYield,
    /// Volatility.
    Volatility,
}

impl MarketParameter {
    /// All bumpable parameters.
    pub const ALL: [MarketParameter; 4] = [
        MarketParameter::Spot,
        MarketParameter::RiskFreeRate,
        MarketParameter::DividendYield,
        MarketParameter::Volatility,
    ];

    /// Canonical snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketParameter::Spot => "spot",
            MarketParameter::RiskFreeRate => "risk_free_rate",
            MarketParameter::DividendYield => "dividend_yield",
            MarketParameter::Volatility => "volatility",
        }
    }
}

impl fmt::Display for MarketParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketParameter {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "spot" | "currentspot" => Ok(MarketParameter::Spot),
            "rate" | "riskfreerate" | "r" => Ok(MarketParameter::RiskFreeRate),
            "dividend" | "dividendyield" | "q" => Ok(MarketParameter::DividendYield),
            "vol" | "volatility" | "sigma" => Ok(MarketParameter::Volatility),
            _ => Err(PricingError::configuration(format!(
                "unknown market parameter '{}': expected volatility, riskFreeRate, dividendYield or currentSpot",
                s
            ))),
        }
    }
}
