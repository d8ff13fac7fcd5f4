//! Closed-form pricing.
//!
//! This module provides:
//! - Black-Scholes-Merton prices and analytical Greeks with dividend yield
//! - Vanilla contract valuation (options and spreads) against a market snapshot
//! - A closed-form approximation for single-trigger autocalls
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: the core formulas run in `f32` or `f64`
//! - **Numerical Stability**: erfc-based normal CDF with exact reflection

pub mod autocall;
pub mod black_scholes;
pub mod distributions;
pub mod error;
pub mod vanilla;

pub use autocall::{autocall_approximation, AutocallApproximation};
pub use black_scholes::{BlackScholes, Greeks};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use vanilla::{price_vanilla, vanilla_greeks, VanillaValuation};
