//! # Pricer Risk (L4: Application)
//!
//! Risk analytics built on repeated Monte Carlo runs.
//!
//! This crate provides:
//! - Tail and dispersion metrics over a payoff sample (VaR, CVaR, drawdown,
//!   Sharpe ratio) with each metric reported independently
//! - Path-wise drawdown and autocall survival curves when path statistics
//!   are available
//! - Vanilla option risk metrics (in/out-of-the-money probabilities)
//! - Autocall fair-value summary (redemption leg, protection, expected life)
//! - Parameter sensitivity sweeps with cooperative cancellation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  metrics/     - VaR, CVaR, drawdown,    │
//! │                 Sharpe, survival        │
//! │  vanilla/     - ITM/OTM, loss range     │
//! │  fair_value/  - autocall summary        │
//! │  sensitivity/ - bumped-market sweeps    │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_pricing (L3)           │
//! │  Path simulation and payoff evaluation  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::MarketEnvironment;
//! use pricer_models::catalog::{standard_catalog, ProductCatalog};
//! use pricer_pricing::mc::{simulate_payoffs, MonteCarloConfig};
//! use pricer_pricing::rng::PricerRng;
//! use pricer_risk::metrics::risk_metrics_for_paths;
//!
//! let catalog = standard_catalog().unwrap();
//! let stepup = catalog.get("autocall_stepup").unwrap();
//!
//! let config = MonteCarloConfig::builder().n_paths(2000).build().unwrap();
//! let sample = simulate_payoffs(
//!     stepup,
//!     &MarketEnvironment::default(),
//!     &config,
//!     &mut PricerRng::from_seed(7),
//! )
//! .unwrap();
//!
//! let metrics = risk_metrics_for_paths(&sample, stepup.payoff.schedule()).unwrap();
//! assert!(metrics.var95 >= 0.0);
//! let risk = metrics.autocall_risk.unwrap();
//! assert!((0.0..=1.0).contains(&risk));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod fair_value;
pub mod metrics;
pub mod sensitivity;
pub mod vanilla;

pub use error::RiskError;
