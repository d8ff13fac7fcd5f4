//! Greeks for structured products.
//!
//! - Vanilla options and spreads use closed-form Black-Scholes Greeks.
//! - Every other family takes delta and gamma from central differences of
//!   the payoff on zero-variance paths, with the levels held at the
//!   unbumped spot.
//! - Vega, theta and rho of non-vanilla products depend on [`GreeksMode`]:
//!   quick indicative proxies by default, or Monte Carlo bump-and-reprice
//!   with common random numbers.
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketEnvironment;
//! use pricer_models::catalog::{standard_catalog, ProductCatalog};
//! use pricer_pricing::greeks::{GreeksConfig, GreeksEngine, GreeksMethod};
//!
//! let catalog = standard_catalog().unwrap();
//! let engine = GreeksEngine::new(GreeksConfig::default());
//!
//! let greeks = engine
//!     .greeks(catalog.get("twin_win").unwrap(), &MarketEnvironment::default())
//!     .unwrap();
//! assert_eq!(greeks.method, GreeksMethod::Proxy);
//! assert!((greeks.vega - 1.0).abs() < 1e-12); // expected return 10 × 0.1
//! ```

mod config;
mod engine;
mod result;

pub use config::{GreeksConfig, GreeksConfigBuilder, GreeksMode};
pub use engine::GreeksEngine;
pub use result::{GreeksMethod, GreeksResult};
