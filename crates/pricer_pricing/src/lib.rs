//! # Pricer Pricing (L3: Monte Carlo Engine)
//!
//! Monte Carlo valuation of structured products.
//!
//! This crate provides:
//! - Seeded random number generation with per-path streams ([`rng`])
//! - Daily GBM path simulation with autocall observation ([`mc`])
//! - Payoff evaluation for every product family ([`payoff`])
//! - Greeks: closed form for vanillas, payoff differences otherwise ([`greeks`])
//! - The full pricing report ([`result::CalculationResult`])
//!
//! ## Reproducibility
//!
//! The engine never owns its randomness. Every run takes a
//! [`rng::PricerRng`]; two runs fed identically seeded generators return
//! identical results, whether paths are simulated sequentially or on the
//! rayon pool.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::market_data::MarketEnvironment;
//! use pricer_models::catalog::{standard_catalog, ProductCatalog};
//! use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
//! use pricer_pricing::rng::PricerRng;
//!
//! let catalog = standard_catalog().unwrap();
//! let product = catalog.get("autocall_classic").unwrap();
//!
//! let config = MonteCarloConfig::builder().n_paths(2_000).build().unwrap();
//! let pricer = MonteCarloPricer::new(config).unwrap();
//!
//! let result = pricer
//!     .price(product, &MarketEnvironment::default(), &mut PricerRng::from_seed(7))
//!     .unwrap();
//!
//! assert!(result.summary.discounted_value > 0.0);
//! assert!(result.max_gain <= 8.5 + 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod greeks;
pub mod mc;
pub mod payoff;
pub mod result;
pub mod rng;
