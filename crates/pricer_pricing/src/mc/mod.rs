//! Monte Carlo engine for structured products.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloPricer
//! ├── MonteCarloConfig  (paths, days per year, seed, parallel)
//! ├── PathSimulator     (daily GBM, autocall observation)
//! │   └── PathObserver  (running min, max, drawdown, first trigger)
//! ├── PayoffEvaluator   (payout per path)
//! └── GreeksEngine      (closed form or payoff differences)
//! ```
//!
//! Each path keeps only its [`PathStatistics`]; payouts and reports are
//! computed from those summaries.
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketEnvironment;
//! use pricer_models::catalog::{standard_catalog, ProductCatalog};
//! use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};
//! use pricer_pricing::rng::PricerRng;
//!
//! let catalog = standard_catalog().unwrap();
//! let config = MonteCarloConfig::builder()
//!     .n_paths(1_000)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let mut rng = config.rng();
//!
//! let pricer = MonteCarloPricer::new(config).unwrap();
//! let result = pricer
//!     .price(catalog.get("twin_win").unwrap(), &MarketEnvironment::default(), &mut rng)
//!     .unwrap();
//! assert!(result.summary.mean_payoff > 0.0);
//! ```

mod config;
mod error;
mod paths;
mod pricer;
mod simulator;

pub use config::{
    MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_DAYS_PER_YEAR, DEFAULT_PATHS, MAX_PATHS,
};
pub use error::ConfigError;
pub use paths::{AutocallTrigger, GbmStep, PathObserver, PathStatistics};
pub use pricer::{quick_evaluation, simulate_payoffs, MonteCarloPricer, PayoffSample};
pub use simulator::PathSimulator;
