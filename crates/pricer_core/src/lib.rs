//! # pricer_core: Foundation for the Structured Product Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Market snapshot: [`MarketEnvironment`] and the [`MarketParameter`] selector
//!   used by bumping and sensitivity sweeps (`market_data`)
//! - Error taxonomy: [`PricingError`] (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Error derivation
//! - serde: Serialisation of market snapshots for collaborators
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::{MarketEnvironment, MarketParameter};
//!
//! let market = MarketEnvironment::new(100.0, 0.03, 0.02, 0.20).unwrap();
//! let shocked = market.bumped(MarketParameter::Volatility, 1.1).unwrap();
//!
//! assert!((shocked.volatility() - 0.22).abs() < 1e-12);
//! // The original snapshot is untouched
//! assert_eq!(market.volatility(), 0.20);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod types;

pub use market_data::{MarketEnvironment, MarketParameter};
pub use types::PricingError;
