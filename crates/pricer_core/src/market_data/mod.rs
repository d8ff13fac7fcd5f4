//! Market data for structured product pricing.
//!
//! The pricer works against a single underlying described by a flat
//! snapshot: spot, risk-free rate, dividend yield and volatility.
//!
//! # Components
//!
//! - [`MarketEnvironment`]: immutable market snapshot with bumped-copy constructors
//! - [`MarketParameter`]: selector for one bumpable field
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::MarketEnvironment;
//!
//! let market = MarketEnvironment::default();
//! assert_eq!(market.spot(), 100.0);
//!
//! let up = market.with_spot(101.0).unwrap();
//! assert_eq!(up.spot(), 101.0);
//! ```

mod environment;

pub use environment::{MarketEnvironment, MarketParameter};
