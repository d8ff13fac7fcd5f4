//! Structured product definitions.
//!
//! This module provides the contract model consumed by every pricing layer:
//!
//! - [`ProductContract`]: catalog metadata, duration window and payoff terms
//! - [`PayoffSpec`]: one variant per product family (autocalls, digital,
//!   participation, twin-win, vanilla options and spreads)
//! - [`AutocallSchedule`]: observation dates, trigger levels and coupons
//! - [`NormalisedPayoff`]: payoff terms rescaled to spot units
//!
//! # Architecture
//!
//! Payoffs are a closed enum rather than trait objects: evaluation is a
//! single `match`, contracts are plain data and serialise directly to and
//! from catalog files.
//!
//! # Examples
//!
//! ```
//! use pricer_models::instruments::{AutocallSchedule, PayoffSpec};
//!
//! let step_up = PayoffSpec::AutocallStepUp {
//!     schedule: AutocallSchedule::new(
//!         vec![1.0, 2.0],
//!         vec![105.0, 110.0],
//!         vec![8.0, 10.0],
//!     ).unwrap(),
//!     barrier: 60.0,
//!     final_barrier: 100.0,
//! };
//!
//! assert!(step_up.validate().is_ok());
//! let normalised = step_up.normalised(50.0);
//! assert_eq!(normalised.spec().schedule().unwrap().levels, vec![52.5, 55.0]);
//! ```

mod contract;
mod payoff;
mod schedule;

pub use contract::{ProductContract, RiskBand};
pub use payoff::{NormalisedPayoff, PayoffSpec, VanillaKind, VanillaTerms};
pub use schedule::{AutocallObservation, AutocallSchedule};
