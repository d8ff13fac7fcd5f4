//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error taxonomy shared by every pricer crate
//!
//! # Re-exports
//!
//! - [`PricingError`] from `error`

pub mod error;

pub use error::PricingError;
