//! # Pricer Models (L2: Product Definitions)
//!
//! Structured product contracts, the product catalog and closed-form models.
//!
//! This crate provides:
//! - Contract definitions: [`instruments::ProductContract`] with one
//!   [`instruments::PayoffSpec`] variant per product family
//! - Validation and normalisation of contract terms against an initial spot
//! - A read-only product catalog with an embedded standard product set
//! - Black-Scholes-Merton pricing and Greeks, vanilla valuation, and a
//!   closed-form autocall approximation
//!
//! ## Design Principles
//!
//! - **Enum-based payoffs** for static dispatch and plain-data serialisation
//! - **Levels quoted in percent** of the initial spot, rescaled on demand
//! - **Validation before evaluation**: incomplete terms are reported, never defaulted
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::MarketEnvironment;
//! use pricer_models::analytical::price_vanilla;
//! use pricer_models::catalog::{standard_catalog, ProductCatalog};
//!
//! let catalog = standard_catalog().unwrap();
//! let put = catalog.get("vanilla_put").unwrap();
//!
//! let valuation = price_vanilla(put, &MarketEnvironment::default()).unwrap();
//! assert!(valuation.theoretical_price > 0.0);
//! assert!(valuation.greeks.delta < 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod catalog;
pub mod instruments;
