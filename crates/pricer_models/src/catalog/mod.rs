//! Read-only product catalog.
//!
//! Collaborators (forms, product selection, reports) only read contracts;
//! they reach them through the [`ProductCatalog`] trait so the backing store
//! can change without touching the pricer.
//!
//! - [`InMemoryCatalog`]: validated catalog parsed from TOML
//! - [`standard_catalog`]: the versioned catalog shipped with the crate
//!
//! # Examples
//!
//! ```
//! use pricer_models::catalog::{standard_catalog, ProductCatalog};
//!
//! let catalog = standard_catalog().unwrap();
//! assert_eq!(catalog.products().len(), 11);
//!
//! let memory = catalog.get("autocall_memory").unwrap();
//! assert!(memory.is_autocall());
//! ```

mod error;
mod memory;

pub use error::CatalogError;
pub use memory::InMemoryCatalog;

use crate::instruments::ProductContract;

/// Standard catalog document, embedded at compile time.
pub const STANDARD_CATALOG_TOML: &str = include_str!("../../data/standard_catalog.toml");

/// Read-only access to a set of product contracts.
pub trait ProductCatalog {
    /// Catalog version string.
    fn version(&self) -> &str;

    /// All products in catalog order.
    fn products(&self) -> &[ProductContract];

    /// Looks a product up by id.
    fn get(&self, id: &str) -> Option<&ProductContract>;

    /// Looks a product up by id, failing with [`CatalogError::NotFound`].
    fn require(&self, id: &str) -> Result<&ProductContract, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

/// Loads the embedded standard catalog.
pub fn standard_catalog() -> Result<InMemoryCatalog, CatalogError> {
    InMemoryCatalog::from_toml_str(STANDARD_CATALOG_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{PayoffSpec, RiskBand, VanillaKind};

    #[test]
    fn test_standard_catalog_loads() {
        let catalog = standard_catalog().unwrap();
        assert_eq!(catalog.version(), "1.0.0");
        assert_eq!(catalog.len(), 11);

        let autocalls = catalog.products().iter().filter(|p| p.is_autocall()).count();
        let vanillas = catalog.products().iter().filter(|p| p.is_vanilla()).count();
        assert_eq!(autocalls, 4);
        assert_eq!(vanillas, 4);
    }

    #[test]
    fn test_standard_catalog_terms() {
        let catalog = standard_catalog().unwrap();

        let classic = catalog.require("autocall_classic").unwrap();
        assert_eq!(classic.risk_band, RiskBand::Medium);
        assert_eq!(
            classic.payoff,
            PayoffSpec::AutocallClassic {
                autocall_level: 100.0,
                coupon: 8.5,
                barrier: 65.0,
                protection: 100.0,
            }
        );

        let stepup = catalog.require("autocall_stepup").unwrap();
        let schedule = stepup.payoff.schedule().unwrap();
        assert_eq!(schedule.levels, vec![105.0, 110.0, 115.0, 120.0]);
        assert_eq!(schedule.coupons, vec![8.0, 10.0, 12.0, 15.0]);

        let spread = catalog.require("vanilla_call_spread").unwrap();
        let terms = spread.payoff.vanilla_terms().unwrap();
        assert_eq!(terms.kind, VanillaKind::CallSpread);
        assert_eq!(terms.second_strike, Some(110.0));
        assert_eq!(spread.max_loss_pct, 50.0);

        let digital = catalog.require("digital_barrier").unwrap();
        assert_eq!(digital.min_duration, 0.5);
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = standard_catalog().unwrap();
        let mut ids: Vec<_> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }
}
