//! In-memory catalog backed by a TOML document.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::ProductCatalog;
use crate::instruments::ProductContract;

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDocument {
    version: String,
    #[serde(default)]
    products: Vec<ProductContract>,
}

/// Validated, immutable product catalog held in memory.
///
/// # Examples
///
/// ```
/// use pricer_models::catalog::{InMemoryCatalog, ProductCatalog};
///
/// let catalog = InMemoryCatalog::from_toml_str(r#"
///     version = "test"
///
///     [[products]]
///     id = "digital_barrier"
///     display_name = "Barrier Digital"
///     risk_band = "High"
///     min_duration = 0.5
///     max_duration = 3.0
///     expected_return = 12.0
///     max_loss_pct = 100.0
///
///     [products.payoff]
///     kind = "digital"
///     barrier = 70.0
///     coupon = 12.0
/// "#).unwrap();
///
/// assert_eq!(catalog.version(), "test");
/// assert!(catalog.get("digital_barrier").is_some());
/// assert!(catalog.get("unknown").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    version: String,
    products: Vec<ProductContract>,
}

impl InMemoryCatalog {
    /// Builds a catalog from contracts, validating each and rejecting
    /// duplicate ids.
    pub fn new(
        version: impl Into<String>,
        products: Vec<ProductContract>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            product
                .validate()
                .map_err(|source| CatalogError::InvalidProduct {
                    id: product.id.clone(),
                    source,
                })?;
        }

        Ok(Self {
            version: version.into(),
            products,
        })
    }

    /// Parses and validates a TOML catalog document.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(text)?;
        Self::new(doc.version, doc.products)
    }

    /// Reads, parses and validates a TOML catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn version(&self) -> &str {
        &self.version
    }

    fn products(&self) -> &[ProductContract] {
        &self.products
    }

    fn get(&self, id: &str) -> Option<&ProductContract> {
        self.products.iter().find(|p| p.id == id)
    }
}
