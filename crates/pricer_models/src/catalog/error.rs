//! Catalog loading and lookup errors.

use std::path::PathBuf;

use pricer_core::types::PricingError;
use thiserror::Error;

/// Errors raised while loading or querying a product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Catalog text is not valid TOML or does not match the schema.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two products share an id.
    #[error("Duplicate product id: {0}")]
    DuplicateId(String),

    /// A product failed contract validation.
    #[error("Invalid product {id}: {source}")]
    InvalidProduct {
        /// Offending product id
        id: String,
        /// Validation failure
        #[source]
        source: PricingError,
    },

    /// No product with the requested id.
    #[error("Unknown product: {0}")]
    NotFound(String),
}

impl From<CatalogError> for PricingError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidProduct { source, .. } => source,
            CatalogError::NotFound(_) => PricingError::Validation(err.to_string()),
            CatalogError::Io { .. } | CatalogError::Parse(_) | CatalogError::DuplicateId(_) => {
                PricingError::Configuration(err.to_string())
            }
        }
    }
}
