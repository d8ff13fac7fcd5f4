//! CLI error types

use pricer_core::types::PricingError;
use pricer_models::catalog::CatalogError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
