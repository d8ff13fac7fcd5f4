//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands build a
//! serialisable value with `execute` and print it with `run`.

use pricer_core::market_data::MarketEnvironment;
use pricer_models::catalog::{standard_catalog, InMemoryCatalog, ProductCatalog};
use pricer_models::instruments::ProductContract;
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::Result;

pub mod catalog;
pub mod closed_form;
pub mod greeks;
pub mod price;
pub mod risk;
pub mod sweep;

/// Resolved configuration, market and catalog shared by every command
pub struct Session {
    pub config: CliConfig,
    pub market: MarketEnvironment,
    pub catalog: InMemoryCatalog,
}

impl Session {
    /// Load the catalog and market described by `config`
    pub fn new(config: CliConfig) -> Result<Self> {
        let catalog = match &config.catalog {
            Some(path) => {
                info!(path = %path.display(), "loading catalog");
                InMemoryCatalog::from_file(path)?
            }
            None => standard_catalog()?,
        };
        let market = config.market_environment()?;
        Ok(Self {
            config,
            market,
            catalog,
        })
    }

    /// Look a product up by id
    pub fn product(&self, id: &str) -> Result<&ProductContract> {
        Ok(self.catalog.require(id)?)
    }
}

/// Print `value` to stdout as pretty JSON
pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
