//! Catalog command implementation
//!
//! Lists the products of the loaded catalog.

use clap::ValueEnum;
use pricer_models::catalog::ProductCatalog;
use pricer_models::instruments::RiskBand;
use serde::Serialize;
use tracing::info;

use super::{emit_json, Session};
use crate::Result;

/// Output format for the product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub variant: &'static str,
    pub risk_band: RiskBand,
    pub min_duration: f64,
    pub max_duration: f64,
    pub expected_return: f64,
}

/// Catalog listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogListing {
    pub version: String,
    pub products: Vec<ProductSummary>,
}

/// Build the listing
pub fn execute(session: &Session) -> CatalogListing {
    let products = session
        .catalog
        .products()
        .iter()
        .map(|p| ProductSummary {
            id: p.id.clone(),
            name: p.display_name.clone(),
            variant: p.variant_tag(),
            risk_band: p.risk_band,
            min_duration: p.min_duration,
            max_duration: p.max_duration,
            expected_return: p.expected_return,
        })
        .collect();

    CatalogListing {
        version: session.catalog.version().to_string(),
        products,
    }
}

/// Run the catalog command
pub fn run(session: &Session, format: OutputFormat) -> Result<()> {
    let listing = execute(session);
    info!(
        version = %listing.version,
        products = listing.products.len(),
        "catalog loaded"
    );

    match format {
        OutputFormat::Json => emit_json(&listing)?,
        OutputFormat::Table => print!("{}", render_table(&listing)),
    }
    Ok(())
}

/// Render the listing as a fixed-width table
pub fn render_table(listing: &CatalogListing) -> String {
    let mut out = format!("Catalog version {}\n", listing.version);
    out.push_str(&format!(
        "{:<22} {:<18} {:<7} {:>10}\n",
        "ID", "VARIANT", "RISK", "DURATION"
    ));
    for p in &listing.products {
        out.push_str(&format!(
            "{:<22} {:<18} {:<7} {:>4.2}-{:<4.2}\n",
            p.id,
            p.variant,
            p.risk_band.to_string(),
            p.min_duration,
            p.max_duration
        ));
    }
    out
}
