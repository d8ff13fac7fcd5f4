//! Greeks command implementation

use pricer_pricing::greeks::{GreeksEngine, GreeksResult};
use tracing::info;

use super::{emit_json, Session};
use crate::Result;

/// Compute Greeks for a catalog product
pub fn execute(session: &Session, product_id: &str) -> Result<GreeksResult> {
    let contract = session.product(product_id)?;
    let engine = GreeksEngine::new(session.config.greeks_config()?);
    Ok(engine.greeks(contract, &session.market)?)
}

/// Run the greeks command
pub fn run(session: &Session, product_id: &str) -> Result<()> {
    let greeks = execute(session, product_id)?;
    info!(
        product = product_id,
        method = greeks.method.as_str(),
        "greeks computed"
    );
    emit_json(&greeks)
}
