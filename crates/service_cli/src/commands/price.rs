//! Price command implementation
//!
//! Prices a catalog product using the pricer_pricing Monte Carlo engine.

use pricer_core::types::PricingError;
use pricer_pricing::mc::MonteCarloPricer;
use pricer_pricing::result::CalculationResult;
use tracing::info;

use super::{emit_json, Session};
use crate::Result;

/// Build the full pricing report
pub fn execute(session: &Session, product_id: &str) -> Result<CalculationResult> {
    let contract = session.product(product_id)?;
    let config = session.config.monte_carlo()?;
    let greeks = session.config.greeks_config()?;
    let mut rng = config.rng();

    let pricer = MonteCarloPricer::new(config)
        .and_then(|p| p.with_greeks(greeks))
        .map_err(PricingError::from)?;

    Ok(pricer.price(contract, &session.market, &mut rng)?)
}

/// Run the price command
pub fn run(session: &Session, product_id: &str) -> Result<()> {
    info!(product = product_id, "pricing");
    let result = execute(session, product_id)?;
    info!(
        product = product_id,
        mean_payoff = result.summary.mean_payoff,
        std_error = result.summary.std_error,
        "pricing complete"
    );
    emit_json(&result)
}
