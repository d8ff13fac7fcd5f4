//! Sweep command implementation

use pricer_core::market_data::MarketParameter;
use pricer_risk::sensitivity::{SensitivityAnalyzer, SensitivityCurve};
use tracing::info;

use super::{emit_json, Session};
use crate::{CliError, Result};

/// Sweep `parameter` for a catalog product
///
/// `range` and `steps` override the configured sweep shape.
pub fn execute(
    session: &Session,
    product_id: &str,
    parameter: &str,
    range: Option<f64>,
    steps: Option<usize>,
) -> Result<SensitivityCurve> {
    let parameter: MarketParameter = parameter
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("unknown market parameter '{parameter}'")))?;
    let contract = session.product(product_id)?;

    let mut config = session.config.sensitivity_config();
    if let Some(range) = range {
        config.range_pct = range;
    }
    if let Some(steps) = steps {
        config.steps = steps;
    }

    let analyzer = SensitivityAnalyzer::new(config)?;
    Ok(analyzer.sweep(contract, &session.market, parameter)?)
}

/// Run the sweep command
pub fn run(
    session: &Session,
    product_id: &str,
    parameter: &str,
    range: Option<f64>,
    steps: Option<usize>,
) -> Result<()> {
    let curve = execute(session, product_id, parameter, range, steps)?;
    info!(
        product = product_id,
        parameter = %curve.parameter,
        points = curve.points.len(),
        "sweep complete"
    );
    emit_json(&curve)
}
