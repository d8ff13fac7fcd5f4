//! Closed-form command implementation

use pricer_core::types::PricingError;
use pricer_models::analytical::{
    autocall_approximation, price_vanilla, AutocallApproximation, VanillaValuation,
};
use pricer_models::instruments::PayoffSpec;
use serde::Serialize;
use tracing::info;

use super::{emit_json, Session};
use crate::Result;

/// Closed-form valuation, keyed by product family
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedFormReport {
    Vanilla(VanillaValuation),
    Autocall(AutocallApproximation),
}

/// Value a product in closed form
///
/// Only vanillas and the classic autocall have a closed form; every
/// other family is reported as unsupported.
pub fn execute(session: &Session, product_id: &str) -> Result<ClosedFormReport> {
    let contract = session.product(product_id)?;
    let market = &session.market;

    let report = match &contract.payoff {
        PayoffSpec::Vanilla { .. } => ClosedFormReport::Vanilla(price_vanilla(contract, market)?),
        PayoffSpec::AutocallClassic { .. } => {
            ClosedFormReport::Autocall(autocall_approximation(contract, market)?)
        }
        _ => {
            return Err(PricingError::unsupported(format!(
                "{}: no closed form for {}",
                contract.id,
                contract.variant_tag()
            ))
            .into())
        }
    };
    Ok(report)
}

/// Run the closed-form command
pub fn run(session: &Session, product_id: &str) -> Result<()> {
    let report = execute(session, product_id)?;
    info!(product = product_id, "closed-form valuation");
    emit_json(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::session;
    use crate::CliError;

    #[test]
    fn test_vanilla_call() {
        match execute(&session(10), "vanilla_call").unwrap() {
            ClosedFormReport::Vanilla(v) => {
                assert!(v.theoretical_price > 0.0);
                approx::assert_relative_eq!(
                    v.time_value,
                    v.theoretical_price - v.intrinsic_value,
                    epsilon = 1e-12
                );
            }
            other => panic!("expected vanilla valuation, got {other:?}"),
        }
    }

    #[test]
    fn test_classic_autocall() {
        match execute(&session(10), "autocall_classic").unwrap() {
            ClosedFormReport::Autocall(a) => {
                assert!((0.0..=1.0).contains(&a.trigger_probability));
                approx::assert_relative_eq!(
                    a.total,
                    a.autocall_value + a.protection_value,
                    epsilon = 1e-12
                );
            }
            other => panic!("expected autocall approximation, got {other:?}"),
        }
    }

    #[test]
    fn test_other_families_are_unsupported() {
        for id in ["autocall_memory", "digital_barrier", "twin_win"] {
            let err = execute(&session(10), id).unwrap_err();
            assert!(
                matches!(err, CliError::Pricing(PricingError::UnsupportedInstrument(_))),
                "{id}"
            );
        }
    }

    #[test]
    fn test_json_is_keyed_by_family() {
        let report = execute(&session(10), "vanilla_put").unwrap();
        let json = serde_json::to_value(report).unwrap();
        assert!(json["vanilla"]["theoretical_price"].is_number());
    }
}
