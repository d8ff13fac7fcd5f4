//! Integration tests for the market snapshot.
//!
//! Exercises the crate-root re-exports, serde round trips through the
//! validating wire form and bump invariants.

use approx::assert_relative_eq;
use pricer_core::{MarketEnvironment, MarketParameter, PricingError};
use proptest::prelude::*;

// ============================================================================
// Re-exports and parsing
// ============================================================================

#[test]
fn test_root_reexports() {
    let market = MarketEnvironment::default();
    let err: PricingError = MarketEnvironment::new(0.0, 0.0, 0.0, 0.2).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(market.get(MarketParameter::Spot), 100.0);
}

#[test]
fn test_collaborator_parameter_names() {
    let cases = [
        ("volatility", MarketParameter::Volatility),
        ("riskFreeRate", MarketParameter::RiskFreeRate),
        ("dividendYield", MarketParameter::DividendYield),
        ("currentSpot", MarketParameter::Spot),
        ("risk_free_rate", MarketParameter::RiskFreeRate),
    ];
    for (name, expected) in cases {
        assert_eq!(name.parse::<MarketParameter>().unwrap(), expected, "{name}");
    }

    let err = "correlation".parse::<MarketParameter>().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_display_parses_back() {
    for parameter in MarketParameter::ALL {
        let parsed: MarketParameter = parameter.to_string().parse().unwrap();
        assert_eq!(parsed, parameter);
    }
}

// ============================================================================
// Wire form
// ============================================================================

#[test]
fn test_deserialise_defaults_dividend_yield() {
    let market: MarketEnvironment =
        serde_json::from_str(r#"{"spot": 95.0, "risk_free_rate": 0.04, "volatility": 0.3}"#)
            .unwrap();
    assert_eq!(market.spot(), 95.0);
    assert_eq!(market.dividend_yield(), 0.0);
}

#[test]
fn test_deserialise_rejects_invalid_snapshot() {
    let result: Result<MarketEnvironment, _> = serde_json::from_str(
        r#"{"spot": 100.0, "risk_free_rate": 0.04, "dividend_yield": 0.0, "volatility": -0.3}"#,
    );
    assert!(result.is_err());
}

// ============================================================================
// Bump invariants
// ============================================================================

proptest! {
    #[test]
    fn prop_bump_scales_only_the_selected_field(
        multiplier in 0.5f64..1.5,
        index in 0usize..4,
    ) {
        let market = MarketEnvironment::default();
        let parameter = MarketParameter::ALL[index];
        let bumped = market.bumped(parameter, multiplier).unwrap();

        for other in MarketParameter::ALL {
            if other == parameter {
                assert_relative_eq!(
                    bumped.get(other),
                    market.get(other) * multiplier,
                    epsilon = 1e-12
                );
            } else {
                prop_assert_eq!(bumped.get(other), market.get(other));
            }
        }
    }

    #[test]
    fn prop_negative_spot_multiplier_is_rejected(multiplier in -2.0f64..=0.0) {
        let err = MarketEnvironment::default()
            .bumped(MarketParameter::Spot, multiplier)
            .unwrap_err();
        prop_assert!(err.is_validation());
    }
}
