//! Payoff specifications for the structured product families.
//!
//! A [`PayoffSpec`] holds the variant-specific terms of a contract exactly as
//! quoted: levels (barriers, strikes, protection, autocall triggers) are
//! percentages of the initial spot, coupons and participation are
//! percentage points of payout. [`PayoffSpec::normalised`] converts the
//! levels to spot units for a given initial spot; payout terms are never
//! rescaled.

use pricer_core::types::PricingError;
use serde::{Deserialize, Serialize};

use super::schedule::AutocallSchedule;

/// Vanilla option flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VanillaKind {
    /// Long call: max(S - K, 0)
    Call,
    /// Long put: max(K - S, 0)
    Put,
    /// Long call at K₁, short call at K₂ > K₁
    CallSpread,
    /// Long put at K₁, short put at K₂ < K₁
    PutSpread,
}

impl VanillaKind {
    /// Returns `true` for call-side payoffs.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, VanillaKind::Call | VanillaKind::CallSpread)
    }

    /// Returns `true` for spreads, which need a second strike.
    #[inline]
    pub fn is_spread(&self) -> bool {
        matches!(self, VanillaKind::CallSpread | VanillaKind::PutSpread)
    }
}

/// Variant-specific terms of a structured product.
///
/// Serialised with an internal `kind` tag so catalog files read naturally:
///
/// ```
/// use pricer_models::instruments::PayoffSpec;
///
/// let spec: PayoffSpec = toml::from_str(r#"
///     kind = "digital"
///     barrier = 70.0
///     coupon = 12.0
/// "#).unwrap();
///
/// assert_eq!(spec, PayoffSpec::Digital { barrier: 70.0, coupon: 12.0 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayoffSpec {
    /// Single-level autocall with coupon at protection.
    AutocallClassic {
        /// Trigger level on the running maximum.
        autocall_level: f64,
        /// Coupon paid on trigger or above protection.
        coupon: f64,
        /// Capital barrier at maturity.
        barrier: f64,
        /// Coupon level at maturity.
        protection: f64,
    },
    /// Autocall with increasing levels and coupons.
    AutocallStepUp {
        /// Observation schedule.
        schedule: AutocallSchedule,
        /// Capital barrier at maturity.
        barrier: f64,
        /// Final coupon level at maturity.
        final_barrier: f64,
    },
    /// Autocall that accumulates unpaid coupons.
    AutocallMemory {
        /// Observation schedule.
        schedule: AutocallSchedule,
        /// Capital barrier at maturity.
        barrier: f64,
        /// Final coupon level at maturity.
        final_barrier: f64,
    },
    /// Autocall whose upside requires a knock-in event.
    AutocallKnockIn {
        /// Observation schedule.
        schedule: AutocallSchedule,
        /// Capital barrier at maturity.
        barrier: f64,
        /// Knock-in level on the running minimum.
        knock_in: f64,
        /// Final coupon level at maturity.
        final_barrier: f64,
    },
    /// Fixed coupon if the barrier is never touched.
    Digital {
        /// Down barrier on the running minimum.
        barrier: f64,
        /// Coupon paid while the barrier holds.
        coupon: f64,
    },
    /// Leveraged upside above a strike, with a protection floor.
    Participation {
        /// Participation rate in percent.
        participation: f64,
        /// Protection level at maturity.
        protection: f64,
        /// Participation strike.
        strike: f64,
    },
    /// Absolute performance while a down barrier holds.
    TwinWin {
        /// Down barrier on the running minimum.
        barrier: f64,
        /// Reference strike.
        strike: f64,
    },
    /// European vanilla option or spread.
    ///
    /// All fields are optional on the wire; [`PayoffSpec::vanilla_terms`]
    /// reports missing ones instead of defaulting them.
    Vanilla {
        /// Option flavour.
        option: Option<VanillaKind>,
        /// First strike.
        strike: Option<f64>,
        /// Second strike for spreads.
        second_strike: Option<f64>,
        /// Time to maturity in years.
        time_to_maturity: Option<f64>,
        /// Contract notional.
        notional: Option<f64>,
    },
}

/// Fully resolved vanilla terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanillaTerms {
    /// Option flavour.
    pub kind: VanillaKind,
    /// First strike.
    pub strike: f64,
    /// Second strike (spreads only).
    pub second_strike: Option<f64>,
    /// Time to maturity in years.
    pub time_to_maturity: f64,
    /// Contract notional, if quoted.
    pub notional: Option<f64>,
}

impl VanillaTerms {
    /// Intrinsic value at `spot`, spreads capped at the strike distance.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::instruments::{VanillaKind, VanillaTerms};
    ///
    /// let spread = VanillaTerms {
    ///     kind: VanillaKind::CallSpread,
    ///     strike: 100.0,
    ///     second_strike: Some(110.0),
    ///     time_to_maturity: 1.0,
    ///     notional: None,
    /// };
    /// assert_eq!(spread.intrinsic(105.0), 5.0);
    /// assert_eq!(spread.intrinsic(150.0), 10.0);
    /// ```
    pub fn intrinsic(&self, spot: f64) -> f64 {
        let k1 = self.strike;
        let k2 = self.second_strike.unwrap_or(k1);
        match self.kind {
            VanillaKind::Call => (spot - k1).max(0.0),
            VanillaKind::Put => (k1 - spot).max(0.0),
            VanillaKind::CallSpread => (spot - k1).max(0.0).min(k2 - k1),
            VanillaKind::PutSpread => (k1 - spot).max(0.0).min(k1 - k2),
        }
    }

    /// Returns `true` if `spot` finishes in the money against the first strike.
    pub fn is_in_the_money(&self, spot: f64) -> bool {
        if self.kind.is_call() {
            spot > self.strike
        } else {
            spot < self.strike
        }
    }
}

/// Payoff terms with every level expressed in spot units.
///
/// Produced by [`PayoffSpec::normalised`]; evaluation code works only on
/// this form so levels cannot be rescaled twice.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedPayoff {
    initial_spot: f64,
    spec: PayoffSpec,
}

impl NormalisedPayoff {
    /// Initial spot the levels were rescaled against.
    #[inline]
    pub fn initial_spot(&self) -> f64 {
        self.initial_spot
    }

    /// Rescaled terms.
    #[inline]
    pub fn spec(&self) -> &PayoffSpec {
        &self.spec
    }
}

impl PayoffSpec {
    /// Family name, matching the serde tag.
    pub fn variant_tag(&self) -> &'static str {
        match self {
            PayoffSpec::AutocallClassic { .. } => "autocall_classic",
            PayoffSpec::AutocallStepUp { .. } => "autocall_step_up",
            PayoffSpec::AutocallMemory { .. } => "autocall_memory",
            PayoffSpec::AutocallKnockIn { .. } => "autocall_knock_in",
            PayoffSpec::Digital { .. } => "digital",
            PayoffSpec::Participation { .. } => "participation",
            PayoffSpec::TwinWin { .. } => "twin_win",
            PayoffSpec::Vanilla { .. } => "vanilla",
        }
    }

    /// Returns `true` for the four autocall families.
    pub fn is_autocall(&self) -> bool {
        matches!(
            self,
            PayoffSpec::AutocallClassic { .. }
                | PayoffSpec::AutocallStepUp { .. }
                | PayoffSpec::AutocallMemory { .. }
                | PayoffSpec::AutocallKnockIn { .. }
        )
    }

    /// Returns `true` for vanilla options and spreads.
    pub fn is_vanilla(&self) -> bool {
        matches!(self, PayoffSpec::Vanilla { .. })
    }

    /// Observation schedule, for the autocall families that carry one.
    pub fn schedule(&self) -> Option<&AutocallSchedule> {
        match self {
            PayoffSpec::AutocallStepUp { schedule, .. }
            | PayoffSpec::AutocallMemory { schedule, .. }
            | PayoffSpec::AutocallKnockIn { schedule, .. } => Some(schedule),
            _ => None,
        }
    }

    /// Largest single coupon the product can pay (0 for non-coupon products).
    pub fn max_coupon(&self) -> f64 {
        match self {
            PayoffSpec::AutocallClassic { coupon, .. } | PayoffSpec::Digital { coupon, .. } => {
                *coupon
            }
            PayoffSpec::AutocallMemory { schedule, .. } => schedule.total_coupons(),
            PayoffSpec::AutocallStepUp { schedule, .. }
            | PayoffSpec::AutocallKnockIn { schedule, .. } => schedule.max_coupon(),
            _ => 0.0,
        }
    }

    /// Resolves the vanilla terms.
    ///
    /// # Errors
    ///
    /// - `PricingError::UnsupportedInstrument` for non-vanilla variants
    /// - `PricingError::Validation` if the option type, strike, maturity or
    ///   (for spreads) second strike is missing or inconsistent
    pub fn vanilla_terms(&self) -> Result<VanillaTerms, PricingError> {
        let PayoffSpec::Vanilla {
            option,
            strike,
            second_strike,
            time_to_maturity,
            notional,
        } = self
        else {
            return Err(PricingError::unsupported(format!(
                "{} has no vanilla terms",
                self.variant_tag()
            )));
        };

        let kind = option.ok_or_else(|| PricingError::validation("vanilla option type is missing"))?;
        let strike = strike.ok_or_else(|| PricingError::validation("vanilla strike is missing"))?;
        let time_to_maturity = time_to_maturity
            .ok_or_else(|| PricingError::validation("vanilla time to maturity is missing"))?;

        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::validation(format!(
                "vanilla strike must be positive, got {}",
                strike
            )));
        }
        if !time_to_maturity.is_finite() || time_to_maturity <= 0.0 {
            return Err(PricingError::validation(format!(
                "vanilla time to maturity must be positive, got {}",
                time_to_maturity
            )));
        }
        if let Some(n) = notional {
            if !n.is_finite() || *n <= 0.0 {
                return Err(PricingError::validation(format!(
                    "vanilla notional must be positive, got {}",
                    n
                )));
            }
        }

        let second_strike = if kind.is_spread() {
            let k2 = second_strike.ok_or_else(|| {
                PricingError::validation("vanilla spread second strike is missing")
            })?;
            let ordered = match kind {
                VanillaKind::CallSpread => k2 > strike,
                _ => k2 < strike && k2 > 0.0,
            };
            if !k2.is_finite() || !ordered {
                return Err(PricingError::validation(format!(
                    "second strike {} is on the wrong side of strike {} for a {:?}",
                    k2, strike, kind
                )));
            }
            Some(k2)
        } else {
            None
        };

        Ok(VanillaTerms {
            kind,
            strike,
            second_strike,
            time_to_maturity,
            notional: *notional,
        })
    }

    /// Checks the variant-specific invariants.
    ///
    /// Schedules are checked structurally (configuration errors); scalar
    /// levels must be finite and non-negative, and vanilla terms complete
    /// (validation errors).
    pub fn validate(&self) -> Result<(), PricingError> {
        if let Some(schedule) = self.schedule() {
            schedule.validate()?;
        }
        if self.is_vanilla() {
            self.vanilla_terms()?;
            return Ok(());
        }

        let scalars: Vec<(&str, f64)> = match self {
            PayoffSpec::AutocallClassic {
                autocall_level,
                coupon,
                barrier,
                protection,
            } => vec![
                ("autocall_level", *autocall_level),
                ("coupon", *coupon),
                ("barrier", *barrier),
                ("protection", *protection),
            ],
            PayoffSpec::AutocallStepUp {
                barrier,
                final_barrier,
                ..
            }
            | PayoffSpec::AutocallMemory {
                barrier,
                final_barrier,
                ..
            } => vec![("barrier", *barrier), ("final_barrier", *final_barrier)],
            PayoffSpec::AutocallKnockIn {
                barrier,
                knock_in,
                final_barrier,
                ..
            } => vec![
                ("barrier", *barrier),
                ("knock_in", *knock_in),
                ("final_barrier", *final_barrier),
            ],
            PayoffSpec::Digital { barrier, coupon } => {
                vec![("barrier", *barrier), ("coupon", *coupon)]
            }
            PayoffSpec::Participation {
                participation,
                protection,
                strike,
            } => vec![
                ("participation", *participation),
                ("protection", *protection),
                ("strike", *strike),
            ],
            PayoffSpec::TwinWin { barrier, strike } => {
                vec![("barrier", *barrier), ("strike", *strike)]
            }
            PayoffSpec::Vanilla { .. } => vec![],
        };

        for (name, value) in &scalars {
            if !value.is_finite() || *value < 0.0 {
                return Err(PricingError::validation(format!(
                    "{} {} must be non-negative and finite, got {}",
                    self.variant_tag(),
                    name,
                    value
                )));
            }
        }
        Ok(())
    }

    /// Rescales every percentage level to spot units.
    ///
    /// Levels (barriers, protection, strikes, knock-in, autocall triggers)
    /// become `value / 100 × initial_spot`. Coupons, participation,
    /// maturity and notional are left as quoted.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_models::instruments::PayoffSpec;
    ///
    /// let spec = PayoffSpec::AutocallClassic {
    ///     autocall_level: 100.0,
    ///     coupon: 8.5,
    ///     barrier: 65.0,
    ///     protection: 100.0,
    /// };
    /// let normalised = spec.normalised(200.0);
    ///
    /// assert_eq!(
    ///     normalised.spec(),
    ///     &PayoffSpec::AutocallClassic {
    ///         autocall_level: 200.0,
    ///         coupon: 8.5,
    ///         barrier: 130.0,
    ///         protection: 200.0,
    ///     }
    /// );
    /// ```
    pub fn normalised(&self, initial_spot: f64) -> NormalisedPayoff {
        let f = initial_spot / 100.0;
        let spec = match self {
            PayoffSpec::AutocallClassic {
                autocall_level,
                coupon,
                barrier,
                protection,
            } => PayoffSpec::AutocallClassic {
                autocall_level: autocall_level * f,
                coupon: *coupon,
                barrier: barrier * f,
                protection: protection * f,
            },
            PayoffSpec::AutocallStepUp {
                schedule,
                barrier,
                final_barrier,
            } => PayoffSpec::AutocallStepUp {
                schedule: schedule.scaled_levels(f),
                barrier: barrier * f,
                final_barrier: final_barrier * f,
            },
            PayoffSpec::AutocallMemory {
                schedule,
                barrier,
                final_barrier,
            } => PayoffSpec::AutocallMemory {
                schedule: schedule.scaled_levels(f),
                barrier: barrier * f,
                final_barrier: final_barrier * f,
            },
            PayoffSpec::AutocallKnockIn {
                schedule,
                barrier,
                knock_in,
                final_barrier,
            } => PayoffSpec::AutocallKnockIn {
                schedule: schedule.scaled_levels(f),
                barrier: barrier * f,
                knock_in: knock_in * f,
                final_barrier: final_barrier * f,
            },
            PayoffSpec::Digital { barrier, coupon } => PayoffSpec::Digital {
                barrier: barrier * f,
                coupon: *coupon,
            },
            PayoffSpec::Participation {
                participation,
                protection,
                strike,
            } => PayoffSpec::Participation {
                participation: *participation,
                protection: protection * f,
                strike: strike * f,
            },
            PayoffSpec::TwinWin { barrier, strike } => PayoffSpec::TwinWin {
                barrier: barrier * f,
                strike: strike * f,
            },
            PayoffSpec::Vanilla {
                option,
                strike,
                second_strike,
                time_to_maturity,
                notional,
            } => PayoffSpec::Vanilla {
                option: *option,
                strike: strike.map(|k| k * f),
                second_strike: second_strike.map(|k| k * f),
                time_to_maturity: *time_to_maturity,
                notional: *notional,
            },
        };

        NormalisedPayoff { initial_spot, spec }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn memory() -> PayoffSpec {
        PayoffSpec::AutocallMemory {
            schedule: AutocallSchedule::new(
                vec![1.0, 2.0, 3.0],
                vec![100.0, 105.0, 110.0],
                vec![6.0, 8.0, 10.0],
            )
            .unwrap(),
            barrier: 50.0,
            final_barrier: 100.0,
        }
    }

    fn vanilla(kind: Option<VanillaKind>, strike: Option<f64>, k2: Option<f64>) -> PayoffSpec {
        PayoffSpec::Vanilla {
            option: kind,
            strike,
            second_strike: k2,
            time_to_maturity: Some(1.0),
            notional: Some(100_000.0),
        }
    }

    // ==========================================================
    // Classification
    // ==========================================================

    #[test]
    fn test_variant_tags() {
        assert_eq!(memory().variant_tag(), "autocall_memory");
        assert!(memory().is_autocall());
        assert!(!memory().is_vanilla());
        assert!(memory().schedule().is_some());

        let digital = PayoffSpec::Digital {
            barrier: 70.0,
            coupon: 12.0,
        };
        assert_eq!(digital.variant_tag(), "digital");
        assert!(!digital.is_autocall());
        assert!(digital.schedule().is_none());
    }

    #[test]
    fn test_max_coupon() {
        assert_eq!(memory().max_coupon(), 24.0);
        let classic = PayoffSpec::AutocallClassic {
            autocall_level: 100.0,
            coupon: 8.5,
            barrier: 65.0,
            protection: 100.0,
        };
        assert_eq!(classic.max_coupon(), 8.5);
    }

    // ==========================================================
    // Vanilla terms
    // ==========================================================

    #[test]
    fn test_vanilla_terms_complete() {
        let terms = vanilla(Some(VanillaKind::Put), Some(100.0), None)
            .vanilla_terms()
            .unwrap();
        assert_eq!(terms.kind, VanillaKind::Put);
        assert_eq!(terms.strike, 100.0);
        assert_eq!(terms.second_strike, None);
    }

    #[test]
    fn test_vanilla_missing_fields_are_validation_errors() {
        let err = vanilla(None, Some(100.0), None).vanilla_terms().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("option type"));

        let err = vanilla(Some(VanillaKind::Call), None, None)
            .vanilla_terms()
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("strike"));

        let err = vanilla(Some(VanillaKind::CallSpread), Some(100.0), None)
            .vanilla_terms()
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("second strike"));
    }

    #[test]
    fn test_vanilla_spread_strike_ordering() {
        assert!(vanilla(Some(VanillaKind::CallSpread), Some(100.0), Some(90.0))
            .vanilla_terms()
            .is_err());
        assert!(vanilla(Some(VanillaKind::PutSpread), Some(100.0), Some(110.0))
            .vanilla_terms()
            .is_err());
        assert!(vanilla(Some(VanillaKind::PutSpread), Some(100.0), Some(90.0))
            .vanilla_terms()
            .is_ok());
    }

    #[test]
    fn test_vanilla_terms_on_non_vanilla() {
        let err = memory().vanilla_terms().unwrap_err();
        assert!(matches!(err, PricingError::UnsupportedInstrument(_)));
    }

    #[test]
    fn test_intrinsic_values() {
        let put_spread = vanilla(Some(VanillaKind::PutSpread), Some(100.0), Some(90.0))
            .vanilla_terms()
            .unwrap();
        assert_eq!(put_spread.intrinsic(120.0), 0.0);
        assert_eq!(put_spread.intrinsic(95.0), 5.0);
        assert_eq!(put_spread.intrinsic(50.0), 10.0);
        assert!(put_spread.is_in_the_money(95.0));
        assert!(!put_spread.is_in_the_money(100.0));
    }

    // ==========================================================
    // Validation
    // ==========================================================

    #[test]
    fn test_validate_rejects_negative_levels() {
        let spec = PayoffSpec::TwinWin {
            barrier: -60.0,
            strike: 100.0,
        };
        assert!(spec.validate().unwrap_err().is_validation());

        let spec = PayoffSpec::Digital {
            barrier: f64::NAN,
            coupon: 12.0,
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_validate_schedule_is_configuration_error() {
        let spec = PayoffSpec::AutocallStepUp {
            schedule: AutocallSchedule {
                dates: vec![1.0, 2.0],
                levels: vec![105.0],
                coupons: vec![8.0, 10.0],
            },
            barrier: 60.0,
            final_barrier: 100.0,
        };
        assert!(spec.validate().unwrap_err().is_configuration());
    }

    // ==========================================================
    // Normalisation
    // ==========================================================

    #[test]
    fn test_normalised_rescales_schedule_levels_only() {
        let normalised = memory().normalised(50.0);
        let schedule = normalised.spec().schedule().unwrap();
        assert_eq!(schedule.levels, vec![50.0, 52.5, 55.0]);
        assert_eq!(schedule.coupons, vec![6.0, 8.0, 10.0]);
        assert_eq!(normalised.initial_spot(), 50.0);
    }

    #[test]
    fn test_normalised_participation_unchanged() {
        let spec = PayoffSpec::Participation {
            participation: 150.0,
            protection: 90.0,
            strike: 100.0,
        };
        match spec.normalised(80.0).spec() {
            PayoffSpec::Participation {
                participation,
                protection,
                strike,
            } => {
                assert_eq!(*participation, 150.0);
                assert_relative_eq!(*protection, 72.0, epsilon = 1e-12);
                assert_relative_eq!(*strike, 80.0, epsilon = 1e-12);
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_normalised_vanilla_keeps_maturity() {
        let spec = vanilla(Some(VanillaKind::CallSpread), Some(100.0), Some(110.0));
        let terms = spec.normalised(120.0).spec().vanilla_terms().unwrap();
        assert_relative_eq!(terms.strike, 120.0, epsilon = 1e-12);
        assert_relative_eq!(terms.second_strike.unwrap(), 132.0, epsilon = 1e-12);
        assert_eq!(terms.time_to_maturity, 1.0);
        assert_eq!(terms.notional, Some(100_000.0));
    }

    #[test]
    fn test_serde_tagged_round_trip_shape() {
        let json = serde_json::to_value(memory()).unwrap();
        assert_eq!(json["kind"], "autocall_memory");
        assert_eq!(json["schedule"]["coupons"][2], 10.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_normalising_at_par_is_identity(barrier in 0.0..200.0f64, coupon in 0.0..30.0f64) {
            let spec = PayoffSpec::Digital { barrier, coupon };
            let normalised = spec.normalised(100.0);
            prop_assert_eq!(normalised.spec(), &spec);
        }

        #[test]
        fn prop_levels_scale_linearly(strike in 1.0..200.0f64, spot in 1.0..500.0f64) {
            let spec = PayoffSpec::TwinWin { barrier: 60.0, strike };
            if let PayoffSpec::TwinWin { barrier: b, strike: k } = spec.normalised(spot).spec() {
                prop_assert!((b - 0.6 * spot).abs() < 1e-9);
                prop_assert!((k - strike * spot / 100.0).abs() < 1e-9);
            } else {
                prop_assert!(false);
            }
        }
    }
}
