//! Risk command implementation
//!
//! Reports payoff risk metrics for any product, plus the fair-value
//! decomposition for autocalls and moneyness metrics for vanillas.
//! A metric that is undefined for the sample is reported as an error
//! string next to the metrics that are available.

use pricer_core::types::PricingError;
use pricer_pricing::mc::simulate_payoffs;
use pricer_risk::fair_value::{autocall_fair_value, AutocallFairValue};
use pricer_risk::metrics::{risk_metrics_for_paths, MetricResult, RiskMetrics, SurvivalPoint};
use pricer_risk::vanilla::{vanilla_risk_metrics, VanillaRiskMetrics};
use serde::Serialize;
use tracing::info;

use super::{emit_json, Session};
use crate::Result;

/// A metric value or the reason it is undefined
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Value(f64),
    Error { error: String },
}

impl From<&MetricResult> for MetricValue {
    fn from(result: &MetricResult) -> Self {
        match result {
            Ok(v) => MetricValue::Value(*v),
            Err(e) => MetricValue::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Payoff risk metrics as printed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsView {
    pub n_samples: usize,
    pub mean_return: f64,
    pub var95: f64,
    pub cvar95: MetricValue,
    pub max_drawdown: f64,
    pub sharpe_ratio: MetricValue,
    pub worst_path_drawdown: Option<f64>,
    pub survival_by_date: Option<Vec<SurvivalPoint>>,
    pub autocall_risk: Option<f64>,
}

impl From<RiskMetrics> for MetricsView {
    fn from(m: RiskMetrics) -> Self {
        Self {
            n_samples: m.n_samples,
            mean_return: m.mean_return,
            var95: m.var95,
            cvar95: (&m.cvar95).into(),
            max_drawdown: m.max_drawdown,
            sharpe_ratio: (&m.sharpe_ratio).into(),
            worst_path_drawdown: m.worst_path_drawdown,
            survival_by_date: m.survival_by_date,
            autocall_risk: m.autocall_risk,
        }
    }
}

/// Vanilla metrics as printed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VanillaView {
    pub var95: f64,
    pub cvar95: MetricValue,
    pub max_loss: f64,
    pub break_even: f64,
    pub probability_itm: f64,
    pub probability_otm: f64,
}

impl From<VanillaRiskMetrics> for VanillaView {
    fn from(m: VanillaRiskMetrics) -> Self {
        Self {
            var95: m.var95,
            cvar95: (&m.cvar95).into(),
            max_loss: m.max_loss,
            break_even: m.break_even,
            probability_itm: m.probability_itm,
            probability_otm: m.probability_otm,
        }
    }
}

/// Risk report for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub product: String,
    pub metrics: MetricsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_value: Option<AutocallFairValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vanilla: Option<VanillaView>,
}

/// Build the risk report
///
/// Every section reruns the simulation from the configured seed, so with a
/// seed they all see the same paths.
pub fn execute(session: &Session, product_id: &str) -> Result<RiskReport> {
    let contract = session.product(product_id)?;
    let config = session.config.monte_carlo()?;
    let market = &session.market;

    let sample = simulate_payoffs(contract, market, &config, &mut config.rng())?;
    let metrics = risk_metrics_for_paths(&sample, contract.payoff.schedule())
        .map_err(PricingError::from)?;

    let fair_value = if contract.is_autocall() {
        Some(autocall_fair_value(contract, market, &config, &mut config.rng())?)
    } else {
        None
    };

    let vanilla = if contract.is_vanilla() {
        Some(vanilla_risk_metrics(contract, market, &config, &mut config.rng())?.into())
    } else {
        None
    };

    Ok(RiskReport {
        product: contract.id.clone(),
        metrics: metrics.into(),
        fair_value,
        vanilla,
    })
}

/// Run the risk command
pub fn run(session: &Session, product_id: &str) -> Result<()> {
    let report = execute(session, product_id)?;
    info!(
        product = product_id,
        var95 = report.metrics.var95,
        "risk computed"
    );
    emit_json(&report)
}
