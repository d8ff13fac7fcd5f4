//! Criterion benchmarks for pricer_risk.
//!
//! Benchmarks cover:
//! - Payoff risk metrics over growing sample sizes (dominated by the sort)
//! - A short volatility sweep on a scheduled autocall

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::{MarketEnvironment, MarketParameter};
use pricer_models::catalog::{standard_catalog, ProductCatalog};
use pricer_pricing::rng::PricerRng;
use pricer_risk::metrics::risk_metrics;
use pricer_risk::sensitivity::{SensitivityAnalyzer, SensitivityConfig};

/// Synthetic payoffs spread around par.
fn generate_payoffs(n: usize) -> Vec<f64> {
    let mut rng = PricerRng::from_seed(1);
    (0..n).map(|_| 100.0 + 15.0 * rng.gen_normal()).collect()
}

/// Benchmark VaR, CVaR, drawdown and Sharpe together.
fn bench_risk_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_metrics");

    for n in [1_000, 10_000, 100_000] {
        let payoffs = generate_payoffs(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &payoffs, |b, payoffs| {
            b.iter(|| risk_metrics(black_box(payoffs), 100.0).unwrap());
        });
    }

    group.finish();
}

/// Benchmark a five-point volatility sweep.
fn bench_sweep(c: &mut Criterion) {
    let catalog = standard_catalog().unwrap();
    let stepup = catalog.get("autocall_stepup").unwrap();
    let market = MarketEnvironment::default();
    let analyzer = SensitivityAnalyzer::new(SensitivityConfig {
        steps: 5,
        n_paths: 1_000,
        seed: Some(42),
        parallel: true,
        ..Default::default()
    })
    .unwrap();

    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);
    group.bench_function("autocall_stepup_vol_5x1000", |b| {
        b.iter(|| {
            analyzer
                .sweep(black_box(stepup), &market, MarketParameter::Volatility)
                .unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_risk_metrics, bench_sweep);
criterion_main!(benches);
