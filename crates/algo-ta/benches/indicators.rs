//! Performance benchmarks for algo-ta indicators.
//!
//! Run with: `cargo bench -p algo-ta`
//!
//! Throughput for each indicator family across input sizes, plus the engine
//! evaluating a full configuration set.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use algo_ta::engine::{IndicatorConfig, IndicatorEngine};
use algo_ta::indicators::{
    rsi, smooth, zlsma, Admf, Adx, Atr, Chandelier, Envelope, Macd, MultiMacd, Smoothing, T3Roc,
    Zlsma,
};
use algo_ta::series::{Bar, Series};

/// Deterministic hourly OHLCV bars.
fn generate_series(size: usize) -> Series<f64> {
    let mut price = 100.0_f64;
    Series::from_bars((0..size).map(|i| {
        let x = i as f64;
        let delta = (x * 0.1).sin() * 2.0 + (x * 0.03).cos() * 1.5;
        let open = price;
        price = (price + delta).max(10.0);
        let high = open.max(price) + 1.0 + (x * 0.07).sin().abs();
        let low = open.min(price) - 1.0 - (x * 0.05).cos().abs();
        let volume = 1_000_000.0 + (x * 1000.0).sin().abs() * 500_000.0;
        Bar::new(i as i64 * 3_600, open, high, low, price, volume)
    }))
    .expect("hourly timestamps are increasing")
}

// Standard sizes for benchmarking
const SIZES: &[usize] = &[100, 1_000, 10_000, 100_000];

fn bench_smoothing(c: &mut Criterion) {
    for kind in Smoothing::ALL {
        let mut group = c.benchmark_group(format!("smooth/{kind}"));
        for &size in SIZES {
            let series = generate_series(size);
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, s| {
                b.iter(|| smooth(kind, black_box(s.close()), black_box(20), Some(s.volume())))
            });
        }
        group.finish();
    }
}

fn bench_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsi");
    for &size in SIZES {
        let series = generate_series(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, s| {
            b.iter(|| rsi(black_box(s.close()), black_box(14)))
        });
    }
    group.finish();
}

fn bench_zlsma(c: &mut Criterion) {
    let mut group = c.benchmark_group("zlsma");
    for &size in SIZES {
        let series = generate_series(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, s| {
            b.iter(|| zlsma(black_box(s.close()), black_box(32), 0))
        });
    }
    group.finish();
}

fn bench_configs(c: &mut Criterion) {
    let configs = [
        IndicatorConfig::Atr(Atr::new()),
        IndicatorConfig::Adx(Adx::new()),
        IndicatorConfig::Macd(Macd::new()),
        IndicatorConfig::MultiMacd(MultiMacd::new()),
        IndicatorConfig::Envelope(Envelope::new()),
        IndicatorConfig::T3Roc(T3Roc::new()),
        IndicatorConfig::Chandelier(Chandelier::new()),
        IndicatorConfig::Admf(Admf::new()),
    ];
    for config in &configs {
        let mut group = c.benchmark_group(config.kind());
        for &size in SIZES {
            let series = generate_series(size);
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, s| {
                b.iter(|| config.compute(black_box(s)))
            });
        }
        group.finish();
    }
}

fn bench_engine(c: &mut Criterion) {
    let engine = IndicatorEngine::new()
        .with("atr", IndicatorConfig::Atr(Atr::new()))
        .with("adx", IndicatorConfig::Adx(Adx::new()))
        .with("macd", IndicatorConfig::Macd(Macd::new()))
        .with("t3", IndicatorConfig::T3Roc(T3Roc::new()))
        .with("chandelier", IndicatorConfig::Chandelier(Chandelier::new()))
        .with("admf", IndicatorConfig::Admf(Admf::new()))
        .with("zlsma", IndicatorConfig::Zlsma(Zlsma::new()));

    let mut group = c.benchmark_group("engine");
    for &size in SIZES {
        let series = generate_series(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, s| {
            b.iter(|| engine.run(black_box(s)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_smoothing,
    bench_rsi,
    bench_zlsma,
    bench_configs,
    bench_engine,
);

criterion_main!(benches);
