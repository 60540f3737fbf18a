//! Shared test utilities for algo-ta tests.

use algo_ta::series::{Bar, Series};

/// Approximate equality where two NaN values are considered equal.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point operations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// One bar per hour starting at the epoch.
#[allow(dead_code)]
pub const HOUR: i64 = 3_600;

/// Bars with `high = low = close` at every price, hourly, volume 1.
#[allow(dead_code)]
pub fn flat_bars(close: &[f64]) -> Series<f64> {
    Series::from_bars(
        close
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * HOUR, c, c, c, c, 1.0)),
    )
    .expect("hourly timestamps are increasing")
}

/// Well-formed OHLCV bars around `close`: open is the previous close, high
/// and low straddle both by `spread`.
#[allow(dead_code)]
pub fn ohlc_bars(close: &[f64], spread: f64, volume: f64) -> Series<f64> {
    Series::from_bars(close.iter().enumerate().map(|(i, &c)| {
        let open = if i == 0 { c } else { close[i - 1] };
        Bar::new(
            i as i64 * HOUR,
            open,
            open.max(c) + spread,
            open.min(c) - spread,
            c,
            volume,
        )
    }))
    .expect("hourly timestamps are increasing")
}

/// A deterministic wavy price path.
#[allow(dead_code)]
pub fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            100.0 + 5.0 * (x * 0.13).sin() + 2.0 * (x * 0.41).cos() + 0.05 * x
        })
        .collect()
}

/// Count the NaN values in a slice.
#[allow(dead_code)]
pub fn count_nans(data: &[f64]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_nan_handling() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(1.0, f64::NAN, EPSILON));
    }

    #[test]
    fn test_ohlc_bars_are_well_formed() {
        let s = ohlc_bars(&wave(20), 0.5, 10.0);
        for bar in s.bars() {
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
        }
    }
}
