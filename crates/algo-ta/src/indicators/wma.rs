//! Weighted moving averages: WMA, VWMA and the Hull moving average (HMA).
//!
//! # Formula
//!
//! ```text
//! WMA[i]  = Σ (k × x[i-period+k]) / Σ k,    k = 1..=period
//! VWMA[i] = Σ (x × volume) / Σ volume       over the trailing period
//! HMA     = WMA(2 × WMA(x, period / 2) - WMA(x, period), floor(sqrt(period)))
//! ```
//!
//! The HMA sub-lengths truncate and never drop below 1.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::wma::wma;
//!
//! let data = vec![10.0_f64, 11.0, 12.0, 13.0, 14.0];
//! let result = wma(&data, 3).unwrap();
//!
//! assert!(result[1].is_nan());
//! // (10×1 + 11×2 + 12×3) / 6
//! assert!((result[2] - 68.0 / 6.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::kernels::{rolling_sum, rolling_weighted_mean};
use crate::traits::{validate_aligned, validate_indicator_input, SeriesElement};
use crate::utils::checked_ratio;

/// Returns the lookback period for WMA and VWMA: `period - 1`.
#[inline]
#[must_use]
pub const fn wma_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Returns the minimum input length required for WMA, which equals the period.
#[inline]
#[must_use]
pub const fn wma_min_len(period: usize) -> usize {
    period
}

/// The two inner lengths of a Hull moving average: `(period / 2, floor(sqrt(period)))`,
/// each at least 1.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::wma::hma_lengths;
///
/// assert_eq!(hma_lengths(9), (4, 3));
/// assert_eq!(hma_lengths(1), (1, 1));
/// ```
#[must_use]
pub const fn hma_lengths(period: usize) -> (usize, usize) {
    let half = period / 2;
    let mut root = 0;
    while (root + 1) * (root + 1) <= period {
        root += 1;
    }
    (if half == 0 { 1 } else { half }, if root == 0 { 1 } else { root })
}

/// Returns the lookback period for HMA: `(period - 1) + (floor(sqrt(period)) - 1)`.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::wma::hma_lookback;
///
/// assert_eq!(hma_lookback(9), 10);
/// ```
#[must_use]
pub const fn hma_lookback(period: usize) -> usize {
    let (_, root) = hma_lengths(period);
    period.saturating_sub(1) + root - 1
}

/// Computes the linearly Weighted Moving Average.
///
/// # Errors
///
/// Returns an error if:
/// - The input data is empty (`Error::EmptyInput`)
/// - The period is zero (`Error::InvalidPeriod`)
/// - The input data is shorter than the period (`Error::InsufficientData`)
#[must_use = "this returns a Result with the WMA values, which should be used"]
pub fn wma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "wma")?;
    Ok(rolling_weighted_mean(data, period))
}

/// Computes the Volume-Weighted Moving Average of `price` weighted by `volume`.
///
/// A window whose volume sums to zero yields NaN.
///
/// # Errors
///
/// Same as [`wma`], plus `Error::LengthMismatch` when the two series differ
/// in length.
#[must_use = "this returns a Result with the VWMA values, which should be used"]
pub fn vwma<T: SeriesElement>(price: &[T], volume: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(price, period, "vwma")?;
    validate_aligned(("price", price), &[("volume", volume)])?;
    Ok(vwma_values(price, volume, period))
}

/// Computes the Hull Moving Average.
///
/// # Errors
///
/// Same as [`wma`].
#[must_use = "this returns a Result with the HMA values, which should be used"]
pub fn hma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "hma")?;
    Ok(hma_values(data, period))
}

pub(crate) fn vwma_values<T: SeriesElement>(price: &[T], volume: &[T], period: usize) -> Vec<T> {
    let weighted: Vec<T> = price.iter().zip(volume).map(|(&p, &v)| p * v).collect();
    let numerator = rolling_sum(&weighted, period);
    let denominator = rolling_sum(volume, period);
    numerator
        .iter()
        .zip(&denominator)
        .map(|(&n, &d)| checked_ratio(n, d))
        .collect()
}

pub(crate) fn hma_values<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    let (half, root) = hma_lengths(period);
    let fast = rolling_weighted_mean(data, half);
    let slow = rolling_weighted_mean(data, period);
    let raw: Vec<T> = fast
        .iter()
        .zip(&slow)
        .map(|(&f, &s)| T::two() * f - s)
        .collect();
    rolling_weighted_mean(&raw, root)
}
