//! Simple Moving Average (SMA) indicator.
//!
//! The arithmetic mean of the trailing `period` samples.
//!
//! # Formula
//!
//! ```text
//! SMA[0..period-2] = NaN (insufficient lookback)
//! SMA[i] = (x[i-period+1] + ... + x[i]) / period
//! ```
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::sma::sma;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let result = sma(&data, 3).unwrap();
//!
//! assert!(result[1].is_nan());
//! assert!((result[2] - 2.0).abs() < 1e-10);
//! assert!((result[4] - 4.0).abs() < 1e-10);
//! ```

use crate::error::Result;
use crate::kernels::rolling_mean;
use crate::traits::{validate_indicator_input, SeriesElement};

/// Returns the lookback period for SMA: `period - 1`.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::sma::sma_lookback;
///
/// assert_eq!(sma_lookback(20), 19);
/// ```
#[inline]
#[must_use]
pub const fn sma_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Returns the minimum input length required for SMA, which equals the period.
#[inline]
#[must_use]
pub const fn sma_min_len(period: usize) -> usize {
    period
}

/// Computes the Simple Moving Average of a data series.
///
/// A window containing a NaN sample yields NaN.
///
/// # Errors
///
/// Returns an error if:
/// - The input data is empty (`Error::EmptyInput`)
/// - The period is zero (`Error::InvalidPeriod`)
/// - The input data is shorter than the period (`Error::InsufficientData`)
#[must_use = "this returns a Result with the SMA values, which should be used"]
pub fn sma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "sma")?;
    Ok(rolling_mean(data, period))
}
