//! Exponential smoothing family: EMA, RMA (Wilder/SMMA), DEMA and TEMA.
//!
//! All four are recurrences evaluated in strict time order through
//! [`crate::kernels::exponential`].
//!
//! # Smoothing factors
//!
//! - **EMA**: `α = 2 / (period + 1)`
//! - **RMA**: `α = 1 / period` (Wilder's smoothing, also called SMMA)
//!
//! # Seeding
//!
//! The recursion is seeded by the first defined sample, so `EMA[0] = x[0]`
//! and every value is defined from index 0 onward. Early values are
//! statistically unstable until roughly `period` samples have been seen.
//! Leading NaN inputs stay NaN; a NaN after seeding repeats the previous value.
//!
//! # Formula
//!
//! ```text
//! EMA[0] = x[0]
//! EMA[i] = α × x[i] + (1 - α) × EMA[i-1]
//! DEMA   = 2 × EMA(x) - EMA(EMA(x))
//! TEMA   = 3 × (EMA(x) - EMA(EMA(x))) + EMA(EMA(EMA(x)))
//! ```
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::ema::{ema, rma};
//!
//! let data = vec![10.0_f64, 11.0, 12.0];
//!
//! let result = ema(&data, 3).unwrap();
//! assert_eq!(result[0], 10.0);
//! assert!((result[1] - 10.5).abs() < 1e-10);
//!
//! let wilder = rma(&data, 2).unwrap();
//! assert!((wilder[2] - 11.25).abs() < 1e-10);
//! ```

use crate::error::{Error, Result};
use crate::kernels::exponential;
use crate::traits::{validate_indicator_input, validate_period, SeriesElement, ValidatedInput};

/// Returns the lookback for every exponential form: 0, since the recursion
/// is defined from the first sample.
#[inline]
#[must_use]
pub const fn ema_lookback(_period: usize) -> usize {
    0
}

/// Returns the minimum input length accepted by [`ema`], which equals the period.
#[inline]
#[must_use]
pub const fn ema_min_len(period: usize) -> usize {
    period
}

/// Standard EMA smoothing factor `2 / (period + 1)`.
///
/// # Errors
///
/// `Error::InvalidPeriod` for a zero period.
pub fn ema_alpha<T: SeriesElement>(period: usize) -> Result<T> {
    validate_period(period)?;
    Ok(T::two() / (T::from_usize(period)? + T::one()))
}

/// Wilder smoothing factor `1 / period`.
///
/// # Errors
///
/// `Error::InvalidPeriod` for a zero period.
pub fn rma_alpha<T: SeriesElement>(period: usize) -> Result<T> {
    validate_period(period)?;
    Ok(T::one() / T::from_usize(period)?)
}

/// Computes the Exponential Moving Average with `α = 2 / (period + 1)`.
///
/// # Errors
///
/// Returns an error if:
/// - The input data is empty (`Error::EmptyInput`)
/// - The period is zero (`Error::InvalidPeriod`)
/// - The input data is shorter than the period (`Error::InsufficientData`)
#[must_use = "this returns a Result with the EMA values, which should be used"]
pub fn ema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "ema")?;
    ema_values(data, period)
}

/// Computes Wilder's moving average (RMA/SMMA) with `α = 1 / period`.
///
/// # Errors
///
/// Same as [`ema`].
#[must_use = "this returns a Result with the RMA values, which should be used"]
pub fn rma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "rma")?;
    rma_values(data, period)
}

/// Computes the Double Exponential Moving Average.
///
/// # Errors
///
/// Same as [`ema`].
#[must_use = "this returns a Result with the DEMA values, which should be used"]
pub fn dema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "dema")?;
    dema_values(data, period)
}

/// Computes the Triple Exponential Moving Average.
///
/// # Errors
///
/// Same as [`ema`].
#[must_use = "this returns a Result with the TEMA values, which should be used"]
pub fn tema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_indicator_input(data, period, "tema")?;
    tema_values(data, period)
}

/// Exponential smoothing with an explicit factor.
///
/// # Errors
///
/// `Error::EmptyInput` for empty data and `Error::InvalidParameter` unless
/// `0 < alpha <= 1`.
pub fn ema_with_alpha<T: SeriesElement>(data: &[T], alpha: T) -> Result<Vec<T>> {
    data.validate_not_empty()?;
    if !(alpha > T::zero() && alpha <= T::one()) {
        return Err(Error::invalid_parameter(
            "alpha",
            format!("must be in (0, 1], got {}", alpha.to_f64_lossy()),
        ));
    }
    Ok(exponential(data, alpha))
}

pub(crate) fn ema_values<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    Ok(exponential(data, ema_alpha(period)?))
}

pub(crate) fn rma_values<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    Ok(exponential(data, rma_alpha(period)?))
}

pub(crate) fn dema_values<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let alpha = ema_alpha(period)?;
    let e1 = exponential(data, alpha);
    let e2 = exponential(&e1, alpha);
    Ok(e1
        .iter()
        .zip(&e2)
        .map(|(&a, &b)| T::two() * a - b)
        .collect())
}

pub(crate) fn tema_values<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let alpha = ema_alpha(period)?;
    let three = T::two() + T::one();
    let e1 = exponential(data, alpha);
    let e2 = exponential(&e1, alpha);
    let e3 = exponential(&e2, alpha);
    Ok((0..data.len())
        .map(|i| three * (e1[i] - e2[i]) + e3[i])
        .collect())
}
