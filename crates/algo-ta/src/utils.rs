//! Utility functions for algo-ta.
//!
//! Tolerance-based float comparison and NaN bookkeeping helpers, used by the
//! test suites and exposed for callers aligning indicator output with their
//! own data.
//!
//! # Example
//!
//! ```
//! use algo_ta::utils::{approx_eq, count_nan_prefix, EPSILON};
//!
//! assert!(approx_eq(1.0 / 3.0, 0.333333333333333, EPSILON));
//! assert_eq!(count_nan_prefix(&[f64::NAN, 1.0, f64::NAN]), 1);
//! ```

use crate::traits::SeriesElement;

/// Standard tolerance for high-precision comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser tolerance for values built from many accumulated operations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Absolute-tolerance comparison where two NaNs compare equal.
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Relative-tolerance comparison where two NaNs compare equal.
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());

    if max_abs == T::zero() {
        return diff == T::zero();
    }

    diff / max_abs < rel_tolerance
}

/// Number of NaN values in `data`.
#[inline]
#[must_use]
pub fn count_nans<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

/// Number of leading NaN values in `data` (the observed warm-up length).
#[inline]
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

/// Encodes a boolean flag as `1` or `0` so it can travel in a numeric channel.
#[inline]
#[must_use]
pub fn flag<T: SeriesElement>(value: bool) -> T {
    if value {
        T::one()
    } else {
        T::zero()
    }
}

/// Sign with `sign(0) = 0` and NaN preserved; `Float::signum` maps zero to one.
#[inline]
#[must_use]
pub fn sign<T: SeriesElement>(value: T) -> T {
    if value.is_nan() {
        T::nan()
    } else if value > T::zero() {
        T::one()
    } else if value < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

/// `numerator / denominator`, NaN where the denominator is zero.
#[inline]
#[must_use]
pub fn checked_ratio<T: SeriesElement>(numerator: T, denominator: T) -> T {
    if denominator == T::zero() {
        T::nan()
    } else {
        numerator / denominator
    }
}
