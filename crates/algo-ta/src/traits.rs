//! Core traits for algo-ta numeric operations.
//!
//! The primary trait is [`SeriesElement`], which abstracts over `f32` and `f64`
//! so every indicator can run on either precision. The module also provides
//! validation helpers through [`ValidatedInput`] and standalone functions used
//! at the top of every public operation.
//!
//! # Example
//!
//! ```
//! use algo_ta::traits::{SeriesElement, validate_indicator_input};
//!
//! fn mean_of_first<T: SeriesElement>(data: &[T], period: usize) -> algo_ta::Result<T> {
//!     validate_indicator_input(data, period, "mean_of_first")?;
//!
//!     let period_t = T::from_usize(period)?;
//!     let sum: T = data.iter().take(period).fold(T::zero(), |acc, &x| acc + x);
//!     Ok(sum / period_t)
//! }
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! assert!((mean_of_first(&data, 3).unwrap() - 2.0).abs() < 1e-10);
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A numeric type usable as an element of a price or indicator series.
///
/// Blanket-implemented for every type satisfying the bounds, which in practice
/// means `f32` and `f64`. Undefined values are represented by NaN.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Converts a `usize` into this element type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericConversion`] if the value is not representable.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Converts an `i32` into this element type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericConversion`] if the value is not representable.
    #[inline]
    fn from_i32(value: i32) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "i32 to series element",
        })
    }

    /// Converts an `f64` configuration value into this element type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NumericConversion`] if the value is not representable.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Returns the constant 2.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns the constant 100.
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        // 100 is always representable in Float types
        <Self as NumCast>::from(100).unwrap_or_else(Self::nan)
    }

    /// Converts this element into `f64` for summary statistics, NaN if the
    /// value has no `f64` representation.
    #[inline]
    #[must_use]
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Input validation for slices of series elements.
pub trait ValidatedInput {
    /// Element type of the series.
    type Element: SeriesElement;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails with [`Error::InsufficientData`] when shorter than `min_length`.
    ///
    /// # Errors
    ///
    /// See above.
    #[inline]
    fn validate_min_length(&self, min_length: usize, indicator: &'static str) -> Result<()> {
        if self.len() < min_length {
            Err(Error::InsufficientData {
                required: min_length,
                actual: self.len(),
                indicator,
            })
        } else {
            Ok(())
        }
    }

    /// Fails with [`Error::EmptyInput`] when empty.
    ///
    /// # Errors
    ///
    /// See above.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }
}

impl<T: SeriesElement> ValidatedInput for [T] {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T: SeriesElement> ValidatedInput for Vec<T> {
    type Element = T;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Rejects a zero period.
///
/// # Errors
///
/// Returns [`Error::InvalidPeriod`] when `period == 0`.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}

/// Full validation for the smoothing primitives: positive period, non-empty
/// data, and at least `period` samples.
///
/// # Errors
///
/// [`Error::InvalidPeriod`], [`Error::EmptyInput`] or
/// [`Error::InsufficientData`].
#[inline]
pub fn validate_indicator_input<T: SeriesElement>(
    data: &[T],
    period: usize,
    indicator: &'static str,
) -> Result<()> {
    validate_period(period)?;
    data.validate_not_empty()?;
    data.validate_min_length(period, indicator)?;
    Ok(())
}

/// Cold-start validation for composite indicators: positive period and
/// non-empty data. A history shorter than the lookback is allowed.
///
/// # Errors
///
/// [`Error::InvalidPeriod`] or [`Error::EmptyInput`].
#[inline]
pub fn validate_period_and_data<T: SeriesElement>(data: &[T], period: usize) -> Result<()> {
    validate_period(period)?;
    data.validate_not_empty()
}

/// Checks that every channel has the same length as `first`.
///
/// # Errors
///
/// [`Error::EmptyInput`] when `first` is empty, [`Error::LengthMismatch`]
/// naming the first channel that disagrees.
pub fn validate_aligned<T: SeriesElement>(
    first: (&'static str, &[T]),
    others: &[(&'static str, &[T])],
) -> Result<()> {
    let (first_name, first_data) = first;
    first_data.validate_not_empty()?;

    for (name, data) in others {
        if data.len() != first_data.len() {
            return Err(Error::LengthMismatch {
                description: format!(
                    "{first_name} has {} elements, {name} has {}",
                    first_data.len(),
                    data.len()
                ),
            });
        }
    }
    Ok(())
}

/// Rejects non-finite or non-positive configuration values.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] naming `name`.
pub fn validate_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_element_from_usize() {
        let val: f64 = SeriesElement::from_usize(42).unwrap();
        assert!((val - 42.0).abs() < 1e-10);

        let val_f32: f32 = SeriesElement::from_usize(100).unwrap();
        assert!((val_f32 - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_series_element_from_i32() {
        let val: f64 = SeriesElement::from_i32(-5).unwrap();
        assert!((val - (-5.0)).abs() < 1e-10);
    }

    #[test]
    fn test_series_element_constants() {
        let two: f64 = SeriesElement::two();
        let hundred: f32 = SeriesElement::hundred();
        assert!((two - 2.0).abs() < 1e-10);
        assert!((hundred - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_to_f64_lossy() {
        assert!((1.5_f32.to_f64_lossy() - 1.5).abs() < 1e-10);
        assert!(f64::NAN.to_f64_lossy().is_nan());
    }

    #[test]
    fn test_validate_min_length() {
        let data: Vec<f64> = vec![1.0, 2.0, 3.0];
        assert!(data.validate_min_length(3, "test").is_ok());
        match data.validate_min_length(5, "test") {
            Err(Error::InsufficientData {
                required, actual, ..
            }) => {
                assert_eq!(required, 5);
                assert_eq!(actual, 3);
            }
            other => panic!("Expected InsufficientData error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_period_zero() {
        assert!(validate_period(1).is_ok());
        assert!(matches!(
            validate_period(0),
            Err(Error::InvalidPeriod { period: 0, .. })
        ));
    }

    #[test]
    fn test_validate_indicator_input() {
        let data = vec![1.0_f64, 2.0, 3.0];
        assert!(validate_indicator_input(&data, 3, "sma").is_ok());
        assert!(validate_indicator_input(&data, 4, "sma").is_err());

        let empty: Vec<f64> = vec![];
        assert_eq!(
            validate_indicator_input(&empty, 3, "sma"),
            Err(Error::EmptyInput)
        );
    }

    #[test]
    fn test_validate_period_and_data_allows_short_history() {
        let data = vec![1.0_f64, 2.0];
        assert!(validate_period_and_data(&data, 32).is_ok());
        assert!(validate_period_and_data(&data, 0).is_err());
    }

    #[test]
    fn test_validate_aligned() {
        let a: &[f64] = &[1.0, 2.0];
        let b: &[f64] = &[1.0, 2.0];
        let c: &[f64] = &[1.0];
        assert!(validate_aligned(("high", a), &[("low", b)]).is_ok());

        let err = validate_aligned(("high", a), &[("low", b), ("close", c)]).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                description: "high has 2 elements, close has 1".to_string()
            }
        );
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("tick_size", 0.01).is_ok());
        assert!(validate_positive("tick_size", 0.0).is_err());
        assert!(validate_positive("tick_size", f64::NAN).is_err());
        assert!(validate_positive("tick_size", f64::INFINITY).is_err());
    }
}
