//! Rate of Change (ROC) and its bounded color/line codes.
//!
//! ```text
//! ROC[i] = 100 × (Close[i] / Close[i-length] - 1)
//! ```
//!
//! The color and line codes map ROC into small integers for display and for
//! the T3 trend filter. They scale ROC against a third of its minimum and
//! maximum:
//!
//! ```text
//! lo, hi    = min(ROC) / 3, max(ROC) / 3
//! norm10    = 20 × (ROC - lo) / (hi - lo) - 10
//! norm5     = 10 × (ROC - lo) / (hi - lo) - 5
//! color     = ROC > 0 ? min(ceil(norm10), 10) : max(floor(norm10), -10)
//! line      = min(ceil(|norm5|), 5)
//! ```
//!
//! [`RocNormalization::WholeSeries`] takes `min`/`max` over the entire
//! series, so every code depends on the future. This is the one non-causal
//! computation in the crate and it is kept as an explicit mode;
//! [`RocNormalization::Expanding`] uses the extremes observed so far instead
//! and is causal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::{validate_period_and_data, SeriesElement};
use crate::utils::checked_ratio;

/// Returns the lookback period for ROC, which equals the length.
#[inline]
#[must_use]
pub const fn roc_lookback(length: usize) -> usize {
    length
}

/// Computes the percentage rate of change over `length` bars.
///
/// A zero reference price yields NaN.
///
/// # Errors
///
/// `Error::InvalidPeriod` or `Error::EmptyInput`.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::roc::roc;
///
/// let result = roc(&[100.0_f64, 105.0, 110.0], 2).unwrap();
/// assert!(result[1].is_nan());
/// assert!((result[2] - 10.0).abs() < 1e-10);
/// ```
pub fn roc<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_period_and_data(data, length)?;
    Ok((0..data.len())
        .map(|i| {
            if i < length {
                T::nan()
            } else {
                (checked_ratio(data[i], data[i - length]) - T::one()) * T::hundred()
            }
        })
        .collect())
}

/// Which extremes scale the ROC color and line codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum RocNormalization {
    /// Minimum and maximum of the whole series (non-causal).
    #[default]
    WholeSeries,
    /// Minimum and maximum observed up to each bar (causal).
    Expanding,
}

impl RocNormalization {
    /// Snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WholeSeries => "whole_series",
            Self::Expanding => "expanding",
        }
    }

    /// Whether this mode reads future bars.
    #[must_use]
    pub const fn is_causal(self) -> bool {
        matches!(self, Self::Expanding)
    }
}

impl fmt::Display for RocNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RocNormalization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "whole_series" | "whole" | "series" => Ok(Self::WholeSeries),
            "expanding" | "running" => Ok(Self::Expanding),
            other => Err(Error::invalid_parameter(
                "normalization",
                format!("unknown ROC normalization '{other}' (expected whole_series or expanding)"),
            )),
        }
    }
}

impl TryFrom<String> for RocNormalization {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// ROC color (`-10..=10`) and line (`0..=5`) codes.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCodes<T> {
    /// Signed color code.
    pub color: Vec<T>,
    /// Line thickness code.
    pub line: Vec<T>,
}

/// Maps ROC values into color and line codes under `normalization`.
#[must_use]
pub fn roc_codes<T: SeriesElement>(roc: &[T], normalization: RocNormalization) -> RocCodes<T> {
    let (lows, highs) = match normalization {
        RocNormalization::WholeSeries => {
            let (lo, hi) = extremes(roc.iter().copied());
            (vec![lo; roc.len()], vec![hi; roc.len()])
        }
        RocNormalization::Expanding => {
            let mut lo = T::nan();
            let mut hi = T::nan();
            roc.iter()
                .map(|&r| {
                    // Float::min/max skip a NaN operand
                    lo = lo.min(r);
                    hi = hi.max(r);
                    (lo, hi)
                })
                .unzip()
        }
    };

    let three = T::two() + T::one();
    let five = T::two() + three;
    let ten = five + five;
    let twenty = ten + ten;

    let (color, line) = (0..roc.len())
        .map(|i| {
            let r = roc[i];
            let lo = lows[i] / three;
            let hi = highs[i] / three;
            let scaled = checked_ratio(r - lo, hi - lo);
            let norm10 = twenty * scaled - ten;
            let norm5 = ten * scaled - five;

            let color = if r > T::zero() {
                norm10.ceil().min(ten)
            } else {
                norm10.floor().max(-ten)
            };
            let line = norm5.abs().ceil().min(five);
            (nan_if_nan(color, scaled), nan_if_nan(line, scaled))
        })
        .unzip();

    RocCodes { color, line }
}

fn extremes<T: SeriesElement>(values: impl Iterator<Item = T>) -> (T, T) {
    values.fold((T::nan(), T::nan()), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// `Float::min`/`max` drop a NaN operand, so re-impose NaN where the input was undefined.
fn nan_if_nan<T: SeriesElement>(value: T, source: T) -> T {
    if source.is_nan() {
        T::nan()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix, EPSILON};

    #[test]
    fn test_roc_basic() {
        let data = vec![50.0_f64, 40.0, 60.0, 44.0];
        let result = roc(&data, 1).unwrap();
        assert!(result[0].is_nan());
        assert!(approx_eq(result[1], -20.0, EPSILON));
        assert!(approx_eq(result[2], 50.0, EPSILON));
        assert_eq!(count_nan_prefix(&result), roc_lookback(1));
    }

    #[test]
    fn test_roc_zero_reference_is_undefined() {
        let result = roc(&[0.0_f64, 1.0], 1).unwrap();
        assert!(result[1].is_nan());
    }

    #[test]
    fn test_codes_whole_series() {
        // lo = -3, hi = 3
        let roc = vec![f64::NAN, -9.0, 0.0, 1.5, 9.0];
        let codes = roc_codes(&roc, RocNormalization::WholeSeries);
        assert!(codes.color[0].is_nan() && codes.line[0].is_nan());
        // -9: norm10 = 20 * (-6 / 6) - 10 = -30 -> clipped -10
        assert_eq!(codes.color[1], -10.0);
        assert_eq!(codes.line[1], 5.0);
        // 0: norm10 = 0, not positive -> floor 0 ; norm5 = 0
        assert_eq!(codes.color[2], 0.0);
        assert_eq!(codes.line[2], 0.0);
        // 1.5: norm10 = 20 * 4.5 / 6 - 10 = 5 ; norm5 = 2.5 -> 3
        assert_eq!(codes.color[3], 5.0);
        assert_eq!(codes.line[3], 3.0);
        assert_eq!(codes.color[4], 10.0);
    }

    #[test]
    fn test_codes_expanding_is_causal() {
        let roc = vec![1.0_f64, -2.0, 4.0, 0.5, -8.0, 3.0];
        let full = roc_codes(&roc, RocNormalization::Expanding);
        let head = roc_codes(&roc[..4], RocNormalization::Expanding);
        for i in 0..4 {
            assert!(approx_eq(full.color[i], head.color[i], EPSILON));
            assert!(approx_eq(full.line[i], head.line[i], EPSILON));
        }
        // a single observation has no range
        assert!(full.color[0].is_nan());
    }

    #[test]
    fn test_codes_whole_series_sees_the_future() {
        let roc = vec![1.0_f64, -2.0, 4.0, 0.5, -8.0, 3.0];
        let full = roc_codes(&roc, RocNormalization::WholeSeries);
        let head = roc_codes(&roc[..4], RocNormalization::WholeSeries);
        assert!(!approx_eq(full.color[3], head.color[3], EPSILON));
    }

    #[test]
    fn test_normalization_from_str() {
        assert_eq!(
            "whole-series".parse::<RocNormalization>().unwrap(),
            RocNormalization::WholeSeries
        );
        assert_eq!(
            "Expanding".parse::<RocNormalization>().unwrap(),
            RocNormalization::Expanding
        );
        assert!("rolling".parse::<RocNormalization>().is_err());
        assert!(RocNormalization::Expanding.is_causal());
    }
}
