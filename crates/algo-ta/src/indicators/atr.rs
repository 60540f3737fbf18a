//! Average True Range (ATR) indicator.
//!
//! The Average True Range measures volatility by smoothing the true range of
//! each bar, the widest of its own range and the gaps from the prior close.
//!
//! # Formula
//!
//! ```text
//! TR[0] = High[0] - Low[0]                         (no prior close)
//! TR[i] = max(High[i] - Low[i],
//!             |High[i] - Close[i-1]|,
//!             |Low[i] - Close[i-1]|)
//! ATR   = smooth(kind, TR, length)                 (default RMA, 14)
//! ```
//!
//! # Units
//!
//! [`AtrUnit`] converts the raw ATR into the unit a trader reads it in:
//!
//! | Unit         | Value                                          |
//! |--------------|------------------------------------------------|
//! | `Regular`    | `ATR`                                          |
//! | `Percentage` | `100 × ATR / Close` (NaN where Close is zero)  |
//! | `Ticks`      | `ATR / tick_size`                              |
//! | `Currency`   | `ATR × point_value × position_size`, to cents  |
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::atr::{Atr, AtrUnit};
//! use algo_ta::indicators::smoothing::Smoothing;
//!
//! let high = vec![110.0_f64, 112.0, 115.0, 117.0, 120.0];
//! let low = vec![100.0_f64, 105.0, 108.0, 111.0, 113.0];
//! let close = vec![105.0_f64, 110.0, 112.0, 115.0, 118.0];
//!
//! let atr = Atr::new()
//!     .length(3)
//!     .smoothing(Smoothing::Sma)
//!     .compute_hlc(&high, &low, &close)
//!     .unwrap();
//! assert!(atr[1].is_nan());
//! // true ranges 10, 7, 7
//! assert!((atr[2] - 8.0).abs() < 1e-10);
//!
//! let ticks = Atr::new()
//!     .unit(AtrUnit::Ticks { tick_size: 0.5 })
//!     .compute_hlc(&high, &low, &close)
//!     .unwrap();
//! assert_eq!(ticks[0], 20.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::smoothing::Smoothing;
use crate::output::IndicatorOutput;
use crate::series::Series;
use crate::traits::{validate_aligned, validate_period, validate_positive, SeriesElement};
use crate::utils::checked_ratio;

/// Returns the lookback for ATR under `smoothing`: the true range is
/// defined from bar 0, so this is the smoothing's own lookback.
#[inline]
#[must_use]
pub const fn atr_lookback(length: usize, smoothing: Smoothing) -> usize {
    smoothing.lookback(length)
}

/// Computes the True Range of each bar.
///
/// # Errors
///
/// `Error::EmptyInput` or `Error::LengthMismatch`.
pub fn true_range<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    validate_aligned(("high", high), &[("low", low), ("close", close)])?;
    Ok(true_range_values(high, low, close))
}

pub(crate) fn true_range_values<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Vec<T> {
    (0..high.len())
        .map(|i| {
            let range = high[i] - low[i];
            if i == 0 {
                return range;
            }
            let prev_close = close[i - 1];
            range
                .max((high[i] - prev_close).abs())
                .max((low[i] - prev_close).abs())
        })
        .collect()
}

/// Computes ATR with Wilder's smoothing in price units.
///
/// # Errors
///
/// `Error::InvalidPeriod`, `Error::EmptyInput` or `Error::LengthMismatch`.
pub fn atr<T: SeriesElement>(high: &[T], low: &[T], close: &[T], length: usize) -> Result<Vec<T>> {
    Atr::new().length(length).compute_hlc(high, low, close)
}

/// The unit an ATR value is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AtrUnit {
    /// Price units.
    #[default]
    Regular,
    /// Percent of the closing price.
    Percentage,
    /// Minimum price increments.
    Ticks {
        /// Size of one tick in price units.
        tick_size: f64,
    },
    /// Money at risk for a position.
    Currency {
        /// Currency value of one point of price movement.
        point_value: f64,
        /// Number of contracts or shares.
        #[serde(default = "default_position_size")]
        position_size: f64,
    },
}

const fn default_position_size() -> f64 {
    1.0
}

impl AtrUnit {
    /// Tick size used when `"ticks"` is parsed without one.
    pub const DEFAULT_TICK_SIZE: f64 = 0.01;

    /// Lowercase name of the unit kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Percentage => "percentage",
            Self::Ticks { .. } => "ticks",
            Self::Currency { .. } => "currency",
        }
    }

    /// Rejects a non-positive tick size, point value or position size.
    ///
    /// # Errors
    ///
    /// `Error::InvalidParameter` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Regular | Self::Percentage => Ok(()),
            Self::Ticks { tick_size } => validate_positive("tick_size", tick_size),
            Self::Currency {
                point_value,
                position_size,
            } => {
                validate_positive("point_value", point_value)?;
                validate_positive("position_size", position_size)
            }
        }
    }

    /// Converts raw ATR values into this unit.
    ///
    /// # Errors
    ///
    /// Same as [`AtrUnit::validate`], plus `Error::NumericConversion`.
    pub fn apply<T: SeriesElement>(&self, atr: Vec<T>, close: &[T]) -> Result<Vec<T>> {
        self.validate()?;
        Ok(match *self {
            Self::Regular => atr,
            Self::Percentage => atr
                .iter()
                .zip(close)
                .map(|(&a, &c)| checked_ratio(a, c) * T::hundred())
                .collect(),
            Self::Ticks { tick_size } => {
                let tick = T::from_f64(tick_size)?;
                atr.into_iter().map(|a| a / tick).collect()
            }
            Self::Currency {
                point_value,
                position_size,
            } => {
                let scale = T::from_f64(point_value * position_size)?;
                atr.into_iter()
                    .map(|a| (a * scale * T::hundred()).round() / T::hundred())
                    .collect()
            }
        })
    }
}

impl fmt::Display for AtrUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AtrUnit {
    type Err = Error;

    /// Parses a unit kind; `ticks` and `currency` get default parameters.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" | "price" => Ok(Self::Regular),
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "ticks" | "tick" => Ok(Self::Ticks {
                tick_size: Self::DEFAULT_TICK_SIZE,
            }),
            "currency" | "money" => Ok(Self::Currency {
                point_value: 1.0,
                position_size: default_position_size(),
            }),
            other => Err(Error::invalid_parameter(
                "unit",
                format!("unknown ATR unit '{other}' (expected regular, percentage, ticks or currency)"),
            )),
        }
    }
}

/// ATR configuration with fluent builder API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atr {
    /// Smoothing window.
    pub length: usize,
    /// Smoothing applied to the true range.
    pub smoothing: Smoothing,
    /// Output unit.
    pub unit: AtrUnit,
}

impl Default for Atr {
    /// RMA over 14 bars, in price units.
    fn default() -> Self {
        Self {
            length: 14,
            smoothing: Smoothing::Rma,
            unit: AtrUnit::Regular,
        }
    }
}

impl Atr {
    /// Creates an ATR configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the smoothing window.
    ///
    /// Default: 14
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the smoothing applied to the true range.
    ///
    /// Default: RMA
    #[must_use]
    pub const fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Sets the output unit.
    ///
    /// Default: `Regular`
    #[must_use]
    pub const fn unit(mut self, unit: AtrUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` for a zero length, `Error::InvalidParameter`
    /// for a bad unit, `Error::MissingChannel` for VWMA smoothing.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.length)?;
        if self.smoothing.needs_volume() {
            return Err(Error::MissingChannel { channel: "volume" });
        }
        self.unit.validate()
    }

    /// Computes ATR from high, low and close columns.
    ///
    /// # Errors
    ///
    /// Same as [`Atr::validate`], plus `Error::EmptyInput` and
    /// `Error::LengthMismatch`.
    pub fn compute_hlc<T: SeriesElement>(&self, high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
        self.validate()?;
        let tr = true_range(high, low, close)?;
        let raw = self.smoothing.apply(&tr, self.length, None)?;
        self.unit.apply(raw, close)
    }

    /// Computes ATR over a series.
    ///
    /// # Errors
    ///
    /// Same as [`Atr::compute_hlc`].
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<Vec<T>> {
        self.compute_hlc(series.high(), series.low(), series.close())
    }

    /// Computes ATR as a single `ATR` channel.
    ///
    /// # Errors
    ///
    /// Same as [`Atr::compute_hlc`].
    pub fn compute_output<T: SeriesElement>(&self, series: &Series<T>) -> Result<IndicatorOutput<T>> {
        Ok(IndicatorOutput::new("atr", series.len()).with_channel("ATR", self.compute(series)?))
    }

    /// Returns the lookback for this configuration.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        atr_lookback(self.length, self.smoothing)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_true_range_basic() {
        let high = vec![10.0_f64, 12.0, 11.0];
        let low = vec![8.0, 9.0, 10.5];
        let close = vec![9.0, 11.0, 10.8];
        let tr = true_range(&high, &low, &close).unwrap();
        assert_eq!(tr, vec![2.0, 3.0, 0.5]);
    }

    #[test]
    fn test_true_range_with_gaps() {
        // gap up: high - prev close dominates
        let tr = true_range(&[10.0_f64, 15.0], &[9.0, 14.0], &[9.5, 14.5]).unwrap();
        assert!(approx_eq(tr[1], 5.5, EPSILON));
        // gap down: prev close - low dominates
        let tr = true_range(&[10.0_f64, 6.0], &[9.0, 5.0], &[9.5, 5.5]).unwrap();
        assert!(approx_eq(tr[1], 4.5, EPSILON));
    }

    #[test]
    fn test_true_range_mismatched_lengths() {
        assert!(matches!(
            true_range(&[1.0_f64, 2.0], &[1.0], &[1.0, 2.0]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_atr_rma_recursion() {
        let high = vec![12.0_f64, 12.0, 12.0];
        let low = vec![10.0, 8.0, 11.0];
        let close = vec![11.0, 11.0, 11.5];
        // TR = 2, 4, 1 ; alpha = 1/2
        let result = atr(&high, &low, &close, 2).unwrap();
        assert_eq!(result, vec![2.0, 3.0, 2.0]);
    }

    #[test]
    fn test_flat_market_is_exactly_zero() {
        let flat = vec![100.0_f64; 20];
        for smoothing in [Smoothing::Rma, Smoothing::Ema, Smoothing::Sma, Smoothing::Wma] {
            let result = Atr::new()
                .smoothing(smoothing)
                .compute_hlc(&flat, &flat, &flat)
                .unwrap();
            assert!(result
                .iter()
                .skip(smoothing.lookback(14))
                .all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_percentage_unit_zero_close_is_undefined() {
        let result = Atr::new()
            .length(1)
            .unit(AtrUnit::Percentage)
            .compute_hlc(&[2.0_f64, 2.0], &[1.0, 1.0], &[1.0, 0.0])
            .unwrap();
        assert!(approx_eq(result[0], 100.0, EPSILON));
        assert!(result[1].is_nan());
    }

    #[test]
    fn test_currency_unit_rounds_to_cents() {
        let unit = AtrUnit::Currency {
            point_value: 50.0,
            position_size: 2.0,
        };
        assert!(approx_eq(unit.apply(vec![0.1_f64], &[1.0]).unwrap()[0], 10.0, 1e-9));

        // 12.5 cents rounds half away from zero in both directions
        let unit = AtrUnit::Currency {
            point_value: 1.0,
            position_size: 1.0,
        };
        let out = unit.apply(vec![0.125_f64, -0.125], &[1.0, 1.0]).unwrap();
        assert!(approx_eq(out[0], 0.13, 1e-12));
        assert!(approx_eq(out[1], -0.13, 1e-12));
    }

    #[test]
    fn test_invalid_unit_parameters() {
        let zero_tick = Atr::new().unit(AtrUnit::Ticks { tick_size: 0.0 });
        assert!(matches!(
            zero_tick.compute_hlc(&[1.0_f64], &[1.0], &[1.0]),
            Err(Error::InvalidParameter { name: "tick_size", .. })
        ));

        let negative = AtrUnit::Currency {
            point_value: 1.0,
            position_size: -1.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_unit_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            atr: Atr,
        }
        let parsed: Wrapper =
            toml::from_str("[atr]\nlength = 10\nunit = { kind = \"ticks\", tick_size = 0.25 }")
                .unwrap();
        assert_eq!(parsed.atr.length, 10);
        assert_eq!(parsed.atr.smoothing, Smoothing::Rma);
        assert_eq!(parsed.atr.unit, AtrUnit::Ticks { tick_size: 0.25 });
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("Percentage".parse::<AtrUnit>().unwrap(), AtrUnit::Percentage);
        assert_eq!(
            "ticks".parse::<AtrUnit>().unwrap(),
            AtrUnit::Ticks { tick_size: 0.01 }
        );
        assert!("pips".parse::<AtrUnit>().is_err());
    }
}
