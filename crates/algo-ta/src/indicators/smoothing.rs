//! Smoothing selection as a tagged variant.
//!
//! [`Smoothing`] names one moving-average formula. The choice is dispatched
//! once per call by [`smooth`], never per sample, and every composite
//! indicator that lets the caller pick a smoothing goes through here.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::smoothing::{smooth, Smoothing};
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let sma = smooth(Smoothing::Sma, &data, 3, None).unwrap();
//! assert!((sma[4] - 4.0).abs() < 1e-10);
//!
//! let kind: Smoothing = "smma".parse().unwrap();
//! assert_eq!(kind, Smoothing::Rma);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::ema::{dema_values, ema_values, rma_values, tema_values};
use crate::indicators::wma::{hma_lookback, hma_values, vwma_values};
use crate::kernels::{rolling_mean, rolling_weighted_mean};
use crate::series::{PriceSource, Series};
use crate::traits::{
    validate_aligned, validate_indicator_input, validate_period, validate_period_and_data,
    SeriesElement,
};

/// A moving-average formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Smoothing {
    /// Simple moving average.
    #[default]
    Sma,
    /// Exponential moving average, `α = 2 / (length + 1)`.
    Ema,
    /// Double exponential moving average.
    Dema,
    /// Triple exponential moving average.
    Tema,
    /// Linearly weighted moving average.
    Wma,
    /// Volume-weighted moving average; needs a volume channel.
    Vwma,
    /// Wilder's moving average (SMMA), `α = 1 / length`.
    Rma,
    /// Hull moving average.
    Hma,
}

impl Smoothing {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Sma,
        Self::Ema,
        Self::Dema,
        Self::Tema,
        Self::Wma,
        Self::Vwma,
        Self::Rma,
        Self::Hma,
    ];

    /// Uppercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Dema => "DEMA",
            Self::Tema => "TEMA",
            Self::Wma => "WMA",
            Self::Vwma => "VWMA",
            Self::Rma => "RMA",
            Self::Hma => "HMA",
        }
    }

    /// Whether the formula reads a volume channel.
    #[must_use]
    pub const fn needs_volume(self) -> bool {
        matches!(self, Self::Vwma)
    }

    /// Number of leading NaN outputs for a clean input of sufficient length.
    #[must_use]
    pub const fn lookback(self, length: usize) -> usize {
        match self {
            Self::Ema | Self::Dema | Self::Tema | Self::Rma => 0,
            Self::Sma | Self::Wma | Self::Vwma => length.saturating_sub(1),
            Self::Hma => hma_lookback(length),
        }
    }

    /// Applies the formula without checking `length` against the data, so a
    /// short history yields NaN instead of an error.
    pub(crate) fn apply<T: SeriesElement>(
        self,
        source: &[T],
        length: usize,
        volume: Option<&[T]>,
    ) -> Result<Vec<T>> {
        validate_period(length)?;
        match self {
            Self::Sma => Ok(rolling_mean(source, length)),
            Self::Ema => ema_values(source, length),
            Self::Dema => dema_values(source, length),
            Self::Tema => tema_values(source, length),
            Self::Wma => Ok(rolling_weighted_mean(source, length)),
            Self::Rma => rma_values(source, length),
            Self::Hma => Ok(hma_values(source, length)),
            Self::Vwma => {
                let volume = volume.ok_or(Error::MissingChannel { channel: "volume" })?;
                Ok(vwma_values(source, volume, length))
            }
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Smoothing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA" => Ok(Self::Sma),
            "EMA" => Ok(Self::Ema),
            "DEMA" => Ok(Self::Dema),
            "TEMA" => Ok(Self::Tema),
            "WMA" => Ok(Self::Wma),
            "VWMA" => Ok(Self::Vwma),
            "RMA" | "SMMA" | "WILDER" => Ok(Self::Rma),
            "HMA" | "HULL" => Ok(Self::Hma),
            other => Err(Error::invalid_parameter(
                "smoothing",
                format!("unknown smoothing '{other}' (expected SMA, EMA, DEMA, TEMA, WMA, VWMA, RMA/SMMA or HMA)"),
            )),
        }
    }
}

impl TryFrom<String> for Smoothing {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Smooths `source` with `kind` over `length` samples.
///
/// `volume` is required for [`Smoothing::Vwma`] and ignored otherwise.
///
/// # Errors
///
/// Returns an error if:
/// - The source is empty (`Error::EmptyInput`)
/// - The length is zero (`Error::InvalidPeriod`)
/// - The source is shorter than the length (`Error::InsufficientData`)
/// - VWMA is requested without volume (`Error::MissingChannel`)
/// - The volume length differs from the source (`Error::LengthMismatch`)
pub fn smooth<T: SeriesElement>(
    kind: Smoothing,
    source: &[T],
    length: usize,
    volume: Option<&[T]>,
) -> Result<Vec<T>> {
    validate_indicator_input(source, length, kind.as_str())?;
    if let Some(volume) = volume {
        validate_aligned(("source", source), &[("volume", volume)])?;
    }
    kind.apply(source, length, volume)
}

/// A moving average of a price column, as a standalone indicator.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::smoothing::{MovingAverage, Smoothing};
/// use algo_ta::series::{Bar, Series};
///
/// let series = Series::from_bars((0..10).map(|i| {
///     let p = i as f64;
///     Bar::new(i, p, p, p, p, 1.0)
/// }))
/// .unwrap();
///
/// let hull = MovingAverage::new().kind(Smoothing::Hma).length(4);
/// let values = hull.compute(&series).unwrap();
/// assert_eq!(values.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverage {
    /// Formula.
    pub kind: Smoothing,
    /// Window length.
    pub length: usize,
    /// Price column to smooth.
    pub source: PriceSource,
}

impl Default for MovingAverage {
    /// SMA of close over 20 bars.
    fn default() -> Self {
        Self {
            kind: Smoothing::Sma,
            length: 20,
            source: PriceSource::Close,
        }
    }
}

impl MovingAverage {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the formula.
    #[must_use]
    pub const fn kind(mut self, kind: Smoothing) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the window length.
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the price column.
    #[must_use]
    pub const fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` for a zero length.
    pub const fn validate(&self) -> Result<()> {
        validate_period(self.length)
    }

    /// Smooths the configured price column. A series shorter than the length
    /// yields all NaN.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` or `Error::EmptyInput`.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<Vec<T>> {
        let source: Cow<'_, [T]> = series.source(self.source);
        validate_period_and_data(&source, self.length)?;
        self.kind.apply(&source, self.length, Some(series.volume()))
    }
}
