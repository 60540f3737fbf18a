//! Bar and series data model.
//!
//! A [`Series`] is an immutable, columnar OHLCV history with strictly
//! increasing timestamps. It is built once, either bar by bar through a
//! [`SeriesBuilder`] or from whole columns, and then only read by the
//! indicators.
//!
//! # Example
//!
//! ```
//! use algo_ta::series::{Bar, PriceSource, SeriesBuilder};
//!
//! let mut builder = SeriesBuilder::new();
//! builder.push(Bar::new(0, 10.0_f64, 12.0, 9.0, 11.0, 1_000.0)).unwrap();
//! builder.push(Bar::new(60, 11.0, 13.0, 10.0, 12.0, 1_500.0)).unwrap();
//! let series = builder.build();
//!
//! assert_eq!(series.len(), 2);
//! assert_eq!(series.source(PriceSource::HL2)[0], 10.5);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::{validate_aligned, SeriesElement};

/// Bar timestamp, in seconds since the Unix epoch.
pub type Timestamp = i64;

/// One OHLCV sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar<T> {
    /// Start of the bar, seconds since the Unix epoch.
    pub timestamp: Timestamp,
    /// Opening price.
    pub open: T,
    /// Highest price.
    pub high: T,
    /// Lowest price.
    pub low: T,
    /// Closing price.
    pub close: T,
    /// Traded volume.
    pub volume: T,
}

impl<T: SeriesElement> Bar<T> {
    /// Creates a bar from its fields.
    #[must_use]
    pub const fn new(timestamp: Timestamp, open: T, high: T, low: T, close: T, volume: T) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Which price column an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    #[default]
    Close,
    /// `(high + low) / 2`.
    HL2,
    /// `(high + low + close) / 3`, the typical price.
    HLC3,
    /// `(open + high + low + close) / 4`.
    OHLC4,
}

impl PriceSource {
    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::HL2 => "hl2",
            Self::HLC3 => "hlc3",
            Self::OHLC4 => "ohlc4",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "o" => Ok(Self::Open),
            "high" | "h" => Ok(Self::High),
            "low" | "l" => Ok(Self::Low),
            "close" | "c" => Ok(Self::Close),
            "hl2" => Ok(Self::HL2),
            "hlc3" | "typical" => Ok(Self::HLC3),
            "ohlc4" => Ok(Self::OHLC4),
            other => Err(Error::invalid_parameter(
                "source",
                format!("unknown price source '{other}' (expected open, high, low, close, hl2, hlc3 or ohlc4)"),
            )),
        }
    }
}

impl TryFrom<String> for PriceSource {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Immutable columnar OHLCV history.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    timestamps: Vec<Timestamp>,
    open: Vec<T>,
    high: Vec<T>,
    low: Vec<T>,
    close: Vec<T>,
    volume: Vec<T>,
}

impl<T: SeriesElement> Series<T> {
    /// Builds a series from whole columns.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if the columns differ in length and
    /// [`Error::NonMonotonicTimestamp`] if the timestamps are not strictly
    /// increasing.
    pub fn from_columns(
        timestamps: Vec<Timestamp>,
        open: Vec<T>,
        high: Vec<T>,
        low: Vec<T>,
        close: Vec<T>,
        volume: Vec<T>,
    ) -> Result<Self> {
        if timestamps.len() != close.len() {
            return Err(Error::LengthMismatch {
                description: format!(
                    "timestamps has {} elements, close has {}",
                    timestamps.len(),
                    close.len()
                ),
            });
        }
        if !close.is_empty() {
            validate_aligned(
                ("close", close.as_slice()),
                &[
                    ("open", open.as_slice()),
                    ("high", high.as_slice()),
                    ("low", low.as_slice()),
                    ("volume", volume.as_slice()),
                ],
            )?;
        }
        check_monotonic(&timestamps)?;

        Ok(Self {
            timestamps,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Builds a series from bars in arrival order.
    ///
    /// # Errors
    ///
    /// [`Error::NonMonotonicTimestamp`] if the timestamps are not strictly
    /// increasing.
    pub fn from_bars<I>(bars: I) -> Result<Self>
    where
        I: IntoIterator<Item = Bar<T>>,
    {
        let mut builder = SeriesBuilder::new();
        for bar in bars {
            builder.push(bar)?;
        }
        Ok(builder.build())
    }

    /// Number of bars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Returns `true` if the series has no bars.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Bar timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Opening prices.
    #[must_use]
    pub fn open(&self) -> &[T] {
        &self.open
    }

    /// Highest prices.
    #[must_use]
    pub fn high(&self) -> &[T] {
        &self.high
    }

    /// Lowest prices.
    #[must_use]
    pub fn low(&self) -> &[T] {
        &self.low
    }

    /// Closing prices.
    #[must_use]
    pub fn close(&self) -> &[T] {
        &self.close
    }

    /// Volumes.
    #[must_use]
    pub fn volume(&self) -> &[T] {
        &self.volume
    }

    /// The price column selected by `source`, derived on demand for the
    /// composite prices.
    #[must_use]
    pub fn source(&self, source: PriceSource) -> Cow<'_, [T]> {
        match source {
            PriceSource::Open => Cow::Borrowed(self.open.as_slice()),
            PriceSource::High => Cow::Borrowed(self.high.as_slice()),
            PriceSource::Low => Cow::Borrowed(self.low.as_slice()),
            PriceSource::Close => Cow::Borrowed(self.close.as_slice()),
            PriceSource::HL2 => Cow::Owned(
                self.high
                    .iter()
                    .zip(&self.low)
                    .map(|(&h, &l)| (h + l) / T::two())
                    .collect(),
            ),
            PriceSource::HLC3 => Cow::Owned(typical_price(&self.high, &self.low, &self.close)),
            PriceSource::OHLC4 => {
                let four = T::two() + T::two();
                Cow::Owned(
                    (0..self.len())
                        .map(|i| (self.open[i] + self.high[i] + self.low[i] + self.close[i]) / four)
                        .collect(),
                )
            }
        }
    }

    /// The bar at `index`, if any.
    #[must_use]
    pub fn bar(&self, index: usize) -> Option<Bar<T>> {
        (index < self.len()).then(|| Bar {
            timestamp: self.timestamps[index],
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume[index],
        })
    }

    /// Iterates the bars in order.
    pub fn bars(&self) -> impl Iterator<Item = Bar<T>> + '_ {
        (0..self.len()).filter_map(move |i| self.bar(i))
    }

    /// The first `len` bars as a new series (the whole series if shorter).
    #[must_use]
    pub fn head(&self, len: usize) -> Self {
        let len = len.min(self.len());
        Self {
            timestamps: self.timestamps[..len].to_vec(),
            open: self.open[..len].to_vec(),
            high: self.high[..len].to_vec(),
            low: self.low[..len].to_vec(),
            close: self.close[..len].to_vec(),
            volume: self.volume[..len].to_vec(),
        }
    }
}

/// `(high + low + close) / 3` per bar.
pub(crate) fn typical_price<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Vec<T> {
    let three = T::two() + T::one();
    high.iter()
        .zip(low)
        .zip(close)
        .map(|((&h, &l), &c)| (h + l + c) / three)
        .collect()
}

fn check_monotonic(timestamps: &[Timestamp]) -> Result<()> {
    for (index, pair) in timestamps.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(Error::NonMonotonicTimestamp {
                index: index + 1,
                timestamp: pair[1],
                previous: pair[0],
            });
        }
    }
    Ok(())
}

/// Append-only builder for a [`Series`].
#[derive(Debug, Clone)]
pub struct SeriesBuilder<T> {
    series: Series<T>,
}

impl<T: SeriesElement> Default for SeriesBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> SeriesBuilder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            series: Series {
                timestamps: Vec::new(),
                open: Vec::new(),
                high: Vec::new(),
                low: Vec::new(),
                close: Vec::new(),
                volume: Vec::new(),
            },
        }
    }

    /// Creates an empty builder with room for `capacity` bars.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            series: Series {
                timestamps: Vec::with_capacity(capacity),
                open: Vec::with_capacity(capacity),
                high: Vec::with_capacity(capacity),
                low: Vec::with_capacity(capacity),
                close: Vec::with_capacity(capacity),
                volume: Vec::with_capacity(capacity),
            },
        }
    }

    /// Appends a bar.
    ///
    /// # Errors
    ///
    /// [`Error::NonMonotonicTimestamp`] if the bar is not strictly after the
    /// previous one. The builder is left unchanged.
    pub fn push(&mut self, bar: Bar<T>) -> Result<&mut Self> {
        if let Some(&previous) = self.series.timestamps.last() {
            if bar.timestamp <= previous {
                return Err(Error::NonMonotonicTimestamp {
                    index: self.series.len(),
                    timestamp: bar.timestamp,
                    previous,
                });
            }
        }

        let s = &mut self.series;
        s.timestamps.push(bar.timestamp);
        s.open.push(bar.open);
        s.high.push(bar.high);
        s.low.push(bar.low);
        s.close.push(bar.close);
        s.volume.push(bar.volume);
        Ok(self)
    }

    /// Number of bars pushed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns `true` if no bar has been pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Finishes the series.
    #[must_use]
    pub fn build(self) -> Series<T> {
        self.series
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    fn sample() -> Series<f64> {
        Series::from_bars(vec![
            Bar::new(0, 10.0, 14.0, 8.0, 12.0, 100.0),
            Bar::new(10, 12.0, 16.0, 10.0, 11.0, 200.0),
            Bar::new(20, 11.0, 13.0, 9.0, 10.0, 300.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_builder_rejects_duplicate_timestamp() {
        let mut builder = SeriesBuilder::new();
        builder.push(Bar::new(5, 1.0_f64, 1.0, 1.0, 1.0, 1.0)).unwrap();
        let err = builder
            .push(Bar::new(5, 2.0, 2.0, 2.0, 2.0, 2.0))
            .unwrap_err();
        assert_eq!(
            err,
            Error::NonMonotonicTimestamp {
                index: 1,
                timestamp: 5,
                previous: 5
            }
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = Series::from_columns(
            vec![0, 1],
            vec![1.0_f64, 2.0],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
        );
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn test_from_columns_rejects_decreasing_timestamps() {
        let result = Series::from_columns(
            vec![3, 2],
            vec![1.0_f64, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
        );
        assert!(matches!(
            result,
            Err(Error::NonMonotonicTimestamp { index: 1, .. })
        ));
    }

    #[test]
    fn test_price_sources() {
        let series = sample();
        assert_eq!(&*series.source(PriceSource::Close), &[12.0, 11.0, 10.0]);
        assert_eq!(series.source(PriceSource::HL2)[0], 11.0);
        assert!((series.source(PriceSource::HLC3)[0] - 34.0 / 3.0).abs() < 1e-12);
        assert_eq!(series.source(PriceSource::OHLC4)[0], 11.0);
    }

    #[test]
    fn test_price_source_from_str() {
        assert_eq!("HLC3".parse::<PriceSource>().unwrap(), PriceSource::HLC3);
        assert_eq!(" close ".parse::<PriceSource>().unwrap(), PriceSource::Close);
        assert!("median".parse::<PriceSource>().is_err());
    }

    #[test]
    fn test_bar_access_and_head() {
        let series = sample();
        assert_eq!(series.bar(1).unwrap().volume, 200.0);
        assert!(series.bar(3).is_none());
        assert_eq!(series.bars().count(), 3);

        let head = series.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.timestamps(), &[0, 10]);
        assert_eq!(series.head(10).len(), 3);
    }
}
