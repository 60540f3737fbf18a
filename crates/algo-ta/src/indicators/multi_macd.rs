//! Multi-resolution MACD.
//!
//! MACD and signal are computed on several coarser bar resolutions, carried
//! back onto the base timeline and averaged. The combined lines drive a
//! Long / Short / Neutral position, forced to Neutral whenever the MACD and
//! signal of the finest resolution are within the neutral zone.
//!
//! # Causality
//!
//! A coarse bar is only complete once its bucket closes. At base bar `i` the
//! value for a resolution is the MACD of all completed coarse bars followed
//! by the in-progress bucket, whose close is the close of bar `i`. Nothing
//! after `i` is read. At the last base bar of each bucket the values equal
//! MACD over [`resample`](crate::resample::resample)d bars.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::multi_macd::MultiMacd;
//! use algo_ta::series::{Bar, Series};
//!
//! let hour = 3_600;
//! // an accelerating rally
//! let series = Series::from_bars((0..200).map(|i| {
//!     let p = 100.0_f64 + 0.01 * (i as f64).powi(2);
//!     Bar::new(i * hour, p, p + 1.0, p - 1.0, p, 1_000.0)
//! }))
//! .unwrap();
//!
//! let out = MultiMacd::new().compute(&series).unwrap();
//! assert_eq!(out.position[199], 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::macd::MacdState;
use crate::output::IndicatorOutput;
use crate::resample::{Resolution, DAY, HOUR, MINUTE};
use crate::series::{Series, Timestamp};
use crate::traits::SeriesElement;

/// MACD and signal of one resolution, aligned to the base bars.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionMacd<T> {
    /// The resolution these lines were computed at.
    pub resolution: Resolution,
    /// MACD line.
    pub macd: Vec<T>,
    /// Signal line.
    pub signal: Vec<T>,
}

/// Output of the multi-resolution MACD.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMacdOutput<T> {
    /// Average MACD line across resolutions.
    pub macd: Vec<T>,
    /// Average signal line across resolutions.
    pub signal: Vec<T>,
    /// Combined MACD minus combined signal.
    pub histogram: Vec<T>,
    /// `1` long, `-1` short, `0` neutral.
    pub position: Vec<T>,
    /// Per-resolution lines, in configuration order.
    pub per_resolution: Vec<ResolutionMacd<T>>,
}

impl<T: SeriesElement> MultiMacdOutput<T> {
    /// Named channels `MACD`, `Signal`, `Histogram`, `Position`, then
    /// `MACD <res>` and `Signal <res>` for each resolution.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        let mut out = IndicatorOutput::new("multi_macd", self.macd.len())
            .with_channel("MACD", self.macd)
            .with_channel("Signal", self.signal)
            .with_channel("Histogram", self.histogram)
            .with_channel("Position", self.position);
        for r in self.per_resolution {
            out.push(format!("MACD {}", r.resolution), r.macd);
            out.push(format!("Signal {}", r.resolution), r.signal);
        }
        out
    }
}

/// Multi-resolution MACD configuration with fluent builder API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiMacd {
    /// Fast EMA period.
    pub fast: usize,
    /// Slow EMA period.
    pub slow: usize,
    /// Signal EMA period.
    pub signal: usize,
    /// Resolutions to combine.
    pub resolutions: Vec<Resolution>,
    /// `|MACD - Signal|` below this at the finest resolution is neutral.
    pub neutral_threshold: f64,
}

impl Default for MultiMacd {
    /// 12/26/9 over 2D, 1D, 4H, 1H, 30T and 15T with a 0.05 neutral zone.
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            resolutions: vec![
                Resolution::fixed(2 * DAY),
                Resolution::fixed(DAY),
                Resolution::fixed(4 * HOUR),
                Resolution::fixed(HOUR),
                Resolution::fixed(30 * MINUTE),
                Resolution::fixed(15 * MINUTE),
            ],
            neutral_threshold: 0.05,
        }
    }
}

impl MultiMacd {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fast EMA period.
    ///
    /// Default: 12
    #[must_use]
    pub const fn fast(mut self, period: usize) -> Self {
        self.fast = period;
        self
    }

    /// Sets the slow EMA period.
    ///
    /// Default: 26
    #[must_use]
    pub const fn slow(mut self, period: usize) -> Self {
        self.slow = period;
        self
    }

    /// Sets the signal EMA period.
    ///
    /// Default: 9
    #[must_use]
    pub const fn signal(mut self, period: usize) -> Self {
        self.signal = period;
        self
    }

    /// Sets the resolutions to combine.
    #[must_use]
    pub fn resolutions(mut self, resolutions: Vec<Resolution>) -> Self {
        self.resolutions = resolutions;
        self
    }

    /// Sets the neutral zone half-width.
    ///
    /// Default: 0.05
    #[must_use]
    pub const fn neutral_threshold(mut self, threshold: f64) -> Self {
        self.neutral_threshold = threshold;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` or `Error::InvalidParameter` for bad periods,
    /// an empty resolution list, or a negative or non-finite threshold.
    pub fn validate(&self) -> Result<()> {
        MacdState::<f64>::new(self.fast, self.slow, self.signal)?;
        if self.resolutions.is_empty() {
            return Err(Error::invalid_parameter(
                "resolutions",
                "at least one resolution is required",
            ));
        }
        if !(self.neutral_threshold.is_finite() && self.neutral_threshold >= 0.0) {
            return Err(Error::invalid_parameter(
                "neutral_threshold",
                format!("must be a non-negative finite number, got {}", self.neutral_threshold),
            ));
        }
        Ok(())
    }

    /// MACD and signal of `close` at one resolution, causal over `timestamps`.
    fn lines<T: SeriesElement>(
        &self,
        timestamps: &[Timestamp],
        close: &[T],
        resolution: Resolution,
    ) -> Result<ResolutionMacd<T>> {
        let mut committed = MacdState::new(self.fast, self.slow, self.signal)?;
        let mut open_bucket: Option<(Timestamp, T)> = None;
        let mut macd = Vec::with_capacity(close.len());
        let mut signal = Vec::with_capacity(close.len());

        for (&ts, &c) in timestamps.iter().zip(close) {
            let bucket = resolution.bucket_start(ts);
            if let Some((current, last_close)) = open_bucket {
                if current != bucket {
                    committed = committed.update(last_close);
                }
            }
            open_bucket = Some((bucket, c));

            let tentative = committed.update(c);
            macd.push(tentative.macd());
            signal.push(tentative.signal());
        }

        Ok(ResolutionMacd {
            resolution,
            macd,
            signal,
        })
    }

    /// Computes the combined lines and position.
    ///
    /// # Errors
    ///
    /// Same as [`MultiMacd::validate`], plus `Error::EmptyInput`.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<MultiMacdOutput<T>> {
        self.validate()?;
        if series.is_empty() {
            return Err(Error::EmptyInput);
        }

        let per_resolution = self
            .resolutions
            .iter()
            .map(|&r| self.lines(series.timestamps(), series.close(), r))
            .collect::<Result<Vec<_>>>()?;

        let n = series.len();
        let count = T::from_usize(per_resolution.len())?;
        let mut macd = vec![T::zero(); n];
        let mut signal = vec![T::zero(); n];
        for r in &per_resolution {
            for i in 0..n {
                macd[i] = macd[i] + r.macd[i];
                signal[i] = signal[i] + r.signal[i];
            }
        }
        for v in macd.iter_mut().chain(signal.iter_mut()) {
            *v = *v / count;
        }
        let histogram: Vec<T> = macd.iter().zip(&signal).map(|(&m, &s)| m - s).collect();

        let threshold = T::from_f64(self.neutral_threshold)?;
        let finest = per_resolution
            .iter()
            .min_by_key(|r| r.resolution)
            .ok_or_else(|| {
                Error::invalid_parameter("resolutions", "at least one resolution is required")
            })?;

        let position = (0..n)
            .map(|i| {
                let neutral = (finest.macd[i] - finest.signal[i]).abs() < threshold;
                if neutral || histogram[i].is_nan() {
                    T::zero()
                } else if histogram[i] > T::zero() {
                    T::one()
                } else if histogram[i] < T::zero() {
                    -T::one()
                } else {
                    T::zero()
                }
            })
            .collect();

        Ok(MultiMacdOutput {
            macd,
            signal,
            histogram,
            position,
            per_resolution,
        })
    }
}
