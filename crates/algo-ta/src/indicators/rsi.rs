//! Relative Strength Index (RSI) indicator.
//!
//! # Formula
//!
//! ```text
//! delta[i] = Close[i] - Close[i-1]            (delta[0] is undefined)
//! avgGain  = SMA(max(delta, 0), length)
//! avgLoss  = SMA(max(-delta, 0), length)
//! RSI      = 100 - 100 / (1 + avgGain / avgLoss)
//! ```
//!
//! The first defined value is at index `length`. When `avgLoss` is zero the
//! RSI is 100 if there were gains and undefined if the market was flat.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::rsi::rsi;
//!
//! let close = vec![10.0_f64, 11.0, 10.0, 11.5, 12.0];
//! let result = rsi(&close, 2).unwrap();
//!
//! assert!(result[1].is_nan());
//! // gains 1, 0 ; losses 0, 1 -> RS = 1
//! assert!((result[2] - 50.0).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::profile::OutlierProfile;
use crate::kernels::rolling_mean;
use crate::output::IndicatorOutput;
use crate::series::{PriceSource, Series};
use crate::traits::{validate_period, validate_period_and_data, SeriesElement};
use crate::utils::flag;

/// Returns the lookback period for RSI, which equals the length.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::rsi::rsi_lookback;
///
/// assert_eq!(rsi_lookback(14), 14);
/// ```
#[inline]
#[must_use]
pub const fn rsi_lookback(length: usize) -> usize {
    length
}

/// Computes RSI over `data` with SMA-averaged gains and losses.
///
/// A series no longer than `length` yields all NaN.
///
/// # Errors
///
/// `Error::InvalidPeriod` or `Error::EmptyInput`.
#[must_use = "this returns a Result with the RSI values, which should be used"]
pub fn rsi<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_period_and_data(data, length)?;

    let zero = T::zero();
    let (gains, losses): (Vec<T>, Vec<T>) = (0..data.len())
        .map(|i| {
            if i == 0 {
                return (T::nan(), T::nan());
            }
            let delta = data[i] - data[i - 1];
            if delta.is_nan() {
                (delta, delta)
            } else {
                (delta.max(zero), (-delta).max(zero))
            }
        })
        .unzip();

    let avg_gain = rolling_mean(&gains, length);
    let avg_loss = rolling_mean(&losses, length);

    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| rsi_value(gain, loss))
        .collect())
}

fn rsi_value<T: SeriesElement>(gain: T, loss: T) -> T {
    if gain.is_nan() || loss.is_nan() {
        return T::nan();
    }
    // averages of non-negative samples; drop any rounding below zero
    let gain = gain.max(T::zero());
    let loss = loss.max(T::zero());
    if loss == T::zero() {
        return if gain > T::zero() {
            T::hundred()
        } else {
            T::nan()
        };
    }
    T::hundred() - T::hundred() / (T::one() + gain / loss)
}

/// RSI configuration with fluent builder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rsi {
    /// Averaging window.
    pub length: usize,
    /// Price column.
    pub source: PriceSource,
    /// Liquidity boundary window; when set, an `Outlier` channel is added.
    pub outlier_length: Option<usize>,
}

impl Default for Rsi {
    /// 14 bars of close, no outlier channel.
    fn default() -> Self {
        Self {
            length: 14,
            source: PriceSource::Close,
            outlier_length: None,
        }
    }
}

impl Rsi {
    /// Creates an RSI configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the averaging window.
    ///
    /// Default: 14
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the price column.
    ///
    /// Default: close
    #[must_use]
    pub const fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    /// Enables the `Outlier` channel with the given boundary window.
    #[must_use]
    pub const fn outliers(mut self, length: usize) -> Self {
        self.outlier_length = Some(length);
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` for a zero length or outlier window.
    pub fn validate(&self) -> Result<()> {
        if let Some(length) = self.outlier_length {
            validate_period(length)?;
        }
        validate_period(self.length)
    }

    /// The outlier profile matching this configuration, if enabled.
    #[must_use]
    pub fn profile(&self) -> Option<OutlierProfile> {
        self.outlier_length.map(|length| {
            OutlierProfile::new()
                .rsi_length(self.length)
                .outlier_length(length)
        })
    }

    /// Computes RSI over the configured price column.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` or `Error::EmptyInput`.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<Vec<T>> {
        rsi(&series.source(self.source), self.length)
    }

    /// Computes the `RSI` channel, plus `Outlier` (1 on liquidity outliers)
    /// when enabled.
    ///
    /// # Errors
    ///
    /// Same as [`Rsi::compute`].
    pub fn compute_output<T: SeriesElement>(&self, series: &Series<T>) -> Result<IndicatorOutput<T>> {
        self.validate()?;
        let mut output = IndicatorOutput::new("rsi", series.len()).with_channel("RSI", self.compute(series)?);
        if let Some(profile) = self.profile() {
            let flags = profile.outliers(series)?.into_iter().map(flag).collect();
            output.push("Outlier", flags);
        }
        Ok(output)
    }
}
