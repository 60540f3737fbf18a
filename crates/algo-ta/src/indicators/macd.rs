//! Moving Average Convergence Divergence (MACD) indicator.
//!
//! - **MACD Line**: fast EMA minus slow EMA
//! - **Signal Line**: EMA of the MACD line
//! - **Histogram**: MACD line minus signal line
//!
//! # Formula
//!
//! ```text
//! MACD[i]      = EMA(x, fast)[i] - EMA(x, slow)[i]
//! Signal[i]    = EMA(MACD, signal)[i]
//! Histogram[i] = MACD[i] - Signal[i]
//! ```
//!
//! All three EMAs are seeded by their first sample, so every component is
//! defined from index 0.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::macd::macd;
//!
//! let data: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
//! let result = macd(&data, 12, 26, 9).unwrap();
//!
//! assert_eq!(result.macd[0], 0.0);
//! // a rising series keeps the fast EMA above the slow one
//! assert!(result.macd[39] > 0.0);
//! assert!(result.histogram[39] > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::ema::ema_alpha;
use crate::kernels::{recurrence, Ewm};
use crate::output::IndicatorOutput;
use crate::series::{PriceSource, Series};
use crate::traits::{validate_period, SeriesElement, ValidatedInput};

/// The output of MACD calculation containing all three components.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput<T> {
    /// Fast EMA minus slow EMA.
    pub macd: Vec<T>,
    /// EMA of the MACD line.
    pub signal: Vec<T>,
    /// MACD line minus signal line.
    pub histogram: Vec<T>,
}

impl<T: SeriesElement> MacdOutput<T> {
    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    /// Returns `true` for an empty output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// Named channels `MACD`, `Signal`, `Histogram`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("macd", self.len())
            .with_channel("MACD", self.macd)
            .with_channel("Signal", self.signal)
            .with_channel("Histogram", self.histogram)
    }
}

/// Running state of the three MACD averages, advanced one close at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdState<T> {
    fast: Ewm<T>,
    slow: Ewm<T>,
    signal: Ewm<T>,
}

impl<T: SeriesElement> MacdState<T> {
    /// An unseeded state for the given periods.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` for a zero period, `Error::InvalidParameter`
    /// unless `fast < slow`.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self> {
        validate_periods(fast, slow, signal)?;
        Ok(Self {
            fast: Ewm::new(ema_alpha(fast)?),
            slow: Ewm::new(ema_alpha(slow)?),
            signal: Ewm::new(ema_alpha(signal)?),
        })
    }

    /// The state after observing `close`.
    #[inline]
    #[must_use]
    pub fn update(self, close: T) -> Self {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        let line = fast.value() - slow.value();
        Self {
            fast,
            slow,
            signal: self.signal.update(line),
        }
    }

    /// Current MACD line value.
    #[inline]
    #[must_use]
    pub fn macd(self) -> T {
        self.fast.value() - self.slow.value()
    }

    /// Current signal line value.
    #[inline]
    #[must_use]
    pub fn signal(self) -> T {
        self.signal.value()
    }
}

fn validate_periods(fast: usize, slow: usize, signal: usize) -> Result<()> {
    validate_period(fast)?;
    validate_period(slow)?;
    validate_period(signal)?;
    if fast >= slow {
        return Err(Error::invalid_parameter(
            "fast",
            format!("fast period ({fast}) must be shorter than slow period ({slow})"),
        ));
    }
    Ok(())
}

/// Computes MACD over `data`.
///
/// # Errors
///
/// Returns an error if:
/// - The input data is empty (`Error::EmptyInput`)
/// - Any period is zero (`Error::InvalidPeriod`)
/// - `fast_period >= slow_period` (`Error::InvalidParameter`)
#[must_use = "this returns a Result with the MACD values, which should be used"]
pub fn macd<T: SeriesElement>(
    data: &[T],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdOutput<T>> {
    let state = MacdState::new(fast_period, slow_period, signal_period)?;
    data.validate_not_empty()?;

    let pairs = recurrence(data, state, |state, x| {
        let next = state.update(x);
        (next, (next.macd(), next.signal()))
    });
    let (macd, signal): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();
    let histogram = macd.iter().zip(&signal).map(|(&m, &s)| m - s).collect();

    Ok(MacdOutput {
        macd,
        signal,
        histogram,
    })
}

/// MACD configuration with fluent builder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macd {
    /// Fast EMA period.
    pub fast: usize,
    /// Slow EMA period.
    pub slow: usize,
    /// Signal EMA period.
    pub signal: usize,
    /// Price column.
    pub source: PriceSource,
}

impl Default for Macd {
    /// The classic 12/26/9 on close.
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            source: PriceSource::Close,
        }
    }
}

impl Macd {
    /// Creates a MACD configuration with the default parameters.
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

    /// Sets the price column.
    ///
    /// Default: close
    #[must_use]
    pub const fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` or `Error::InvalidParameter`.
    pub fn validate(&self) -> Result<()> {
        validate_periods(self.fast, self.slow, self.signal)
    }

    /// Computes MACD over the configured price column.
    ///
    /// # Errors
    ///
    /// Same as [`macd`].
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<MacdOutput<T>> {
        macd(&series.source(self.source), self.fast, self.slow, self.signal)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::indicators::ema::ema;
    use crate::utils::{approx_eq, EPSILON};

    fn prices() -> Vec<f64> {
        (0..80)
            .map(|i| 50.0 + (i as f64 * 0.25).sin() * 4.0 + i as f64 * 0.05)
            .collect()
    }

    #[test]
    fn test_macd_matches_ema_difference() {
        let data = prices();
        let out = macd(&data, 5, 13, 4).unwrap();
        let fast = ema(&data, 5).unwrap();
        let slow = ema(&data, 13).unwrap();
        for i in 0..data.len() {
            assert!(approx_eq(out.macd[i], fast[i] - slow[i], EPSILON));
        }
        let signal = ema(&out.macd, 4).unwrap();
        for i in 0..data.len() {
            assert!(approx_eq(out.signal[i], signal[i], EPSILON));
            assert!(approx_eq(out.histogram[i], out.macd[i] - out.signal[i], EPSILON));
        }
    }

    #[test]
    fn test_macd_defined_from_start() {
        let out = macd(&[10.0_f64, 11.0], 12, 26, 9).unwrap();
        assert_eq!(out.macd[0], 0.0);
        assert!(!out.signal[1].is_nan());
    }

    #[test]
    fn test_fast_must_be_shorter_than_slow() {
        assert!(matches!(
            macd(&prices(), 26, 12, 9),
            Err(Error::InvalidParameter { name: "fast", .. })
        ));
        assert!(matches!(
            macd(&prices(), 12, 12, 9),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_state_step_matches_batch() {
        let data = prices();
        let batch = macd(&data, 12, 26, 9).unwrap();
        let mut state = MacdState::new(12, 26, 9).unwrap();
        for (i, &x) in data.iter().enumerate() {
            state = state.update(x);
            assert_eq!(state.macd(), batch.macd[i]);
            assert_eq!(state.signal(), batch.signal[i]);
        }
    }

    #[test]
    fn test_into_output() {
        let out = macd(&prices(), 12, 26, 9).unwrap().into_output();
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["MACD", "Signal", "Histogram"]);
        assert_eq!(out.len(), 80);
    }
}
