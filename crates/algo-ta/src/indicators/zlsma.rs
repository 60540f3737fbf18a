//! Zero-Lag Least Squares Moving Average (ZLSMA).
//!
//! ```text
//! LSMA  = linreg(source, length, offset)
//! ZLSMA = LSMA + (LSMA - linreg(LSMA, length, offset))
//! ```
//!
//! `linreg` fits a least-squares line to each trailing window and evaluates
//! it at window position `length - 1 + offset`. Feeding the fit back through
//! itself and adding the difference cancels most of the fit's lag.
//!
//! # Lookback
//!
//! `2 × (length - 1)`: the second regression needs a full window of defined
//! LSMA values.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kernels::linreg;
use crate::output::IndicatorOutput;
use crate::series::{PriceSource, Series};
use crate::traits::{validate_period, validate_period_and_data, SeriesElement};

/// Returns the lookback period for ZLSMA.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::zlsma::zlsma_lookback;
///
/// assert_eq!(zlsma_lookback(32), 62);
/// ```
#[inline]
#[must_use]
pub const fn zlsma_lookback(length: usize) -> usize {
    2 * length.saturating_sub(1)
}

/// LSMA and ZLSMA lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ZlsmaOutput<T> {
    /// Single least-squares fit.
    pub lsma: Vec<T>,
    /// Lag-corrected fit.
    pub zlsma: Vec<T>,
}

impl<T: SeriesElement> ZlsmaOutput<T> {
    /// Named channels `LSMA`, `ZLSMA`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("zlsma", self.lsma.len())
            .with_channel("LSMA", self.lsma)
            .with_channel("ZLSMA", self.zlsma)
    }
}

/// Computes ZLSMA of `data`.
///
/// # Errors
///
/// `Error::InvalidPeriod` or `Error::EmptyInput`.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::zlsma::zlsma;
///
/// let close = [105.0_f64, 110.0, 112.0, 115.0, 118.0];
/// let out = zlsma(&close, 32, 0).unwrap();
/// assert!(out.zlsma.iter().all(|v| v.is_nan()));
/// ```
pub fn zlsma<T: SeriesElement>(data: &[T], length: usize, offset: i32) -> Result<ZlsmaOutput<T>> {
    validate_period_and_data(data, length)?;
    let lsma = linreg(data, length, offset);
    let refit = linreg(&lsma, length, offset);
    let zlsma = lsma
        .iter()
        .zip(&refit)
        .map(|(&a, &b)| T::two() * a - b)
        .collect();
    Ok(ZlsmaOutput { lsma, zlsma })
}

/// ZLSMA configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zlsma {
    /// Regression window.
    pub length: usize,
    /// Evaluation offset from the window's last bar.
    pub offset: i32,
    /// Price column.
    pub source: PriceSource,
}

impl Default for Zlsma {
    fn default() -> Self {
        Self {
            length: 32,
            offset: 0,
            source: PriceSource::Close,
        }
    }
}

impl Zlsma {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the regression window.
    ///
    /// Default: 32
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the evaluation offset.
    ///
    /// Default: 0
    #[must_use]
    pub const fn offset(mut self, offset: i32) -> Self {
        self.offset = offset;
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
    /// `Error::InvalidPeriod` for a zero length.
    pub const fn validate(&self) -> Result<()> {
        validate_period(self.length)
    }

    /// Index of the first defined ZLSMA value.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        zlsma_lookback(self.length)
    }

    /// Computes LSMA and ZLSMA of the configured column.
    ///
    /// # Errors
    ///
    /// Same as [`zlsma`].
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<ZlsmaOutput<T>> {
        zlsma(&series.source(self.source), self.length, self.offset)
    }
}
