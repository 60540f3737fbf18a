//! Moving-average envelope.
//!
//! ```text
//! Basis = smooth(kind, source, length)        (default SMA, 20)
//! Upper = Basis × (1 + percent / 100)
//! Lower = Basis × (1 - percent / 100)
//! ```
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::envelope::envelope;
//!
//! let data = vec![100.0_f64, 102.0, 104.0];
//! let out = envelope(&data, 3, 10.0).unwrap();
//!
//! assert!((out.basis[2] - 102.0).abs() < 1e-10);
//! assert!((out.upper[2] - 112.2).abs() < 1e-10);
//! assert!((out.lower[2] - 91.8).abs() < 1e-10);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::smoothing::Smoothing;
use crate::output::IndicatorOutput;
use crate::series::{PriceSource, Series};
use crate::traits::{validate_period, validate_period_and_data, SeriesElement};

/// Output of the envelope indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeOutput<T> {
    /// The moving average.
    pub basis: Vec<T>,
    /// Basis shifted up by the percentage.
    pub upper: Vec<T>,
    /// Basis shifted down by the percentage.
    pub lower: Vec<T>,
}

impl<T: SeriesElement> EnvelopeOutput<T> {
    /// Named channels `Basis`, `Upper`, `Lower`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("envelope", self.basis.len())
            .with_channel("Basis", self.basis)
            .with_channel("Upper", self.upper)
            .with_channel("Lower", self.lower)
    }
}

/// SMA envelope of `data`.
///
/// # Errors
///
/// Same as [`Envelope::compute_source`].
pub fn envelope<T: SeriesElement>(data: &[T], length: usize, percent: f64) -> Result<EnvelopeOutput<T>> {
    Envelope::new()
        .length(length)
        .percent(percent)
        .compute_source(data, None)
}

/// Envelope configuration with fluent builder API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Basis window.
    pub length: usize,
    /// Band offset in percent of the basis.
    pub percent: f64,
    /// Basis formula.
    pub basis: Smoothing,
    /// Price column.
    pub source: PriceSource,
}

impl Default for Envelope {
    /// SMA basis over 20 bars of close, bands at 10%.
    fn default() -> Self {
        Self {
            length: 20,
            percent: 10.0,
            basis: Smoothing::Sma,
            source: PriceSource::Close,
        }
    }
}

impl Envelope {
    /// Creates an envelope configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the basis window.
    ///
    /// Default: 20
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the band offset in percent.
    ///
    /// Default: 10.0
    #[must_use]
    pub const fn percent(mut self, percent: f64) -> Self {
        self.percent = percent;
        self
    }

    /// Sets the basis formula.
    ///
    /// Default: SMA
    #[must_use]
    pub const fn basis(mut self, basis: Smoothing) -> Self {
        self.basis = basis;
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
    /// `Error::InvalidPeriod` for a zero length, `Error::InvalidParameter`
    /// for a negative or non-finite percentage.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.length)?;
        if !(self.percent.is_finite() && self.percent >= 0.0) {
            return Err(Error::invalid_parameter(
                "percent",
                format!("must be a non-negative finite number, got {}", self.percent),
            ));
        }
        Ok(())
    }

    /// Computes the envelope of an arbitrary source; `volume` feeds a VWMA basis.
    ///
    /// # Errors
    ///
    /// Same as [`Envelope::validate`], plus `Error::EmptyInput` and
    /// `Error::MissingChannel` for a VWMA basis without volume.
    pub fn compute_source<T: SeriesElement>(
        &self,
        data: &[T],
        volume: Option<&[T]>,
    ) -> Result<EnvelopeOutput<T>> {
        self.validate()?;
        validate_period_and_data(data, self.length)?;

        let k = T::from_f64(self.percent / 100.0)?;
        let basis = self.basis.apply(data, self.length, volume)?;
        let upper = basis.iter().map(|&b| b * (T::one() + k)).collect();
        let lower = basis.iter().map(|&b| b * (T::one() - k)).collect();

        Ok(EnvelopeOutput {
            basis,
            upper,
            lower,
        })
    }

    /// Computes the envelope of the configured price column.
    ///
    /// # Errors
    ///
    /// Same as [`Envelope::compute_source`].
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<EnvelopeOutput<T>> {
        self.compute_source(&series.source(self.source), Some(series.volume()))
    }
}
