//! Average Directional Index (ADX) with the enhanced DI averages.
//!
//! # Formula
//!
//! ```text
//! upMove   = High[i] - High[i-1]
//! downMove = Low[i-1] - Low[i]
//! +DM      = upMove   if upMove > downMove and upMove > 0, else 0
//! -DM      = downMove if downMove > upMove and downMove > 0, else 0
//! +DI      = 100 × smooth(+DM, di_length) / smooth(TR, di_length)
//! -DI      = 100 × smooth(-DM, di_length) / smooth(TR, di_length)
//! DX       = SMA(100 × |+DI - -DI| / (+DI + -DI), adx_length)
//! ADX      = SMA(DX, adx_length)
//! +DI MA   = SMA(+DI, ma_length)
//! -DI MA   = SMA(-DI, ma_length)
//! ```
//!
//! The directional index is averaged twice, once into `DX` and once more
//! into `ADX`. Bar 0 has no prior bar, so `+DM[0] = -DM[0] = 0`. A zero
//! smoothed true range or a zero DI sum yields NaN at that bar.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::adx::Adx;
//!
//! let high: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
//! let low: Vec<f64> = high.iter().map(|h| h - 2.0).collect();
//! let close: Vec<f64> = high.iter().map(|h| h - 1.0).collect();
//!
//! let out = Adx::new().compute_hlc(&high, &low, &close).unwrap();
//! // a steady uptrend has no downward movement
//! assert!((out.adx[59] - 100.0).abs() < 1e-9);
//! assert_eq!(out.minus_di[59], 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::atr::true_range_values;
use crate::indicators::smoothing::Smoothing;
use crate::kernels::rolling_mean;
use crate::output::IndicatorOutput;
use crate::series::Series;
use crate::traits::{validate_aligned, validate_period, SeriesElement};
use crate::utils::checked_ratio;

/// Directional movement of each bar as `(+DM, -DM)`.
///
/// # Errors
///
/// `Error::EmptyInput` or `Error::LengthMismatch`.
pub fn directional_movement<T: SeriesElement>(high: &[T], low: &[T]) -> Result<(Vec<T>, Vec<T>)> {
    validate_aligned(("high", high), &[("low", low)])?;
    Ok(directional_movement_values(high, low))
}

fn directional_movement_values<T: SeriesElement>(high: &[T], low: &[T]) -> (Vec<T>, Vec<T>) {
    let zero = T::zero();
    (0..high.len())
        .map(|i| {
            if i == 0 {
                return (zero, zero);
            }
            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];
            let plus = if up > down && up > zero { up } else { zero };
            let minus = if down > up && down > zero { down } else { zero };
            (plus, minus)
        })
        .unzip()
}

/// Output of the ADX indicator. Every vector has the input's length.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput<T> {
    /// Average directional index.
    pub adx: Vec<T>,
    /// Positive directional indicator.
    pub plus_di: Vec<T>,
    /// Negative directional indicator.
    pub minus_di: Vec<T>,
    /// Averaged directional index, the input to `adx`.
    pub dx: Vec<T>,
    /// Moving average of `+DI`.
    pub plus_di_ma: Vec<T>,
    /// Moving average of `-DI`.
    pub minus_di_ma: Vec<T>,
}

impl<T: SeriesElement> AdxOutput<T> {
    /// Named channels `ADX`, `+DI`, `-DI`, `DX`, `+DI MA`, `-DI MA`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("adx", self.adx.len())
            .with_channel("ADX", self.adx)
            .with_channel("+DI", self.plus_di)
            .with_channel("-DI", self.minus_di)
            .with_channel("DX", self.dx)
            .with_channel("+DI MA", self.plus_di_ma)
            .with_channel("-DI MA", self.minus_di_ma)
    }
}

/// ADX configuration with fluent builder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adx {
    /// Window of the DM and TR smoothing.
    pub di_length: usize,
    /// Window of both DX averages.
    pub adx_length: usize,
    /// Window of the DI moving averages.
    pub ma_length: usize,
    /// Smoothing applied to +DM, -DM and TR.
    pub smoothing: Smoothing,
}

impl Default for Adx {
    /// DI, ADX and MA lengths of 13 with SMA smoothing.
    fn default() -> Self {
        Self {
            di_length: 13,
            adx_length: 13,
            ma_length: 13,
            smoothing: Smoothing::Sma,
        }
    }
}

impl Adx {
    /// Creates an ADX configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the DM/TR smoothing window.
    ///
    /// Default: 13
    #[must_use]
    pub const fn di_length(mut self, length: usize) -> Self {
        self.di_length = length;
        self
    }

    /// Sets the DX averaging window.
    ///
    /// Default: 13
    #[must_use]
    pub const fn adx_length(mut self, length: usize) -> Self {
        self.adx_length = length;
        self
    }

    /// Sets the DI moving-average window.
    ///
    /// Default: 13
    #[must_use]
    pub const fn ma_length(mut self, length: usize) -> Self {
        self.ma_length = length;
        self
    }

    /// Sets the smoothing of +DM, -DM and TR.
    ///
    /// Default: SMA
    #[must_use]
    pub const fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` for any zero length, `Error::MissingChannel`
    /// for VWMA smoothing.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.di_length)?;
        validate_period(self.adx_length)?;
        validate_period(self.ma_length)?;
        if self.smoothing.needs_volume() {
            return Err(Error::MissingChannel { channel: "volume" });
        }
        Ok(())
    }

    /// Index of the first defined ADX value.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        self.smoothing.lookback(self.di_length) + 2 * self.adx_length.saturating_sub(1)
    }

    /// Computes ADX from high, low and close columns.
    ///
    /// # Errors
    ///
    /// Same as [`Adx::validate`], plus `Error::EmptyInput` and
    /// `Error::LengthMismatch`.
    pub fn compute_hlc<T: SeriesElement>(
        &self,
        high: &[T],
        low: &[T],
        close: &[T],
    ) -> Result<AdxOutput<T>> {
        self.validate()?;
        validate_aligned(("high", high), &[("low", low), ("close", close)])?;

        let (plus_dm, minus_dm) = directional_movement_values(high, low);
        let tr = true_range_values(high, low, close);

        let smooth = |data: &[T]| self.smoothing.apply(data, self.di_length, None);
        let tr_s = smooth(&tr)?;
        let plus_di = di(&smooth(&plus_dm)?, &tr_s);
        let minus_di = di(&smooth(&minus_dm)?, &tr_s);

        let raw_dx: Vec<T> = plus_di
            .iter()
            .zip(&minus_di)
            .map(|(&p, &m)| checked_ratio((p - m).abs(), p + m) * T::hundred())
            .collect();
        let dx = rolling_mean(&raw_dx, self.adx_length);
        let adx = rolling_mean(&dx, self.adx_length);

        Ok(AdxOutput {
            adx,
            plus_di_ma: rolling_mean(&plus_di, self.ma_length),
            minus_di_ma: rolling_mean(&minus_di, self.ma_length),
            plus_di,
            minus_di,
            dx,
        })
    }

    /// Computes ADX over a series.
    ///
    /// # Errors
    ///
    /// Same as [`Adx::compute_hlc`].
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<AdxOutput<T>> {
        self.compute_hlc(series.high(), series.low(), series.close())
    }
}

fn di<T: SeriesElement>(dm: &[T], tr: &[T]) -> Vec<T> {
    dm.iter()
        .zip(tr)
        .map(|(&d, &t)| checked_ratio(d, t) * T::hundred())
        .collect()
}
