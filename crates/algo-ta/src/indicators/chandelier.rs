//! Chandelier Exit.
//!
//! Trailing stops hung an ATR multiple away from the recent extreme:
//!
//! ```text
//! ATR       = smooth(TrueRange, length) × multiplier      (default SMA)
//! raw long  = highest(close or high, length) - ATR
//! raw short = lowest(close or low, length) + ATR
//! ```
//!
//! The stops ratchet: while the previous close held above the previous long
//! stop, the long stop may only rise, and symmetrically the short stop may
//! only fall. Direction turns +1 when close breaks above the previous short
//! stop, -1 when close breaks below the previous long stop, and otherwise
//! keeps its last value. It is undefined until the first break.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::chandelier::Chandelier;
//!
//! let close = [10.0_f64, 11.0, 12.0, 13.0, 14.0, 13.0, 12.5];
//! let out = Chandelier::new()
//!     .length(2)
//!     .multiplier(1.0)
//!     .compute_hlc(&close, &close, &close)
//!     .unwrap();
//!
//! assert_eq!(out.long_stop[6], 12.25);
//! assert_eq!(out.direction[5], 1.0);
//! assert_eq!(out.direction[6], -1.0);
//! assert_eq!(out.sell[6], 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::atr::true_range_values;
use crate::indicators::smoothing::Smoothing;
use crate::kernels::{recurrence, rolling_max, rolling_min};
use crate::output::IndicatorOutput;
use crate::series::Series;
use crate::traits::{validate_aligned, validate_period, validate_positive, SeriesElement};
use crate::utils::flag;

/// Output of [`Chandelier`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChandelierOutput<T> {
    /// Ratcheted stop for long positions.
    pub long_stop: Vec<T>,
    /// Ratcheted stop for short positions.
    pub short_stop: Vec<T>,
    /// +1 / -1 trend direction, NaN until the first break.
    pub direction: Vec<T>,
    /// 1 where direction turned from -1 to +1.
    pub buy: Vec<T>,
    /// 1 where direction turned from +1 to -1.
    pub sell: Vec<T>,
}

impl<T: SeriesElement> ChandelierOutput<T> {
    /// Named channels `LongStop`, `ShortStop`, `Direction`, `BuySignal`, `SellSignal`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("chandelier", self.long_stop.len())
            .with_channel("LongStop", self.long_stop)
            .with_channel("ShortStop", self.short_stop)
            .with_channel("Direction", self.direction)
            .with_channel("BuySignal", self.buy)
            .with_channel("SellSignal", self.sell)
    }
}

#[derive(Clone, Copy)]
struct StopState<T> {
    close: T,
    long: T,
    short: T,
    direction: T,
}

/// Chandelier Exit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chandelier {
    /// ATR and extreme window.
    pub length: usize,
    /// ATR multiple.
    pub multiplier: f64,
    /// Take extremes from close instead of high/low.
    pub use_close: bool,
    /// Require the signal bar to close beyond the previous close.
    pub await_confirmation: bool,
    /// True-range smoothing.
    pub smoothing: Smoothing,
}

impl Default for Chandelier {
    /// Length 22, multiplier 3, close extremes, confirmed signals, SMA.
    fn default() -> Self {
        Self {
            length: 22,
            multiplier: 3.0,
            use_close: true,
            await_confirmation: true,
            smoothing: Smoothing::Sma,
        }
    }
}

impl Chandelier {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window.
    ///
    /// Default: 22
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the ATR multiple.
    ///
    /// Default: 3.0
    #[must_use]
    pub const fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Chooses close (`true`) or high/low (`false`) extremes.
    ///
    /// Default: true
    #[must_use]
    pub const fn use_close(mut self, use_close: bool) -> Self {
        self.use_close = use_close;
        self
    }

    /// Sets whether signals need a confirming close.
    ///
    /// Default: true
    #[must_use]
    pub const fn await_confirmation(mut self, await_confirmation: bool) -> Self {
        self.await_confirmation = await_confirmation;
        self
    }

    /// Sets the true-range smoothing.
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
    /// `Error::InvalidPeriod` for a zero length, `Error::InvalidParameter`
    /// for a non-positive multiplier.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.length)?;
        validate_positive("multiplier", self.multiplier)
    }

    /// Index of the first defined stop.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        let extreme = self.length.saturating_sub(1);
        let atr = self.smoothing.lookback(self.length);
        if atr > extreme {
            atr
        } else {
            extreme
        }
    }

    /// Computes the exit from high, low and close columns.
    ///
    /// # Errors
    ///
    /// Same as [`Chandelier::validate`], plus `Error::EmptyInput`,
    /// `Error::LengthMismatch`, and `Error::MissingChannel` for VWMA smoothing.
    pub fn compute_hlc<T: SeriesElement>(
        &self,
        high: &[T],
        low: &[T],
        close: &[T],
    ) -> Result<ChandelierOutput<T>> {
        self.stops(high, low, close, None)
    }

    /// Computes the exit over a series.
    ///
    /// # Errors
    ///
    /// Same as [`Chandelier::compute_hlc`].
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<ChandelierOutput<T>> {
        self.stops(series.high(), series.low(), series.close(), Some(series.volume()))
    }

    fn stops<T: SeriesElement>(
        &self,
        high: &[T],
        low: &[T],
        close: &[T],
        volume: Option<&[T]>,
    ) -> Result<ChandelierOutput<T>> {
        self.validate()?;
        validate_aligned(("high", high), &[("low", low), ("close", close)])?;

        let multiplier = T::from_f64(self.multiplier)?;
        let tr = true_range_values(high, low, close);
        let atr = self.smoothing.apply(&tr, self.length, volume)?;

        let (upper, lower) = if self.use_close {
            (rolling_max(close, self.length), rolling_min(close, self.length))
        } else {
            (rolling_max(high, self.length), rolling_min(low, self.length))
        };

        let rows: Vec<(T, T, T)> = (0..close.len())
            .map(|i| {
                let offset = atr[i] * multiplier;
                (close[i], upper[i] - offset, lower[i] + offset)
            })
            .collect();

        let start = StopState {
            close: T::nan(),
            long: T::nan(),
            short: T::nan(),
            direction: T::nan(),
        };
        let await_confirmation = self.await_confirmation;
        let steps = recurrence(&rows, start, |prev, (c, raw_long, raw_short)| {
            let long = if prev.close > prev.long && !raw_long.is_nan() {
                raw_long.max(prev.long)
            } else {
                raw_long
            };
            let short = if prev.close < prev.short && !raw_short.is_nan() {
                raw_short.min(prev.short)
            } else {
                raw_short
            };

            let direction = if c > prev.short {
                T::one()
            } else if c < prev.long {
                -T::one()
            } else {
                prev.direction
            };

            let confirmed_up = !await_confirmation || c > prev.close;
            let confirmed_down = !await_confirmation || c < prev.close;
            let buy = direction == T::one() && prev.direction == -T::one() && confirmed_up;
            let sell = direction == -T::one() && prev.direction == T::one() && confirmed_down;

            let state = StopState {
                close: c,
                long,
                short,
                direction,
            };
            (state, (long, short, direction, buy, sell))
        });

        let mut out = ChandelierOutput {
            long_stop: Vec::with_capacity(steps.len()),
            short_stop: Vec::with_capacity(steps.len()),
            direction: Vec::with_capacity(steps.len()),
            buy: Vec::with_capacity(steps.len()),
            sell: Vec::with_capacity(steps.len()),
        };
        for (long, short, direction, buy, sell) in steps {
            out.long_stop.push(long);
            out.short_stop.push(short);
            out.direction.push(direction);
            out.buy.push(flag(buy));
            out.sell.push(flag(sell));
        }
        Ok(out)
    }
}
