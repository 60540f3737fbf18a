//! Tillson T3 moving average with Rate-of-Change trend signals.
//!
//! One T3 pass blends two stacked EMAs with a volume factor `v`:
//!
//! ```text
//! e1 = EMA(x, length)
//! e2 = EMA(e1, length)
//! T3(x) = (1 + v) × e1 - v × e2
//! ```
//!
//! [`T3Mode`] selects how many passes are chained. [`T3Roc`] pairs the
//! average with [`roc`](crate::indicators::roc::roc) over the same length
//! and folds both into long/short signals and a trend state:
//!
//! | Trend | Meaning |
//! |-------|---------|
//! | 1 / -1 | long / short trend started on a cross confirmed by ROC sign |
//! | 2 / -2 | trend continuing with a thin ROC line (new signals suppressed) |
//! | 0 | no trend yet |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::ema::ema_alpha;
use crate::indicators::roc::{roc_codes, roc_lookback, RocNormalization};
use crate::kernels::{exponential, recurrence};
use crate::output::IndicatorOutput;
use crate::series::{PriceSource, Series};
use crate::traits::{validate_period, validate_period_and_data, SeriesElement};
use crate::utils::flag;

/// Number of chained T3 passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum T3Mode {
    /// One pass.
    Single,
    /// Two passes.
    #[default]
    Double,
    /// Three passes.
    Triple,
}

impl T3Mode {
    /// Number of passes.
    #[must_use]
    pub const fn passes(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Double => "DOUBLE",
            Self::Triple => "TRIPLE",
        }
    }
}

impl fmt::Display for T3Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for T3Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SINGLE" | "1" => Ok(Self::Single),
            "DOUBLE" | "2" => Ok(Self::Double),
            "TRIPLE" | "3" => Ok(Self::Triple),
            other => Err(Error::invalid_parameter(
                "mode",
                format!("unknown T3 mode '{other}' (expected SINGLE, DOUBLE or TRIPLE)"),
            )),
        }
    }
}

impl TryFrom<String> for T3Mode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Computes the T3 average of `data`.
///
/// EMAs seed on the first sample, so the result is defined from the first
/// defined input.
///
/// # Errors
///
/// `Error::InvalidPeriod`, `Error::EmptyInput`, or `Error::InvalidParameter`
/// when `factor` is outside `0..=1`.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::t3::{t3, T3Mode};
///
/// let result = t3(&[10.0_f64, 20.0], 3, 0.7, T3Mode::Single).unwrap();
/// assert!((result[1] - 16.75).abs() < 1e-10);
/// ```
pub fn t3<T: SeriesElement>(data: &[T], length: usize, factor: f64, mode: T3Mode) -> Result<Vec<T>> {
    validate_period_and_data(data, length)?;
    validate_factor(factor)?;

    let alpha = ema_alpha(length)?;
    let v = T::from_f64(factor)?;
    let mut out = data.to_vec();
    for _ in 0..mode.passes() {
        out = t3_pass(&out, alpha, v);
    }
    Ok(out)
}

fn t3_pass<T: SeriesElement>(data: &[T], alpha: T, v: T) -> Vec<T> {
    let e1 = exponential(data, alpha);
    let e2 = exponential(&e1, alpha);
    e1.iter()
        .zip(&e2)
        .map(|(&a, &b)| (T::one() + v) * a - v * b)
        .collect()
}

fn validate_factor(factor: f64) -> Result<()> {
    if (0.0..=1.0).contains(&factor) {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            "factor",
            format!("must lie in 0..=1, got {factor}"),
        ))
    }
}

/// Long/short flags and trend state from the T3/ROC fold.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSignals<T> {
    /// 1 on bars that start a long trend, else 0.
    pub long: Vec<T>,
    /// 1 on bars that start a short trend, else 0.
    pub short: Vec<T>,
    /// Trend state after each bar, one of -2, -1, 0, 1, 2.
    pub trend: Vec<T>,
}

/// Folds close, T3, ROC and ROC line codes into trend signals.
///
/// Per bar, starting from trend 0:
/// 1. while trending, a line code `<= filter` moves the trend to ±2 and
///    suppresses signals on this bar;
/// 2. otherwise close above T3 with positive ROC starts a long trend (unless
///    already long), close below T3 with negative ROC starts a short trend.
///
/// Undefined values never satisfy a comparison.
///
/// # Errors
///
/// `Error::LengthMismatch` if the slices differ in length,
/// `Error::NumericConversion` if `filter` is not representable.
pub fn trend_signals<T: SeriesElement>(
    close: &[T],
    t3: &[T],
    roc: &[T],
    line: &[T],
    filter: f64,
) -> Result<TrendSignals<T>> {
    crate::traits::validate_aligned(("close", close), &[("t3", t3), ("roc", roc), ("line", line)])?;
    let filter = T::from_f64(filter)?;

    let rows: Vec<(T, T, T, T)> = (0..close.len())
        .map(|i| (close[i], t3[i], roc[i], line[i]))
        .collect();

    let steps = recurrence(&rows, 0_i8, |trend, (c, avg, r, l)| {
        let mut trend = trend;
        let mut filtered = false;
        if trend > 0 && l <= filter {
            trend = 2;
            filtered = true;
        } else if trend < 0 && l <= filter {
            trend = -2;
            filtered = true;
        }

        let mut long = false;
        let mut short = false;
        if !filtered && c > avg && r > T::zero() && trend < 1 {
            long = true;
            trend = 1;
        } else if !filtered && c < avg && r < T::zero() && trend > -1 {
            short = true;
            trend = -1;
        }
        (trend, (long, short, trend))
    });

    let mut signals = TrendSignals {
        long: Vec::with_capacity(steps.len()),
        short: Vec::with_capacity(steps.len()),
        trend: Vec::with_capacity(steps.len()),
    };
    for (long, short, trend) in steps {
        signals.long.push(flag(long));
        signals.short.push(flag(short));
        signals.trend.push(T::from_i32(i32::from(trend))?);
    }
    Ok(signals)
}

/// Output of [`T3Roc`].
#[derive(Debug, Clone, PartialEq)]
pub struct T3RocOutput<T> {
    /// T3 average of the source.
    pub t3: Vec<T>,
    /// Rate of change of close.
    pub roc: Vec<T>,
    /// ROC color code, -10..=10.
    pub color: Vec<T>,
    /// ROC line code, 0..=5.
    pub line: Vec<T>,
    /// Trend signals.
    pub signals: TrendSignals<T>,
}

impl<T: SeriesElement> T3RocOutput<T> {
    /// Named channels `T3`, `ROC`, `ROC Color`, `ROC Line`, `Long`, `Short`, `Trend`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("t3_roc", self.t3.len())
            .with_channel("T3", self.t3)
            .with_channel("ROC", self.roc)
            .with_channel("ROC Color", self.color)
            .with_channel("ROC Line", self.line)
            .with_channel("Long", self.signals.long)
            .with_channel("Short", self.signals.short)
            .with_channel("Trend", self.signals.trend)
    }
}

/// T3 average with ROC trend signals.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::t3::{T3Mode, T3Roc};
/// use algo_ta::indicators::roc::RocNormalization;
///
/// let config = T3Roc::new()
///     .length(10)
///     .mode(T3Mode::Triple)
///     .normalization(RocNormalization::Expanding);
/// assert_eq!(config.length, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct T3Roc {
    /// EMA and ROC length.
    pub length: usize,
    /// Volume factor of each T3 pass.
    pub factor: f64,
    /// Number of T3 passes.
    pub mode: T3Mode,
    /// Line code at or below which a running trend suppresses new signals.
    pub roc_filter: f64,
    /// Extremes used for the color and line codes.
    pub normalization: RocNormalization,
    /// Price column fed to T3. ROC and signals always use close.
    pub source: PriceSource,
}

impl Default for T3Roc {
    /// Length 21, factor 0.7, DOUBLE mode, filter 1, whole-series codes.
    fn default() -> Self {
        Self {
            length: 21,
            factor: 0.7,
            mode: T3Mode::Double,
            roc_filter: 1.0,
            normalization: RocNormalization::WholeSeries,
            source: PriceSource::Close,
        }
    }
}

impl T3Roc {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the EMA and ROC length.
    ///
    /// Default: 21
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the volume factor.
    ///
    /// Default: 0.7
    #[must_use]
    pub const fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Sets the number of passes.
    ///
    /// Default: DOUBLE
    #[must_use]
    pub const fn mode(mut self, mode: T3Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the line-code filter.
    ///
    /// Default: 1
    #[must_use]
    pub const fn roc_filter(mut self, roc_filter: f64) -> Self {
        self.roc_filter = roc_filter;
        self
    }

    /// Sets the ROC code normalization.
    ///
    /// Default: whole series
    #[must_use]
    pub const fn normalization(mut self, normalization: RocNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Sets the price column for T3.
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
    /// for a factor outside `0..=1` or a non-finite filter.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.length)?;
        validate_factor(self.factor)?;
        if !self.roc_filter.is_finite() {
            return Err(Error::invalid_parameter(
                "roc_filter",
                format!("must be finite, got {}", self.roc_filter),
            ));
        }
        Ok(())
    }

    /// Index of the first defined ROC value.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        roc_lookback(self.length)
    }

    /// Computes T3, ROC, the ROC codes and the trend signals.
    ///
    /// # Errors
    ///
    /// Same as [`T3Roc::validate`], plus `Error::EmptyInput`.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<T3RocOutput<T>> {
        self.validate()?;
        let close = series.close();
        let average = t3(&series.source(self.source), self.length, self.factor, self.mode)?;
        let roc = crate::indicators::roc::roc(close, self.length)?;
        let codes = roc_codes(&roc, self.normalization);
        let signals = trend_signals(close, &average, &roc, &codes.line, self.roc_filter)?;

        Ok(T3RocOutput {
            t3: average,
            roc,
            color: codes.color,
            line: codes.line,
            signals,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::indicators::ema::ema;
    use crate::utils::{approx_eq, EPSILON};

    fn series_from_close(close: &[f64]) -> Series<f64> {
        let n = close.len();
        let ts: Vec<i64> = (0..n as i64).map(|i| i * 60).collect();
        Series::from_columns(ts, close.to_vec(), close.to_vec(), close.to_vec(), close.to_vec(), vec![1.0; n])
            .unwrap()
    }

    #[test]
    fn test_zero_factor_single_pass_is_ema() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.4).sin()).collect();
        let t = t3(&data, 5, 0.0, T3Mode::Single).unwrap();
        let e = ema(&data, 5).unwrap();
        for (a, b) in t.iter().zip(&e) {
            assert!(approx_eq(*a, *b, 1e-12));
        }
    }

    #[test]
    fn test_constant_input_is_fixed_point() {
        for mode in [T3Mode::Single, T3Mode::Double, T3Mode::Triple] {
            let t = t3(&[42.0_f64; 25], 7, 0.7, mode).unwrap();
            assert!(t.iter().all(|v| approx_eq(*v, 42.0, 1e-9)));
        }
    }

    #[test]
    fn test_more_passes_lag_more_on_a_ramp() {
        let data: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let single = t3(&data, 5, 0.7, T3Mode::Single).unwrap();
        let triple = t3(&data, 5, 0.7, T3Mode::Triple).unwrap();
        assert!(triple[49] < single[49]);
    }

    #[test]
    fn test_factor_range() {
        assert!(t3(&[1.0_f64; 3], 2, 1.0, T3Mode::Single).is_ok());
        assert!(matches!(
            t3(&[1.0_f64; 3], 2, 1.5, T3Mode::Single),
            Err(Error::InvalidParameter { name: "factor", .. })
        ));
    }

    #[test]
    fn test_trend_signals_hand_case() {
        let nan = f64::NAN;
        let close = [10.0, 12.0, 12.0, 9.0];
        let avg = [11.0; 4];
        let roc = [nan, 5.0, 5.0, -5.0];
        let line = [nan, 3.0, 1.0, 3.0];
        let s = trend_signals(&close, &avg, &roc, &line, 1.0).unwrap();
        assert_eq!(s.long, vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(s.short, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(s.trend, vec![0.0, 1.0, 2.0, -1.0]);
    }

    #[test]
    fn test_filtered_trend_blocks_reentry() {
        // trend 2 is not < 1, so no new long while it persists
        let close = [12.0_f64, 12.0, 12.0];
        let avg = [11.0; 3];
        let roc = [5.0; 3];
        let line = [3.0, 0.0, 4.0];
        let s = trend_signals(&close, &avg, &roc, &line, 1.0).unwrap();
        assert_eq!(s.trend, vec![1.0, 2.0, 2.0]);
        assert_eq!(s.long, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_trend_signals_length_mismatch() {
        let r = trend_signals(&[1.0_f64, 2.0], &[1.0], &[1.0, 2.0], &[1.0, 2.0], 1.0);
        assert!(matches!(r, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn test_t3_roc_channels() {
        let close: Vec<f64> = (0..60).map(|i| 100.0 + 5.0 * (i as f64 * 0.2).sin()).collect();
        let out = T3Roc::new().length(5).compute(&series_from_close(&close)).unwrap();
        assert!(out.roc[..5].iter().all(|v| v.is_nan()));
        assert!(out.color.iter().skip(5).all(|v| (-10.0..=10.0).contains(v)));
        assert!(out.line.iter().skip(5).all(|v| (0.0..=5.0).contains(v)));
        assert!(out.signals.trend.iter().all(|t| [-2.0, -1.0, 0.0, 1.0, 2.0].contains(t)));
        assert!(out.signals.long.iter().any(|v| approx_eq(*v, 1.0, EPSILON)));

        let output = out.into_output();
        assert_eq!(
            output.names().collect::<Vec<_>>(),
            vec!["T3", "ROC", "ROC Color", "ROC Line", "Long", "Short", "Trend"]
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("triple".parse::<T3Mode>().unwrap(), T3Mode::Triple);
        assert_eq!("2".parse::<T3Mode>().unwrap(), T3Mode::Double);
        assert!("quad".parse::<T3Mode>().is_err());
        assert_eq!(T3Mode::default().to_string(), "DOUBLE");
    }
}
