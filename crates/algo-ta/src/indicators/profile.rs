//! RSI outlier profile.
//!
//! A whole-series statistic: bars whose *price-movement liquidity* (volume
//! per unit of candle body) breaks above a volatility boundary are treated as
//! outliers, and the RSI readings on those bars are histogrammed to find
//! where RSI tends to sit when liquidity spikes.
//!
//! ```text
//! liquidity = Volume / |Close - Open|              (NaN for a zero body)
//! boundary  = EMA(liquidity, L) + stddev(liquidity, L)
//! outlier   = liquidity > boundary
//! ```
//!
//! The histogram buckets `round(RSI)` clamped to `0..=100`. The summary
//! reports the most and least frequent buckets, the mean and the population
//! standard deviation of the bucketed values, and the 68% interval
//! `mean ± stddev`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::ema::ema_values;
use crate::indicators::rsi::rsi;
use crate::kernels::rolling_stddev;
use crate::series::Series;
use crate::traits::{validate_aligned, validate_period, SeriesElement};

/// Number of histogram buckets (RSI 0 through 100).
pub const RSI_BUCKETS: usize = 101;

/// Volume traded per unit of candle body.
///
/// # Errors
///
/// `Error::EmptyInput` or `Error::LengthMismatch`.
pub fn price_movement_liquidity<T: SeriesElement>(
    open: &[T],
    close: &[T],
    volume: &[T],
) -> Result<Vec<T>> {
    validate_aligned(("open", open), &[("close", close), ("volume", volume)])?;
    Ok((0..open.len())
        .map(|i| {
            let body = (close[i] - open[i]).abs();
            if body == T::zero() {
                T::nan()
            } else {
                volume[i] / body
            }
        })
        .collect())
}

/// `EMA(liquidity, length) + stddev(liquidity, length)`.
///
/// # Errors
///
/// `Error::InvalidPeriod` for a zero length.
pub fn liquidity_boundary<T: SeriesElement>(liquidity: &[T], length: usize) -> Result<Vec<T>> {
    validate_period(length)?;
    let ema = ema_values(liquidity, length)?;
    let stddev = rolling_stddev(liquidity, length);
    Ok(ema.iter().zip(&stddev).map(|(&e, &s)| e + s).collect())
}

/// Summary of RSI readings on liquidity outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiProfile {
    /// Count of outlier bars per rounded RSI value.
    pub histogram: Vec<usize>,
    /// Number of outlier bars with a defined RSI.
    pub samples: usize,
    /// Most frequent rounded RSI (lowest on ties).
    pub most_frequent: usize,
    /// Occurrences of `most_frequent`.
    pub most_frequent_count: usize,
    /// Least frequent rounded RSI among those that occur (lowest on ties).
    pub least_frequent: usize,
    /// Occurrences of `least_frequent`.
    pub least_frequent_count: usize,
    /// Mean rounded RSI.
    pub mean: f64,
    /// Population standard deviation of the rounded RSI.
    pub stddev: f64,
}

impl RsiProfile {
    /// Builds the profile from RSI values and an outlier mask. Undefined RSI
    /// values are skipped. Returns `None` when no outlier has a defined RSI.
    #[must_use]
    pub fn from_outliers<T: SeriesElement>(rsi: &[T], outliers: &[bool]) -> Option<Self> {
        let mut histogram = vec![0_usize; RSI_BUCKETS];
        for (&value, _) in rsi.iter().zip(outliers).filter(|(_, &o)| o) {
            if let Some(bucket) = bucket(value.to_f64_lossy()) {
                histogram[bucket] += 1;
            }
        }
        Self::from_histogram(histogram)
    }

    fn from_histogram(histogram: Vec<usize>) -> Option<Self> {
        let samples: usize = histogram.iter().sum();
        if samples == 0 {
            return None;
        }

        let (most_frequent, most_frequent_count) = histogram
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0), |best, (k, c)| if c > best.1 { (k, c) } else { best });
        let (least_frequent, least_frequent_count) = histogram
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, c)| c > 0)
            .fold((0, usize::MAX), |best, (k, c)| if c < best.1 { (k, c) } else { best });

        let (sum, sum_sq) = histogram
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(s, sq), (k, &c)| {
                let (k, c) = (k as f64, c as f64);
                (s + k * c, sq + k * k * c)
            });
        let n = samples as f64;
        let mean = sum / n;
        let stddev = (sum_sq / n - mean * mean).max(0.0).sqrt();

        Some(Self {
            histogram,
            samples,
            most_frequent,
            most_frequent_count,
            least_frequent,
            least_frequent_count,
            mean,
            stddev,
        })
    }

    /// Lower edge of the 68% interval, `mean - stddev`.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.mean - self.stddev
    }

    /// Upper edge of the 68% interval, `mean + stddev`.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.mean + self.stddev
    }
}

fn bucket(value: f64) -> Option<usize> {
    if value.is_nan() {
        return None;
    }
    let rounded = value.round().clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(rounded as usize)
}

impl fmt::Display for RsiProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Most Frequent RSI: {} ({} times)",
            self.most_frequent, self.most_frequent_count
        )?;
        writeln!(
            f,
            "Least Frequent RSI: {} ({} times)",
            self.least_frequent, self.least_frequent_count
        )?;
        writeln!(f, "Mean RSI: {:.2}", self.mean)?;
        writeln!(f, "Standard Deviation: {:.2}", self.stddev)?;
        write!(
            f,
            "68% Confidence Interval: {:.0} - {:.0}",
            self.lower(),
            self.upper()
        )
    }
}

/// Configuration of the RSI outlier profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierProfile {
    /// RSI length.
    pub rsi_length: usize,
    /// Window of the liquidity boundary.
    pub outlier_length: usize,
}

impl Default for OutlierProfile {
    /// RSI 14, boundary window 10.
    fn default() -> Self {
        Self {
            rsi_length: 14,
            outlier_length: 10,
        }
    }
}

impl OutlierProfile {
    /// Creates a profile configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the RSI length.
    ///
    /// Default: 14
    #[must_use]
    pub const fn rsi_length(mut self, length: usize) -> Self {
        self.rsi_length = length;
        self
    }

    /// Sets the liquidity boundary window.
    ///
    /// Default: 10
    #[must_use]
    pub const fn outlier_length(mut self, length: usize) -> Self {
        self.outlier_length = length;
        self
    }

    /// Marks the liquidity outliers of `series`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` or `Error::EmptyInput`.
    pub fn outliers<T: SeriesElement>(&self, series: &Series<T>) -> Result<Vec<bool>> {
        let liquidity = price_movement_liquidity(series.open(), series.close(), series.volume())?;
        let boundary = liquidity_boundary(&liquidity, self.outlier_length)?;
        // NaN on either side compares false
        Ok(liquidity
            .iter()
            .zip(&boundary)
            .map(|(&l, &b)| l > b)
            .collect())
    }

    /// Computes the profile, `None` when the series has no usable outlier.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` or `Error::EmptyInput`.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<Option<RsiProfile>> {
        let rsi = rsi(series.close(), self.rsi_length)?;
        let outliers = self.outliers(series)?;
        Ok(RsiProfile::from_outliers(&rsi, &outliers))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::series::Bar;
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_liquidity_zero_body_is_undefined() {
        let liq = price_movement_liquidity(&[10.0_f64, 10.0], &[12.0, 10.0], &[100.0, 100.0]).unwrap();
        assert_eq!(liq[0], 50.0);
        assert!(liq[1].is_nan());
    }

    #[test]
    fn test_profile_statistics() {
        let rsi = vec![30.2_f64, 29.6, 70.0, 50.0, f64::NAN, 30.0];
        let outliers = vec![true, true, true, false, true, true];
        let profile = RsiProfile::from_outliers(&rsi, &outliers).unwrap();

        // buckets: 30, 30, 70, 30
        assert_eq!(profile.samples, 4);
        assert_eq!(profile.histogram[30], 3);
        assert_eq!(profile.most_frequent, 30);
        assert_eq!(profile.most_frequent_count, 3);
        assert_eq!(profile.least_frequent, 70);
        assert_eq!(profile.least_frequent_count, 1);
        assert!(approx_eq(profile.mean, 40.0, EPSILON));
        // population variance: (3*100 + 900) / 4 = 300
        assert!(approx_eq(profile.stddev, 300.0_f64.sqrt(), 1e-9));
        assert!(approx_eq(profile.lower() + profile.upper(), 80.0, 1e-9));
    }

    #[test]
    fn test_profile_clamps_buckets() {
        let profile = RsiProfile::from_outliers(&[100.4_f64, -0.2], &[true, true]).unwrap();
        assert_eq!(profile.histogram[100], 1);
        assert_eq!(profile.histogram[0], 1);
    }

    #[test]
    fn test_no_outliers_is_none() {
        assert!(RsiProfile::from_outliers(&[50.0_f64], &[false]).is_none());
        assert!(RsiProfile::from_outliers(&[f64::NAN], &[true]).is_none());
    }

    #[test]
    fn test_outlier_spike_is_detected() {
        let bars: Vec<Bar<f64>> = (0..40)
            .map(|i| {
                let open = 100.0 + (i % 5) as f64;
                let close = open + if i % 2 == 0 { 1.0 } else { -1.0 };
                let volume = match i {
                    30 => 50_000.0,
                    _ if i % 2 == 0 => 1_000.0,
                    _ => 1_100.0,
                };
                Bar::new(i, open, open.max(close) + 0.5, open.min(close) - 0.5, close, volume)
            })
            .collect();
        let series = Series::from_bars(bars).unwrap();
        let outliers = OutlierProfile::new().outliers(&series).unwrap();
        assert!(outliers[30]);
        assert_eq!(outliers.iter().filter(|&&o| o).count(), 1);

        let profile = OutlierProfile::new().compute(&series).unwrap().unwrap();
        assert_eq!(profile.samples, 1);
    }

    #[test]
    fn test_display_summary() {
        let profile = RsiProfile::from_outliers(&[40.0_f64, 60.0], &[true, true]).unwrap();
        let text = profile.to_string();
        assert!(text.contains("Most Frequent RSI: 40 (1 times)"));
        assert!(text.contains("68% Confidence Interval: 40 - 60"));
    }
}
