//! Accumulation/Distribution Money Flow (ADMF).
//!
//! ```text
//! AD Ratio  = (1 - w) × r + sign(r) × w,
//!             r = ΔClose / (max(H, L, C) - min(H, L, C))
//! flow      = Volume × HLC3          (or raw Volume)
//! ADMF      = SMA(flow, length)
//! MA1       = smooth(ma1, ADMF)
//! MA2       = smooth(ma2, MA1)
//! Histogram = MA1 - MA2
//! Gradient  = 100 × Histogram / (max(Histogram) - min(Histogram))   over norm_period
//! ```
//!
//! A zero bar range leaves the AD ratio undefined, and so does a flat
//! histogram window for the gradient.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::smoothing::Smoothing;
use crate::kernels::{rolling_max, rolling_mean, rolling_min};
use crate::output::IndicatorOutput;
use crate::series::{typical_price, Series};
use crate::traits::{validate_period, SeriesElement, ValidatedInput};
use crate::utils::{checked_ratio, sign};

/// Output of [`Admf`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdmfOutput<T> {
    /// Weighted close-change to bar-range ratio.
    pub ad_ratio: Vec<T>,
    /// Rolling mean of money flow.
    pub admf: Vec<T>,
    /// Fast smoothing of ADMF.
    pub ma1: Vec<T>,
    /// Smoothing of MA1.
    pub ma2: Vec<T>,
    /// MA1 - MA2.
    pub histogram: Vec<T>,
    /// Histogram as a percentage of its recent range.
    pub gradient: Vec<T>,
}

impl<T: SeriesElement> AdmfOutput<T> {
    /// Named channels `AD Ratio`, `ADMF`, `MA1`, `MA2`, `Histogram`, `Gradient`.
    #[must_use]
    pub fn into_output(self) -> IndicatorOutput<T> {
        IndicatorOutput::new("admf", self.admf.len())
            .with_channel("AD Ratio", self.ad_ratio)
            .with_channel("ADMF", self.admf)
            .with_channel("MA1", self.ma1)
            .with_channel("MA2", self.ma2)
            .with_channel("Histogram", self.histogram)
            .with_channel("Gradient", self.gradient)
    }
}

/// Computes the weighted AD ratio for each bar; bar 0 is undefined.
///
/// # Errors
///
/// `Error::EmptyInput`, `Error::LengthMismatch`, or
/// `Error::InvalidParameter` when `weight` is outside `0..=1`.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::admf::ad_ratio;
///
/// let high = [12.0_f64, 13.0];
/// let low = [8.0_f64, 9.0];
/// let close = [10.0_f64, 12.0];
/// let ratio = ad_ratio(&high, &low, &close, 0.0).unwrap();
/// assert!(ratio[0].is_nan());
/// assert!((ratio[1] - 0.5).abs() < 1e-12);
/// ```
pub fn ad_ratio<T: SeriesElement>(high: &[T], low: &[T], close: &[T], weight: f64) -> Result<Vec<T>> {
    crate::traits::validate_aligned(("high", high), &[("low", low), ("close", close)])?;
    validate_weight(weight)?;
    let w = T::from_f64(weight)?;

    Ok((0..close.len())
        .map(|i| {
            if i == 0 {
                return T::nan();
            }
            let top = high[i].max(low[i]).max(close[i]);
            let bottom = high[i].min(low[i]).min(close[i]);
            let r = checked_ratio(close[i] - close[i - 1], top - bottom);
            (T::one() - w) * r + sign(r) * w
        })
        .collect())
}

fn validate_weight(weight: f64) -> Result<()> {
    if (0.0..=1.0).contains(&weight) {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            "ad_weight",
            format!("must lie in 0..=1, got {weight}"),
        ))
    }
}

/// ADMF configuration.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::admf::Admf;
/// use algo_ta::indicators::smoothing::Smoothing;
///
/// let config = Admf::new().length(14).ma1(Smoothing::Sma, 3);
/// assert_eq!(config.ma1_length, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Admf {
    /// Money-flow averaging window.
    pub length: usize,
    /// Weight money flow by typical price.
    pub price_weighted: bool,
    /// Blend between the raw ratio and its sign.
    pub ad_weight: f64,
    /// Fast smoothing kind.
    pub ma1_kind: Smoothing,
    /// Fast smoothing length.
    pub ma1_length: usize,
    /// Slow smoothing kind.
    pub ma2_kind: Smoothing,
    /// Slow smoothing length.
    pub ma2_length: usize,
    /// Gradient normalization window.
    pub norm_period: usize,
}

impl Default for Admf {
    fn default() -> Self {
        Self {
            length: 9,
            price_weighted: true,
            ad_weight: 0.0,
            ma1_kind: Smoothing::Ema,
            ma1_length: 2,
            ma2_kind: Smoothing::Ema,
            ma2_length: 2,
            norm_period: 100,
        }
    }
}

impl Admf {
    /// Creates a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the money-flow window.
    ///
    /// Default: 9
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Chooses price-weighted (`true`) or raw volume.
    ///
    /// Default: true
    #[must_use]
    pub const fn price_weighted(mut self, price_weighted: bool) -> Self {
        self.price_weighted = price_weighted;
        self
    }

    /// Sets the AD ratio sign weight.
    ///
    /// Default: 0.0
    #[must_use]
    pub const fn ad_weight(mut self, ad_weight: f64) -> Self {
        self.ad_weight = ad_weight;
        self
    }

    /// Sets the fast smoothing.
    ///
    /// Default: EMA, 2
    #[must_use]
    pub const fn ma1(mut self, kind: Smoothing, length: usize) -> Self {
        self.ma1_kind = kind;
        self.ma1_length = length;
        self
    }

    /// Sets the slow smoothing.
    ///
    /// Default: EMA, 2
    #[must_use]
    pub const fn ma2(mut self, kind: Smoothing, length: usize) -> Self {
        self.ma2_kind = kind;
        self.ma2_length = length;
        self
    }

    /// Sets the gradient window.
    ///
    /// Default: 100
    #[must_use]
    pub const fn norm_period(mut self, norm_period: usize) -> Self {
        self.norm_period = norm_period;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// `Error::InvalidPeriod` for any zero length, `Error::InvalidParameter`
    /// for a weight outside `0..=1`.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.length)?;
        validate_period(self.ma1_length)?;
        validate_period(self.ma2_length)?;
        validate_period(self.norm_period)?;
        validate_weight(self.ad_weight)
    }

    /// Computes every ADMF channel.
    ///
    /// # Errors
    ///
    /// Same as [`Admf::validate`], plus `Error::EmptyInput`.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<AdmfOutput<T>> {
        self.validate()?;
        series.close().validate_not_empty()?;

        let (high, low, close, volume) = (series.high(), series.low(), series.close(), series.volume());
        let ratio = ad_ratio(high, low, close, self.ad_weight)?;

        let flow: Vec<T> = if self.price_weighted {
            typical_price(high, low, close)
                .iter()
                .zip(volume)
                .map(|(&p, &v)| p * v)
                .collect()
        } else {
            volume.to_vec()
        };

        let admf = rolling_mean(&flow, self.length);
        let ma1 = self.ma1_kind.apply(&admf, self.ma1_length, Some(volume))?;
        let ma2 = self.ma2_kind.apply(&ma1, self.ma2_length, Some(volume))?;
        let histogram: Vec<T> = ma1.iter().zip(&ma2).map(|(&a, &b)| a - b).collect();

        let top = rolling_max(&histogram, self.norm_period);
        let bottom = rolling_min(&histogram, self.norm_period);
        let gradient = (0..histogram.len())
            .map(|i| checked_ratio(histogram[i], top[i] - bottom[i]) * T::hundred())
            .collect();

        Ok(AdmfOutput {
            ad_ratio: ratio,
            admf,
            ma1,
            ma2,
            histogram,
            gradient,
        })
    }
}
