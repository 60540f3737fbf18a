//! Configuration-driven indicator evaluation.
//!
//! [`IndicatorConfig`] is the tagged union of every indicator's
//! configuration. It deserializes from any serde format with an `indicator`
//! key selecting the variant and the remaining keys filling the variant's
//! fields (missing fields take their defaults):
//!
//! ```toml
//! [[indicator]]
//! name = "fast atr"
//! indicator = "atr"
//! length = 10
//! unit = { kind = "percentage" }
//!
//! [[indicator]]
//! name = "trend"
//! indicator = "t3_roc"
//! mode = "TRIPLE"
//! ```
//!
//! An [`IndicatorEngine`] holds a list of [`NamedIndicator`]s and evaluates
//! all of them over one series. Evaluations share nothing but the read-only
//! series, so with the `parallel` feature they run on the rayon pool.

use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::indicators::{
    Admf, Adx, Atr, Chandelier, Envelope, Macd, MovingAverage, MultiMacd, Rsi, T3Roc, Zlsma,
};
use crate::output::IndicatorOutput;
use crate::series::Series;
use crate::traits::SeriesElement;

/// Configuration of one indicator, tagged by its `indicator` name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "indicator", rename_all = "snake_case")]
pub enum IndicatorConfig {
    /// Average True Range.
    Atr(Atr),
    /// Average Directional Index.
    Adx(Adx),
    /// Relative Strength Index with optional outlier flags.
    Rsi(Rsi),
    /// MACD.
    Macd(Macd),
    /// MACD averaged across resolutions.
    MultiMacd(MultiMacd),
    /// Moving-average envelope.
    Envelope(Envelope),
    /// T3 average with ROC trend signals.
    T3Roc(T3Roc),
    /// Chandelier Exit.
    Chandelier(Chandelier),
    /// Accumulation/Distribution Money Flow.
    Admf(Admf),
    /// Zero-lag least squares moving average.
    Zlsma(Zlsma),
    /// Any smoothing primitive over a price column.
    MovingAverage(MovingAverage),
}

impl IndicatorConfig {
    /// The `indicator` tag of this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Atr(_) => "atr",
            Self::Adx(_) => "adx",
            Self::Rsi(_) => "rsi",
            Self::Macd(_) => "macd",
            Self::MultiMacd(_) => "multi_macd",
            Self::Envelope(_) => "envelope",
            Self::T3Roc(_) => "t3_roc",
            Self::Chandelier(_) => "chandelier",
            Self::Admf(_) => "admf",
            Self::Zlsma(_) => "zlsma",
            Self::MovingAverage(_) => "moving_average",
        }
    }

    /// Checks the configuration without touching any data.
    ///
    /// # Errors
    ///
    /// The variant's own validation error.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Atr(c) => c.validate(),
            Self::Adx(c) => c.validate(),
            Self::Rsi(c) => c.validate(),
            Self::Macd(c) => c.validate(),
            Self::MultiMacd(c) => c.validate(),
            Self::Envelope(c) => c.validate(),
            Self::T3Roc(c) => c.validate(),
            Self::Chandelier(c) => c.validate(),
            Self::Admf(c) => c.validate(),
            Self::Zlsma(c) => c.validate(),
            Self::MovingAverage(c) => c.validate(),
        }
    }

    /// Evaluates the indicator over `series`.
    ///
    /// # Errors
    ///
    /// Any error of the underlying indicator; `Error::EmptyInput` for an
    /// empty series.
    pub fn compute<T: SeriesElement>(&self, series: &Series<T>) -> Result<IndicatorOutput<T>> {
        self.validate()?;
        if series.is_empty() {
            return Err(Error::EmptyInput);
        }

        let output = match self {
            Self::Atr(c) => c.compute_output(series)?,
            Self::Adx(c) => c.compute(series)?.into_output(),
            Self::Rsi(c) => c.compute_output(series)?,
            Self::Macd(c) => c.compute(series)?.into_output(),
            Self::MultiMacd(c) => c.compute(series)?.into_output(),
            Self::Envelope(c) => c.compute(series)?.into_output(),
            Self::T3Roc(c) => c.compute(series)?.into_output(),
            Self::Chandelier(c) => c.compute(series)?.into_output(),
            Self::Admf(c) => c.compute(series)?.into_output(),
            Self::Zlsma(c) => c.compute(series)?.into_output(),
            Self::MovingAverage(c) => IndicatorOutput::new("moving_average", series.len())
                .with_channel(c.kind.as_str(), c.compute(series)?),
        };
        Ok(output)
    }
}

/// An indicator configuration with a user-facing name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedIndicator {
    /// Name reported on the output.
    pub name: String,
    /// The indicator and its parameters.
    #[serde(flatten)]
    pub config: IndicatorConfig,
}

impl NamedIndicator {
    /// Pairs a name with a configuration.
    pub fn new(name: impl Into<String>, config: IndicatorConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Evaluates the indicator; the output carries this indicator's name.
    ///
    /// # Errors
    ///
    /// Same as [`IndicatorConfig::compute`].
    pub fn evaluate<T: SeriesElement>(&self, series: &Series<T>) -> Result<IndicatorOutput<T>> {
        debug!(
            name = %self.name,
            indicator = self.config.kind(),
            bars = series.len(),
            config = ?self.config,
            "evaluating indicator"
        );
        let mut output = self.config.compute(series)?;
        output.set_indicator(self.name.clone());
        Ok(output)
    }
}

/// An ordered set of named indicators evaluated together.
///
/// Deserializes from a document whose `indicator` array holds the named
/// configurations, the layout of a TOML run file with `[[indicator]]` tables.
///
/// # Example
///
/// ```
/// use algo_ta::engine::{IndicatorConfig, IndicatorEngine};
/// use algo_ta::indicators::{Atr, Zlsma};
/// use algo_ta::series::{Bar, Series};
///
/// let series = Series::from_bars(
///     (0..40).map(|i| Bar::new(i * 60, 100.0_f64, 101.0, 99.0, 100.0, 10.0)),
/// )
/// .unwrap();
///
/// let engine = IndicatorEngine::new()
///     .with("atr", IndicatorConfig::Atr(Atr::new().length(5)))
///     .with("zlsma", IndicatorConfig::Zlsma(Zlsma::new().length(8)));
///
/// let outputs = engine.run(&series).unwrap();
/// assert_eq!(outputs[0].indicator(), "atr");
/// assert_eq!(outputs[1].get("ZLSMA").unwrap().len(), 40);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEngine {
    #[serde(rename = "indicator", default)]
    indicators: Vec<NamedIndicator>,
}

impl IndicatorEngine {
    /// An engine with no indicators.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            indicators: Vec::new(),
        }
    }

    /// Adds an indicator, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, config: IndicatorConfig) -> Self {
        self.push(NamedIndicator::new(name, config));
        self
    }

    /// Adds an indicator.
    pub fn push(&mut self, indicator: NamedIndicator) {
        self.indicators.push(indicator);
    }

    /// The configured indicators in evaluation order.
    #[must_use]
    pub fn indicators(&self) -> &[NamedIndicator] {
        &self.indicators
    }

    /// Number of configured indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    /// Returns `true` when no indicator is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Validates every configuration and rejects duplicate or empty names.
    ///
    /// # Errors
    ///
    /// The first configuration error, or `Error::InvalidParameter` naming
    /// `name`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for indicator in &self.indicators {
            if indicator.name.trim().is_empty() {
                return Err(Error::invalid_parameter("name", "indicator names must not be empty"));
            }
            if !seen.insert(indicator.name.as_str()) {
                return Err(Error::invalid_parameter(
                    "name",
                    format!("duplicate indicator name '{}'", indicator.name),
                ));
            }
            indicator.config.validate()?;
        }
        Ok(())
    }

    /// Evaluates every indicator over `series`, in configuration order.
    ///
    /// # Errors
    ///
    /// Same as [`IndicatorEngine::validate`], plus the first evaluation error.
    pub fn run<T: SeriesElement>(&self, series: &Series<T>) -> Result<Vec<IndicatorOutput<T>>> {
        self.validate()?;
        trace!(indicators = self.indicators.len(), bars = series.len(), "running engine");

        #[cfg(feature = "parallel")]
        let outputs = self
            .indicators
            .par_iter()
            .map(|indicator| indicator.evaluate(series))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outputs = self
            .indicators
            .iter()
            .map(|indicator| indicator.evaluate(series))
            .collect();

        outputs
    }
}

impl FromIterator<NamedIndicator> for IndicatorEngine {
    fn from_iter<I: IntoIterator<Item = NamedIndicator>>(iter: I) -> Self {
        Self {
            indicators: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::indicators::{AtrUnit, Smoothing, T3Mode};
    use crate::series::Bar;

    fn sample(n: i64) -> Series<f64> {
        Series::from_bars((0..n).map(|i| {
            let c = 100.0 + (i as f64 * 0.25).sin() * 4.0;
            Bar::new(i * 3_600, c - 0.3, c + 1.0, c - 1.0, c, 1_000.0 + i as f64)
        }))
        .unwrap()
    }

    #[test]
    fn test_every_kind_produces_aligned_channels() {
        let series = sample(120);
        let configs = vec![
            IndicatorConfig::Atr(Atr::new()),
            IndicatorConfig::Adx(Adx::new()),
            IndicatorConfig::Rsi(Rsi::new().outliers(10)),
            IndicatorConfig::Macd(Macd::new()),
            IndicatorConfig::MultiMacd(MultiMacd::new()),
            IndicatorConfig::Envelope(Envelope::new()),
            IndicatorConfig::T3Roc(T3Roc::new()),
            IndicatorConfig::Chandelier(Chandelier::new()),
            IndicatorConfig::Admf(Admf::new()),
            IndicatorConfig::Zlsma(Zlsma::new()),
            IndicatorConfig::MovingAverage(MovingAverage::new().kind(Smoothing::Hma)),
        ];
        for config in configs {
            let output = config.compute(&series).unwrap();
            assert_eq!(output.indicator(), config.kind());
            assert!(output.channel_count() >= 1, "{}", config.kind());
            for (name, values) in output.channels() {
                assert_eq!(values.len(), 120, "{} / {name}", config.kind());
            }
        }
    }

    #[test]
    fn test_moving_average_channel_is_named_after_kind() {
        let config = IndicatorConfig::MovingAverage(MovingAverage::new().kind(Smoothing::Rma).length(3));
        let output = config.compute(&sample(10)).unwrap();
        assert_eq!(output.names().collect::<Vec<_>>(), vec!["RMA"]);
    }

    #[test]
    fn test_run_preserves_order_and_names() {
        let engine = IndicatorEngine::new()
            .with("slow", IndicatorConfig::Zlsma(Zlsma::new()))
            .with("fast", IndicatorConfig::Atr(Atr::new().length(3)));
        let outputs = engine.run(&sample(50)).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].indicator(), "slow");
        assert_eq!(outputs[1].indicator(), "fast");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let engine = IndicatorEngine::new()
            .with("x", IndicatorConfig::Atr(Atr::new()))
            .with("x", IndicatorConfig::Adx(Adx::new()));
        assert!(matches!(engine.validate(), Err(Error::InvalidParameter { name: "name", .. })));
    }

    #[test]
    fn test_invalid_config_fails_before_computation() {
        let engine = IndicatorEngine::new().with("bad", IndicatorConfig::Macd(Macd::new().fast(30)));
        assert!(engine.run(&sample(10)).is_err());
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let empty = crate::series::SeriesBuilder::<f64>::new().build();
        assert_eq!(IndicatorConfig::Atr(Atr::new()).compute(&empty), Err(Error::EmptyInput));
    }

    #[test]
    fn test_deserialize_run_file() {
        let text = r#"
            [[indicator]]
            name = "atr ticks"
            indicator = "atr"
            length = 10
            unit = { kind = "ticks", tick_size = 0.25 }

            [[indicator]]
            name = "t3"
            indicator = "t3_roc"
            mode = "triple"

            [[indicator]]
            name = "hull"
            indicator = "moving_average"
            kind = "HULL"
            length = 9
        "#;
        let engine: IndicatorEngine = toml::from_str(text).unwrap();
        assert_eq!(engine.len(), 3);
        assert_eq!(
            engine.indicators()[0].config,
            IndicatorConfig::Atr(Atr::new().length(10).unit(AtrUnit::Ticks { tick_size: 0.25 }))
        );
        assert_eq!(
            engine.indicators()[1].config,
            IndicatorConfig::T3Roc(T3Roc::new().mode(T3Mode::Triple))
        );
        assert_eq!(
            engine.indicators()[2].config,
            IndicatorConfig::MovingAverage(MovingAverage::new().kind(Smoothing::Hma).length(9))
        );
        assert!(engine.validate().is_ok());
    }

    #[test]
    fn test_unknown_indicator_tag_rejected() {
        let text = r#"
            [[indicator]]
            name = "x"
            indicator = "ichimoku"
        "#;
        assert!(toml::from_str::<IndicatorEngine>(text).is_err());
    }
}
