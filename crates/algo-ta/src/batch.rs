//! Evaluating indicators over many series at once.
//!
//! With the `parallel` feature (on by default) batches at or above
//! [`BatchProcessor::min_parallel_threshold`] series run on the rayon
//! pool; smaller batches and builds without the feature run sequentially.
//! Results are returned in input order either way.
//!
//! # Example
//!
//! ```
//! use algo_ta::batch::BatchProcessor;
//! use algo_ta::engine::IndicatorConfig;
//! use algo_ta::indicators::Rsi;
//! use algo_ta::series::{Bar, Series};
//!
//! let symbols: Vec<Series<f64>> = (0..3)
//!     .map(|k| {
//!         Series::from_bars((0..30).map(|i| {
//!             let c = 100.0 + f64::from(k) + (f64::from(i) * 0.5).sin();
//!             Bar::new(i64::from(i) * 60, c, c + 1.0, c - 1.0, c, 1_000.0)
//!         }))
//!         .unwrap()
//!     })
//!     .collect();
//!
//! let outputs = BatchProcessor::new()
//!     .evaluate(&symbols, &IndicatorConfig::Rsi(Rsi::new()))
//!     .unwrap();
//! assert_eq!(outputs.len(), 3);
//! assert_eq!(outputs[2].get("RSI").unwrap().len(), 30);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::engine::IndicatorConfig;
use crate::error::Result;
use crate::output::IndicatorOutput;
use crate::series::Series;
use crate::traits::SeriesElement;

/// Batch processor for evaluating one indicator over many series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProcessor {
    /// Minimum number of series before the rayon pool is used.
    min_parallel_threshold: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Creates a processor that parallelises batches of 4 or more series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_threshold: 4,
        }
    }

    /// Sets the minimum batch size for parallel processing.
    #[must_use]
    pub const fn min_parallel_threshold(mut self, threshold: usize) -> Self {
        self.min_parallel_threshold = threshold;
        self
    }

    /// Whether a batch of `len` series would run in parallel.
    #[must_use]
    pub const fn is_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && len >= self.min_parallel_threshold
    }

    /// Applies `indicator_fn` to every item, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error returned by `indicator_fn`.
    #[cfg(feature = "parallel")]
    pub fn process<I, F, R>(&self, items: &[I], indicator_fn: F) -> Result<Vec<R>>
    where
        I: Sync,
        F: Fn(&I) -> Result<R> + Send + Sync,
        R: Send,
    {
        let parallel = self.is_parallel(items.len());
        trace!(items = items.len(), parallel, "scheduling batch");
        if parallel {
            items.par_iter().map(&indicator_fn).collect()
        } else {
            items.iter().map(indicator_fn).collect()
        }
    }

    /// Applies `indicator_fn` to every item, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error returned by `indicator_fn`.
    #[cfg(not(feature = "parallel"))]
    pub fn process<I, F, R>(&self, items: &[I], indicator_fn: F) -> Result<Vec<R>>
    where
        F: Fn(&I) -> Result<R>,
    {
        trace!(items = items.len(), parallel = false, "scheduling batch");
        items.iter().map(indicator_fn).collect()
    }

    /// Evaluates `config` over every series.
    ///
    /// # Errors
    ///
    /// The configuration's validation error, or the first evaluation error.
    pub fn evaluate<T: SeriesElement>(
        &self,
        series: &[Series<T>],
        config: &IndicatorConfig,
    ) -> Result<Vec<IndicatorOutput<T>>> {
        config.validate()?;
        self.process(series, |s| config.compute(s))
    }
}

/// Shorthand for [`BatchProcessor::new`]`.process(items, indicator_fn)`.
///
/// # Example
///
/// ```
/// use algo_ta::batch::process_batch;
/// use algo_ta::indicators::sma;
///
/// let columns = vec![
///     vec![1.0_f64, 2.0, 3.0, 4.0, 5.0],
///     vec![5.0, 4.0, 3.0, 2.0, 1.0],
/// ];
///
/// let results = process_batch(&columns, |c| sma(c, 3)).unwrap();
/// assert!((results[1][2] - 4.0).abs() < 1e-10);
/// ```
///
/// # Errors
///
/// The first error returned by `indicator_fn`.
#[cfg(feature = "parallel")]
pub fn process_batch<I, F, R>(items: &[I], indicator_fn: F) -> Result<Vec<R>>
where
    I: Sync,
    F: Fn(&I) -> Result<R> + Send + Sync,
    R: Send,
{
    BatchProcessor::new().process(items, indicator_fn)
}

/// Shorthand for [`BatchProcessor::new`]`.process(items, indicator_fn)`.
///
/// # Errors
///
/// The first error returned by `indicator_fn`.
#[cfg(not(feature = "parallel"))]
pub fn process_batch<I, F, R>(items: &[I], indicator_fn: F) -> Result<Vec<R>>
where
    F: Fn(&I) -> Result<R>,
{
    BatchProcessor::new().process(items, indicator_fn)
}
