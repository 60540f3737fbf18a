//! algo-ta: causal batch technical analysis over OHLCV series
//!
//! This crate computes trading indicators over a complete, immutable history
//! of bars. Every output channel is exactly as long as the input and marks
//! undefined values (warm-up, zero denominators) with NaN. Values at bar `i`
//! depend only on bars `0..=i`.
//!
//! # Features
//!
//! - **Generics**: works with both `f32` and `f64` series
//! - **Configurable**: every indicator has a serde-deserializable
//!   configuration with documented defaults and a fluent builder
//! - **Parallel**: independent indicators and independent series are
//!   evaluated on the rayon pool (`parallel` feature, on by default)
//!
//! # Quick Start
//!
//! ```
//! use algo_ta::prelude::*;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let result = sma(&data, 3).unwrap();
//!
//! assert!(result[0].is_nan());
//! assert!(result[1].is_nan());
//! assert!((result[2] - 2.0).abs() < 1e-10);
//! ```
//!
//! # Indicators over bars
//!
//! ```
//! use algo_ta::prelude::*;
//!
//! let series = Series::from_bars((0..60).map(|i| {
//!     let c = 100.0_f64 + f64::from(i).sin();
//!     Bar::new(i64::from(i) * 60, c, c + 0.5, c - 0.5, c, 1_000.0)
//! }))
//! .unwrap();
//!
//! let atr = Atr::new().length(14).unit(AtrUnit::Percentage).compute(&series).unwrap();
//! let adx = Adx::new().compute(&series).unwrap();
//! assert_eq!(atr.len(), 60);
//! assert_eq!(adx.adx.len(), 60);
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T, Error>`]:
//!
//! ```
//! use algo_ta::prelude::*;
//!
//! // Period too long for a smoothing primitive
//! assert!(sma(&[1.0_f64, 2.0], 10).is_err());
//!
//! // Composite indicators treat a short history as a cold start
//! let out = zlsma(&[1.0_f64, 2.0], 32, 0).unwrap();
//! assert!(out.zlsma.iter().all(|v| v.is_nan()));
//!
//! // Empty data is always an error
//! let empty: Vec<f64> = vec![];
//! assert_eq!(sma(&empty, 5), Err(Error::EmptyInput));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod kernels;
pub mod output;
pub mod prelude;
pub mod resample;
pub mod series;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use engine::{IndicatorConfig, IndicatorEngine, NamedIndicator};
pub use error::{Error, Result};
pub use output::IndicatorOutput;
pub use series::{Bar, PriceSource, Series, SeriesBuilder};
pub use traits::{SeriesElement, ValidatedInput};
pub use utils::{approx_eq, approx_eq_relative, count_nan_prefix, count_nans, EPSILON, LOOSE_EPSILON};
