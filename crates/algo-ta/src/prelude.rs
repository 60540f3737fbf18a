//! Commonly used types and traits for convenient importing.
//!
//! # Usage
//!
//! ```
//! use algo_ta::prelude::*;
//!
//! let prices = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//!
//! let sma_result = sma(&prices, 3).unwrap();
//! let ema_result = ema(&prices, 3).unwrap();
//! let rsi_result = rsi(&prices, 5).unwrap();
//! assert_eq!(sma_result.len(), ema_result.len());
//! assert_eq!(rsi_result[9], 100.0);
//! ```
//!
//! # Contents
//!
//! - [`Error`] and [`Result`]
//! - [`SeriesElement`] and [`ValidatedInput`]
//! - [`Bar`], [`Series`], [`SeriesBuilder`], [`PriceSource`], [`Resolution`]
//! - the smoothing primitives and the plain-slice indicator functions
//! - every indicator configuration type
//! - [`IndicatorEngine`], [`IndicatorConfig`], [`NamedIndicator`],
//!   [`IndicatorOutput`] and [`BatchProcessor`]

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::traits::{SeriesElement, ValidatedInput};

// Input data
pub use crate::resample::{resample, Resolution};
pub use crate::series::{Bar, PriceSource, Series, SeriesBuilder, Timestamp};

// Smoothing primitives
pub use crate::indicators::{dema, ema, hma, rma, sma, smooth, tema, vwma, wma, Smoothing};

// Plain-slice indicator functions
pub use crate::indicators::{atr, envelope, macd, roc, rsi, t3, true_range, zlsma};

// Configuration types
pub use crate::indicators::{
    Admf, Adx, Atr, AtrUnit, Chandelier, Envelope, Macd, MovingAverage, MultiMacd, OutlierProfile,
    RocNormalization, Rsi, T3Mode, T3Roc, Zlsma,
};

// Evaluation
pub use crate::batch::BatchProcessor;
pub use crate::engine::{IndicatorConfig, IndicatorEngine, NamedIndicator};
pub use crate::output::IndicatorOutput;
