//! Technical analysis indicators.
//!
//! Every indicator takes whole columns and returns one value per input bar,
//! with NaN wherever the value is undefined (warm-up, zero denominators,
//! undefined inputs). Outputs are causal: the value at index `i` reads only
//! bars `0..=i`. The single exception is the whole-series ROC code
//! normalization in [`roc`], kept as an explicit mode.
//!
//! # Indicator Families
//!
//! ## Smoothing primitives
//!
//! - [`sma`], [`ema`] (EMA, RMA, DEMA, TEMA), [`wma`] (WMA, VWMA, HMA)
//! - [`smoothing`]: the [`Smoothing`] selector and the [`smooth`] dispatcher
//!
//! ## Trend and momentum
//!
//! - [`adx`]: directional movement with DI moving averages
//! - [`rsi`]: Relative Strength Index, and [`profile`] for the RSI profile
//!   of liquidity outliers
//! - [`macd`] and [`multi_macd`] (averaged across resolutions)
//! - [`t3`] and [`roc`]: T3 average with ROC trend signals
//! - [`zlsma`]: zero-lag least squares moving average
//!
//! ## Volatility and bands
//!
//! - [`atr`]: Average True Range in price, percent, ticks or currency
//! - [`envelope`]: percentage bands around a moving average
//! - [`chandelier`]: ATR trailing stops with direction signals
//!
//! ## Volume
//!
//! - [`admf`]: Accumulation/Distribution Money Flow
//!
//! # Error Handling
//!
//! - The smoothing primitives are strict: a length longer than the data is
//!   [`InsufficientData`](crate::error::Error::InsufficientData).
//! - Composite indicators accept any history; a short one yields NaN.
//! - A zero length is always [`InvalidPeriod`](crate::error::Error::InvalidPeriod)
//!   and empty input is always [`EmptyInput`](crate::error::Error::EmptyInput).
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::{ema, rsi, sma};
//!
//! let prices = vec![44.0_f64, 44.5, 43.5, 44.5, 44.0, 43.0, 42.5, 43.5, 44.5, 45.0];
//!
//! let sma_result = sma(&prices, 5).unwrap();
//! let ema_result = ema(&prices, 5).unwrap();
//! let rsi_result = rsi(&prices, 5).unwrap();
//!
//! assert!(sma_result[3].is_nan());
//! assert!(!ema_result[0].is_nan());
//! assert!(rsi_result[4].is_nan() && !rsi_result[5].is_nan());
//! ```

pub mod admf;
pub mod adx;
pub mod atr;
pub mod chandelier;
pub mod ema;
pub mod envelope;
pub mod macd;
pub mod multi_macd;
pub mod profile;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod smoothing;
pub mod t3;
pub mod wma;
pub mod zlsma;

pub use admf::{ad_ratio, Admf, AdmfOutput};
pub use adx::{directional_movement, Adx, AdxOutput};
pub use atr::{atr, atr_lookback, true_range, Atr, AtrUnit};
pub use chandelier::{Chandelier, ChandelierOutput};
pub use ema::{
    dema, ema, ema_alpha, ema_lookback, ema_min_len, ema_with_alpha, rma, rma_alpha, tema,
};
pub use envelope::{envelope, Envelope, EnvelopeOutput};
pub use macd::{macd, Macd, MacdOutput, MacdState};
pub use multi_macd::{MultiMacd, MultiMacdOutput, ResolutionMacd};
pub use profile::{
    liquidity_boundary, price_movement_liquidity, OutlierProfile, RsiProfile, RSI_BUCKETS,
};
pub use roc::{roc, roc_codes, roc_lookback, RocCodes, RocNormalization};
pub use rsi::{rsi, rsi_lookback, Rsi};
pub use sma::{sma, sma_lookback, sma_min_len};
pub use smoothing::{smooth, MovingAverage, Smoothing};
pub use t3::{t3, trend_signals, T3Mode, T3Roc, T3RocOutput, TrendSignals};
pub use wma::{hma, hma_lengths, hma_lookback, vwma, wma, wma_lookback, wma_min_len};
pub use zlsma::{zlsma, zlsma_lookback, Zlsma, ZlsmaOutput};
