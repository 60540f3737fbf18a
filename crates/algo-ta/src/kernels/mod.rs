//! Building blocks shared by the indicators.
//!
//! Kernels never validate: they accept any period (zero is treated as 1),
//! return one output per input, and mark not-yet-full or NaN-contaminated
//! windows as NaN. The public indicator functions validate their
//! configuration and then delegate here.
//!
//! # Kernels
//!
//! - [`rolling`]: rolling sum, mean, weighted mean, sample standard deviation
//!   and least-squares endpoint
//! - [`rolling_extrema`]: monotonic deque for O(n) rolling max/min
//! - [`recurrence`]: first-order recurrences as folds, exponential smoothing

pub mod recurrence;
pub mod rolling;
pub mod rolling_extrema;

pub use recurrence::{exponential, recurrence, Ewm};
pub use rolling::{linreg, rolling_mean, rolling_stddev, rolling_sum, rolling_weighted_mean};
pub use rolling_extrema::{rolling_max, rolling_min, MonotonicDeque};
