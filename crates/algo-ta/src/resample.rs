//! Resampling a series into coarser bars.
//!
//! Bars are grouped into fixed-width buckets aligned to the Unix epoch
//! (`bucket = floor(timestamp / width) * width`) and aggregated as
//! open = first, high = max, low = min, close = last, volume = sum. Empty
//! buckets produce no bar.
//!
//! # Example
//!
//! ```
//! use algo_ta::resample::{resample, Resolution};
//! use algo_ta::series::{Bar, Series};
//!
//! let hour = 3_600;
//! let series = Series::from_bars((0..8).map(|i| {
//!     let p = 100.0_f64 + i as f64;
//!     Bar::new(i * hour, p, p + 1.0, p - 1.0, p, 10.0)
//! }))
//! .unwrap();
//!
//! let four_hourly = resample(&series, "4H".parse::<Resolution>().unwrap()).unwrap();
//! assert_eq!(four_hourly.len(), 2);
//! assert_eq!(four_hourly.close()[0], 103.0);
//! assert_eq!(four_hourly.volume()[1], 40.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::series::{Bar, Series, SeriesBuilder, Timestamp};
use crate::traits::SeriesElement;

pub(crate) const MINUTE: i64 = 60;
pub(crate) const HOUR: i64 = 60 * MINUTE;
pub(crate) const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Width of a resampling bucket.
///
/// Parsed from a count and a unit: `S` seconds, `T`/`m`/`min` minutes,
/// `H` hours, `D` days, `W` weeks (`"2D"`, `"4H"`, `"30T"`, `"15min"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    seconds: i64,
}

impl Resolution {
    /// A resolution of `seconds` seconds.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] unless `seconds` is positive.
    pub fn from_seconds(seconds: i64) -> Result<Self> {
        if seconds > 0 {
            Ok(Self { seconds })
        } else {
            Err(Error::invalid_parameter(
                "resolution",
                format!("bucket width must be positive, got {seconds}s"),
            ))
        }
    }

    /// A resolution from a positive literal width.
    pub(crate) const fn fixed(seconds: i64) -> Self {
        debug_assert!(seconds > 0);
        Self { seconds }
    }

    /// Bucket width in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.seconds
    }

    /// Start of the bucket containing `timestamp`.
    #[inline]
    #[must_use]
    pub const fn bucket_start(self, timestamp: Timestamp) -> Timestamp {
        timestamp.div_euclid(self.seconds) * self.seconds
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        let (count, unit) = if s % WEEK == 0 {
            (s / WEEK, "W")
        } else if s % DAY == 0 {
            (s / DAY, "D")
        } else if s % HOUR == 0 {
            (s / HOUR, "H")
        } else if s % MINUTE == 0 {
            (s / MINUTE, "T")
        } else {
            (s, "S")
        };
        write!(f, "{count}{unit}")
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        let count: i64 = if digits.is_empty() {
            1
        } else {
            digits.parse().map_err(|_| {
                Error::invalid_parameter("resolution", format!("invalid count in '{s}'"))
            })?
        };

        let unit_seconds = match unit.to_ascii_lowercase().as_str() {
            "s" | "sec" => 1,
            "t" | "m" | "min" => MINUTE,
            "h" => HOUR,
            "d" => DAY,
            "w" => WEEK,
            _ => {
                return Err(Error::invalid_parameter(
                    "resolution",
                    format!("unknown unit in '{s}' (expected S, T, min, H, D or W)"),
                ))
            }
        };

        let seconds = count.checked_mul(unit_seconds).ok_or_else(|| {
            Error::invalid_parameter("resolution", format!("'{s}' is too large"))
        })?;
        Self::from_seconds(seconds)
    }
}

impl TryFrom<String> for Resolution {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

/// Aggregates `series` into bars of `resolution`, each stamped with its
/// bucket start.
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty series.
pub fn resample<T: SeriesElement>(series: &Series<T>, resolution: Resolution) -> Result<Series<T>> {
    if series.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut builder = SeriesBuilder::new();
    let mut current: Option<Bar<T>> = None;

    for bar in series.bars() {
        let bucket = resolution.bucket_start(bar.timestamp);
        current = Some(match current {
            Some(acc) if acc.timestamp == bucket => merge(acc, bar),
            Some(acc) => {
                builder.push(acc)?;
                Bar { timestamp: bucket, ..bar }
            }
            None => Bar { timestamp: bucket, ..bar },
        });
    }
    if let Some(acc) = current {
        builder.push(acc)?;
    }

    Ok(builder.build())
}

/// Folds `bar` into the in-progress bucket `acc`.
#[inline]
pub(crate) fn merge<T: SeriesElement>(acc: Bar<T>, bar: Bar<T>) -> Bar<T> {
    Bar {
        timestamp: acc.timestamp,
        open: acc.open,
        high: acc.high.max(bar.high),
        low: acc.low.min(bar.low),
        close: bar.close,
        volume: acc.volume + bar.volume,
    }
}
