//! Rolling extrema using a monotonic deque for O(n) rolling max/min.
//!
//! # Algorithm
//!
//! The deque holds `(index, value)` pairs whose values are monotonic:
//! decreasing for a rolling max, increasing for a rolling min. The front is
//! always the extremum of the current window. Each element is pushed and
//! popped at most once, so a full pass is O(n) regardless of the window.
//!
//! # Undefined samples
//!
//! A window that contains a NaN sample yields NaN, the same rule every
//! windowed operator in this crate follows. NaN samples never enter the deque.
//!
//! # Example
//!
//! ```
//! use algo_ta::kernels::rolling_extrema::{rolling_max, rolling_min};
//!
//! let data = vec![3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//!
//! let max = rolling_max(&data, 3);
//! assert!(max[1].is_nan());
//! assert_eq!(max[2], 4.0); // max of [3, 1, 4]
//! assert_eq!(max[5], 9.0); // max of [1, 5, 9]
//!
//! let min = rolling_min(&data, 3);
//! assert_eq!(min[2], 1.0);
//! assert_eq!(min[7], 2.0);
//! ```

use std::collections::VecDeque;

use crate::traits::SeriesElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Max,
    Min,
}

/// A monotonic deque tracking the extremum of a sliding window.
#[derive(Debug, Clone)]
pub struct MonotonicDeque<T> {
    deque: VecDeque<(usize, T)>,
    period: usize,
    kind: Extremum,
}

impl<T: SeriesElement> MonotonicDeque<T> {
    /// A deque tracking the maximum of the last `period` samples.
    #[must_use]
    pub fn max(period: usize) -> Self {
        Self::with_kind(period, Extremum::Max)
    }

    /// A deque tracking the minimum of the last `period` samples.
    #[must_use]
    pub fn min(period: usize) -> Self {
        Self::with_kind(period, Extremum::Min)
    }

    fn with_kind(period: usize, kind: Extremum) -> Self {
        Self {
            deque: VecDeque::with_capacity(period),
            period: period.max(1),
            kind,
        }
    }

    /// Returns the window size.
    #[must_use]
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Returns true if the deque holds no candidates.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    /// Number of candidates currently held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    /// Pushes the sample at `index` and drops candidates that left the window.
    ///
    /// Indices must be pushed in increasing order. NaN values are skipped.
    #[inline]
    pub fn push(&mut self, index: usize, value: T) {
        if !value.is_nan() {
            while let Some(&(_, back)) = self.deque.back() {
                let dominated = match self.kind {
                    Extremum::Max => value >= back,
                    Extremum::Min => value <= back,
                };
                if dominated {
                    self.deque.pop_back();
                } else {
                    break;
                }
            }
            self.deque.push_back((index, value));
        }

        if index + 1 >= self.period {
            let window_start = index + 1 - self.period;
            while let Some(&(front, _)) = self.deque.front() {
                if front < window_start {
                    self.deque.pop_front();
                } else {
                    break;
                }
            }
        }
    }

    /// The current extremum, NaN when the deque is empty.
    #[inline]
    #[must_use]
    pub fn extremum(&self) -> T {
        self.deque.front().map_or_else(T::nan, |&(_, value)| value)
    }
}

fn rolling_extremum<T: SeriesElement>(data: &[T], mut deque: MonotonicDeque<T>) -> Vec<T> {
    let period = deque.period();
    let mut last_nan: Option<usize> = None;

    data.iter()
        .enumerate()
        .map(|(i, &value)| {
            if value.is_nan() {
                last_nan = Some(i);
            }
            deque.push(i, value);

            let window_full = i + 1 >= period;
            let window_clean = last_nan.map_or(true, |j| i - j >= period);
            if window_full && window_clean {
                deque.extremum()
            } else {
                T::nan()
            }
        })
        .collect()
}

/// Rolling maximum over `period` samples; the first `period - 1` outputs are
/// NaN. A zero period is treated as 1.
#[must_use]
pub fn rolling_max<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    rolling_extremum(data, MonotonicDeque::max(period))
}

/// Rolling minimum over `period` samples; the first `period - 1` outputs are
/// NaN. A zero period is treated as 1.
#[must_use]
pub fn rolling_min<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    rolling_extremum(data, MonotonicDeque::min(period))
}
