//! Non-validating rolling-window kernels.
//!
//! Every kernel returns a vector the length of its input with NaN wherever
//! the window is not yet full or contains a NaN sample. A zero period is
//! treated as 1; callers validate configuration before reaching here.
//!
//! Sums are maintained incrementally over the defined samples of the window
//! plus a count of undefined ones, so a NaN leaving the window stops
//! affecting later outputs. The running sum is compensated (Neumaier) and
//! snaps back to exactly zero whenever the window holds no nonzero sample,
//! so a flat stretch after movement sums to `0` rather than to the rounding
//! residue of the values that left.

use crate::traits::SeriesElement;

/// Incremental sum over a sliding window, tolerant of NaN samples.
#[derive(Debug, Clone, Copy)]
struct WindowSum<T> {
    sum: T,
    compensation: T,
    nans: usize,
    nonzero: usize,
}

impl<T: SeriesElement> WindowSum<T> {
    fn new() -> Self {
        Self {
            sum: T::zero(),
            compensation: T::zero(),
            nans: 0,
            nonzero: 0,
        }
    }

    #[inline]
    fn add(&mut self, x: T) {
        if x.is_nan() {
            self.nans += 1;
        } else if x != T::zero() {
            self.nonzero += 1;
            self.accumulate(x);
        }
    }

    #[inline]
    fn remove(&mut self, x: T) {
        if x.is_nan() {
            self.nans -= 1;
        } else if x != T::zero() {
            self.nonzero -= 1;
            if self.nonzero == 0 {
                self.sum = T::zero();
                self.compensation = T::zero();
            } else {
                self.accumulate(-x);
            }
        }
    }

    #[inline]
    fn accumulate(&mut self, x: T) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation = self.compensation + ((self.sum - t) + x);
        } else {
            self.compensation = self.compensation + ((x - t) + self.sum);
        }
        self.sum = t;
    }

    #[inline]
    fn value(&self) -> T {
        self.sum + self.compensation
    }

    #[inline]
    const fn is_clean(&self) -> bool {
        self.nans == 0
    }
}

/// Applies `emit` to the running window sum of `data` at every index where
/// the window is full and clean.
fn windowed<T, F>(data: &[T], period: usize, mut emit: F) -> Vec<T>
where
    T: SeriesElement,
    F: FnMut(usize, T) -> T,
{
    let period = period.max(1);
    let mut window = WindowSum::new();

    (0..data.len())
        .map(|i| {
            window.add(data[i]);
            if i >= period {
                window.remove(data[i - period]);
            }
            if i + 1 >= period && window.is_clean() {
                emit(i, window.value())
            } else {
                T::nan()
            }
        })
        .collect()
}

/// Rolling sum over `period` samples.
#[must_use]
pub fn rolling_sum<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    windowed(data, period, |_, sum| sum)
}

/// Rolling arithmetic mean over `period` samples.
#[must_use]
pub fn rolling_mean<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    let n = T::from_usize(period.max(1)).unwrap_or_else(|_| T::nan());
    windowed(data, period, |_, sum| sum / n)
}

/// Rolling linearly weighted mean: weights `1..=period`, the newest sample
/// weighted heaviest, normalised by the weight total.
#[must_use]
pub fn rolling_weighted_mean<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    let period = period.max(1);
    let weights: Vec<T> = (1..=period)
        .map(|w| T::from_usize(w).unwrap_or_else(|_| T::nan()))
        .collect();
    let total = weights.iter().fold(T::zero(), |acc, &w| acc + w);

    windowed(data, period, |i, _| {
        let window = &data[i + 1 - period..=i];
        let weighted = window
            .iter()
            .zip(&weights)
            .fold(T::zero(), |acc, (&x, &w)| acc + x * w);
        weighted / total
    })
}

/// Rolling sample standard deviation (divisor `period - 1`). Undefined for a
/// period of 1.
#[must_use]
pub fn rolling_stddev<T: SeriesElement>(data: &[T], period: usize) -> Vec<T> {
    let period = period.max(1);
    if period == 1 {
        return vec![T::nan(); data.len()];
    }
    let n = T::from_usize(period).unwrap_or_else(|_| T::nan());

    windowed(data, period, |i, sum| {
        let mean = sum / n;
        let window = &data[i + 1 - period..=i];
        let squares = window.iter().fold(T::zero(), |acc, &x| {
            let d = x - mean;
            acc + d * d
        });
        (squares / (n - T::one())).sqrt()
    })
}

/// Rolling least-squares line through the last `period` `(position, value)`
/// pairs, evaluated at window position `period - 1 + offset`.
///
/// With `offset = 0` this is the fitted value at the newest sample. A period
/// of 1 returns the input.
#[must_use]
pub fn linreg<T: SeriesElement>(data: &[T], period: usize, offset: i32) -> Vec<T> {
    let period = period.max(1);
    if period == 1 {
        return data.to_vec();
    }

    let to_t = |v: usize| T::from_usize(v).unwrap_or_else(|_| T::nan());
    let n = to_t(period);
    let sum_x = to_t(period * (period - 1) / 2);
    let sum_xx = to_t((period - 1) * period * (2 * period - 1) / 6);
    let denominator = n * sum_xx - sum_x * sum_x;
    let at = to_t(period - 1) + T::from_i32(offset).unwrap_or_else(|_| T::nan());

    windowed(data, period, |i, sum_y| {
        let window = &data[i + 1 - period..=i];
        let sum_xy = window
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (x, &y)| acc + to_t(x) * y);
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        intercept + slope * at
    })
}
