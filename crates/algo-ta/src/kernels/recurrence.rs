//! First-order recurrences expressed as folds.
//!
//! Recursive operators (EMA, RMA, the chandelier stops and direction) are
//! written as `state[i] = f(state[i - 1], input[i])` and evaluated with
//! [`recurrence`], so each step function can be tested on its own with a
//! short seed state.

use crate::traits::SeriesElement;

/// Scans `data` with `step`, starting from `init`, emitting one output per
/// input. `step` receives the previous state and the current sample and
/// returns the next state together with the output for this index.
pub fn recurrence<T, S, O, F>(data: &[T], init: S, mut step: F) -> Vec<O>
where
    T: Copy,
    S: Copy,
    F: FnMut(S, T) -> (S, O),
{
    data.iter()
        .scan(init, |state, &x| {
            let (next, out) = step(*state, x);
            *state = next;
            Some(out)
        })
        .collect()
}

/// Exponential smoothing state: `value = alpha * x + (1 - alpha) * value`.
///
/// The state is unseeded until the first defined sample, which it adopts as
/// is. A NaN sample after seeding leaves the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ewm<T> {
    alpha: T,
    value: Option<T>,
}

impl<T: SeriesElement> Ewm<T> {
    /// An unseeded state with smoothing factor `alpha`.
    #[must_use]
    pub const fn new(alpha: T) -> Self {
        Self { alpha, value: None }
    }

    /// The state after observing `x`.
    #[inline]
    #[must_use]
    pub fn update(self, x: T) -> Self {
        let value = match self.value {
            _ if x.is_nan() => self.value,
            None => Some(x),
            Some(prev) => Some(self.alpha * x + (T::one() - self.alpha) * prev),
        };
        Self { value, ..self }
    }

    /// Current smoothed value, NaN while unseeded.
    #[inline]
    #[must_use]
    pub fn value(self) -> T {
        self.value.unwrap_or_else(T::nan)
    }
}

/// Exponential smoothing of `data` with factor `alpha`.
#[must_use]
pub fn exponential<T: SeriesElement>(data: &[T], alpha: T) -> Vec<T> {
    recurrence(data, Ewm::new(alpha), |state, x| {
        let next = state.update(x);
        (next, next.value())
    })
}
