//! Named, index-aligned indicator output.
//!
//! Every indicator produces one or more channels, each exactly as long as the
//! input series. Channels keep the order in which the indicator emitted them,
//! so writers can lay them out as columns without sorting.

use crate::traits::SeriesElement;

/// Ordered named channels produced by one indicator evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorOutput<T> {
    indicator: String,
    len: usize,
    channels: Vec<(String, Vec<T>)>,
}

impl<T: SeriesElement> IndicatorOutput<T> {
    /// An output with no channels for a series of `len` bars.
    #[must_use]
    pub fn new(indicator: impl Into<String>, len: usize) -> Self {
        Self {
            indicator: indicator.into(),
            len,
            channels: Vec::new(),
        }
    }

    /// Appends a channel.
    ///
    /// # Panics
    ///
    /// Panics if `values` is not exactly as long as the series; indicators
    /// construct their channels from the same input so this is an internal
    /// bug, not a user error.
    #[must_use]
    pub fn with_channel(mut self, name: impl Into<String>, values: Vec<T>) -> Self {
        self.push(name, values);
        self
    }

    /// Appends a channel in place. See [`IndicatorOutput::with_channel`].
    ///
    /// # Panics
    ///
    /// Panics if `values` is not exactly as long as the series.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<T>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.len,
            "channel '{name}' of {} is misaligned",
            self.indicator
        );
        self.channels.push((name, values));
    }

    /// Name of the indicator that produced this output.
    #[must_use]
    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    /// Renames the output, e.g. to the user-facing name of a configured
    /// indicator.
    pub fn set_indicator(&mut self, indicator: impl Into<String>) {
        self.indicator = indicator.into();
    }

    /// Length of every channel (the input series length).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for an output over an empty series.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// The channel called `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[T]> {
        self.channels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Channel names in emission order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, values)` pairs in emission order.
    pub fn channels(&self) -> impl Iterator<Item = (&str, &[T])> + '_ {
        self.channels.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Index of the first bar at which any channel is defined, or `len()`
    /// when every value is NaN.
    #[must_use]
    pub fn first_defined(&self) -> usize {
        (0..self.len)
            .find(|&i| self.channels.iter().any(|(_, v)| !v[i].is_nan()))
            .unwrap_or(self.len)
    }
}
