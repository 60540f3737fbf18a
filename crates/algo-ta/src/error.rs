//! Error types for algo-ta.
//!
//! This module defines the error types used throughout the algo-ta library
//! for handling invalid configuration and malformed input.

use thiserror::Error;

/// The main error type for algo-ta operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data series is too short for the requested operation.
    ///
    /// Only the smoothing primitives raise this; composite indicators treat a
    /// short history as a cold start and return undefined values instead.
    #[error("insufficient data for {indicator}: required {required} elements, got {actual}")]
    InsufficientData {
        /// The number of data points required.
        required: usize,
        /// The number of data points provided.
        actual: usize,
        /// Name of the operation that rejected the input.
        indicator: &'static str,
    },

    /// Failed to convert a numeric value to the target type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },

    /// The input data series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// The period (window length) parameter is invalid.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Description of why the period is invalid.
        reason: &'static str,
    },

    /// A non-period configuration parameter is out of range or unknown.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of why the value was rejected.
        reason: String,
    },

    /// Input channels that must be index-aligned have different lengths.
    #[error("length mismatch: {description}")]
    LengthMismatch {
        /// Which channels disagree and by how much.
        description: String,
    },

    /// Bar timestamps are not strictly increasing.
    #[error("timestamps must be strictly increasing: bar {index} has {timestamp}, previous bar has {previous}")]
    NonMonotonicTimestamp {
        /// Index of the offending bar.
        index: usize,
        /// Timestamp of the offending bar.
        timestamp: i64,
        /// Timestamp of the bar before it.
        previous: i64,
    },

    /// An operation needs an input channel that was not supplied.
    #[error("missing input channel: {channel}")]
    MissingChannel {
        /// Name of the missing channel (e.g. `volume`).
        channel: &'static str,
    },
}

/// Convenience type alias for Results using the algo-ta Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for building an [`Error::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
