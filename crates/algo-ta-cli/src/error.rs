//! CLI error types for file I/O, CSV parsing, run files and indicators.
//!
//! [`CliError`] wraps every failure the command-line front end can hit.
//! Messages say what went wrong and, where there is an obvious fix, how to
//! fix it.

use std::fmt;
use std::io;

/// CLI error type encompassing all possible error conditions.
#[derive(Debug)]
pub enum CliError {
    /// An I/O error occurred while reading or writing files.
    IoError {
        /// The underlying I/O error.
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },
    /// The input CSV is malformed or lacks a required column.
    CsvParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred, if known.
        line: Option<usize>,
    },
    /// A TOML run file could not be read as an indicator list.
    ConfigError {
        /// Path of the run file.
        path: String,
        /// Description of the problem.
        message: String,
    },
    /// An indicator rejected its configuration or input.
    IndicatorError {
        /// The underlying algo-ta error.
        source: algo_ta::Error,
    },
    /// An invalid argument was provided.
    InvalidArgument {
        /// Name of the invalid argument.
        argument: String,
        /// Description of why it's invalid.
        reason: String,
        /// Suggestion for valid values.
        suggestion: Option<String>,
    },
}

impl CliError {
    /// Shorthand for an [`CliError::InvalidArgument`] with a suggestion.
    pub fn invalid_argument(
        argument: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Shorthand for a [`CliError::CsvParseError`] without a line number.
    pub fn csv(message: impl Into<String>) -> Self {
        Self::CsvParseError {
            message: message.into(),
            line: None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError { source, path } => {
                if let Some(p) = path {
                    write!(f, "I/O error with file '{p}': {source}. ")?;
                    write!(f, "Check that the path exists and is accessible.")
                } else {
                    write!(f, "I/O error: {source}")
                }
            }
            Self::CsvParseError { message, line } => {
                if let Some(l) = line {
                    write!(f, "CSV parse error on line {l}: {message}. ")?;
                } else {
                    write!(f, "CSV parse error: {message}. ")?;
                }
                write!(
                    f,
                    "Expected a header row with close (and optionally date, open, high, low, volume) columns."
                )
            }
            Self::ConfigError { path, message } => {
                write!(f, "invalid run file '{path}': {message}. ")?;
                write!(
                    f,
                    "Each [[indicator]] table needs a unique name and an indicator kind."
                )
            }
            Self::IndicatorError { source } => {
                write!(f, "Indicator computation error: {source}")
            }
            Self::InvalidArgument {
                argument,
                reason,
                suggestion,
            } => {
                write!(f, "Invalid argument '{argument}': {reason}")?;
                if let Some(s) = suggestion {
                    write!(f, ". {s}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::IndicatorError { source } => Some(source),
            Self::CsvParseError { .. } | Self::ConfigError { .. } | Self::InvalidArgument { .. } => {
                None
            }
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            source: err,
            path: None,
        }
    }
}

impl From<algo_ta::Error> for CliError {
    fn from(err: algo_ta::Error) -> Self {
        Self::IndicatorError { source: err }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .and_then(|p| usize::try_from(p.line()).ok());
        Self::CsvParseError {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_io_error_with_path() {
        let err = CliError::IoError {
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            path: Some("/path/to/bars.csv".to_string()),
        };

        let display = err.to_string();
        assert!(display.contains("/path/to/bars.csv"));
        assert!(display.contains("file not found"));
        assert!(display.contains("Check that the path exists"));
    }

    #[test]
    fn test_display_io_error_without_path() {
        let err = CliError::from(io::Error::other("broken pipe"));
        let display = err.to_string();
        assert!(display.starts_with("I/O error"));
        assert!(display.contains("broken pipe"));
    }

    #[test]
    fn test_display_csv_parse_error() {
        let with_line = CliError::CsvParseError {
            message: "cannot parse 'abc' as number".to_string(),
            line: Some(10),
        };
        assert!(with_line.to_string().contains("line 10"));
        assert!(with_line.to_string().contains("'abc'"));

        let without_line = CliError::csv("no close price column found");
        assert!(without_line.to_string().contains("no close price column"));
        assert!(without_line.to_string().contains("header row"));
    }

    #[test]
    fn test_display_config_error() {
        let err = CliError::ConfigError {
            path: "run.toml".to_string(),
            message: "unknown variant `stochastic`".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("run.toml"));
        assert!(display.contains("stochastic"));
        assert!(display.contains("[[indicator]]"));
    }

    #[test]
    fn test_display_indicator_error() {
        let err = CliError::from(algo_ta::Error::EmptyInput);
        let display = err.to_string();
        assert!(display.contains("Indicator computation error"));
        assert!(display.contains("empty input"));
    }

    #[test]
    fn test_display_invalid_argument() {
        let err = CliError::invalid_argument(
            "params",
            "MACD requires 3 parameters, got 2",
            "Use format: fast,slow,signal (e.g., 12,26,9)",
        );
        let display = err.to_string();
        assert!(display.contains("'params'"));
        assert!(display.contains("3 parameters"));
        assert!(display.contains("12,26,9"));

        let bare = CliError::InvalidArgument {
            argument: "output".to_string(),
            reason: "is a directory".to_string(),
            suggestion: None,
        };
        assert_eq!(bare.to_string(), "Invalid argument 'output': is a directory");
    }

    #[test]
    fn test_source_chain() {
        let io = CliError::from(io::Error::other("disk full"));
        assert!(io.source().is_some());

        let indicator = CliError::from(algo_ta::Error::MissingChannel { channel: "volume" });
        let source = indicator.source().unwrap();
        assert_eq!(source.to_string(), "missing input channel: volume");

        assert!(CliError::csv("bad").source().is_none());
        assert!(CliError::invalid_argument("a", "b", "c").source().is_none());
    }

    #[test]
    fn test_from_algo_ta_error_keeps_variant() {
        let err: CliError = algo_ta::Error::EmptyInput.into();
        assert!(matches!(
            err,
            CliError::IndicatorError {
                source: algo_ta::Error::EmptyInput
            }
        ));
    }

    #[test]
    fn test_from_csv_error() {
        let data = "a,b\n1,2\n3\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let err = reader
            .records()
            .find_map(|r| r.err())
            .expect("unequal record lengths");
        let cli: CliError = err.into();
        match cli {
            CliError::CsvParseError { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CliError>();
    }
}
