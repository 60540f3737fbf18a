//! TOML run files.
//!
//! A run file lists named indicators as `[[indicator]]` tables. Each table
//! has a `name`, an `indicator` kind and any of that indicator's parameters;
//! omitted parameters take their defaults.
//!
//! ```toml
//! [[indicator]]
//! name = "atr_ticks"
//! indicator = "atr"
//! length = 10
//! unit = { kind = "ticks", tick_size = 0.25 }
//!
//! [[indicator]]
//! name = "hull"
//! indicator = "moving_average"
//! kind = "HMA"
//! length = 9
//! ```

use std::fs;
use std::path::Path;

use algo_ta::IndicatorEngine;
use tracing::debug;

use crate::error::{CliError, Result};

/// Parses run-file text. `path` is only used in error messages.
///
/// # Errors
///
/// `CliError::ConfigError` for invalid TOML, an unknown indicator or
/// parameter, an empty file, or a configuration the engine rejects.
pub fn parse_run_file(text: &str, path: &str) -> Result<IndicatorEngine> {
    let config_error = |message: String| CliError::ConfigError {
        path: path.to_string(),
        message,
    };

    let engine: IndicatorEngine =
        toml::from_str(text).map_err(|e| config_error(e.to_string()))?;
    if engine.is_empty() {
        return Err(config_error("no [[indicator]] tables found".to_string()));
    }
    engine.validate().map_err(|e| config_error(e.to_string()))?;

    debug!(path, indicators = engine.len(), "loaded run file");
    Ok(engine)
}

/// Reads and parses a run file.
///
/// # Errors
///
/// `CliError::IoError` if the file cannot be read, otherwise see
/// [`parse_run_file`].
pub fn load_run_file<P: AsRef<Path>>(path: P) -> Result<IndicatorEngine> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(display.clone()),
    })?;
    parse_run_file(&text, &display)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use algo_ta::indicators::{Atr, AtrUnit, MovingAverage, Smoothing};
    use algo_ta::IndicatorConfig;
    use std::io::Write;

    const RUN_FILE: &str = r#"
[[indicator]]
name = "atr_ticks"
indicator = "atr"
length = 10
unit = { kind = "ticks", tick_size = 0.25 }

[[indicator]]
name = "hull"
indicator = "moving_average"
kind = "HMA"
length = 9
"#;

    #[test]
    fn test_parse_run_file() {
        let engine = parse_run_file(RUN_FILE, "run.toml").unwrap();
        let indicators = engine.indicators();
        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].name, "atr_ticks");
        assert_eq!(
            indicators[0].config,
            IndicatorConfig::Atr(Atr::new().length(10).unit(AtrUnit::Ticks { tick_size: 0.25 }))
        );
        assert_eq!(
            indicators[1].config,
            IndicatorConfig::MovingAverage(MovingAverage::new().kind(Smoothing::Hma).length(9))
        );
    }

    #[test]
    fn test_unknown_indicator_is_config_error() {
        let text = "[[indicator]]\nname = \"k\"\nindicator = \"stochastic\"\n";
        match parse_run_file(text, "run.toml") {
            Err(CliError::ConfigError { path, message }) => {
                assert_eq!(path, "run.toml");
                assert!(message.contains("stochastic"), "{message}");
            }
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_run_file_is_config_error() {
        match parse_run_file("", "empty.toml") {
            Err(CliError::ConfigError { message, .. }) => {
                assert!(message.contains("no [[indicator]]"))
            }
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = "[[indicator]]\nname = \"a\"\nindicator = \"rsi\"\n\n\
                    [[indicator]]\nname = \"a\"\nindicator = \"atr\"\n";
        match parse_run_file(text, "dup.toml") {
            Err(CliError::ConfigError { message, .. }) => assert!(message.contains("duplicate")),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_parameter_rejected() {
        let text = "[[indicator]]\nname = \"t\"\nindicator = \"t3_roc\"\nfactor = 1.5\n";
        match parse_run_file(text, "t3.toml") {
            Err(CliError::ConfigError { message, .. }) => assert!(message.contains("factor")),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_run_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RUN_FILE.as_bytes()).unwrap();
        let engine = load_run_file(file.path()).unwrap();
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_missing_run_file_is_io_error() {
        match load_run_file("/nonexistent/run.toml") {
            Err(CliError::IoError { path, .. }) => {
                assert_eq!(path.as_deref(), Some("/nonexistent/run.toml"))
            }
            other => panic!("Expected IoError, got {other:?}"),
        }
    }
}
