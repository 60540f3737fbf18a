//! algo-ta CLI library
//!
//! The pieces behind the `algo-ta` binary: argument parsing, CSV input,
//! TOML run files, indicator evaluation and CSV output. They are exposed
//! here for testing and reuse.

pub mod args;
pub mod csv_parser;
pub mod csv_writer;
pub mod error;
pub mod run_file;

pub use error::{CliError, Result};

use algo_ta::indicators::RsiProfile;
use algo_ta::series::Series;
use algo_ta::{IndicatorConfig, IndicatorEngine, IndicatorOutput};
use tracing::info;

use crate::args::{Args, Command};
use crate::csv_writer::OutputDest;

/// The engine a command evaluates: the run file's indicators for `run`, a
/// single indicator named after its kind otherwise.
///
/// # Errors
///
/// Argument or run-file errors.
pub fn build_engine(command: &Command) -> Result<IndicatorEngine> {
    match command {
        Command::Run { config, .. } => run_file::load_run_file(config),
        other => match other.config()? {
            Some(config) => Ok(IndicatorEngine::new().with(config.kind(), config)),
            None => Ok(IndicatorEngine::new()),
        },
    }
}

/// RSI outlier profiles of every RSI indicator that has outlier detection
/// enabled, by indicator name. `None` marks an RSI without outliers.
///
/// # Errors
///
/// Indicator errors from the profile computation.
pub fn rsi_profiles(
    engine: &IndicatorEngine,
    series: &Series<f64>,
) -> Result<Vec<(String, Option<RsiProfile>)>> {
    engine
        .indicators()
        .iter()
        .filter_map(|indicator| match &indicator.config {
            IndicatorConfig::Rsi(rsi) => rsi.profile().map(|p| (indicator.name.as_str(), p)),
            _ => None,
        })
        .map(|(name, profile)| -> Result<(String, Option<RsiProfile>)> {
            Ok((name.to_string(), profile.compute(series)?))
        })
        .collect()
}

/// Evaluates the command over `series`, logging any RSI outlier profile.
///
/// # Errors
///
/// Argument, run-file or indicator errors.
pub fn evaluate(command: &Command, series: &Series<f64>) -> Result<Vec<IndicatorOutput<f64>>> {
    let engine = build_engine(command)?;
    let outputs = engine.run(series)?;

    for (name, profile) in rsi_profiles(&engine, series)? {
        match profile {
            Some(profile) => {
                info!(
                    indicator = %name,
                    samples = profile.samples,
                    most_frequent = profile.most_frequent,
                    mean = profile.mean,
                    stddev = profile.stddev,
                    "RSI outlier profile"
                );
                eprintln!("{name} outlier profile:\n{profile}");
            }
            None => info!(indicator = %name, "no liquidity outliers with a defined RSI"),
        }
    }
    Ok(outputs)
}

/// Runs the whole pipeline: read the CSV, evaluate, write the CSV.
///
/// # Errors
///
/// Any [`CliError`].
pub fn run(args: &Args) -> Result<()> {
    let io = args.command.io();
    let data = csv_parser::load_series(&io.input)?;
    info!(input = %io.input, bars = data.series.len(), "read input");

    let outputs = evaluate(&args.command, &data.series)?;

    let dest = OutputDest::from_path(io.output.as_deref());
    csv_writer::write_outputs(&outputs, data.dates.as_deref(), io.skip_warmup, &dest)?;
    info!(
        indicators = outputs.len(),
        destination = io.output.as_deref().unwrap_or("stdout"),
        "wrote output"
    );
    Ok(())
}
