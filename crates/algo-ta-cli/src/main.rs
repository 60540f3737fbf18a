//! algo-ta command-line interface
//!
//! Reads OHLCV bars from a CSV file, evaluates one indicator or a TOML run
//! file of several, and writes the output channels as CSV.

use std::process::ExitCode;

use algo_ta_cli::args::Args;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays clean CSV. `-v` flags take precedence
/// over `RUST_LOG`; with neither, only warnings are shown.
fn init_tracing(args: &Args) {
    let filter = match args.log_filter() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(&args);

    match algo_ta_cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
