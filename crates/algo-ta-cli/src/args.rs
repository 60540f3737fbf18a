//! CLI argument parsing module.
//!
//! The CLI follows the pattern `algo-ta <indicator> <input.csv> [params]
//! [-o output.csv]`, or `algo-ta run <input.csv> <indicators.toml>` for a run
//! file of several named indicators.
//!
//! # Examples
//!
//! ```bash
//! # Hull moving average of HLC3 over 9 bars
//! algo-ta ma bars.csv --kind hma --length 9 --source hlc3
//!
//! # ATR in ticks of 0.25
//! algo-ta atr bars.csv --unit ticks --tick-size 0.25
//!
//! # MACD with custom parameters, dropping the warm-up rows
//! algo-ta macd bars.csv 8,21,5 --skip-warmup -o macd.csv
//!
//! # RSI with the outlier channel and profile summary
//! algo-ta rsi bars.csv --outliers -v
//!
//! # Several indicators from a TOML run file
//! algo-ta run bars.csv indicators.toml
//! ```

use algo_ta::indicators::{
    Admf, Adx, Atr, AtrUnit, Chandelier, Envelope, Macd, MovingAverage, MultiMacd,
    RocNormalization, Rsi, Smoothing, T3Mode, T3Roc, Zlsma,
};
use algo_ta::resample::Resolution;
use algo_ta::series::PriceSource;
use algo_ta::IndicatorConfig;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

use crate::error::{CliError, Result};

/// algo-ta: causal technical-analysis indicators over OHLCV CSV files
#[derive(Parser, Debug)]
#[command(name = "algo-ta")]
#[command(author, version, about = "Causal technical-analysis indicators over OHLCV data")]
#[command(long_about = "algo-ta reads OHLCV bars from a CSV file, evaluates one indicator \
    (or a TOML run file of several) and writes every output channel as CSV to a file \
    or stdout. Undefined warm-up values are written as empty cells.")]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The indicator to compute
    #[command(subcommand)]
    pub command: Command,
}

/// Input and output options shared by every command.
#[derive(ClapArgs, Debug, Clone)]
pub struct IoArgs {
    /// Input CSV file with a close column and optional date/open/high/low/volume
    pub input: String,

    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Drop leading rows where every output channel is undefined
    #[arg(long)]
    pub skip_warmup: bool,
}

/// Available indicator commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Moving average of any kind over a price source
    #[command(name = "ma", about = "Moving average (SMA, EMA, DEMA, TEMA, WMA, VWMA, RMA, HMA)")]
    MovingAverage {
        #[command(flatten)]
        io: IoArgs,

        /// Smoothing formula
        #[arg(short, long, default_value = "sma")]
        kind: Smoothing,

        /// Averaging window
        #[arg(short, long, default_value = "20")]
        length: usize,

        /// Price source (open, high, low, close, hl2, hlc3, ohlc4)
        #[arg(short, long, default_value = "close")]
        source: PriceSource,
    },

    /// Average True Range
    #[command(about = "Average True Range (ATR) in price, percent, ticks or currency")]
    Atr {
        #[command(flatten)]
        io: IoArgs,

        /// Smoothing window
        #[arg(short, long, default_value = "14")]
        length: usize,

        /// Smoothing applied to the true range
        #[arg(long, default_value = "rma")]
        smoothing: Smoothing,

        /// Output unit (regular, percentage, ticks, currency)
        #[arg(short, long, default_value = "regular")]
        unit: AtrUnit,

        /// Tick size for `--unit ticks`
        #[arg(long)]
        tick_size: Option<f64>,

        /// Currency value of one point for `--unit currency`
        #[arg(long)]
        point_value: Option<f64>,

        /// Position size for `--unit currency`
        #[arg(long)]
        position_size: Option<f64>,
    },

    /// Average Directional Index
    #[command(about = "Directional Movement Index and ADX with DI moving averages")]
    Adx {
        #[command(flatten)]
        io: IoArgs,

        /// Window of the directional indicators
        #[arg(long, default_value = "13")]
        di_length: usize,

        /// Window of the ADX average
        #[arg(long, default_value = "13")]
        adx_length: usize,

        /// Window of the +DI and -DI moving averages
        #[arg(long, default_value = "13")]
        ma_length: usize,

        /// Smoothing used for DI and ADX
        #[arg(long, default_value = "sma")]
        smoothing: Smoothing,
    },

    /// Relative Strength Index
    #[command(about = "Relative Strength Index (RSI) with optional liquidity outliers")]
    Rsi {
        #[command(flatten)]
        io: IoArgs,

        /// Averaging window
        #[arg(short, long, default_value = "14")]
        length: usize,

        /// Price source
        #[arg(short, long, default_value = "close")]
        source: PriceSource,

        /// Add the Outlier channel and log the outlier RSI profile, using this
        /// liquidity window
        #[arg(long, num_args = 0..=1, default_missing_value = "10", value_name = "WINDOW")]
        outliers: Option<usize>,
    },

    /// Moving Average Convergence Divergence
    #[command(about = "MACD (Moving Average Convergence Divergence)")]
    Macd {
        #[command(flatten)]
        io: IoArgs,

        /// Parameters: fast_period,slow_period,signal_period (e.g., 12,26,9)
        #[arg(default_value = "12,26,9")]
        params: String,

        /// Price source
        #[arg(short, long, default_value = "close")]
        source: PriceSource,
    },

    /// MACD over several resolutions
    #[command(name = "multi-macd", about = "MACD evaluated over several resampled resolutions")]
    MultiMacd {
        #[command(flatten)]
        io: IoArgs,

        /// Parameters: fast_period,slow_period,signal_period (e.g., 12,26,9)
        #[arg(default_value = "12,26,9")]
        params: String,

        /// Comma-separated resolutions, e.g. 2D,1D,4H,1H,30T,15T
        #[arg(short, long, value_delimiter = ',', default_value = "2D,1D,4H,1H,30T,15T")]
        resolutions: Vec<Resolution>,

        /// Width of the neutral zone around zero for the position channel
        #[arg(long, default_value = "0.05")]
        neutral_threshold: f64,
    },

    /// Moving-average envelope
    #[command(about = "Envelope: a moving average with bands a fixed percent away")]
    Envelope {
        #[command(flatten)]
        io: IoArgs,

        /// Basis window
        #[arg(short, long, default_value = "20")]
        length: usize,

        /// Band distance in percent of the basis
        #[arg(short, long, default_value = "10")]
        percent: f64,

        /// Basis smoothing
        #[arg(short, long, default_value = "sma")]
        basis: Smoothing,

        /// Price source
        #[arg(short, long, default_value = "close")]
        source: PriceSource,
    },

    /// T3 moving average with rate-of-change trend signals
    #[command(name = "t3-roc", about = "T3 average with ROC color/line codes and trend signals")]
    T3Roc {
        #[command(flatten)]
        io: IoArgs,

        /// T3 and ROC window
        #[arg(short, long, default_value = "21")]
        length: usize,

        /// Volume factor in 0..=1
        #[arg(short, long, default_value = "0.7")]
        factor: f64,

        /// Number of T3 passes (single, double, triple)
        #[arg(short, long, default_value = "double")]
        mode: T3Mode,

        /// Line code at or below which an open trend is filtered
        #[arg(long, default_value = "1.0")]
        roc_filter: f64,

        /// ROC normalization (whole-series or expanding)
        #[arg(short, long, default_value = "whole-series")]
        normalization: RocNormalization,

        /// Price source of the T3 average
        #[arg(short, long, default_value = "close")]
        source: PriceSource,
    },

    /// Chandelier exit
    #[command(about = "Chandelier exit trailing stops with buy/sell signals")]
    Chandelier {
        #[command(flatten)]
        io: IoArgs,

        /// ATR and extreme window
        #[arg(short, long, default_value = "22")]
        length: usize,

        /// ATR multiplier
        #[arg(short, long, default_value = "3.0")]
        multiplier: f64,

        /// Use rolling high/low instead of rolling close for the extremes
        #[arg(long)]
        use_high_low: bool,

        /// Signal on the flip bar without waiting for a confirming close
        #[arg(long)]
        no_confirmation: bool,

        /// ATR smoothing
        #[arg(long, default_value = "sma")]
        smoothing: Smoothing,
    },

    /// Accumulation/distribution money flow
    #[command(about = "ADMF: money flow with fast/slow averages, histogram and gradient")]
    Admf {
        #[command(flatten)]
        io: IoArgs,

        /// Money-flow averaging window
        #[arg(short, long, default_value = "9")]
        length: usize,

        /// Use raw volume instead of volume times typical price
        #[arg(long)]
        volume_only: bool,

        /// Weight of the sign term in the A/D ratio, in 0..=1
        #[arg(long, default_value = "0.0")]
        ad_weight: f64,

        /// Fast average kind
        #[arg(long, default_value = "ema")]
        ma1: Smoothing,

        /// Fast average window
        #[arg(long, default_value = "2")]
        ma1_length: usize,

        /// Slow average kind (applied to the fast average)
        #[arg(long, default_value = "ema")]
        ma2: Smoothing,

        /// Slow average window
        #[arg(long, default_value = "2")]
        ma2_length: usize,

        /// Window of the gradient normalization
        #[arg(long, default_value = "100")]
        norm_period: usize,
    },

    /// Zero-lag least-squares moving average
    #[command(about = "ZLSMA (zero-lag least-squares moving average)")]
    Zlsma {
        #[command(flatten)]
        io: IoArgs,

        /// Regression window
        #[arg(short, long, default_value = "32")]
        length: usize,

        /// Bars ahead (positive) or behind (negative) of the window end
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,

        /// Price source
        #[arg(short, long, default_value = "close")]
        source: PriceSource,
    },

    /// Run several named indicators from a TOML file
    #[command(about = "Evaluate the [[indicator]] tables of a TOML run file")]
    Run {
        #[command(flatten)]
        io: IoArgs,

        /// TOML run file
        config: String,
    },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter implied by `-v` flags, `None` when none were given.
    pub const fn log_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Get the input file path from the command.
    pub fn input_path(&self) -> &str {
        &self.command.io().input
    }

    /// Get the output file path from the command, if specified.
    pub fn output_path(&self) -> Option<&str> {
        self.command.io().output.as_deref()
    }
}

impl Command {
    /// Input and output options of the command.
    pub const fn io(&self) -> &IoArgs {
        match self {
            Self::MovingAverage { io, .. }
            | Self::Atr { io, .. }
            | Self::Adx { io, .. }
            | Self::Rsi { io, .. }
            | Self::Macd { io, .. }
            | Self::MultiMacd { io, .. }
            | Self::Envelope { io, .. }
            | Self::T3Roc { io, .. }
            | Self::Chandelier { io, .. }
            | Self::Admf { io, .. }
            | Self::Zlsma { io, .. }
            | Self::Run { io, .. } => io,
        }
    }

    /// The indicator configuration described by the arguments, `None` for
    /// `run`.
    ///
    /// # Errors
    ///
    /// `CliError::InvalidArgument` for malformed parameter lists or unit
    /// options that do not match the unit.
    pub fn config(&self) -> Result<Option<IndicatorConfig>> {
        let config = match self {
            Self::MovingAverage {
                kind,
                length,
                source,
                ..
            } => IndicatorConfig::MovingAverage(
                MovingAverage::new().kind(*kind).length(*length).source(*source),
            ),
            Self::Atr {
                length,
                smoothing,
                unit,
                tick_size,
                point_value,
                position_size,
                ..
            } => IndicatorConfig::Atr(
                Atr::new()
                    .length(*length)
                    .smoothing(*smoothing)
                    .unit(atr_unit(*unit, *tick_size, *point_value, *position_size)?),
            ),
            Self::Adx {
                di_length,
                adx_length,
                ma_length,
                smoothing,
                ..
            } => IndicatorConfig::Adx(
                Adx::new()
                    .di_length(*di_length)
                    .adx_length(*adx_length)
                    .ma_length(*ma_length)
                    .smoothing(*smoothing),
            ),
            Self::Rsi {
                length,
                source,
                outliers,
                ..
            } => {
                let rsi = Rsi::new().length(*length).source(*source);
                IndicatorConfig::Rsi(match outliers {
                    Some(window) => rsi.outliers(*window),
                    None => rsi,
                })
            }
            Self::Macd { params, source, .. } => {
                let (fast, slow, signal) = parse_macd_params(params)?;
                IndicatorConfig::Macd(
                    Macd::new()
                        .fast(fast)
                        .slow(slow)
                        .signal(signal)
                        .source(*source),
                )
            }
            Self::MultiMacd {
                params,
                resolutions,
                neutral_threshold,
                ..
            } => {
                let (fast, slow, signal) = parse_macd_params(params)?;
                IndicatorConfig::MultiMacd(
                    MultiMacd::new()
                        .fast(fast)
                        .slow(slow)
                        .signal(signal)
                        .resolutions(resolutions.clone())
                        .neutral_threshold(*neutral_threshold),
                )
            }
            Self::Envelope {
                length,
                percent,
                basis,
                source,
                ..
            } => IndicatorConfig::Envelope(
                Envelope::new()
                    .length(*length)
                    .percent(*percent)
                    .basis(*basis)
                    .source(*source),
            ),
            Self::T3Roc {
                length,
                factor,
                mode,
                roc_filter,
                normalization,
                source,
                ..
            } => IndicatorConfig::T3Roc(
                T3Roc::new()
                    .length(*length)
                    .factor(*factor)
                    .mode(*mode)
                    .roc_filter(*roc_filter)
                    .normalization(*normalization)
                    .source(*source),
            ),
            Self::Chandelier {
                length,
                multiplier,
                use_high_low,
                no_confirmation,
                smoothing,
                ..
            } => IndicatorConfig::Chandelier(
                Chandelier::new()
                    .length(*length)
                    .multiplier(*multiplier)
                    .use_close(!*use_high_low)
                    .await_confirmation(!*no_confirmation)
                    .smoothing(*smoothing),
            ),
            Self::Admf {
                length,
                volume_only,
                ad_weight,
                ma1,
                ma1_length,
                ma2,
                ma2_length,
                norm_period,
                ..
            } => IndicatorConfig::Admf(
                Admf::new()
                    .length(*length)
                    .price_weighted(!*volume_only)
                    .ad_weight(*ad_weight)
                    .ma1(*ma1, *ma1_length)
                    .ma2(*ma2, *ma2_length)
                    .norm_period(*norm_period),
            ),
            Self::Zlsma {
                length,
                offset,
                source,
                ..
            } => IndicatorConfig::Zlsma(
                Zlsma::new()
                    .length(*length)
                    .offset(*offset)
                    .source(*source),
            ),
            Self::Run { .. } => return Ok(None),
        };
        Ok(Some(config))
    }
}

/// Fills the unit parameters from the unit options.
fn atr_unit(
    unit: AtrUnit,
    tick_size: Option<f64>,
    point_value: Option<f64>,
    position_size: Option<f64>,
) -> Result<AtrUnit> {
    match unit {
        AtrUnit::Ticks { tick_size: default } => {
            if point_value.is_some() || position_size.is_some() {
                return Err(unit_mismatch("point_value", "currency"));
            }
            Ok(AtrUnit::Ticks {
                tick_size: tick_size.unwrap_or(default),
            })
        }
        AtrUnit::Currency {
            point_value: default_point,
            position_size: default_size,
        } => {
            if tick_size.is_some() {
                return Err(unit_mismatch("tick_size", "ticks"));
            }
            Ok(AtrUnit::Currency {
                point_value: point_value.unwrap_or(default_point),
                position_size: position_size.unwrap_or(default_size),
            })
        }
        AtrUnit::Regular | AtrUnit::Percentage => {
            if tick_size.is_some() {
                Err(unit_mismatch("tick_size", "ticks"))
            } else if point_value.is_some() || position_size.is_some() {
                Err(unit_mismatch("point_value", "currency"))
            } else {
                Ok(unit)
            }
        }
    }
}

fn unit_mismatch(option: &str, unit: &str) -> CliError {
    CliError::invalid_argument(
        option,
        format!("only applies to the {unit} unit"),
        format!("Add --unit {unit} or drop --{}", option.replace('_', "-")),
    )
}

/// Parse MACD parameters from string "fast,slow,signal".
///
/// # Errors
///
/// `CliError::InvalidArgument` naming the offending part.
pub fn parse_macd_params(params: &str) -> Result<(usize, usize, usize)> {
    let parts: Vec<&str> = params.split(',').collect();
    if parts.len() != 3 {
        return Err(CliError::invalid_argument(
            "params",
            format!("MACD requires 3 parameters, got {}", parts.len()),
            "Use format: fast,slow,signal (e.g., 12,26,9)",
        ));
    }

    let period = |name: &str, raw: &str, example: &str| {
        raw.trim().parse::<usize>().map_err(|_| {
            CliError::invalid_argument(
                name,
                format!("cannot parse '{raw}' as integer"),
                format!("Use a positive integer like {example}"),
            )
        })
    };
    let fast = period("fast_period", parts[0], "12")?;
    let slow = period("slow_period", parts[1], "26")?;
    let signal = period("signal_period", parts[2], "9")?;

    if fast == 0 || slow == 0 || signal == 0 {
        return Err(CliError::invalid_argument(
            "params",
            "all periods must be positive",
            "Use positive integers like 12,26,9",
        ));
    }

    if fast >= slow {
        return Err(CliError::invalid_argument(
            "params",
            "fast period must be less than slow period",
            "Use fast < slow (e.g., 12,26,9)",
        ));
    }

    Ok((fast, slow, signal))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    fn config(args: &[&str]) -> IndicatorConfig {
        parse(args).command.config().unwrap().unwrap()
    }

    #[test]
    fn test_parse_ma_defaults() {
        let args = parse(&["algo-ta", "ma", "bars.csv"]);
        assert_eq!(args.input_path(), "bars.csv");
        assert_eq!(args.output_path(), None);
        assert_eq!(args.verbose, 0);
        match config(&["algo-ta", "ma", "bars.csv"]) {
            IndicatorConfig::MovingAverage(ma) => assert_eq!(ma, MovingAverage::new()),
            other => panic!("Expected MovingAverage, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ma_with_options() {
        let cfg = config(&[
            "algo-ta", "ma", "bars.csv", "--kind", "hull", "--length", "9", "--source", "HLC3",
        ]);
        assert_eq!(
            cfg,
            IndicatorConfig::MovingAverage(
                MovingAverage::new()
                    .kind(Smoothing::Hma)
                    .length(9)
                    .source(PriceSource::HLC3)
            )
        );
    }

    #[test]
    fn test_parse_output_and_skip_warmup() {
        let args = parse(&["algo-ta", "rsi", "bars.csv", "-o", "rsi.csv", "--skip-warmup"]);
        assert_eq!(args.output_path(), Some("rsi.csv"));
        assert!(args.command.io().skip_warmup);
    }

    #[test]
    fn test_verbosity_is_global() {
        let args = parse(&["algo-ta", "atr", "bars.csv", "-vv"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.log_filter(), Some("debug"));

        let args = parse(&["algo-ta", "-v", "atr", "bars.csv"]);
        assert_eq!(args.log_filter(), Some("info"));

        assert_eq!(parse(&["algo-ta", "atr", "bars.csv"]).log_filter(), None);
    }

    #[test]
    fn test_parse_atr_ticks() {
        let cfg = config(&[
            "algo-ta", "atr", "bars.csv", "--unit", "ticks", "--tick-size", "0.25",
        ]);
        assert_eq!(
            cfg,
            IndicatorConfig::Atr(Atr::new().unit(AtrUnit::Ticks { tick_size: 0.25 }))
        );
    }

    #[test]
    fn test_parse_atr_currency_defaults_position_size() {
        let cfg = config(&[
            "algo-ta", "atr", "bars.csv", "--unit", "currency", "--point-value", "50",
        ]);
        assert_eq!(
            cfg,
            IndicatorConfig::Atr(Atr::new().unit(AtrUnit::Currency {
                point_value: 50.0,
                position_size: 1.0,
            }))
        );
    }

    #[test]
    fn test_atr_unit_option_mismatch() {
        let args = parse(&["algo-ta", "atr", "bars.csv", "--tick-size", "0.25"]);
        match args.command.config() {
            Err(CliError::InvalidArgument {
                argument,
                suggestion,
                ..
            }) => {
                assert_eq!(argument, "tick_size");
                assert!(suggestion.unwrap().contains("--unit ticks"));
            }
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_enum_value_is_a_parse_error() {
        assert!(Args::try_parse_from(["algo-ta", "ma", "bars.csv", "--kind", "alma"]).is_err());
        assert!(Args::try_parse_from(["algo-ta", "t3-roc", "bars.csv", "--mode", "quad"]).is_err());
    }

    #[test]
    fn test_parse_rsi_outliers() {
        match config(&["algo-ta", "rsi", "bars.csv", "--outliers"]) {
            IndicatorConfig::Rsi(rsi) => assert_eq!(rsi.outlier_length, Some(10)),
            other => panic!("Expected Rsi, got {other:?}"),
        }
        match config(&["algo-ta", "rsi", "bars.csv", "--outliers", "20"]) {
            IndicatorConfig::Rsi(rsi) => assert_eq!(rsi.outlier_length, Some(20)),
            other => panic!("Expected Rsi, got {other:?}"),
        }
        match config(&["algo-ta", "rsi", "bars.csv"]) {
            IndicatorConfig::Rsi(rsi) => assert_eq!(rsi.outlier_length, None),
            other => panic!("Expected Rsi, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_macd_multi_param() {
        let cfg = config(&["algo-ta", "macd", "bars.csv", "8,21,5"]);
        assert_eq!(
            cfg,
            IndicatorConfig::Macd(Macd::new().fast(8).slow(21).signal(5))
        );
    }

    #[test]
    fn test_parse_multi_macd_resolutions() {
        match config(&["algo-ta", "multi-macd", "bars.csv", "--resolutions", "4H,1H"]) {
            IndicatorConfig::MultiMacd(m) => {
                let expected: Vec<Resolution> =
                    vec!["4H".parse().unwrap(), "1H".parse().unwrap()];
                assert_eq!(m.resolutions, expected);
            }
            other => panic!("Expected MultiMacd, got {other:?}"),
        }
        match config(&["algo-ta", "multi-macd", "bars.csv"]) {
            IndicatorConfig::MultiMacd(m) => assert_eq!(m, MultiMacd::new()),
            other => panic!("Expected MultiMacd, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_t3_roc() {
        let cfg = config(&[
            "algo-ta",
            "t3-roc",
            "bars.csv",
            "--mode",
            "triple",
            "--normalization",
            "expanding",
        ]);
        assert_eq!(
            cfg,
            IndicatorConfig::T3Roc(
                T3Roc::new()
                    .mode(T3Mode::Triple)
                    .normalization(RocNormalization::Expanding)
            )
        );
        assert_eq!(
            config(&["algo-ta", "t3-roc", "bars.csv"]),
            IndicatorConfig::T3Roc(T3Roc::new())
        );
    }

    #[test]
    fn test_parse_chandelier_flags() {
        let cfg = config(&[
            "algo-ta",
            "chandelier",
            "bars.csv",
            "--use-high-low",
            "--no-confirmation",
        ]);
        assert_eq!(
            cfg,
            IndicatorConfig::Chandelier(
                Chandelier::new().use_close(false).await_confirmation(false)
            )
        );
    }

    #[test]
    fn test_defaults_match_library_defaults() {
        let cases = [
            (vec!["algo-ta", "atr", "bars.csv"], IndicatorConfig::Atr(Atr::new())),
            (vec!["algo-ta", "adx", "bars.csv"], IndicatorConfig::Adx(Adx::new())),
            (vec!["algo-ta", "rsi", "bars.csv"], IndicatorConfig::Rsi(Rsi::new())),
            (vec!["algo-ta", "macd", "bars.csv"], IndicatorConfig::Macd(Macd::new())),
            (
                vec!["algo-ta", "envelope", "bars.csv"],
                IndicatorConfig::Envelope(Envelope::new()),
            ),
            (
                vec!["algo-ta", "chandelier", "bars.csv"],
                IndicatorConfig::Chandelier(Chandelier::new()),
            ),
            (vec!["algo-ta", "admf", "bars.csv"], IndicatorConfig::Admf(Admf::new())),
            (vec!["algo-ta", "zlsma", "bars.csv"], IndicatorConfig::Zlsma(Zlsma::new())),
        ];
        for (argv, expected) in cases {
            assert_eq!(config(&argv), expected, "{argv:?}");
        }
    }

    #[test]
    fn test_parse_zlsma_negative_offset() {
        let cfg = config(&["algo-ta", "zlsma", "bars.csv", "--offset", "-3"]);
        assert_eq!(cfg, IndicatorConfig::Zlsma(Zlsma::new().offset(-3)));
    }

    #[test]
    fn test_parse_run() {
        let args = parse(&["algo-ta", "run", "bars.csv", "indicators.toml", "-o", "out.csv"]);
        match &args.command {
            Command::Run { config, io } => {
                assert_eq!(config, "indicators.toml");
                assert_eq!(io.input, "bars.csv");
            }
            other => panic!("Expected Run, got {other:?}"),
        }
        assert!(args.command.config().unwrap().is_none());
    }

    #[test]
    fn test_parse_help_and_version() {
        assert!(Args::try_parse_from(["algo-ta", "--help"]).is_err());
        assert!(Args::try_parse_from(["algo-ta", "--version"]).is_err());
    }

    #[test]
    fn test_error_missing_command_or_input() {
        assert!(Args::try_parse_from(["algo-ta"]).is_err());
        assert!(Args::try_parse_from(["algo-ta", "ma"]).is_err());
        assert!(Args::try_parse_from(["algo-ta", "run", "bars.csv"]).is_err());
    }

    #[test]
    fn test_error_invalid_macd_params() {
        match parse_macd_params("12,26") {
            Err(CliError::InvalidArgument { reason, .. }) => assert!(reason.contains("3 parameters")),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
        match parse_macd_params("12,abc,9") {
            Err(CliError::InvalidArgument { argument, .. }) => assert_eq!(argument, "slow_period"),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
        match parse_macd_params("0,26,9") {
            Err(CliError::InvalidArgument { reason, .. }) => assert!(reason.contains("positive")),
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
        match parse_macd_params("26,12,9") {
            Err(CliError::InvalidArgument { reason, .. }) => {
                assert!(reason.contains("fast period must be less"))
            }
            other => panic!("Expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
