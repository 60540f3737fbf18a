//! CSV output module for writing indicator channels.
//!
//! - Every row of the input is written unless `--skip-warmup` is given, in
//!   which case the leading rows where every channel is undefined are dropped.
//! - Undefined (NaN) values are written as empty cells.
//! - The date column, when the input had one, stays aligned with its row.
//!
//! # Column Names
//!
//! A single indicator writes its channel names as headers (`MACD`,
//! `Signal`, ...). Several indicators from a run file prefix each channel with
//! the indicator name (`fast.MACD`, `slow.MACD`) so headers stay unique.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use algo_ta::IndicatorOutput;
use csv::WriterBuilder;

use crate::error::{CliError, Result};

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// `File` for `Some(path)`, `Stdout` otherwise.
    pub fn from_path(path: Option<&str>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_string()))
    }

    /// Create a writer for this output destination.
    ///
    /// # Errors
    ///
    /// `CliError::IoError` with the path when the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout().lock())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Flattens indicator outputs into named columns in evaluation order.
pub fn output_columns(outputs: &[IndicatorOutput<f64>]) -> Vec<(String, &[f64])> {
    let prefixed = outputs.len() > 1;
    outputs
        .iter()
        .flat_map(|output| {
            output.channels().map(move |(channel, values)| {
                let header = if prefixed {
                    format!("{}.{channel}", output.indicator())
                } else {
                    channel.to_string()
                };
                (header, values)
            })
        })
        .collect()
}

/// Number of leading rows in which every channel of every output is
/// undefined.
pub fn warmup_rows(outputs: &[IndicatorOutput<f64>]) -> usize {
    outputs
        .iter()
        .map(IndicatorOutput::first_defined)
        .min()
        .unwrap_or(0)
}

/// Writes named columns as CSV, starting at row `skip`.
///
/// # Errors
///
/// `CliError::IoError` or `CliError::CsvParseError` from the underlying
/// writer.
pub fn write_columns<W: Write>(
    writer: W,
    columns: &[(String, &[f64])],
    dates: Option<&[String]>,
    skip: usize,
) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if dates.is_some() {
        header.push("date");
    }
    header.extend(columns.iter().map(|(name, _)| name.as_str()));
    csv_writer.write_record(&header)?;

    let len = columns.first().map_or(0, |(_, values)| values.len());
    let mut row: Vec<String> = Vec::with_capacity(header.len());
    for i in skip..len {
        row.clear();
        if let Some(dates) = dates {
            row.push(dates.get(i).cloned().unwrap_or_default());
        }
        for (_, values) in columns {
            row.push(match values.get(i) {
                Some(v) if !v.is_nan() => v.to_string(),
                _ => String::new(),
            });
        }
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes indicator outputs to `dest`.
///
/// # Errors
///
/// See [`OutputDest::writer`] and [`write_columns`].
pub fn write_outputs(
    outputs: &[IndicatorOutput<f64>],
    dates: Option<&[String]>,
    skip_warmup: bool,
    dest: &OutputDest,
) -> Result<()> {
    let columns = output_columns(outputs);
    if columns.is_empty() {
        return Ok(());
    }
    let skip = if skip_warmup { warmup_rows(outputs) } else { 0 };
    write_columns(dest.writer()?, &columns, dates, skip)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    fn render(columns: &[(String, &[f64])], dates: Option<&[String]>, skip: usize) -> String {
        let mut buffer = Vec::new();
        write_columns(&mut buffer, columns, dates, skip).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn macd_output() -> IndicatorOutput<f64> {
        IndicatorOutput::new("macd", 4)
            .with_channel("MACD", vec![f64::NAN, f64::NAN, 1.0, 1.5])
            .with_channel("Signal", vec![f64::NAN, f64::NAN, f64::NAN, 1.25])
    }

    #[test]
    fn test_write_single_column() {
        let values = [f64::NAN, f64::NAN, 44.0, 44.5, 44.0];
        let columns = vec![("SMA".to_string(), &values[..])];
        assert_eq!(render(&columns, None, 0).lines().count(), 6);
        assert_eq!(render(&columns, None, 2), "SMA\n44\n44.5\n44\n");
    }

    #[test]
    fn test_write_multi_column_with_dates() {
        let output = macd_output();
        let columns = output_columns(std::slice::from_ref(&output));
        let dates: Vec<String> = (1..=4).map(|d| format!("2024-01-0{d}")).collect();

        let text = render(&columns, Some(dates.as_slice()), 0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,MACD,Signal");
        assert_eq!(lines[1], "2024-01-01,,");
        assert_eq!(lines[3], "2024-01-03,1,");
        assert_eq!(lines[4], "2024-01-04,1.5,1.25");
    }

    #[test]
    fn test_output_columns_prefix_when_several() {
        let mut fast = macd_output();
        fast.set_indicator("fast");
        let mut slow = macd_output();
        slow.set_indicator("slow");

        let outputs = [fast, slow];
        let columns = output_columns(&outputs);
        let headers: Vec<&str> = columns.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(
            headers,
            vec!["fast.MACD", "fast.Signal", "slow.MACD", "slow.Signal"]
        );
    }

    #[test]
    fn test_warmup_rows_uses_earliest_defined_channel() {
        assert_eq!(warmup_rows(&[macd_output()]), 2);

        let late = IndicatorOutput::new("late", 4).with_channel("X", vec![f64::NAN; 4]);
        assert_eq!(warmup_rows(&[late.clone()]), 4);
        assert_eq!(warmup_rows(&[late, macd_output()]), 2);
        assert_eq!(warmup_rows(&[]), 0);
    }

    #[test]
    fn test_write_outputs_to_file_skips_warmup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macd.csv");
        let dest = OutputDest::File(path.display().to_string());

        write_outputs(&[macd_output()], None, true, &dest).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "MACD,Signal\n1,\n1.5,1.25\n");
    }

    #[test]
    fn test_write_to_missing_directory_reports_path() {
        let dest = OutputDest::File("/nonexistent/dir/out.csv".to_string());
        match write_outputs(&[macd_output()], None, false, &dest) {
            Err(CliError::IoError { path, .. }) => {
                assert_eq!(path.as_deref(), Some("/nonexistent/dir/out.csv"));
            }
            other => panic!("Expected IoError, got {other:?}"),
        }
    }

    #[test]
    fn test_output_dest_from_path() {
        assert_eq!(OutputDest::from_path(None), OutputDest::Stdout);
        assert_eq!(
            OutputDest::from_path(Some("out.csv")),
            OutputDest::File("out.csv".to_string())
        );
    }
}
