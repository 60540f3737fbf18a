//! CSV parsing module for reading OHLCV bars.
//!
//! # Column Detection
//!
//! Columns are detected by header name (case-insensitive):
//! - `close`, `price`, `adj close`, `adjusted close` → close prices
//! - `open`, `high`, `low` → the remaining price fields
//! - `volume`, `vol` → volume
//! - `date`, `time`, `datetime`, `timestamp`, `dt` → bar timestamp
//!
//! Only a close column is required. Missing open/high/low columns are filled
//! from the close and a missing volume column is undefined (NaN), so
//! close-only files still work with close-based indicators.
//!
//! # Timestamps
//!
//! Date cells are parsed with `chrono` from integer epoch seconds,
//! `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (also with a `T` separator) or
//! RFC 3339. Without a date column bars are numbered `0, 1, 2, ...`.
//! The original date strings are kept for the output file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use algo_ta::series::{Bar, Series, SeriesBuilder, Timestamp};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Bars read from a CSV file together with their original date strings.
#[derive(Debug, Clone)]
pub struct PriceData {
    /// Date/time strings as written in the file (if present).
    pub dates: Option<Vec<String>>,
    /// The parsed bar history.
    pub series: Series<f64>,
}

/// Parsed CSV data with column mapping.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Column headers from the CSV.
    pub headers: Vec<String>,
    /// Mapping of normalized column name to column index.
    pub column_map: HashMap<String, usize>,
    /// Date column values (if found).
    pub dates: Option<Vec<String>>,
    /// All numeric data columns by index.
    pub columns: HashMap<usize, Vec<f64>>,
    /// Number of rows parsed.
    pub row_count: usize,
}

impl ParsedCsv {
    /// Get a column by normalized name (e.g., "close", "high").
    pub fn get_column(&self, name: &str) -> Option<&Vec<f64>> {
        self.column_map
            .get(name)
            .and_then(|idx| self.columns.get(idx))
    }

    /// Get close prices, trying multiple common column names.
    pub fn get_close(&self) -> Option<&Vec<f64>> {
        self.get_column("close")
            .or_else(|| self.get_column("price"))
            .or_else(|| self.get_column("adj close"))
            .or_else(|| self.get_column("adjusted close"))
    }

    /// Get volume, trying `volume` then `vol`.
    pub fn get_volume(&self) -> Option<&Vec<f64>> {
        self.get_column("volume")
            .or_else(|| self.get_column("vol"))
    }

    /// Parses the date column into timestamps, or numbers the rows when
    /// there is no date column.
    ///
    /// # Errors
    ///
    /// `CliError::CsvParseError` naming the line of the first unparseable
    /// date.
    pub fn timestamps(&self) -> Result<Vec<Timestamp>> {
        match &self.dates {
            Some(dates) => dates
                .iter()
                .enumerate()
                .map(|(row, date)| {
                    parse_timestamp(date).ok_or_else(|| CliError::CsvParseError {
                        message: format!("cannot parse '{date}' as a date or timestamp"),
                        line: Some(row + 2),
                    })
                })
                .collect(),
            None => Ok((0..self.row_count)
                .map(|i| Timestamp::try_from(i).unwrap_or(Timestamp::MAX))
                .collect()),
        }
    }

    /// Assembles the parsed columns into a [`Series`].
    ///
    /// # Errors
    ///
    /// `CliError::CsvParseError` without a close column or with a bad date,
    /// `CliError::IndicatorError` when timestamps are not strictly
    /// increasing.
    pub fn into_price_data(self) -> Result<PriceData> {
        let close = self
            .get_close()
            .ok_or_else(|| {
                CliError::csv("no close price column found (expected 'close', 'price', or 'adj close')")
            })?
            .clone();
        let timestamps = self.timestamps()?;

        let fill_from_close = |name: &str| match self.get_column(name) {
            Some(values) => values.clone(),
            None => {
                warn!(column = name, "column missing, using close prices");
                close.clone()
            }
        };
        let open = fill_from_close("open");
        let high = fill_from_close("high");
        let low = fill_from_close("low");
        let volume = self.get_volume().cloned().unwrap_or_else(|| {
            warn!("no volume column, volume-based indicators will be undefined");
            vec![f64::NAN; close.len()]
        });

        let mut builder = SeriesBuilder::with_capacity(close.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            builder.push(Bar::new(ts, open[i], high[i], low[i], close[i], volume[i]))?;
        }
        let series = builder.build();
        debug!(bars = series.len(), "loaded price series");

        Ok(PriceData {
            dates: self.dates,
            series,
        })
    }
}

/// Normalize a column header name for matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Check if a header represents a date column.
fn is_date_column(header: &str) -> bool {
    let normalized = normalize_header(header);
    matches!(
        normalized.as_str(),
        "date" | "time" | "datetime" | "timestamp" | "dt"
    )
}

/// Parse a string value to f64, treating empty as NaN.
fn parse_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(f64::NAN)
    } else {
        trimmed.parse::<f64>().ok()
    }
}

/// Parses a date cell into UTC epoch seconds.
///
/// Accepts integer epoch seconds, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` and RFC 3339. Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<i64>() {
        return Some(seconds);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive).timestamp());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).timestamp())
}

/// Parse a CSV file into a structured format.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be read, or
/// `CliError::CsvParseError` if the CSV is malformed.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<ParsedCsv> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    parse_csv_from_reader(BufReader::new(file))
}

/// Parse CSV data from a reader.
///
/// # Errors
///
/// `CliError::CsvParseError` for a missing header, a malformed record or a
/// non-numeric price cell.
pub fn parse_csv_from_reader<R: Read>(reader: R) -> Result<ParsedCsv> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(1),
        })?
        .iter()
        .map(String::from)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CliError::CsvParseError {
            message: "CSV file has no headers".to_string(),
            line: Some(1),
        });
    }

    let mut column_map = HashMap::new();
    let mut date_column_idx: Option<usize> = None;

    for (idx, header) in headers.iter().enumerate() {
        if is_date_column(header) {
            date_column_idx = Some(idx);
        } else {
            column_map.insert(normalize_header(header), idx);
        }
    }

    let mut columns: HashMap<usize, Vec<f64>> =
        column_map.values().map(|&idx| (idx, Vec::new())).collect();
    let mut dates: Vec<String> = Vec::new();

    let mut row_count = 0;
    for (line_idx, result) in csv_reader.records().enumerate() {
        // +2 for the header and 0-indexing
        let line = line_idx + 2;
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;

        if let Some(date_idx) = date_column_idx {
            dates.push(record.get(date_idx).unwrap_or_default().trim().to_string());
        }

        for (&col_idx, values) in &mut columns {
            let raw = record.get(col_idx).unwrap_or("");
            let parsed = parse_value(raw).ok_or_else(|| CliError::CsvParseError {
                message: format!("cannot parse '{}' as number", raw.trim()),
                line: Some(line),
            })?;
            values.push(parsed);
        }

        row_count += 1;
    }

    Ok(ParsedCsv {
        headers,
        column_map,
        dates: date_column_idx.map(|_| dates),
        columns,
        row_count,
    })
}

/// Reads an OHLCV CSV file into a [`PriceData`].
///
/// # Errors
///
/// See [`parse_csv`] and [`ParsedCsv::into_price_data`].
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<PriceData> {
    let parsed = parse_csv(path)?;
    parsed.into_price_data()
}

/// Reads OHLCV CSV data from a reader into a [`PriceData`].
///
/// # Errors
///
/// See [`parse_csv_from_reader`] and [`ParsedCsv::into_price_data`].
pub fn load_series_from_reader<R: Read>(reader: R) -> Result<PriceData> {
    parse_csv_from_reader(reader)?.into_price_data()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_parse_simple_csv_with_close_prices() {
        let csv_data = "close\n44.0\n44.5\n43.5\n44.5\n44.0\n";
        let parsed = parse_csv_from_reader(Cursor::new(csv_data)).unwrap();

        let close = parsed.get_close().unwrap();
        assert_eq!(close.len(), 5);
        assert!((close[0] - 44.0).abs() < 1e-10);
        assert!((close[2] - 43.5).abs() < 1e-10);
        assert_eq!(parsed.row_count, 5);
        assert!(parsed.dates.is_none());
    }

    #[test]
    fn test_parse_ohlcv_into_series() {
        let csv_data = "date,open,high,low,close,volume\n\
                        2024-01-01,44.0,45.0,43.5,44.5,1000000\n\
                        2024-01-02,44.5,45.5,44.0,45.0,1100000\n";
        let data = load_series_from_reader(Cursor::new(csv_data)).unwrap();

        let series = &data.series;
        assert_eq!(series.len(), 2);
        assert_eq!(series.timestamps(), &[1_704_067_200, 1_704_153_600]);
        assert_eq!(series.open(), &[44.0, 44.5]);
        assert_eq!(series.high(), &[45.0, 45.5]);
        assert_eq!(series.low(), &[43.5, 44.0]);
        assert_eq!(series.close(), &[44.5, 45.0]);
        assert_eq!(series.volume(), &[1_000_000.0, 1_100_000.0]);
        assert_eq!(
            data.dates,
            Some(vec!["2024-01-01".to_string(), "2024-01-02".to_string()])
        );
    }

    #[test]
    fn test_handle_header_case() {
        let csv_data = "Close,HIGH,low,OPEN,Vol\n44.0,45.0,43.0,44.5,10\n";
        let parsed = parse_csv_from_reader(Cursor::new(csv_data)).unwrap();

        assert!(parsed.get_close().is_some());
        assert!(parsed.get_column("high").is_some());
        assert!(parsed.get_column("low").is_some());
        assert!(parsed.get_column("open").is_some());
        assert_eq!(parsed.get_volume(), Some(&vec![10.0]));
    }

    #[test]
    fn test_close_only_fills_other_fields() {
        let data = load_series_from_reader(Cursor::new("close\n10\n11\n12\n")).unwrap();
        let series = &data.series;
        assert_eq!(series.timestamps(), &[0, 1, 2]);
        assert_eq!(series.open(), series.close());
        assert_eq!(series.high(), series.close());
        assert_eq!(series.low(), series.close());
        assert!(series.volume().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_handle_missing_values_as_nan() {
        let csv_data = "date,close\n2024-01-01,44.0\n2024-01-02,\n2024-01-03,45.0\n";
        let parsed = parse_csv_from_reader(Cursor::new(csv_data)).unwrap();

        let close = parsed.get_close().unwrap();
        assert_eq!(close.len(), 3);
        assert!(close[1].is_nan());
        assert!((close[2] - 45.0).abs() < 1e-10);
    }

    #[test]
    fn test_malformed_value_reports_line() {
        let csv_data = "date,close\n2024-01-01,44.0\n2024-01-02,not_a_number\n";
        match parse_csv_from_reader(Cursor::new(csv_data)) {
            Err(CliError::CsvParseError { message, line }) => {
                assert!(message.contains("not_a_number"));
                assert_eq!(line, Some(3));
            }
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_reports_line() {
        let csv_data = "date,close\n2024-01-01,44.0\nyesterday,45.0\n";
        match load_series_from_reader(Cursor::new(csv_data)) {
            Err(CliError::CsvParseError { message, line }) => {
                assert!(message.contains("yesterday"));
                assert_eq!(line, Some(3));
            }
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_order_dates_rejected() {
        let csv_data = "date,close\n2024-01-02,44.0\n2024-01-01,45.0\n";
        match load_series_from_reader(Cursor::new(csv_data)) {
            Err(CliError::IndicatorError {
                source: algo_ta::Error::NonMonotonicTimestamp { index, .. },
            }) => assert_eq!(index, 1),
            other => panic!("Expected NonMonotonicTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_close_column() {
        let csv_data = "open,high,low\n44.0,45.0,43.5\n";
        let err = load_series_from_reader(Cursor::new(csv_data)).unwrap_err();
        assert!(err.to_string().contains("no close price column"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("1704067200"), Some(1_704_067_200));
        assert_eq!(parse_timestamp("2024-01-01"), Some(1_704_067_200));
        assert_eq!(parse_timestamp("2024-01-01 04:00:00"), Some(1_704_081_600));
        assert_eq!(parse_timestamp("2024-01-01T04:00:00"), Some(1_704_081_600));
        assert_eq!(
            parse_timestamp("2024-01-01T06:00:00+02:00"),
            Some(1_704_081_600)
        );
        assert_eq!(parse_timestamp(" 2024-01-01 "), Some(1_704_067_200));
        assert_eq!(parse_timestamp("01/02/2024"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_various_date_column_names() {
        for date_name in &["date", "Date", "DATE", "time", "datetime", "timestamp"] {
            let csv_data = format!("{},close\n2024-01-01,44.0\n", date_name);
            let parsed = parse_csv_from_reader(Cursor::new(csv_data)).unwrap();
            assert!(
                parsed.dates.is_some(),
                "Failed to detect date column: {}",
                date_name
            );
        }
    }

    #[test]
    fn test_empty_csv_no_data_rows() {
        let parsed = parse_csv_from_reader(Cursor::new("date,close\n")).unwrap();
        assert_eq!(parsed.row_count, 0);
        assert_eq!(parsed.dates, Some(vec![]));
        assert!(parsed.get_close().unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_in_values() {
        let csv_data = "close\n  44.0  \n 44.5\n43.5 \n";
        let parsed = parse_csv_from_reader(Cursor::new(csv_data)).unwrap();
        assert_eq!(parsed.get_close().unwrap(), &vec![44.0, 44.5, 43.5]);
    }

    #[test]
    fn test_load_series_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "timestamp,close\n0,1.0\n3600,2.0\n7200,3.0\n").unwrap();

        let data = load_series(file.path()).unwrap();
        assert_eq!(data.series.timestamps(), &[0, 3600, 7200]);
        assert_eq!(data.series.close(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_error_file_not_found() {
        match parse_csv("/nonexistent/path/to/bars.csv") {
            Err(CliError::IoError { path, .. }) => {
                assert!(path.unwrap().contains("nonexistent"));
            }
            other => panic!("Expected IoError, got {other:?}"),
        }
    }
}
