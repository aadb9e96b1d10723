//! Strict loader for the measurement log.
//!
//! The whole file either loads or fails: a missing required column, a row
//! without a timestamp or download value, or a value that does not parse
//! aborts the load with the offending line number.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use speedwatch_types::{COMMENTS, DOWNLOAD, SENTINEL, TIMESTAMP};

use super::Summary;

/// Display label of the timestamp column.
pub const DATE_LABEL: &str = "Date";

/// Display label of the download speed column.
pub const SPEED_LABEL: &str = "Speed Results";

/// Display label of the comments column.
pub const COMMENTS_LABEL: &str = "Comments";

/// Naive timestamp layouts accepted in addition to RFC 3339, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Errors raised while loading a measurement log.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not well-formed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header lacks a column the presentation needs.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A row is too short to hold a required column.
    #[error("line {line}: missing value for '{column}'")]
    MissingField { line: u64, column: &'static str },

    /// A timestamp could not be parsed.
    #[error("line {line}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },

    /// A numeric field could not be parsed.
    #[error("line {line}: cannot parse '{column}' value '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// One reduced log row.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    /// Measurement time.
    pub date: DateTime<Utc>,
    /// Download speed in MiBit/s (may be the sentinel).
    pub speed: f64,
    /// Comment, `None` when empty or when the log has no comments column.
    pub comment: Option<String>,
}

impl DatasetRow {
    /// True when the row records an unavailable measurement.
    pub fn is_unavailable(&self) -> bool {
        self.speed == SENTINEL
    }
}

/// The measurement log reduced to the fields needed for charts.
///
/// Rows keep file order; nothing is sorted or deduplicated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
    has_comments: bool,
}

impl Dataset {
    /// Build a dataset from already reduced rows.
    pub fn from_rows(rows: Vec<DatasetRow>, has_comments: bool) -> Self {
        Self { rows, has_comments }
    }

    /// Parse a log from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let timestamp_idx = column_index(&headers, TIMESTAMP)?;
        let download_idx = column_index(&headers, DOWNLOAD)?;
        let comments_idx = headers.iter().position(|h| h == COMMENTS);

        let mut rows = Vec::new();
        for (i, result) in csv.records().enumerate() {
            let record = result?;
            // Header is line 1
            let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

            let raw_ts = field(&record, timestamp_idx, line, TIMESTAMP)?;
            let date = parse_timestamp(raw_ts).ok_or_else(|| DatasetError::InvalidTimestamp {
                line,
                value: raw_ts.to_string(),
            })?;

            let raw_speed = field(&record, download_idx, line, DOWNLOAD)?;
            let speed = parse_speed(raw_speed).ok_or_else(|| DatasetError::InvalidNumber {
                line,
                column: DOWNLOAD,
                value: raw_speed.to_string(),
            })?;

            let comment = comments_idx
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string);

            rows.push(DatasetRow {
                date,
                speed,
                comment,
            });
        }

        Ok(Self {
            rows,
            has_comments: comments_idx.is_some(),
        })
    }

    /// The rows, in file order.
    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the log has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the source log had a comments column.
    pub fn has_comments(&self) -> bool {
        self.has_comments
    }

    /// Display labels of the columns present, in order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec![DATE_LABEL, SPEED_LABEL];
        if self.has_comments {
            columns.push(COMMENTS_LABEL);
        }
        columns
    }

    /// Download speeds in file order.
    pub fn speeds(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.speed)
    }

    /// Headline statistics over the download column.
    pub fn summary(&self) -> Summary {
        Summary::from_rows(&self.rows)
    }
}

/// Load the measurement log at `path`.
///
/// The header may be the current one or the legacy one without a comments
/// column. Only `Timestamp` and `Download (Mbit/s)` are required.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = Dataset::from_reader(file)?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        comments = dataset.has_comments(),
        "loaded measurement log"
    );
    Ok(dataset)
}

/// Parse a log timestamp as UTC.
///
/// Accepts RFC 3339 (with `Z` or an offset) and naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.f]`, which is taken to be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// A finite speed value; `NaN` and infinities are rejected.
fn parse_speed(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn column_index(headers: &StringRecord, name: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(DatasetError::MissingColumn(name))
}

fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    line: u64,
    column: &'static str,
) -> Result<&'r str, DatasetError> {
    record.get(idx).ok_or(DatasetError::MissingField { line, column })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use speedwatch_types::{HEADER, LEGACY_HEADER};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn log_file(header: &str, rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", header).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_current_format() {
        let file = log_file(
            HEADER,
            &[
                "2024-01-01T00:00:00Z,Example ISP,12.34,45.67,5.67,",
                "2024-01-01T01:00:00.250000Z,Example ISP,11.00,50.00,6.00,after reboot",
                "2023-12-31T23:00:00Z,Example ISP,-1.00,-1.00,-1.00,",
            ],
        );

        let dataset = load(file.path()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.columns(), vec!["Date", "Speed Results", "Comments"]);

        let rows = dataset.rows();
        assert_eq!(rows[0].date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(rows[0].speed, 45.67);
        assert_eq!(rows[0].comment, None);
        assert_eq!(rows[1].comment.as_deref(), Some("after reboot"));
        // File order is kept even when timestamps go backwards
        assert_eq!(rows[2].date, Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap());
        assert!(rows[2].is_unavailable());
    }

    #[test]
    fn test_load_legacy_format() {
        let file = log_file(
            LEGACY_HEADER,
            &[
                "2024-01-01T00:00:00Z,Example ISP,12.34,45.67,5.67",
                // Rows written by newer versions carry a trailing empty field
                "2024-01-02T00:00:00Z,Example ISP,12.34,40.00,5.67,",
            ],
        );

        let dataset = load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.has_comments());
        assert_eq!(dataset.columns(), vec!["Date", "Speed Results"]);
        assert!(dataset.rows().iter().all(|r| r.comment.is_none()));
        assert_eq!(dataset.speeds().collect::<Vec<_>>(), vec![45.67, 40.0]);
    }

    #[test]
    fn test_load_header_only() {
        let file = log_file(HEADER, &[]);
        let dataset = load(file.path()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.has_comments());
    }

    #[test]
    fn test_load_keeps_duplicates() {
        let row = "2024-01-01T00:00:00Z,Example ISP,12.34,45.67,5.67,";
        let file = log_file(HEADER, &[row, row]);
        let dataset = load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0], dataset.rows()[1]);
    }

    #[test]
    fn test_missing_column() {
        let file = log_file("Timestamp,ISP,Ping (ms)", &["2024-01-01T00:00:00Z,x,1.0"]);
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("Download (Mbit/s)")));
    }

    #[test]
    fn test_bad_timestamp_fails_whole_load() {
        let file = log_file(
            HEADER,
            &[
                "2024-01-01T00:00:00Z,Example ISP,12.34,45.67,5.67,",
                "yesterday,Example ISP,12.34,45.67,5.67,",
            ],
        );
        let err = load(file.path()).unwrap_err();
        match err {
            DatasetError::InvalidTimestamp { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_speed_fails_whole_load() {
        let file = log_file(HEADER, &["2024-01-01T00:00:00Z,Example ISP,12.34,fast,5.67,"]);
        let err = load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidNumber {
                line: 2,
                column: "Download (Mbit/s)",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_speed_fails_whole_load() {
        for bad in ["NaN", "inf", "-inf", "infinity"] {
            let corrupt = format!("2024-01-01T01:00:00Z,Example ISP,12.34,{},5.67,", bad);
            let file = log_file(
                HEADER,
                &["2024-01-01T00:00:00Z,Example ISP,12.34,45.67,5.67,", corrupt.as_str()],
            );
            let err = load(file.path()).unwrap_err();
            match err {
                DatasetError::InvalidNumber {
                    line,
                    column,
                    value,
                } => {
                    assert_eq!(line, 3);
                    assert_eq!(column, "Download (Mbit/s)");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {}: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_short_row_fails() {
        let file = log_file(HEADER, &["2024-01-01T00:00:00Z,Example ISP"]);
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingField { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load("/nonexistent/path/speeds.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(parse_timestamp("2024-05-06T07:08:09Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T09:08:09+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06T07:08:09"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-06 07:08:09"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-05-06T07:08:09Z "), Some(expected));

        let fractional = parse_timestamp("2024-05-06T07:08:09.123456Z").unwrap();
        assert_eq!(fractional.timestamp_subsec_micros(), 123_456);
        let naive_fractional = parse_timestamp("2024-05-06 07:08:09.5").unwrap();
        assert_eq!(naive_fractional.timestamp_subsec_millis(), 500);

        assert_eq!(parse_timestamp("06/05/2024"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
