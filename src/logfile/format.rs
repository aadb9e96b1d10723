//! Record formatting.

use speedwatch_types::{MeasurementRecord, DELIMITER};

/// Format a record as one log line (without the trailing newline).
///
/// Fields follow [`speedwatch_types::COLUMNS`]: timestamp, ISP, ping,
/// download and upload in MiBit/s, comment. Numbers use two decimals and
/// the sentinel is written like any other value (`-1.00`). Embedded
/// delimiters are not escaped; line breaks in text fields become spaces so
/// a record always occupies a single line.
pub fn format_record(record: &MeasurementRecord) -> String {
    format!(
        "{ts}{d}{isp}{d}{ping:.2}{d}{down:.2}{d}{up:.2}{d}{comment}",
        ts = record.timestamp,
        isp = single_line(&record.isp_name),
        ping = record.ping_ms,
        down = record.download_mibps(),
        up = record.upload_mibps(),
        comment = record.comment.as_deref().map(single_line).unwrap_or_default(),
        d = DELIMITER,
    )
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
