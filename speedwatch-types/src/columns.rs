//! Column names of the persisted measurement log.
//!
//! The writer emits [`HEADER`]; older logs were written with
//! [`LEGACY_HEADER`], which lacks the trailing comments column. Readers look
//! columns up by name so either variant loads.

/// Timestamp column (ISO-8601, UTC).
pub const TIMESTAMP: &str = "Timestamp";

/// ISP name column.
pub const ISP: &str = "ISP";

/// Round-trip latency column, in milliseconds.
pub const PING: &str = "Ping (ms)";

/// Download speed column, in mebibits per second.
pub const DOWNLOAD: &str = "Download (Mbit/s)";

/// Upload speed column, in mebibits per second.
pub const UPLOAD: &str = "Upload (Mbit/s)";

/// Free-form comments column. Absent from legacy logs.
pub const COMMENTS: &str = "Comments";

/// Column order written by the current log writer.
pub const COLUMNS: [&str; 6] = [TIMESTAMP, ISP, PING, DOWNLOAD, UPLOAD, COMMENTS];

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Header line written when a log file is created (without newline).
pub const HEADER: &str = "Timestamp,ISP,Ping (ms),Download (Mbit/s),Upload (Mbit/s),Comments";

/// Header line of logs written before the comments column existed.
pub const LEGACY_HEADER: &str = "Timestamp,ISP,Ping (ms),Download (Mbit/s),Upload (Mbit/s)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matches_columns() {
        let joined = COLUMNS.join(&DELIMITER.to_string());
        assert_eq!(joined, HEADER);
    }

    #[test]
    fn test_legacy_header_is_prefix() {
        assert!(HEADER.starts_with(LEGACY_HEADER));
        assert_eq!(LEGACY_HEADER.split(DELIMITER).count(), COLUMNS.len() - 1);
    }
}
