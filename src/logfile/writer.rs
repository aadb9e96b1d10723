//! Durable append of log lines.
//!
//! There is no locking: two processes appending to the same file at once
//! may interleave lines. Callers that need that must serialize externally.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use speedwatch_types::{MeasurementRecord, HEADER};
use tracing::debug;

use super::format_record;

/// Append `line` to the log at `path`.
///
/// Creates the file with the header line first if it does not exist. An
/// existing file is never rewritten, so its header (current or legacy) is
/// left as is. Filesystem errors are returned unchanged.
pub fn append<P: AsRef<Path>>(path: P, line: &str) -> io::Result<()> {
    let path = path.as_ref();

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            writeln!(file, "{}", HEADER)?;
            debug!(path = %path.display(), "created measurement log");
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e),
    }

    let mut file = OpenOptions::new().append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()?;

    debug!(path = %path.display(), "appended measurement");
    Ok(())
}

/// Format `record` and append it to the log at `path`.
pub fn append_record<P: AsRef<Path>>(path: P, record: &MeasurementRecord) -> io::Result<()> {
    append(path, &format_record(record))
}
