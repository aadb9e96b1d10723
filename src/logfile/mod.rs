//! The persisted measurement log.
//!
//! One header line followed by one comma-separated line per measurement:
//!
//! ```text
//! Timestamp,ISP,Ping (ms),Download (Mbit/s),Upload (Mbit/s),Comments
//! 2024-01-01T00:00:00Z,Example ISP,12.34,45.67,5.67,
//! ```
//!
//! - [`format`]: turns a [`MeasurementRecord`](speedwatch_types::MeasurementRecord) into a line
//! - [`writer`]: appends lines, creating the file with its header first
//!
//! Reading the log back is handled by [`crate::data::load`].

pub mod format;
pub mod writer;

pub use format::format_record;
pub use writer::{append, append_record};
