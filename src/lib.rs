//! # speedwatch
//!
//! Record internet speed tests to a CSV log and chart the history.
//!
//! Every invocation runs one of two paths:
//!
//! ```text
//!  write path                                read path
//!  ──────────                                ─────────
//!  speedwatch_probe::probe()                 measurement log (CSV)
//!          │                                         │
//!          ▼                                         ▼
//!  logfile::format_record()                  data::load()
//!          │                                         │
//!          ▼                                 ┌───────┴────────┐
//!  logfile::append() ──▶ measurement log     ▼                ▼
//!                                         ui (static)   html_chart
//! ```
//!
//! - **[`logfile`]**: Formatting records and appending them to the log
//! - **[`data`]**: Strict loading of the log into a [`Dataset`], histogram
//!   binning and summary statistics
//! - **[`ui`]**: Two-panel terminal chart (histogram and time series) using ratatui
//! - **[`html_chart`]**: Self-contained interactive HTML chart
//! - **[`settings`]**: Layered configuration (defaults, file, environment)
//!
//! Probing itself lives in the `speedwatch-probe` crate.
//!
//! ## Usage
//!
//! ```bash
//! # Probe once and append to the log
//! speedwatch --outfile speeds.csv
//!
//! # Terminal chart of the log
//! speedwatch --infile speeds.csv --static
//!
//! # Interactive chart written to speedwatch.html
//! speedwatch --infile speeds.csv
//! ```
//!
//! ### As a library
//!
//! ```
//! use speedwatch::logfile::format_record;
//! use speedwatch::MeasurementRecord;
//!
//! let record = MeasurementRecord::unavailable("2024-01-01T00:00:00.000000Z", "Example ISP");
//! assert_eq!(
//!     format_record(&record),
//!     "2024-01-01T00:00:00.000000Z,Example ISP,-1.00,-1.00,-1.00,"
//! );
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod html_chart;
pub mod logfile;
pub mod settings;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{load, Dataset, DatasetError, DatasetRow, Histogram, Summary};
pub use settings::Settings;
pub use speedwatch_types::MeasurementRecord;
