//! Application state for the static chart.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::data::histogram::{MAX_BINS, MIN_BINS};
use crate::data::{self, Dataset, Histogram, Summary};
use crate::html_chart;
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    path: PathBuf,
    description: String,
    pub dataset: Dataset,
    pub summary: Summary,
    pub load_error: Option<String>,

    // Chart
    pub histogram_bins: usize,
    pub export_path: PathBuf,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App for the log at `path`, already loaded as `dataset`.
    pub fn new<P: AsRef<Path>>(path: P, dataset: Dataset, histogram_bins: usize, theme: Theme) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        let summary = dataset.summary();
        Self {
            running: true,
            show_help: false,
            path,
            description,
            dataset,
            summary,
            load_error: None,
            histogram_bins: histogram_bins.clamp(MIN_BINS, MAX_BINS),
            export_path: PathBuf::from(crate::settings::DEFAULT_HTML_OUTPUT),
            theme,
            status_message: None,
        }
    }

    /// Set where `e` exports the interactive chart.
    pub fn with_export_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.export_path = path.into();
        self
    }

    /// Returns a description of the data source.
    pub fn source_description(&self) -> &str {
        &self.description
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Reload the log from disk.
    ///
    /// Returns true on success. On failure the previous data is kept and
    /// the error is stored in `load_error`.
    pub fn reload_data(&mut self) -> bool {
        match data::load(&self.path) {
            Ok(dataset) => {
                self.summary = dataset.summary();
                self.dataset = dataset;
                self.load_error = None;
                true
            }
            Err(e) => {
                self.load_error = Some(e.to_string());
                false
            }
        }
    }

    /// Histogram of the current download speeds.
    pub fn histogram(&self) -> Histogram {
        Histogram::from_values(self.dataset.speeds(), self.histogram_bins)
    }

    /// Use more histogram bins.
    pub fn more_bins(&mut self) {
        self.histogram_bins = (self.histogram_bins + 5).min(MAX_BINS);
    }

    /// Use fewer histogram bins.
    pub fn fewer_bins(&mut self) {
        self.histogram_bins = self.histogram_bins.saturating_sub(5).max(MIN_BINS);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the interactive chart for the current data.
    pub fn export_html(&self) -> std::io::Result<()> {
        html_chart::write(&self.dataset, &self.export_path)
    }
}
