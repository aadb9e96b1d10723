//! Layered application settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. A settings file: `--config <path>`, or `speedwatch.toml` (any format
//!    the `config` crate understands) in the working directory if present
//! 3. Environment variables prefixed with `SPEEDWATCH_`, using `__` to
//!    reach nested keys (e.g. `SPEEDWATCH_PROBE__TIMEOUT_SECS=30`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! provider = "Example Broadband"
//! html_output = "speeds.html"
//! histogram_bins = 40
//!
//! [probe]
//! timeout_secs = 20
//! test_length_secs = 15
//! download_sizes = [350, 500, 750]
//! ```

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use speedwatch_probe::SpeedtestSettings;
use speedwatch_types::DEFAULT_PROVIDER;

use crate::data::histogram::DEFAULT_BINS;

/// Settings file looked up in the working directory (extension optional).
pub const DEFAULT_SETTINGS_FILE: &str = "speedwatch";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "SPEEDWATCH";

/// File the interactive chart is written to.
pub const DEFAULT_HTML_OUTPUT: &str = "speedwatch.html";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// ISP recorded when the probe cannot fetch its configuration.
    pub provider: String,
    /// Where the interactive chart is written.
    pub html_output: PathBuf,
    /// Histogram bins in the static chart.
    pub histogram_bins: usize,
    /// speedtest.net probe tunables.
    pub probe: SpeedtestSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            html_output: PathBuf::from(DEFAULT_HTML_OUTPUT),
            histogram_bins: DEFAULT_BINS,
            probe: SpeedtestSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (required) or the optional default file,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("probe.download_sizes")
                    .with_list_parse_key("probe.upload_sizes"),
            )
            .build()?;

        config.try_deserialize()
    }
}
