//! Error types for probes.

use thiserror::Error;

/// Errors that abort a probe.
///
/// A configuration endpoint that cannot be reached is not an error: it is
/// reported as [`ProbeOutcome::ConfigUnavailable`](crate::ProbeOutcome).
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP request failed after the configuration was retrieved.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The configuration document could not be parsed.
    #[error("Invalid configuration document: {0}")]
    Config(String),

    /// The server list could not be retrieved or parsed.
    #[error("Failed to load server list: {0}")]
    ServerList(String),

    /// No candidate server answered the latency test.
    #[error("No reachable test server")]
    NoServers,

    /// Connection failed mid-measurement.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_connect() {
            ProbeError::Connection(err.to_string())
        } else {
            ProbeError::Http(err.to_string())
        }
    }
}
