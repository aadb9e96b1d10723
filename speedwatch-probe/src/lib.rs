//! # speedwatch-probe
//!
//! Network throughput and latency probes.
//!
//! A probe is a single measurement attempt against an external backend. The
//! backend reports an explicit [`ProbeOutcome`], separating a measurement
//! from the one failure the caller recovers from (the backend cannot fetch
//! its configuration, usually because the network is down). [`probe`] turns
//! either outcome into a [`MeasurementRecord`]; every other failure is a
//! [`ProbeError`].
//!
//! ## Supported Backends
//!
//! - **speedtest.net** ([`SpeedtestClient`]) - closest-server latency,
//!   download and upload over HTTP
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speedwatch_probe::{probe, SpeedtestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpeedtestClient::builder().build()?;
//!     let record = probe(&client, None).await?;
//!
//!     println!("{} via {}", record.timestamp, record.isp_name);
//!     Ok(())
//! }
//! ```

pub mod error;
mod probe;
pub mod speedtest;

pub use error::ProbeError;
pub use probe::{probe, utc_timestamp, Probe, ProbeOutcome};
pub use speedtest::{SpeedtestClient, SpeedtestClientBuilder, SpeedtestSettings};

// Re-export types for convenience
pub use speedwatch_types::{MeasurementRecord, DEFAULT_PROVIDER, SENTINEL};
