//! Probe abstraction and normalization of outcomes into records.

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use speedwatch_types::{MeasurementRecord, DEFAULT_PROVIDER};

use crate::ProbeError;

/// Result of a probe that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The probe completed and produced a measurement.
    Measured(MeasurementRecord),

    /// The backend could not retrieve its server configuration, typically
    /// because there is no network path.
    ConfigUnavailable {
        /// Human-readable cause, for logging.
        reason: String,
    },
}

/// A network throughput/latency measurement backend.
///
/// Implementations perform a single attempt. Failures other than an
/// unreachable configuration endpoint are returned as [`ProbeError`].
#[async_trait]
pub trait Probe: Send + Sync {
    /// Run one measurement.
    async fn measure(&self) -> Result<ProbeOutcome, ProbeError>;

    /// Returns a human-readable description of the backend.
    fn description(&self) -> &str;
}

/// Run `probe` once and normalize the outcome into a record.
///
/// When the backend reports [`ProbeOutcome::ConfigUnavailable`] the record
/// carries the current UTC time, sentinel speeds and ping, and
/// `fallback_isp` (or [`DEFAULT_PROVIDER`]) as the ISP.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use speedwatch_probe::{probe, Probe, ProbeError, ProbeOutcome};
///
/// struct Offline;
///
/// #[async_trait]
/// impl Probe for Offline {
///     async fn measure(&self) -> Result<ProbeOutcome, ProbeError> {
///         Ok(ProbeOutcome::ConfigUnavailable { reason: "no route".into() })
///     }
///     fn description(&self) -> &str {
///         "offline"
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let record = probe(&Offline, Some("My ISP")).await.unwrap();
/// assert!(record.is_unavailable());
/// assert_eq!(record.isp_name, "My ISP");
/// # });
/// ```
pub async fn probe<P>(probe: &P, fallback_isp: Option<&str>) -> Result<MeasurementRecord, ProbeError>
where
    P: Probe + ?Sized,
{
    match probe.measure().await? {
        ProbeOutcome::Measured(record) => Ok(record),
        ProbeOutcome::ConfigUnavailable { reason } => {
            let isp = fallback_isp.unwrap_or(DEFAULT_PROVIDER);
            warn!(
                backend = probe.description(),
                %reason,
                "configuration unavailable, recording sentinel measurement for {}",
                isp
            );
            Ok(MeasurementRecord::unavailable(utc_timestamp(), isp))
        }
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
