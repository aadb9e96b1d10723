//! The measurement record produced by one probe.

/// Value stored in the numeric fields when a measurement is unavailable.
pub const SENTINEL: f64 = -1.0;

/// Bits per mebibit, the divisor between bits/s and the persisted MiBit/s.
pub const BITS_PER_MIBIT: f64 = 1024.0 * 1024.0;

/// ISP recorded for an unavailable measurement when the caller supplies none.
pub const DEFAULT_PROVIDER: &str = "Virgin Media";

/// Outcome of a single throughput/latency probe.
///
/// A successful probe has non-negative speeds and ping. A probe that could
/// not reach its configuration endpoint is still recorded, with every
/// numeric field set to [`SENTINEL`], so the log never loses a row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementRecord {
    /// When the probe completed, ISO-8601 in UTC.
    pub timestamp: String,

    /// Download rate in bits per second.
    pub download_bps: f64,

    /// Upload rate in bits per second.
    pub upload_bps: f64,

    /// Round-trip latency to the selected server, in milliseconds.
    pub ping_ms: f64,

    /// ISP reported by the probe, or the caller's fallback.
    pub isp_name: String,

    /// Optional free-form note stored alongside the measurement.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub comment: Option<String>,
}

impl MeasurementRecord {
    /// Create a builder for a record taken at `timestamp`.
    pub fn builder(timestamp: impl Into<String>) -> MeasurementRecordBuilder {
        MeasurementRecordBuilder::new(timestamp)
    }

    /// Record for a probe that could not run.
    pub fn unavailable(timestamp: impl Into<String>, isp_name: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            download_bps: SENTINEL,
            upload_bps: SENTINEL,
            ping_ms: SENTINEL,
            isp_name: isp_name.into(),
            comment: None,
        }
    }

    /// Attach (or clear) the comment.
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// True when every numeric field holds the sentinel.
    pub fn is_unavailable(&self) -> bool {
        self.download_bps == SENTINEL && self.upload_bps == SENTINEL && self.ping_ms == SENTINEL
    }

    /// Download rate in MiBit/s.
    pub fn download_mibps(&self) -> f64 {
        to_mibps(self.download_bps)
    }

    /// Upload rate in MiBit/s.
    pub fn upload_mibps(&self) -> f64 {
        to_mibps(self.upload_bps)
    }
}

/// Convert bits/s to MiBit/s. The sentinel passes through unchanged.
pub fn to_mibps(bps: f64) -> f64 {
    if bps == SENTINEL {
        SENTINEL
    } else {
        bps / BITS_PER_MIBIT
    }
}

/// Builder for [`MeasurementRecord`].
#[derive(Debug, Clone)]
pub struct MeasurementRecordBuilder {
    record: MeasurementRecord,
}

impl MeasurementRecordBuilder {
    /// Create a builder with zeroed measurements and an empty ISP.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            record: MeasurementRecord {
                timestamp: timestamp.into(),
                download_bps: 0.0,
                upload_bps: 0.0,
                ping_ms: 0.0,
                isp_name: String::new(),
                comment: None,
            },
        }
    }

    /// Set the download rate in bits per second.
    pub fn download_bps(mut self, bps: f64) -> Self {
        self.record.download_bps = bps;
        self
    }

    /// Set the upload rate in bits per second.
    pub fn upload_bps(mut self, bps: f64) -> Self {
        self.record.upload_bps = bps;
        self
    }

    /// Set the round-trip latency in milliseconds.
    pub fn ping_ms(mut self, ms: f64) -> Self {
        self.record.ping_ms = ms;
        self
    }

    /// Set the ISP name.
    pub fn isp(mut self, isp: impl Into<String>) -> Self {
        self.record.isp_name = isp.into();
        self
    }

    /// Set the comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.record.comment = Some(comment.into());
        self
    }

    /// Build the record.
    pub fn build(self) -> MeasurementRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_uses_sentinel() {
        let record = MeasurementRecord::unavailable("2024-01-01T00:00:00Z", "Fallback");
        assert_eq!(record.download_bps, SENTINEL);
        assert_eq!(record.upload_bps, SENTINEL);
        assert_eq!(record.ping_ms, SENTINEL);
        assert_eq!(record.isp_name, "Fallback");
        assert!(record.is_unavailable());
        assert!(record.comment.is_none());
    }

    #[test]
    fn test_mibps_conversion() {
        let record = MeasurementRecord::builder("2024-01-01T00:00:00Z")
            .download_bps(471_859_200.0)
            .upload_bps(58_720_256.0)
            .build();
        assert_eq!(record.download_mibps(), 450.0);
        assert_eq!(record.upload_mibps(), 56.0);
        assert!(!record.is_unavailable());
    }

    #[test]
    fn test_sentinel_survives_conversion() {
        let record = MeasurementRecord::unavailable("2024-01-01T00:00:00Z", "x");
        assert_eq!(record.download_mibps(), SENTINEL);
        assert_eq!(record.upload_mibps(), SENTINEL);
    }

    #[test]
    fn test_builder_comment() {
        let record = MeasurementRecord::builder("t").comment("router rebooted").build();
        assert_eq!(record.comment.as_deref(), Some("router rebooted"));

        let cleared = record.with_comment(None);
        assert!(cleared.comment.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_skips_missing_comment() {
        let record = MeasurementRecord::unavailable("t", "isp");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("comment"));
        let back: MeasurementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
