//! The speedtest.net client configuration document.
//!
//! Only the parts the probe needs are read: the client's detected ISP and
//! location, the server ids that must not be used, and the per-phase test
//! lengths.

use serde::Deserialize;

use crate::ProbeError;

/// Client details as detected by speedtest.net.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientInfo {
    /// Public IP address.
    #[serde(rename = "@ip", default)]
    pub ip: String,
    /// ISP name.
    #[serde(rename = "@isp", default)]
    pub isp: String,
    /// Approximate latitude.
    #[serde(rename = "@lat")]
    pub lat: f64,
    /// Approximate longitude.
    #[serde(rename = "@lon")]
    pub lon: f64,
}

/// Parsed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedtestConfig {
    /// Client details.
    pub client: ClientInfo,
    /// Server ids excluded from selection.
    pub ignore_ids: Vec<u32>,
    /// Download phase length in seconds, when the document gives one.
    pub download_length_secs: Option<u64>,
    /// Upload phase length in seconds, when the document gives one.
    pub upload_length_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SettingsDocument {
    client: ClientInfo,
    #[serde(rename = "server-config", default)]
    server_config: ServerConfigElement,
    #[serde(default)]
    download: Option<PhaseElement>,
    #[serde(default)]
    upload: Option<PhaseElement>,
}

#[derive(Debug, Default, Deserialize)]
struct PhaseElement {
    #[serde(rename = "@testlength", default)]
    testlength: Option<String>,
}

impl PhaseElement {
    fn length_secs(&self) -> Option<u64> {
        self.testlength
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
            .filter(|&secs| secs > 0)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServerConfigElement {
    #[serde(rename = "@ignoreids", default)]
    ignoreids: String,
}

/// Parse the configuration XML.
pub fn parse_config(xml: &str) -> Result<SpeedtestConfig, ProbeError> {
    let doc: SettingsDocument =
        quick_xml::de::from_str(xml).map_err(|e| ProbeError::Config(e.to_string()))?;

    let ignore_ids = doc
        .server_config
        .ignoreids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    Ok(SpeedtestConfig {
        download_length_secs: doc.download.as_ref().and_then(PhaseElement::length_secs),
        upload_length_secs: doc.upload.as_ref().and_then(PhaseElement::length_secs),
        client: doc.client,
        ignore_ids,
    })
}
