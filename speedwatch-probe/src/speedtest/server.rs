//! Test server list and distance-based candidate selection.

use serde::Deserialize;

use crate::ProbeError;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A speedtest.net test server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    /// Upload endpoint; the other endpoints live next to it.
    #[serde(rename = "@url")]
    pub url: String,
    #[serde(rename = "@lat")]
    pub lat: f64,
    #[serde(rename = "@lon")]
    pub lon: f64,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@country", default)]
    pub country: String,
    #[serde(rename = "@sponsor", default)]
    pub sponsor: String,
    #[serde(rename = "@id")]
    pub id: u32,
    #[serde(rename = "@host", default)]
    pub host: String,
    /// Distance from the client, filled in by [`closest`].
    #[serde(skip)]
    pub distance_km: f64,
}

impl Server {
    /// URL of the directory holding the server's test files.
    pub fn base_url(&self) -> &str {
        match self.url.rsplit_once('/') {
            Some((base, _)) => base,
            None => &self.url,
        }
    }

    /// URL of the latency probe file.
    pub fn latency_url(&self) -> String {
        format!("{}/latency.txt", self.base_url())
    }

    /// URL of the square test image of the given edge size.
    pub fn download_url(&self, size: u32) -> String {
        format!("{}/random{}x{}.jpg", self.base_url(), size, size)
    }
}

#[derive(Debug, Deserialize)]
struct ServersDocument {
    servers: ServersElement,
}

#[derive(Debug, Deserialize)]
struct ServersElement {
    #[serde(rename = "server", default)]
    server: Vec<Server>,
}

/// Parse the server list XML.
pub fn parse_servers(xml: &str) -> Result<Vec<Server>, ProbeError> {
    let doc: ServersDocument =
        quick_xml::de::from_str(xml).map_err(|e| ProbeError::ServerList(e.to_string()))?;
    Ok(doc.servers.server)
}

/// Great-circle distance between two (lat, lon) points in kilometres.
pub fn distance_km(origin: (f64, f64), destination: (f64, f64)) -> f64 {
    let (lat1, lon1) = origin;
    let (lat2, lon2) = destination;

    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// The `limit` servers closest to `origin`, nearest first, skipping ignored ids.
pub fn closest(servers: Vec<Server>, origin: (f64, f64), ignore_ids: &[u32], limit: usize) -> Vec<Server> {
    let mut candidates: Vec<Server> = servers
        .into_iter()
        .filter(|s| !ignore_ids.contains(&s.id))
        .map(|mut s| {
            s.distance_km = distance_km(origin, (s.lat, s.lon));
            s
        })
        .collect();

    candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then(a.id.cmp(&b.id)));
    candidates.truncate(limit);
    candidates
}
