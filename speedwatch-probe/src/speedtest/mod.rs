//! speedtest.net probe.
//!
//! Mirrors what the reference speedtest clients do, minus the threading:
//!
//! 1. Fetch the client configuration (detected ISP, location, ignored servers)
//! 2. Fetch the server list and keep the closest candidates
//! 3. Pick the candidate with the lowest mean latency
//! 4. Time sequential downloads of test images from that server
//! 5. Time sequential uploads of filler payloads to that server
//!
//! Downloads and uploads are each time-boxed to a test length (the
//! document's `testlength`, else [`SpeedtestSettings::test_length_secs`]).
//! Once a phase's budget is spent no further sizes are requested and a
//! transfer in flight is cut short; the rate comes from the bytes moved so
//! far. The HTTP timeouts only catch stalled connections.
//!
//! Failing to fetch the configuration is reported as
//! [`ProbeOutcome::ConfigUnavailable`]; every later failure is an error.
//!
//! ## Example
//!
//! ```rust,no_run
//! use speedwatch_probe::{probe, SpeedtestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpeedtestClient::builder().build()?;
//!     let record = probe(&client, Some("My ISP")).await?;
//!     println!("{} Mbit/s down", record.download_mibps());
//!     Ok(())
//! }
//! ```

mod config;
mod server;

pub use config::{parse_config, ClientInfo, SpeedtestConfig};
pub use server::{closest, distance_km, parse_servers, Server};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use serde::Deserialize;
use tracing::{debug, info};

use speedwatch_types::MeasurementRecord;

use crate::probe::utc_timestamp;
use crate::{Probe, ProbeError, ProbeOutcome};

/// Characters cycled through to build upload payloads.
const PAYLOAD_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Form field prefix of every upload body.
const PAYLOAD_PREFIX: &str = "content1=";

/// Expected body of a latency probe.
const LATENCY_BODY: &str = "test=test";

/// Upload bodies are fed to the connection in pieces of this size.
const UPLOAD_CHUNK: usize = 16 * 1024;

/// Tunables for [`SpeedtestClient`].
///
/// Deserializable so it can be embedded in an application settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedtestSettings {
    /// Client configuration document.
    pub config_url: String,
    /// Server list document.
    pub servers_url: String,
    /// Seconds a connection may take to open, or sit idle mid-transfer,
    /// before the request fails.
    pub timeout_secs: u64,
    /// Budget in seconds for each of the download and upload phases when
    /// the configuration document does not set one.
    pub test_length_secs: u64,
    /// Number of closest servers that take part in the latency test.
    pub candidates: usize,
    /// Latency samples per candidate.
    pub latency_samples: usize,
    /// Edge sizes of the test images to download, in order.
    pub download_sizes: Vec<u32>,
    /// Upload payload sizes in bytes, in order.
    pub upload_sizes: Vec<usize>,
}

impl Default for SpeedtestSettings {
    fn default() -> Self {
        Self {
            config_url: "https://www.speedtest.net/speedtest-config.php".to_string(),
            servers_url: "https://www.speedtest.net/speedtest-servers-static.php".to_string(),
            timeout_secs: 10,
            test_length_secs: 10,
            candidates: 5,
            latency_samples: 3,
            download_sizes: vec![350, 500, 750, 1000, 1500, 2000, 2500, 3000, 3500, 4000],
            upload_sizes: vec![32_768, 65_536, 131_072, 262_144, 524_288, 1_048_576, 7_340_032],
        }
    }
}

/// A speedtest.net probe.
///
/// Holds its own HTTP client; create one per measurement run.
#[derive(Debug, Clone)]
pub struct SpeedtestClient {
    client: Client,
    settings: SpeedtestSettings,
    description: String,
}

impl SpeedtestClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> SpeedtestClientBuilder {
        SpeedtestClientBuilder::default()
    }

    /// The settings in use.
    pub fn settings(&self) -> &SpeedtestSettings {
        &self.settings
    }

    /// Fetch the configuration document.
    ///
    /// Any failure here means the backend is unusable, so the cause is
    /// returned as a plain reason rather than a [`ProbeError`].
    async fn fetch_config(&self) -> Result<String, String> {
        let response = self
            .client
            .get(&self.settings.config_url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("configuration endpoint returned status {}", response.status()));
        }

        response.text().await.map_err(|e| e.to_string())
    }

    async fn fetch_servers(&self, config: &SpeedtestConfig) -> Result<Vec<Server>, ProbeError> {
        let response = self.client.get(&self.settings.servers_url).send().await?;

        if !response.status().is_success() {
            return Err(ProbeError::ServerList(format!(
                "server list returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let servers = parse_servers(&body)?;
        let origin = (config.client.lat, config.client.lon);
        let candidates = closest(servers, origin, &config.ignore_ids, self.settings.candidates);

        debug!(count = candidates.len(), "selected candidate servers by distance");
        Ok(candidates)
    }

    /// Mean round-trip latency to `server` in milliseconds, or `None` if no
    /// sample succeeded.
    async fn latency(&self, server: &Server) -> Option<f64> {
        let url = server.latency_url();
        let mut samples = Vec::with_capacity(self.settings.latency_samples);

        for i in 0..self.settings.latency_samples {
            let start = Instant::now();
            let result = self
                .client
                .get(&url)
                .query(&[("x", cache_buster(i))])
                .send()
                .await;

            let response = match result {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    debug!(server = server.id, status = %response.status(), "latency sample rejected");
                    continue;
                }
                Err(e) => {
                    debug!(server = server.id, error = %e, "latency sample failed");
                    continue;
                }
            };

            match response.text().await {
                Ok(body) if body.trim() == LATENCY_BODY => {
                    samples.push(start.elapsed().as_secs_f64() * 1000.0);
                }
                _ => debug!(server = server.id, "unexpected latency response body"),
            }
        }

        if samples.is_empty() {
            None
        } else {
            Some(samples.iter().sum::<f64>() / samples.len() as f64)
        }
    }

    /// Candidate with the lowest latency, and that latency.
    async fn best_server(&self, candidates: Vec<Server>) -> Result<(Server, f64), ProbeError> {
        let mut best: Option<(Server, f64)> = None;

        for server in candidates {
            let Some(latency) = self.latency(&server).await else {
                continue;
            };
            debug!(server = server.id, host = %server.host, latency_ms = latency, "latency measured");

            if best.as_ref().map_or(true, |(_, l)| latency < *l) {
                best = Some((server, latency));
            }
        }

        best.ok_or(ProbeError::NoServers)
    }

    /// Download rate from `server` in bits per second.
    ///
    /// Requests the configured image sizes in order until `budget` is spent,
    /// stopping mid-body if needed.
    async fn download(&self, server: &Server, budget: Duration) -> Result<f64, ProbeError> {
        let start = Instant::now();
        let deadline = tokio::time::Instant::from_std(start + budget);
        let mut bytes = 0usize;

        'sizes: for (i, size) in self.settings.download_sizes.iter().enumerate() {
            if tokio::time::Instant::now() >= deadline {
                debug!(completed = i, "download budget spent");
                break;
            }

            let request = self
                .client
                .get(server.download_url(*size))
                .query(&[("x", cache_buster(i))])
                .send();
            let mut response = match tokio::time::timeout_at(deadline, request).await {
                Ok(response) => response?,
                Err(_) => break,
            };

            if !response.status().is_success() {
                return Err(ProbeError::Http(format!(
                    "download of {}x{} returned status {}",
                    size,
                    size,
                    response.status()
                )));
            }

            loop {
                match tokio::time::timeout_at(deadline, response.chunk()).await {
                    Ok(Ok(Some(chunk))) => bytes += chunk.len(),
                    Ok(Ok(None)) => break,
                    Ok(Err(e)) => return Err(e.into()),
                    Err(_) => {
                        debug!(size, "download budget spent mid-transfer");
                        break 'sizes;
                    }
                }
            }
        }

        Ok(bits_per_second(bytes, start.elapsed()))
    }

    /// Upload rate to `server` in bits per second.
    ///
    /// Posts the configured payload sizes in order until `budget` is spent.
    /// A post cut short by the budget counts the bytes already handed to the
    /// connection.
    async fn upload(&self, server: &Server, budget: Duration) -> Result<f64, ProbeError> {
        let start = Instant::now();
        let deadline = tokio::time::Instant::from_std(start + budget);
        let mut bytes = 0usize;

        for (i, size) in self.settings.upload_sizes.iter().enumerate() {
            if tokio::time::Instant::now() >= deadline {
                debug!(completed = i, "upload budget spent");
                break;
            }

            let payload = upload_payload(*size);
            let len = payload.len();
            let sent = Arc::new(AtomicUsize::new(0));

            let post = async {
                let response = self
                    .client
                    .post(&server.url)
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(CONTENT_LENGTH, len)
                    .body(counted_body(payload, Arc::clone(&sent)))
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(ProbeError::Http(format!(
                        "upload of {} bytes returned status {}",
                        len,
                        response.status()
                    )));
                }

                // Drain the acknowledgement before timing the next chunk
                let _ = response.bytes().await?;
                Ok::<(), ProbeError>(())
            };

            match tokio::time::timeout_at(deadline, post).await {
                Ok(Ok(())) => bytes += len,
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    let partial = sent.load(Ordering::Relaxed).min(len);
                    debug!(size = len, sent = partial, "upload budget spent mid-transfer");
                    bytes += partial;
                    break;
                }
            }
        }

        Ok(bits_per_second(bytes, start.elapsed()))
    }

    /// Phase budget: the document's test length, else the configured one.
    fn budget(&self, document_secs: Option<u64>) -> Duration {
        Duration::from_secs(document_secs.unwrap_or(self.settings.test_length_secs))
    }
}

#[async_trait]
impl Probe for SpeedtestClient {
    async fn measure(&self) -> Result<ProbeOutcome, ProbeError> {
        let document = match self.fetch_config().await {
            Ok(document) => document,
            Err(reason) => return Ok(ProbeOutcome::ConfigUnavailable { reason }),
        };
        let config = parse_config(&document)?;
        debug!(isp = %config.client.isp, ip = %config.client.ip, "retrieved client configuration");

        let candidates = self.fetch_servers(&config).await?;
        let (server, ping_ms) = self.best_server(candidates).await?;
        info!(
            server = server.id,
            sponsor = %server.sponsor,
            name = %server.name,
            distance_km = server.distance_km,
            ping_ms,
            "selected best server"
        );

        let download_bps =
            self.download(&server, self.budget(config.download_length_secs)).await?;
        debug!(download_bps, "download finished");
        let upload_bps = self.upload(&server, self.budget(config.upload_length_secs)).await?;
        debug!(upload_bps, "upload finished");

        let record = MeasurementRecord::builder(utc_timestamp())
            .download_bps(download_bps)
            .upload_bps(upload_bps)
            .ping_ms(ping_ms)
            .isp(config.client.isp)
            .build();

        Ok(ProbeOutcome::Measured(record))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for SpeedtestClient.
#[derive(Debug, Default)]
pub struct SpeedtestClientBuilder {
    settings: Option<SpeedtestSettings>,
    config_url: Option<String>,
    servers_url: Option<String>,
    timeout: Option<Duration>,
}

impl SpeedtestClientBuilder {
    /// Start from a full settings block.
    pub fn settings(mut self, settings: SpeedtestSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Override the configuration document URL.
    pub fn config_url(mut self, url: impl Into<String>) -> Self {
        self.config_url = Some(url.into());
        self
    }

    /// Override the server list URL.
    pub fn servers_url(mut self, url: impl Into<String>) -> Self {
        self.servers_url = Some(url.into());
        self
    }

    /// Set the connect and idle-read timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SpeedtestClient, ProbeError> {
        let mut settings = self.settings.unwrap_or_default();
        if let Some(url) = self.config_url {
            settings.config_url = url;
        }
        if let Some(url) = self.servers_url {
            settings.servers_url = url;
        }
        let timeout = self.timeout.unwrap_or(Duration::from_secs(settings.timeout_secs));

        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(concat!("speedwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        let description = format!("speedtest: {}", settings.config_url);

        Ok(SpeedtestClient {
            client,
            settings,
            description,
        })
    }
}

/// Query value that defeats intermediate caches.
fn cache_buster(i: usize) -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{}.{}", millis, i)
}

/// Form body of exactly `size` bytes (or just the prefix, if larger).
fn upload_payload(size: usize) -> String {
    let filler = size.saturating_sub(PAYLOAD_PREFIX.len());
    let mut body = String::with_capacity(PAYLOAD_PREFIX.len() + filler);
    body.push_str(PAYLOAD_PREFIX);
    body.extend(PAYLOAD_CHARS.iter().cycle().take(filler).map(|&b| b as char));
    body
}

/// Request body streaming `payload` in pieces, adding each piece's length
/// to `sent` as the connection takes it.
fn counted_body(payload: String, sent: Arc<AtomicUsize>) -> Body {
    let pieces: Vec<Vec<u8>> = payload
        .into_bytes()
        .chunks(UPLOAD_CHUNK)
        .map(<[u8]>::to_vec)
        .collect();

    Body::wrap_stream(stream::iter(pieces).map(move |piece| {
        sent.fetch_add(piece.len(), Ordering::Relaxed);
        Ok::<_, std::io::Error>(piece)
    }))
}

fn bits_per_second(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 * 8.0 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Stub response; `pace` sends the body in pieces with a pause after each.
    struct Reply {
        status: u16,
        body: Vec<u8>,
        pace: Option<(usize, Duration)>,
    }

    fn reply(status: u16, body: Vec<u8>) -> Reply {
        Reply {
            status,
            body,
            pace: None,
        }
    }

    fn trickle(body: Vec<u8>, piece: usize, pause: Duration) -> Reply {
        Reply {
            status: 200,
            body,
            pace: Some((piece, pause)),
        }
    }

    type Handler = Arc<dyn Fn(&str, &str) -> Reply + Send + Sync>;

    /// Minimal HTTP/1.1 server answering every request through `handler`.
    async fn spawn_stub<F>(make_handler: F) -> SocketAddr
    where
        F: FnOnce(SocketAddr) -> Handler,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handler = make_handler(addr);

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let handler = handler.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, handler).await;
                });
            }
        });

        addr
    }

    async fn serve(mut stream: TcpStream, handler: Handler) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];

        let header_end = loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.lines();
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let target = parts.next().unwrap_or_default().to_string();
        let path = target.split('?').next().unwrap_or_default().to_string();

        let content_length = lines
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body_read = buf.len() - header_end;
        while body_read < content_length {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            body_read += n;
        }

        let reply = handler(&method, &path);
        let head = format!(
            "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            reply.status,
            reply.body.len()
        );
        stream.write_all(head.as_bytes()).await?;
        match reply.pace {
            Some((piece, pause)) => {
                for part in reply.body.chunks(piece) {
                    stream.write_all(part).await?;
                    stream.flush().await?;
                    tokio::time::sleep(pause).await;
                }
            }
            None => stream.write_all(&reply.body).await?,
        }
        stream.shutdown().await
    }

    fn config_xml() -> Vec<u8> {
        br#"<?xml version="1.0" encoding="UTF-8"?>
<settings>
<client ip="127.0.0.1" lat="0.0" lon="0.0" isp="Stub ISP" />
<server-config threadcount="4" ignoreids="2" />
</settings>"#
            .to_vec()
    }

    fn servers_xml(addr: SocketAddr) -> Vec<u8> {
        format!(
            r#"<settings><servers>
<server url="http://{addr}/near/upload.php" lat="0.1" lon="0.1" name="Near" country="Stub" sponsor="Stub Net" id="1" host="{addr}" />
<server url="http://{addr}/ignored/upload.php" lat="0.0" lon="0.0" name="Ignored" country="Stub" sponsor="Stub Net" id="2" host="{addr}" />
<server url="http://{addr}/dead/upload.php" lat="1.0" lon="1.0" name="Dead" country="Stub" sponsor="Stub Net" id="3" host="{addr}" />
</servers></settings>"#
        )
        .into_bytes()
    }

    fn healthy_backend(addr: SocketAddr) -> Handler {
        Arc::new(move |method: &str, path: &str| match (method, path) {
            ("GET", "/config") => reply(200, config_xml()),
            ("GET", "/servers") => reply(200, servers_xml(addr)),
            ("GET", "/near/latency.txt") => reply(200, b"test=test".to_vec()),
            ("GET", "/dead/latency.txt") => reply(500, Vec::new()),
            ("GET", p) if p.starts_with("/near/random") => reply(200, vec![0u8; 4096]),
            ("POST", "/near/upload.php") => reply(200, b"size=0".to_vec()),
            _ => reply(404, Vec::new()),
        })
    }

    fn client_for(addr: SocketAddr) -> SpeedtestClient {
        let settings = SpeedtestSettings {
            config_url: format!("http://{}/config", addr),
            servers_url: format!("http://{}/servers", addr),
            timeout_secs: 5,
            download_sizes: vec![350, 500],
            upload_sizes: vec![1024, 2048],
            ..SpeedtestSettings::default()
        };
        SpeedtestClient::builder().settings(settings).build().unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = SpeedtestClient::builder().build().unwrap();
        assert_eq!(client.settings(), &SpeedtestSettings::default());
        assert_eq!(
            client.description(),
            "speedtest: https://www.speedtest.net/speedtest-config.php"
        );
    }

    #[test]
    fn test_builder_overrides() {
        let client = SpeedtestClient::builder()
            .config_url("http://localhost/config")
            .servers_url("http://localhost/servers")
            .build()
            .unwrap();
        assert_eq!(client.settings().config_url, "http://localhost/config");
        assert_eq!(client.settings().servers_url, "http://localhost/servers");
    }

    #[test]
    fn test_upload_payload() {
        let body = upload_payload(20);
        assert_eq!(body.len(), 20);
        assert_eq!(body, "content1=0123456789A");
        assert_eq!(upload_payload(3), "content1=");
    }

    #[test]
    fn test_bits_per_second() {
        assert_eq!(bits_per_second(1000, Duration::from_secs(2)), 4000.0);
        assert_eq!(bits_per_second(1000, Duration::ZERO), 0.0);
    }

    #[tokio::test]
    async fn test_measure_against_stub() {
        let addr = spawn_stub(healthy_backend).await;
        let client = client_for(addr);

        let outcome = client.measure().await.unwrap();
        let ProbeOutcome::Measured(record) = outcome else {
            panic!("expected a measurement, got {:?}", outcome);
        };

        assert_eq!(record.isp_name, "Stub ISP");
        assert!(record.download_bps > 0.0);
        assert!(record.upload_bps > 0.0);
        assert!(record.ping_ms >= 0.0);
        assert!(record.timestamp.ends_with('Z'));
        assert!(record.comment.is_none());
    }

    #[tokio::test]
    async fn test_slow_link_is_measured_within_budget() {
        // The large image and the upload acknowledgement both trickle out
        // for longer than the phase budget
        let addr = spawn_stub(|addr| {
            Arc::new(move |method: &str, path: &str| match (method, path) {
                ("GET", "/config") => reply(200, config_xml()),
                ("GET", "/servers") => reply(200, servers_xml(addr)),
                ("GET", "/near/latency.txt") => reply(200, b"test=test".to_vec()),
                ("GET", "/near/random350x350.jpg") => reply(200, vec![0u8; 2048]),
                ("GET", "/near/random4000x4000.jpg") => {
                    trickle(vec![0u8; 15 * 1024], 1024, Duration::from_millis(100))
                }
                ("POST", "/near/upload.php") => {
                    trickle(b"size=0".to_vec(), 1, Duration::from_millis(300))
                }
                _ => reply(404, Vec::new()),
            })
        })
        .await;

        let settings = SpeedtestSettings {
            config_url: format!("http://{}/config", addr),
            servers_url: format!("http://{}/servers", addr),
            timeout_secs: 1,
            test_length_secs: 1,
            download_sizes: vec![350, 4000, 4000],
            upload_sizes: vec![1024, 2048],
            ..SpeedtestSettings::default()
        };
        let client = SpeedtestClient::builder().settings(settings).build().unwrap();

        let started = Instant::now();
        let record = crate::probe(&client, None).await.unwrap();

        assert!(!record.is_unavailable());
        assert_eq!(record.isp_name, "Stub ISP");
        assert!(record.download_bps > 0.0);
        assert!(record.upload_bps > 0.0);
        // Two one-second phases plus latency, nowhere near the trickle time
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_config_is_unavailable() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = client_for(addr).measure().await.unwrap();
        assert!(matches!(outcome, ProbeOutcome::ConfigUnavailable { .. }));

        let record = crate::probe(&client_for(addr), Some("Offline ISP")).await.unwrap();
        assert!(record.is_unavailable());
        assert_eq!(record.isp_name, "Offline ISP");
    }

    #[tokio::test]
    async fn test_config_error_status_is_unavailable() {
        let addr = spawn_stub(|_| Arc::new(|_: &str, _: &str| reply(503, Vec::new()))).await;

        let outcome = client_for(addr).measure().await.unwrap();
        match outcome {
            ProbeOutcome::ConfigUnavailable { reason } => assert!(reason.contains("503")),
            other => panic!("expected ConfigUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_config_is_error() {
        let addr =
            spawn_stub(|_| Arc::new(|_: &str, _: &str| reply(200, b"<html>portal</html>".to_vec())))
                .await;

        let err = client_for(addr).measure().await.unwrap_err();
        assert!(matches!(err, ProbeError::Config(_)));
    }

    #[tokio::test]
    async fn test_no_reachable_server() {
        let addr = spawn_stub(|addr| {
            Arc::new(move |_: &str, path: &str| match path {
                "/config" => reply(200, config_xml()),
                "/servers" => reply(200, servers_xml(addr)),
                _ => reply(500, Vec::new()),
            })
        })
        .await;

        let err = client_for(addr).measure().await.unwrap_err();
        assert!(matches!(err, ProbeError::NoServers));
    }

    #[tokio::test]
    async fn test_failed_download_propagates() {
        let addr = spawn_stub(|addr| {
            Arc::new(move |_: &str, path: &str| match path {
                "/config" => reply(200, config_xml()),
                "/servers" => reply(200, servers_xml(addr)),
                "/near/latency.txt" => reply(200, b"test=test".to_vec()),
                _ => reply(500, Vec::new()),
            })
        })
        .await;

        let err = client_for(addr).measure().await.unwrap_err();
        assert!(matches!(err, ProbeError::Http(_)));
    }
}
