pub mod models;
pub mod simulator;

#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use self::models::TemperatureReading;

/// Fixed upstream deadline, independent of the inbound request deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum TemperatureError {
    #[error("error calling temperature API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status code: {}", .0.as_u16())]
    UnexpectedStatus(StatusCode),
    #[error("error decoding temperature response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Anything able to produce a live reading for a location.
#[async_trait]
pub trait TemperatureSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<TemperatureReading, TemperatureError>;
}

/// HTTP client for the upstream temperature service.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct TemperatureClient {
    http: Client,
    endpoint: Url,
}

impl TemperatureClient {
    /// `base_url` is the service root, e.g. `http://temperature-api:8081`.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build temperature HTTP client")?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&format!("{}/temperature", base_url.trim_end_matches('/')))
            .with_context(|| format!("invalid temperature API base URL: {base_url}"))?;
        Ok(Self { http, endpoint })
    }

    fn url_for(&self, location: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().clear().append_pair("location", location);
        url
    }
}

#[async_trait]
impl TemperatureSource for TemperatureClient {
    async fn fetch(&self, location: &str) -> Result<TemperatureReading, TemperatureError> {
        let url = self.url_for(location);
        debug!(location = %location, url = %url, "Fetching temperature");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(TemperatureError::Transport)?;

        if resp.status() != StatusCode::OK {
            return Err(TemperatureError::UnexpectedStatus(resp.status()));
        }

        let bytes = resp.bytes().await.map_err(TemperatureError::Transport)?;
        serde_json::from_slice(&bytes).map_err(TemperatureError::Decode)
    }
}
