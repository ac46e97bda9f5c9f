//! HTTP client for the Fake Store REST API using wreq.

use crate::config::Config;
use crate::store::models::Product;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use wreq::Client;

/// Why a store request failed. Only logged; views collapse every kind into
/// the same error phase.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// DNS, connect, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("request failed with status: {0}")]
    Status(u16),

    /// The body was not the JSON shape we expected.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Trait for store API access - enables mocking for tests.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Fetches the full product collection in server order.
    async fn products(&self) -> Result<Vec<Product>, FetchError>;

    /// Fetches a single product. The id is passed through unvalidated.
    async fn product(&self, id: &str) -> Result<Product, FetchError>;

    /// Returns true if the image URI answers with a success status.
    async fn probe_image(&self, url: &str) -> bool;
}

/// Fake Store HTTP client.
pub struct StoreClient {
    client: Client,
    base_url: String,
}

impl StoreClient {
    /// Creates a new client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: config.api_url.trim_end_matches('/').to_string() })
    }

    /// Returns the API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| FetchError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl StoreApi for StoreClient {
    async fn products(&self) -> Result<Vec<Product>, FetchError> {
        let url = format!("{}/products", self.base_url);

        info!("Fetching product collection");
        self.get_json(&url).await
    }

    async fn product(&self, id: &str) -> Result<Product, FetchError> {
        let url = format!("{}/products/{}", self.base_url, urlencoding::encode(id));

        info!("Fetching product: {}", id);
        self.get_json(&url).await
    }

    async fn probe_image(&self, url: &str) -> bool {
        debug!("HEAD {}", url);

        let status = match self.client.head(url).send().await {
            Ok(response) => response.status(),
            Err(e) => {
                warn!("Image {} unreachable: {}", url, e);
                return false;
            }
        };

        if status.is_success() {
            return true;
        }

        // Some image hosts reject HEAD but serve GET; fetch a single byte instead
        if !matches!(status.as_u16(), 403 | 405 | 501) {
            warn!("Image {} returned status {}", url, status);
            return false;
        }

        debug!("HEAD {} answered {}, retrying with ranged GET", url, status);

        match self.client.get(url).header("Range", "bytes=0-0").send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Image {} returned status {}", url, response.status());
                false
            }
            Err(e) => {
                warn!("Image {} unreachable: {}", url, e);
                false
            }
        }
    }
}
