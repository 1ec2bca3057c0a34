use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ApiConfig;
use core_types::AssetRecord;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

pub mod error;
pub mod file_source;
pub mod responses;
// --- Public API ---
pub use file_source::SnapshotFileSource;
pub use responses::{ListingEnvelope, ResponseStatus, decode_listing};

/// The abstract interface of a market snapshot provider.
///
/// The report pipeline only depends on this trait, allowing the underlying
/// implementation (live API, saved file or test double) to be swapped out.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches one snapshot of asset records, in the order the provider ranks them.
    async fn fetch_snapshot(&self) -> Result<Vec<AssetRecord>, ApiError>;
}

/// A concrete implementation of `MarketDataSource` for the CoinMarketCap API.
#[derive(Clone)]
pub struct CoinMarketCapClient {
    client: reqwest::Client,
    url: String,
    params: Vec<(String, String)>,
}

impl CoinMarketCapClient {
    pub fn new(api_config: &ApiConfig) -> Result<Self, ApiError> {
        if api_config.key.is_empty() {
            tracing::warn!("No CoinMarketCap API key configured; requests will be rejected.");
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-CMC_PRO_API_KEY",
            HeaderValue::from_str(&api_config.key)
                .map_err(|e| ApiError::Request(format!("Invalid API key header: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()?;

        // Sorted so the query string is stable between runs.
        let mut params: Vec<(String, String)> = api_config
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        params.sort();

        Ok(Self {
            client,
            url: api_config.url.clone(),
            params,
        })
    }
}

#[async_trait]
impl MarketDataSource for CoinMarketCapClient {
    async fn fetch_snapshot(&self) -> Result<Vec<AssetRecord>, ApiError> {
        tracing::debug!(url = %self.url, "Requesting market listings.");

        let response = self
            .client
            .get(&self.url)
            .query(&self.params)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let assets = decode_listing(status.as_u16(), &text)?;
        tracing::info!(assets = assets.len(), "Fetched market snapshot.");
        Ok(assets)
    }
}
