//! CoinGecko quote provider implementation

use crate::{
    config::DashboardConfig,
    constants::{COINGECKO_SIMPLE_PRICE_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
    provider::QuoteProvider,
    types::PriceQuote,
};
use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko API response for simple price queries
///
/// Only the tracked asset's entry is decoded further, so unrelated keys never
/// fail the body. Every level may be missing or `null`.
type CoinGeckoResponse = Option<HashMap<String, serde_json::Value>>;

#[derive(Debug, Default, Deserialize)]
struct CoinGeckoPriceData {
    #[serde(default)]
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
}

/// CoinGecko quote provider
pub struct CoinGeckoProvider {
    client: Client,
    url: Url,
    asset_id: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider for the configured endpoint and asset
    pub fn new(config: &DashboardConfig) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-cache, no-store"),
        );
        headers.insert(header::PRAGMA, header::HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: build_url(&config.endpoint, &config.asset_id),
            asset_id: config.asset_id.clone(),
        })
    }

    /// The fully built request URL
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Builds the simple price URL for one asset, keeping any base path
fn build_url(endpoint: &Url, asset_id: &str) -> Url {
    let mut url = endpoint.clone();
    let path = format!(
        "{}{}",
        endpoint.path().trim_end_matches('/'),
        COINGECKO_SIMPLE_PRICE_ENDPOINT
    );
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair("ids", asset_id)
        .append_pair("vs_currencies", "usd")
        .append_pair("include_24hr_change", "true");
    url
}

/// Parses a CoinGecko response body into a quote for `asset_id`
fn parse_response(body: &str, asset_id: &str) -> Result<PriceQuote, FetchError> {
    let response: CoinGeckoResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::decode(format!("Failed to parse CoinGecko response: {}", e)))?;

    let data = match response.and_then(|mut prices| prices.remove(asset_id)) {
        None | Some(serde_json::Value::Null) => CoinGeckoPriceData::default(),
        Some(entry) => serde_json::from_value::<CoinGeckoPriceData>(entry).map_err(|e| {
            FetchError::decode(format!(
                "Failed to parse CoinGecko {} entry: {}",
                asset_id, e
            ))
        })?,
    };

    Ok(PriceQuote::new(data.usd, data.usd_24h_change))
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    async fn fetch_quote(&self) -> Result<PriceQuote, FetchError> {
        tracing::debug!(url = %self.url, "Fetching quote from CoinGecko");

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network { status });
        }

        let body = response.text().await?;
        let quote = parse_response(&body, &self.asset_id)?;

        if quote.value_usd.is_none() {
            tracing::warn!(asset = %self.asset_id, "CoinGecko response carried no price");
        }

        Ok(quote)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
