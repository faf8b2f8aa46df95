//! Runtime configuration for the dashboard
//!
//! Defaults come from `constants`; `from_env()` lets each of them be
//! overridden without recompiling.

use crate::{
    constants::{
        COINGECKO_API_URL, DEFAULT_ASSET_AMOUNT, DEFAULT_ASSET_ID, DEFAULT_REFRESH_INTERVAL_MS,
        ENV_ASSET_AMOUNT, ENV_ASSET_ID, ENV_DISCARD_STALE, ENV_ENDPOINT, ENV_INTERVAL_MS,
    },
    error::ConfigError,
    types::Holding,
};
use reqwest::Url;
use std::time::Duration;

/// Configuration handed to the poller and the dashboard at construction
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Amount of the asset held
    pub holding: Holding,
    /// Milliseconds between fetch attempts
    pub interval_ms: u64,
    /// API base URL (e.g. `https://api.coingecko.com/api/v3`)
    pub endpoint: Url,
    /// CoinGecko id of the tracked asset
    pub asset_id: String,
    /// Ignore completions older than the newest one already applied
    pub discard_stale_completions: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            holding: Holding::new(DEFAULT_ASSET_AMOUNT),
            interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            endpoint: Url::parse(COINGECKO_API_URL).expect("default endpoint is a valid URL"),
            asset_id: DEFAULT_ASSET_ID.to_string(),
            discard_stale_completions: false,
        }
    }
}

impl DashboardConfig {
    /// Loads the configuration from the process environment
    ///
    /// Unset variables keep their defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ASSET_AMOUNT) {
            let amount = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::invalid_env(ENV_ASSET_AMOUNT, raw.clone()))?;
            config.holding = Holding::new(amount);
        }

        if let Some(raw) = lookup(ENV_INTERVAL_MS) {
            config.interval_ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_env(ENV_INTERVAL_MS, raw.clone()))?;
        }

        if let Some(raw) = lookup(ENV_ENDPOINT) {
            config = config.with_endpoint(raw.trim())?;
        }

        if let Some(raw) = lookup(ENV_ASSET_ID) {
            config.asset_id = raw.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_DISCARD_STALE) {
            config.discard_stale_completions = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(ConfigError::invalid_env(ENV_DISCARD_STALE, raw.clone())),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_holding(mut self, asset_amount: f64) -> Self {
        self.holding = Holding::new(asset_amount);
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Sets the API base URL
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        self.endpoint = url;
        Ok(self)
    }

    pub fn with_asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = asset_id.into();
        self
    }

    pub fn with_discard_stale_completions(mut self, enabled: bool) -> Self {
        self.discard_stale_completions = enabled;
        self
    }

    /// Checks the invariants the poller relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval(self.interval_ms));
        }

        let amount = self.holding.asset_amount;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ConfigError::InvalidAmount(amount));
        }

        if self.asset_id.is_empty() {
            return Err(ConfigError::EmptyAssetId);
        }

        Ok(())
    }

    /// Refresh interval as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
