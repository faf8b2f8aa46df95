//! Constants for the ETH dashboard
//!
//! Defaults for everything the dashboard needs. Each of them can be
//! overridden at runtime through `DashboardConfig::from_env()`.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// CoinGecko id of the tracked asset
pub const DEFAULT_ASSET_ID: &str = "ethereum";

/// Amount of the asset held
pub const DEFAULT_ASSET_AMOUNT: f64 = 4.5;

/// How often to fetch a quote (in milliseconds)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;

/// HTTP request timeout when fetching quotes (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "eth-dashboard/0.1.0";

/// Message shown when the API answers with a non-success status
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Message shown when a failure carries no message of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to load price";

/// Environment variable overriding the held amount
pub const ENV_ASSET_AMOUNT: &str = "ETH_DASHBOARD_AMOUNT";

/// Environment variable overriding the refresh interval (milliseconds)
pub const ENV_INTERVAL_MS: &str = "ETH_DASHBOARD_INTERVAL_MS";

/// Environment variable overriding the API base URL
pub const ENV_ENDPOINT: &str = "ETH_DASHBOARD_ENDPOINT";

/// Environment variable overriding the CoinGecko asset id
pub const ENV_ASSET_ID: &str = "ETH_DASHBOARD_ASSET";

/// Environment variable enabling the out-of-order completion guard
pub const ENV_DISCARD_STALE: &str = "ETH_DASHBOARD_DISCARD_STALE";
