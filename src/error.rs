//! Error types for the ETH dashboard

use crate::constants::{FALLBACK_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while fetching a quote from a provider
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-success status
    #[error("Network error (HTTP {status})")]
    Network { status: StatusCode },

    /// The request could not be sent or its body could not be read
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The body is not the expected JSON shape
    #[error("{0}")]
    Decode(String),
}

impl FetchError {
    /// Creates a Decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// The single display string the view state carries for this failure
    ///
    /// All variants collapse into one string; a non-success status always reads
    /// "Network error", anything else uses its own message or the fallback.
    pub fn display_message(&self) -> String {
        match self {
            FetchError::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            other => {
                let msg = other.to_string();
                if msg.trim().is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    msg
                }
            }
        }
    }
}

/// Errors raised while building a `DashboardConfig`
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Interval must be a positive number of milliseconds
    #[error("Refresh interval must be positive, got {0} ms")]
    InvalidInterval(u64),

    /// Holding must be finite and non-negative
    #[error("Asset amount must be a finite non-negative number, got {0}")]
    InvalidAmount(f64),

    /// Endpoint is not a usable URL
    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Asset id must not be empty
    #[error("Asset id must not be empty")]
    EmptyAssetId,

    /// An environment variable is set but cannot be parsed
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },
}

impl ConfigError {
    /// Creates an InvalidEnv error
    pub fn invalid_env(var: &str, value: impl Into<String>) -> Self {
        Self::InvalidEnv {
            var: var.to_string(),
            value: value.into(),
        }
    }
}

/// Errors raised when constructing a poller
#[derive(Debug, Error)]
pub enum PollerError {
    /// Configuration was rejected
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_collapses_to_fixed_message() {
        let err = FetchError::Network {
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(err.display_message(), "Network error");
    }

    #[test]
    fn test_decode_error_keeps_its_message() {
        let err = FetchError::decode("expected value at line 1 column 1");
        assert_eq!(err.display_message(), "expected value at line 1 column 1");
    }

    #[test]
    fn test_empty_message_uses_fallback() {
        let err = FetchError::decode("  ");
        assert_eq!(err.display_message(), "Failed to load price");
    }
}
