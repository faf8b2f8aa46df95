//! Provider abstraction for fetching quotes from external APIs

use crate::{error::FetchError, types::PriceQuote};
use async_trait::async_trait;

/// Trait for quote providers
///
/// The poller only talks to this trait, so tests can drive it with a scripted
/// provider instead of the live CoinGecko API.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches a fresh quote for the tracked asset
    ///
    /// # Returns
    /// The decoded quote, or the reason the attempt failed
    async fn fetch_quote(&self) -> Result<PriceQuote, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted response for a single call
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Quote {
            value_usd: Option<f64>,
            change_24h_percent: Option<f64>,
        },
        Status(StatusCode),
        Decode(String),
    }

    impl MockResponse {
        fn into_result(self) -> Result<PriceQuote, FetchError> {
            match self {
                MockResponse::Quote {
                    value_usd,
                    change_24h_percent,
                } => Ok(PriceQuote::new(value_usd, change_24h_percent)),
                MockResponse::Status(status) => Err(FetchError::Network { status }),
                MockResponse::Decode(msg) => Err(FetchError::Decode(msg)),
            }
        }
    }

    /// Mock provider for testing
    ///
    /// Queued responses are served first, then the default response.
    pub struct MockProvider {
        queue: Arc<Mutex<VecDeque<(Duration, MockResponse)>>>,
        default: Arc<Mutex<(Duration, MockResponse)>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                queue: Arc::new(Mutex::new(VecDeque::new())),
                default: Arc::new(Mutex::new((
                    Duration::ZERO,
                    MockResponse::Quote {
                        value_usd: Some(2000.0),
                        change_24h_percent: Some(0.0),
                    },
                ))),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn set_quote(&self, value_usd: f64, change_24h_percent: f64) {
            self.default.lock().unwrap().1 = MockResponse::Quote {
                value_usd: Some(value_usd),
                change_24h_percent: Some(change_24h_percent),
            };
        }

        pub fn set_status(&self, status: StatusCode) {
            self.default.lock().unwrap().1 = MockResponse::Status(status);
        }

        pub fn set_delay(&self, delay: Duration) {
            self.default.lock().unwrap().0 = delay;
        }

        pub fn push(&self, delay: Duration, response: MockResponse) {
            self.queue.lock().unwrap().push_back((delay, response));
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        async fn fetch_quote(&self) -> Result<PriceQuote, FetchError> {
            *self.call_count.lock().unwrap() += 1;
            let (delay, response) = {
                let queued = self.queue.lock().unwrap().pop_front();
                queued.unwrap_or_else(|| self.default.lock().unwrap().clone())
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response.into_result()
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
