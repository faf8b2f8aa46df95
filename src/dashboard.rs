//! Dashboard service wiring the poller to the view state
//!
//! The `ViewState` lives in a `tokio::sync::watch` channel: the poller's
//! callback is its only writer, renderers subscribe to it.

use crate::{
    config::DashboardConfig,
    error::PollerError,
    metrics::PollMetrics,
    poller::Poller,
    provider::QuoteProvider,
    types::{Holding, PollEvent, PollOutcome},
    view_state::ViewState,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Live price dashboard
///
/// # Example
/// ```no_run
/// use eth_dashboard::{Dashboard, DashboardConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dashboard = Dashboard::new(DashboardConfig::from_env()?)?;
/// let mut updates = dashboard.subscribe();
/// dashboard.start();
///
/// while updates.changed().await.is_ok() {
///     let state = updates.borrow_and_update().clone();
///     println!("loading={} position={:?}", state.loading, dashboard.position_value_usd());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    config: DashboardConfig,
    poller: Poller,
    state: Arc<watch::Sender<ViewState>>,
}

impl Dashboard {
    /// Creates a dashboard polling CoinGecko
    pub fn new(config: DashboardConfig) -> Result<Self, PollerError> {
        let poller = Poller::coingecko(&config)?;
        Ok(Self::with_poller(config, poller))
    }

    /// Creates a dashboard with a custom provider
    pub fn with_provider(
        config: DashboardConfig,
        provider: Arc<dyn QuoteProvider>,
    ) -> Result<Self, PollerError> {
        let poller = Poller::new(provider, &config)?;
        Ok(Self::with_poller(config, poller))
    }

    fn with_poller(config: DashboardConfig, poller: Poller) -> Self {
        let (state, _) = watch::channel(ViewState::with_stale_guard(
            config.discard_stale_completions,
        ));
        Self {
            config,
            poller,
            state: Arc::new(state),
        }
    }

    fn reducer(&self) -> impl Fn(PollEvent) + Send + Sync + 'static {
        let state = self.state.clone();
        move |event: PollEvent| {
            state.send_modify(|view| {
                view.apply(&event);
            });
        }
    }

    /// Starts polling; outcomes update the view state as they complete
    pub fn start(&self) {
        tracing::info!(
            asset = %self.config.asset_id,
            amount = self.config.holding.asset_amount,
            interval_ms = self.config.interval_ms,
            "Starting dashboard"
        );
        self.poller.start(self.reducer());
    }

    /// Stops polling; the last state stays readable
    pub fn stop(&self) {
        self.poller.stop();
    }

    /// Fetches immediately, outside the regular schedule
    pub async fn refresh_now(&self) -> PollOutcome {
        self.poller.refresh_now(self.reducer()).await
    }

    /// Subscribes to view state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Current view state
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Value of the holding at the current quote
    pub fn position_value_usd(&self) -> Option<f64> {
        self.state.borrow().position_value_usd(&self.config.holding)
    }

    pub fn holding(&self) -> Holding {
        self.config.holding
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.poller.is_running()
    }

    pub async fn metrics(&self) -> PollMetrics {
        self.poller.metrics().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{MockProvider, MockResponse};
    use reqwest::StatusCode;
    use std::time::Duration;
    use tokio::time::sleep;

    fn dashboard(provider: Arc<MockProvider>) -> Dashboard {
        let config = DashboardConfig::default().with_interval_ms(60_000);
        Dashboard::with_provider(config, provider).unwrap()
    }

    #[test]
    fn test_initial_view_state() {
        let dashboard = dashboard(Arc::new(MockProvider::new()));
        let state = dashboard.snapshot();
        assert!(state.loading);
        assert!(state.quote.is_none());
        assert!(state.error.is_none());
        assert_eq!(dashboard.position_value_usd(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_updates_position() {
        let provider = Arc::new(MockProvider::new());
        provider.set_quote(2000.0, 1.25);
        let dashboard = dashboard(provider);

        dashboard.start();
        sleep(Duration::from_millis(1)).await;
        dashboard.stop();

        let state = dashboard.snapshot();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        let quote = state.quote.unwrap();
        assert_eq!(quote.value_usd, Some(2000.0));
        assert_eq!(quote.change_24h_percent, Some(1.25));
        assert_eq!(dashboard.position_value_usd(), Some(9000.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_error_keeps_previous_quote() {
        let provider = Arc::new(MockProvider::new());
        provider.set_quote(2000.0, 0.0);
        let dashboard = dashboard(provider.clone());

        dashboard.start();
        sleep(Duration::from_millis(1)).await;
        provider.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        sleep(Duration::from_millis(60_000)).await;
        dashboard.stop();

        let state = dashboard.snapshot();
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert_eq!(state.quote.unwrap().value_usd, Some(2000.0));
        assert_eq!(dashboard.position_value_usd(), Some(9000.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_attempt_in_flight() {
        let provider = Arc::new(MockProvider::new());
        provider.set_delay(Duration::from_secs(3));
        let dashboard = dashboard(provider);
        let mut updates = dashboard.subscribe();

        dashboard.start();
        sleep(Duration::from_secs(1)).await;
        assert!(dashboard.snapshot().loading);

        sleep(Duration::from_secs(5)).await;
        assert!(updates.has_changed().unwrap());
        assert!(!updates.borrow_and_update().loading);
        dashboard.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_overlapping_attempt_outlives_earlier_one() {
        let provider = Arc::new(MockProvider::new());
        provider.push(
            Duration::from_millis(1_500),
            MockResponse::Quote {
                value_usd: Some(2000.0),
                change_24h_percent: Some(0.5),
            },
        );
        provider.push(
            Duration::from_millis(5_000),
            MockResponse::Quote {
                value_usd: Some(2050.0),
                change_24h_percent: Some(0.7),
            },
        );
        let config = DashboardConfig::default().with_interval_ms(1_000);
        let dashboard = Dashboard::with_provider(config, provider.clone()).unwrap();

        dashboard.start();
        sleep(Duration::from_millis(1_200)).await;
        dashboard.stop();
        assert_eq!(provider.call_count(), 2);

        // Attempt #0 finished at 1.5s, attempt #1 runs until 6s.
        sleep(Duration::from_millis(800)).await;
        let state = dashboard.snapshot();
        assert_eq!(state.quote.as_ref().unwrap().value_usd, Some(2000.0));
        assert!(state.loading);

        sleep(Duration::from_millis(5_000)).await;
        let state = dashboard.snapshot();
        assert_eq!(state.quote.unwrap().value_usd, Some(2050.0));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_refresh_now_applies_outcome() {
        let provider = Arc::new(MockProvider::new());
        provider.set_status(StatusCode::BAD_GATEWAY);
        let dashboard = dashboard(provider);

        let outcome = dashboard.refresh_now().await;
        assert!(!outcome.is_success());

        let state = dashboard.snapshot();
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert!(state.quote.is_none());
        assert_eq!(dashboard.position_value_usd(), None);
        assert!(!dashboard.is_running());
    }
}
