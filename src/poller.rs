//! Periodic quote poller
//!
//! Fires one attempt immediately on `start`, then one per interval until
//! `stop`. Attempts run as independent tasks, so a slow request never delays
//! the next tick and several attempts may be in flight at once.

use crate::{
    config::DashboardConfig,
    error::{ConfigError, PollerError},
    metrics::{MetricsCollector, PollMetrics},
    provider::QuoteProvider,
    providers::CoinGeckoProvider,
    types::{AttemptId, PollEvent, PollOutcome},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Callback receiving every poller event
pub type EventCallback = Arc<dyn Fn(PollEvent) + Send + Sync>;

#[derive(Default)]
struct TimerState {
    running: bool,
    /// Bumped on every start so a timer from a previous run can never spawn
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Drives periodic retrieval of quotes and reports every outcome
///
/// # Example
/// ```no_run
/// use eth_dashboard::{DashboardConfig, Poller};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let poller = Poller::coingecko(&DashboardConfig::default())?;
/// poller.start(|event| println!("{}", event));
/// // ...
/// poller.stop();
/// # Ok(())
/// # }
/// ```
pub struct Poller {
    provider: Arc<dyn QuoteProvider>,
    interval: Duration,
    metrics: Arc<MetricsCollector>,
    next_attempt: Arc<AtomicU64>,
    state: Arc<Mutex<TimerState>>,
}

impl Poller {
    /// Creates a poller backed by the CoinGecko provider
    pub fn coingecko(config: &DashboardConfig) -> Result<Self, PollerError> {
        let provider = CoinGeckoProvider::new(config).map_err(PollerError::Client)?;
        Self::new(Arc::new(provider), config).map_err(Into::into)
    }

    /// Creates a poller with a custom provider
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        config: &DashboardConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let metrics = Arc::new(MetricsCollector::new(provider.provider_name()));

        Ok(Self {
            provider,
            interval: config.interval(),
            metrics,
            next_attempt: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(TimerState::default())),
        })
    }

    fn lock_state(state: &Mutex<TimerState>) -> MutexGuard<'_, TimerState> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts polling
    ///
    /// Must be called from within a tokio runtime. Calling `start` on a running
    /// poller does nothing; a stopped poller can be started again.
    pub fn start<F>(&self, on_event: F)
    where
        F: Fn(PollEvent) + Send + Sync + 'static,
    {
        let on_event: EventCallback = Arc::new(on_event);
        let mut guard = Self::lock_state(&self.state);
        if guard.running {
            tracing::debug!("Poller already running");
            return;
        }

        guard.running = true;
        guard.generation += 1;
        let generation = guard.generation;

        let state = self.state.clone();
        let provider = self.provider.clone();
        let metrics = self.metrics.clone();
        let next_attempt = self.next_attempt.clone();
        let period = self.interval;

        guard.timer = Some(tokio::spawn(async move {
            tracing::info!(
                interval_ms = period.as_millis() as u64,
                provider = provider.provider_name(),
                "Starting quote poller"
            );

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                // Checked and spawned under the lock so nothing starts once stop() returns.
                let guard = Self::lock_state(&state);
                if !guard.running || guard.generation != generation {
                    break;
                }
                let attempt = AttemptId(next_attempt.fetch_add(1, Ordering::SeqCst));
                tokio::spawn(Self::run_attempt(
                    provider.clone(),
                    metrics.clone(),
                    attempt,
                    on_event.clone(),
                ));
                drop(guard);
            }
        }));
    }

    /// Stops issuing new attempts
    ///
    /// In-flight attempts are not aborted and still report their outcome.
    /// Calling `stop` more than once has no further effect.
    pub fn stop(&self) {
        let mut guard = Self::lock_state(&self.state);
        if !guard.running {
            return;
        }
        guard.running = false;
        if let Some(timer) = guard.timer.take() {
            timer.abort();
        }
        tracing::info!("Quote poller stopped");
    }

    /// True between `start` and `stop`
    pub fn is_running(&self) -> bool {
        Self::lock_state(&self.state).running
    }

    /// Runs one attempt right away, outside the regular schedule
    ///
    /// Events are delivered to `on_event` like scheduled attempts.
    pub async fn refresh_now<F>(&self, on_event: F) -> PollOutcome
    where
        F: Fn(PollEvent) + Send + Sync + 'static,
    {
        let attempt = AttemptId(self.next_attempt.fetch_add(1, Ordering::SeqCst));
        let on_event: EventCallback = Arc::new(on_event);
        Self::run_attempt(
            self.provider.clone(),
            self.metrics.clone(),
            attempt,
            on_event,
        )
        .await
    }

    /// Issues a single fetch and reports start and completion
    async fn run_attempt(
        provider: Arc<dyn QuoteProvider>,
        metrics: Arc<MetricsCollector>,
        attempt: AttemptId,
        on_event: EventCallback,
    ) -> PollOutcome {
        on_event(PollEvent::AttemptStarted { attempt });
        let start = Instant::now();

        let outcome = match provider.fetch_quote().await {
            Ok(quote) => {
                tracing::debug!(
                    %attempt,
                    provider = provider.provider_name(),
                    price_usd = ?quote.value_usd,
                    change_24h = ?quote.change_24h_percent,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Fetched quote"
                );
                PollOutcome::Success { quote }
            }
            Err(e) => {
                tracing::warn!(
                    %attempt,
                    provider = provider.provider_name(),
                    error = %e,
                    "Failed to fetch quote"
                );
                PollOutcome::Failure {
                    message: e.display_message(),
                }
            }
        };

        metrics
            .record_attempt(start.elapsed(), outcome.is_success())
            .await;
        on_event(PollEvent::AttemptCompleted {
            attempt,
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Gets poll metrics including latency percentiles and success rate
    pub async fn metrics(&self) -> PollMetrics {
        self.metrics.snapshot().await
    }

    /// Returns the name of the provider being polled
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
