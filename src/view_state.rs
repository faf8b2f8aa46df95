//! Read-model consumed by the renderer
//!
//! `ViewState` is mutated only through the three reducer transitions
//! (`on_attempt_start`, `on_success`, `on_failure`) or through `apply`,
//! which dispatches poller events onto them.

use crate::types::{AttemptId, Holding, PollEvent, PollOutcome, PriceQuote};
use serde::Serialize;

/// Presentation state of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Last good quote; kept across later failures
    pub quote: Option<PriceQuote>,
    /// True while at least one attempt has started and not yet completed
    pub loading: bool,
    /// Message of the most recent failure, cleared by the next success
    pub error: Option<String>,
    /// Newest completion applied so far
    #[serde(skip)]
    last_applied: Option<AttemptId>,
    /// Attempts started and not yet completed
    #[serde(skip)]
    in_flight: u32,
    #[serde(skip)]
    discard_stale_completions: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Initial state: loading, no quote, no error
    pub fn new() -> Self {
        Self {
            quote: None,
            loading: true,
            error: None,
            last_applied: None,
            in_flight: 0,
            discard_stale_completions: false,
        }
    }

    /// Initial state that ignores completions older than the newest applied one
    pub fn with_stale_guard(enabled: bool) -> Self {
        Self {
            discard_stale_completions: enabled,
            ..Self::new()
        }
    }

    pub fn on_attempt_start(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
        self.loading = true;
    }

    pub fn on_success(&mut self, quote: PriceQuote) {
        self.quote = Some(quote);
        self.error = None;
        self.finish_attempt();
    }

    pub fn on_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.finish_attempt();
    }

    /// Number of attempts started and not yet completed
    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    fn finish_attempt(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    /// Applies a poller event
    ///
    /// Returns `false` when a completion was discarded by the stale guard.
    /// A discarded completion still counts as finished for `loading`.
    pub fn apply(&mut self, event: &PollEvent) -> bool {
        match event {
            PollEvent::AttemptStarted { .. } => {
                self.on_attempt_start();
                true
            }
            PollEvent::AttemptCompleted { attempt, outcome } => {
                if self.discard_stale_completions
                    && self.last_applied.is_some_and(|newest| *attempt < newest)
                {
                    tracing::debug!(%attempt, "Discarding out-of-order completion");
                    self.finish_attempt();
                    return false;
                }

                self.last_applied = Some(self.last_applied.map_or(*attempt, |n| n.max(*attempt)));
                match outcome {
                    PollOutcome::Success { quote } => self.on_success(quote.clone()),
                    PollOutcome::Failure { message } => self.on_failure(message.clone()),
                }
                true
            }
        }
    }

    /// Value of the holding at the current quote, `None` without a price
    pub fn position_value_usd(&self, holding: &Holding) -> Option<f64> {
        self.quote
            .as_ref()
            .and_then(|quote| holding.position_value_usd(quote))
    }
}
