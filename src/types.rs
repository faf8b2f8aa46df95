//! Types shared by the poller, the view state and the renderer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed price-and-change snapshot for the tracked asset
///
/// Fields the API omitted stay `None`; a missing price is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Price in USD
    pub value_usd: Option<f64>,

    /// 24h price change percentage
    pub change_24h_percent: Option<f64>,

    /// When the quote was decoded
    pub observed_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote observed now
    pub fn new(value_usd: Option<f64>, change_24h_percent: Option<f64>) -> Self {
        Self {
            value_usd,
            change_24h_percent,
            observed_at: Utc::now(),
        }
    }

    /// Get the age of the quote
    pub fn age(&self) -> std::time::Duration {
        let duration = Utc::now().signed_duration_since(self.observed_at);
        std::time::Duration::from_secs(duration.num_seconds().max(0) as u64)
    }
}

/// The fixed quantity of the asset the user owns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset_amount: f64,
}

impl Holding {
    pub fn new(asset_amount: f64) -> Self {
        Self { asset_amount }
    }

    /// Value of the holding at the quoted price, `None` while no price is known
    pub fn position_value_usd(&self, quote: &PriceQuote) -> Option<f64> {
        quote.value_usd.map(|price| price * self.asset_amount)
    }
}

/// Sequence number of a fetch attempt, increasing per poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub u64);

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollOutcome {
    /// A quote was decoded
    Success { quote: PriceQuote },
    /// The attempt failed; carries the display message
    Failure { message: String },
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Success { .. })
    }
}

/// Events published by the poller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollEvent {
    /// A fetch attempt has been issued
    AttemptStarted { attempt: AttemptId },

    /// A fetch attempt finished
    AttemptCompleted {
        attempt: AttemptId,
        outcome: PollOutcome,
    },
}

impl PollEvent {
    /// Get the attempt this event belongs to
    pub fn attempt(&self) -> AttemptId {
        match self {
            PollEvent::AttemptStarted { attempt } => *attempt,
            PollEvent::AttemptCompleted { attempt, .. } => *attempt,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            PollEvent::AttemptStarted { .. } => "ATTEMPT_STARTED",
            PollEvent::AttemptCompleted { .. } => "ATTEMPT_COMPLETED",
        }
    }
}

impl std::fmt::Display for PollEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollEvent::AttemptStarted { attempt } => write!(f, "Attempt {} started", attempt),
            PollEvent::AttemptCompleted {
                attempt,
                outcome: PollOutcome::Success { quote },
            } => match quote.value_usd {
                Some(price) => write!(f, "Attempt {} succeeded: ${:.2}", attempt, price),
                None => write!(f, "Attempt {} succeeded without a price", attempt),
            },
            PollEvent::AttemptCompleted {
                attempt,
                outcome: PollOutcome::Failure { message },
            } => write!(f, "Attempt {} failed: {}", attempt, message),
        }
    }
}
