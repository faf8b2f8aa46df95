//! Poll statistics
//!
//! Tracks attempt latencies and the success rate of the quote feed.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for latency percentiles
const MAX_SAMPLES: usize = 100;

/// Snapshot of the poller's statistics
#[derive(Debug, Clone, PartialEq)]
pub struct PollMetrics {
    /// Name of the provider being polled
    pub provider_name: String,
    /// 50th percentile latency of successful attempts in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful attempts in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0), 1.0 before any attempt completed
    pub success_rate: f64,
    /// Completed attempts (lifetime)
    pub total_attempts: u64,
    /// Failed attempts (lifetime)
    pub failed_attempts: u64,
}

#[derive(Debug, Default)]
struct MetricsState {
    samples: VecDeque<f64>,
    total_attempts: u64,
    failed_attempts: u64,
}

/// Collects attempt results for one poller
#[derive(Debug)]
pub struct MetricsCollector {
    provider_name: String,
    state: RwLock<MetricsState>,
}

impl MetricsCollector {
    pub fn new(provider_name: &str) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            state: RwLock::new(MetricsState {
                samples: VecDeque::with_capacity(MAX_SAMPLES),
                ..Default::default()
            }),
        }
    }

    /// Records a completed attempt
    pub async fn record_attempt(&self, duration: Duration, success: bool) {
        let mut state = self.state.write().await;
        state.total_attempts += 1;

        if !success {
            state.failed_attempts += 1;
            return;
        }

        if state.samples.len() >= MAX_SAMPLES {
            state.samples.pop_front();
        }
        state.samples.push_back(duration.as_secs_f64() * 1000.0);
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> PollMetrics {
        let state = self.state.read().await;

        let mut latencies: Vec<f64> = state.samples.iter().copied().collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let success_rate = if state.total_attempts > 0 {
            (state.total_attempts - state.failed_attempts) as f64 / state.total_attempts as f64
        } else {
            1.0
        };

        PollMetrics {
            provider_name: self.provider_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_attempts: state.total_attempts,
            failed_attempts: state.failed_attempts,
        }
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let rank = (p / 100.0 * sorted_values.len() as f64).ceil() as usize;
    sorted_values[rank.saturating_sub(1).min(sorted_values.len() - 1)]
}
