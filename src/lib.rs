//! # ETH Dashboard
//!
//! Periodically fetches the price of one asset (ETH by default) from the
//! CoinGecko simple price API and derives the value of a fixed holding.
//!
//! ## Usage
//!
//! ```no_run
//! use eth_dashboard::{Dashboard, DashboardConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::new(DashboardConfig::default())?;
//! dashboard.start();
//!
//! let mut updates = dashboard.subscribe();
//! updates.changed().await?;
//! if let Some(value) = dashboard.position_value_usd() {
//!     println!("Position: ${:.2}", value);
//! }
//!
//! dashboard.stop();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Poller (first attempt immediately, then every interval)
//!     ↓
//! QuoteProvider (CoinGecko)
//!     ↓ PollEvent
//! ViewState reducer (watch channel)
//!     ↓
//! Renderer (render_text, or your own subscriber)
//! ```
//!
//! ## Configuration
//!
//! Defaults live in `constants`: 4.5 ETH held, 60 second interval. Each can be
//! overridden through environment variables, see `DashboardConfig::from_env`.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod poller;
pub mod provider;
pub mod providers;
pub mod render;
pub mod types;
pub mod view_state;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{ConfigError, FetchError, PollerError};
pub use metrics::PollMetrics;
pub use poller::Poller;
pub use types::{AttemptId, Holding, PollEvent, PollOutcome, PriceQuote};
pub use view_state::ViewState;
