//! Watch Flux - Deterministic compute engine for viewer watch-history analytics
//!
//! Flux turns a profile's raw watch events into presentation-ready statistics
//! through a deterministic pipeline: store fetch → adaptation → analytics →
//! encoding.
//!
//! ## Analytics
//!
//! - **Binge sessions**: runs of same-show episodes with small gaps
//! - **Streaks**: consecutive active calendar days
//! - **Velocity**: throughput, peak hour/day, and a two-window trend
//! - **Seasonal**: completions by month and season
//! - **Time to watch**: discovery-to-start and start-to-finish latency, backlog aging
//! - **Abandonment**: stalled in-progress shows and the abandonment rate

pub mod adapter;
pub mod analytics;
pub mod clock;
pub mod config;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use pipeline::{compute_insights, snapshot_to_insights, InsightsProcessor};
pub use store::{FetchOptions, InMemoryWatchStore, WatchEventStore};

/// Flux version embedded in all insights payloads
pub const FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for insights payloads
pub const PRODUCER_NAME: &str = "watch-flux";
