//! Watch analytics
//!
//! Six independent, stateless transformations over one profile's snapshot:
//! binge sessions, day streaks, viewing velocity, seasonal distribution,
//! time-to-watch, and abandonment risk. Each takes its pre-aggregated input
//! (see [`crate::adapter`]) and returns a fully populated stats object, even
//! when the input is empty.

pub mod abandonment;
pub mod binge;
pub mod counts;
pub mod rounding;
pub mod seasonal;
pub mod streak;
pub mod time_to_watch;
pub mod velocity;

pub use abandonment::AbandonmentRiskScorer;
pub use binge::BingeSessionDetector;
pub use counts::OrderedCounts;
pub use seasonal::{Season, SeasonalAggregator};
pub use streak::StreakCalculator;
pub use time_to_watch::TimeToWatchAnalyzer;
pub use velocity::VelocityTrendAnalyzer;
