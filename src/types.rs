//! Watch history data types
//!
//! This module defines the raw watch events supplied by the store, the
//! per-analytic input rows derived from them, and the stats objects returned
//! to callers. Stats objects serialize with camelCase field names; those names
//! and their rounding precision are part of the external contract.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::analytics::counts::OrderedCounts;

/// Placeholder used when no day or month can be named
pub const NOT_AVAILABLE: &str = "N/A";

/// Kind of content a watch event completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Episode,
    Movie,
}

/// Watchlist status of a show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchStatus {
    Watching,
    NotWatched,
    UpToDate,
    Completed,
}

/// A single episode or movie completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// Episode or movie identifier
    pub content_id: String,
    /// Episode or movie
    pub content_type: ContentType,
    /// Owning show (episodes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
    /// Show title, or the movie title for movies
    #[serde(default)]
    pub show_title: String,
    /// Completion instant
    pub timestamp: DateTime<Utc>,
    /// Profile that watched the content
    pub profile_id: String,
}

impl WatchEvent {
    pub fn is_episode(&self) -> bool {
        self.content_type == ContentType::Episode
    }
}

/// A show on a profile's watchlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub show_id: String,
    pub show_title: String,
    pub status: WatchStatus,
    /// When the show was added to the watchlist
    pub created_at: DateTime<Utc>,
    /// Episodes that have aired so far
    #[serde(default)]
    pub aired_episode_count: u32,
}

/// Everything the store knows about one profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub profile_id: String,
    #[serde(default)]
    pub events: Vec<WatchEvent>,
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
}

// ============================================================================
// Analytic inputs
// ============================================================================

/// A run of same-show completions with small gaps
#[derive(Debug, Clone, PartialEq)]
pub struct BingeSession {
    pub show_id: String,
    pub show_title: String,
    pub episode_count: u32,
    pub start_timestamp: DateTime<Utc>,
}

/// Consecutive calendar days with at least one completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub length_in_days: u32,
}

/// Completions for one (date, hour, weekday) slot inside the lookback window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VelocitySample {
    pub date: NaiveDate,
    /// Hour of day, 0-23
    pub hour: u32,
    pub weekday: Weekday,
    pub episode_count: u32,
    /// Distinct shows watched in the slot
    pub show_count: u32,
}

/// Completions for one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    /// Month number, 1-12
    pub month: u32,
    pub month_name: String,
    pub count: u32,
}

/// Watch timeline of one watchlist show
#[derive(Debug, Clone, PartialEq)]
pub struct BacklogEntry {
    pub show_id: String,
    pub show_title: String,
    pub created_at: DateTime<Utc>,
    pub first_watched_at: Option<DateTime<Utc>>,
    pub last_watched_at: Option<DateTime<Utc>>,
}

/// Progress of one watchlist show, used for abandonment scoring
#[derive(Debug, Clone, PartialEq)]
pub struct ShowProgress {
    pub show_id: String,
    pub show_title: String,
    pub status: WatchStatus,
    pub last_watched_at: Option<DateTime<Utc>>,
    pub watched_episode_count: u32,
    pub unwatched_aired_episodes: u32,
}

// ============================================================================
// Stats objects
// ============================================================================

/// Longest binge session, or an empty placeholder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestBinge {
    pub show_title: String,
    pub episode_count: u32,
    /// Start date of the session (YYYY-MM-DD), empty when there is none
    pub date: String,
}

/// A show ranked by how many binge sessions it appears in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingedShow {
    pub show_id: String,
    pub show_title: String,
    pub binge_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingeStats {
    pub binge_session_count: u32,
    /// Rounded to 1 decimal
    pub average_episodes_per_binge: f64,
    pub longest_binge_session: LongestBinge,
    pub top_binged_shows: Vec<BingedShow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// YYYY-MM-DD, empty when there is no streak
    pub longest_streak_start: String,
    /// YYYY-MM-DD, empty when there is no streak
    pub longest_streak_end: String,
    pub streaks_over_7_days: u32,
    /// Rounded to 1 decimal
    pub average_streak_length: f64,
}

/// Direction of viewing velocity between the older and recent halves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityStats {
    /// Rounded to 1 decimal
    pub average_episodes_per_day: f64,
    /// Rounded to 1 decimal
    pub episodes_per_week: f64,
    pub episodes_per_month: u32,
    /// Hour of day (0-23) with the most completions
    pub most_active_hour: u32,
    /// English weekday name, `N/A` when there is no data
    pub most_active_day: String,
    pub velocity_trend: VelocityTrend,
    /// Recent-half vs older-half change (percent, 2 decimals); 0 when too
    /// few active days to classify
    pub trend_change_percent: f64,
}

impl Default for VelocityStats {
    fn default() -> Self {
        Self {
            average_episodes_per_day: 0.0,
            episodes_per_week: 0.0,
            episodes_per_month: 0,
            most_active_hour: 0,
            most_active_day: NOT_AVAILABLE.to_string(),
            velocity_trend: VelocityTrend::Stable,
            trend_change_percent: 0.0,
        }
    }
}

/// Completion counts folded into meteorological seasons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBreakdown {
    pub spring: u32,
    pub summer: u32,
    pub fall: u32,
    pub winter: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalStats {
    /// Month name to completion count, in first-encounter order
    pub monthly_breakdown: OrderedCounts<String>,
    pub seasonal_breakdown: SeasonBreakdown,
    pub peak_viewing_month: String,
    pub slowest_viewing_month: String,
}

impl Default for SeasonalStats {
    fn default() -> Self {
        Self {
            monthly_breakdown: OrderedCounts::new(),
            seasonal_breakdown: SeasonBreakdown::default(),
            peak_viewing_month: NOT_AVAILABLE.to_string(),
            slowest_viewing_month: NOT_AVAILABLE.to_string(),
        }
    }
}

/// A show finished quickly after it was started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastCompletion {
    pub show_id: String,
    pub show_title: String,
    /// Rounded to 1 decimal
    pub days_to_complete: f64,
}

/// Unstarted shows older than each threshold
///
/// Counts overlap: a show idle for 400 days counts in all three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogAging {
    #[serde(rename = "over30Days")]
    pub over_30_days: u32,
    #[serde(rename = "over90Days")]
    pub over_90_days: u32,
    #[serde(rename = "over365Days")]
    pub over_365_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeToWatchStats {
    /// Rounded to 1 decimal
    pub average_days_to_start_show: f64,
    /// Rounded to 1 decimal
    pub average_days_to_complete_show: f64,
    pub fastest_completions: Vec<FastCompletion>,
    pub backlog_aging: BacklogAging,
}

/// An in-progress show that has stalled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEntry {
    pub show_id: String,
    pub show_title: String,
    pub days_since_last_watch: i64,
    pub unwatched_aired_episodes: u32,
    pub status: WatchStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonmentStats {
    pub shows_at_risk: Vec<RiskEntry>,
    pub started_shows: u32,
    pub abandoned_shows: u32,
    /// Percentage rounded to 1 decimal
    pub abandonment_rate: f64,
}

// ============================================================================
// Output payload
// ============================================================================

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// All six analytics for one profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingInsights {
    pub binge: BingeStats,
    pub streaks: StreakStats,
    pub velocity: VelocityStats,
    pub seasonal: SeasonalStats,
    pub time_to_watch: TimeToWatchStats,
    pub abandonment: AbandonmentStats,
}

/// Encoded insights payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsPayload {
    pub producer: InsightsProducer,
    pub profile_id: String,
    /// RFC3339
    pub computed_at_utc: String,
    pub insights: ViewingInsights,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_status_serialization() {
        let json = serde_json::to_string(&WatchStatus::NotWatched).unwrap();
        assert_eq!(json, "\"not-watched\"");

        let parsed: WatchStatus = serde_json::from_str("\"watching\"").unwrap();
        assert_eq!(parsed, WatchStatus::Watching);
    }

    #[test]
    fn test_watch_event_deserialization() {
        let json = r#"{
            "content_id": "ep-1",
            "content_type": "episode",
            "show_id": "show-1",
            "show_title": "The Expanse",
            "timestamp": "2024-01-15T20:00:00Z",
            "profile_id": "profile-1"
        }"#;

        let event: WatchEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_episode());
        assert_eq!(event.show_id.as_deref(), Some("show-1"));
    }

    #[test]
    fn test_movie_event_without_show() {
        let json = r#"{
            "content_id": "movie-1",
            "content_type": "movie",
            "show_title": "Arrival",
            "timestamp": "2024-01-15T20:00:00Z",
            "profile_id": "profile-1"
        }"#;

        let event: WatchEvent = serde_json::from_str(json).unwrap();
        assert!(!event.is_episode());
        assert!(event.show_id.is_none());
    }

    #[test]
    fn test_stats_field_names() {
        let value = serde_json::to_value(BingeStats::default()).unwrap();
        assert_eq!(value["bingeSessionCount"], 0);
        assert_eq!(value["averageEpisodesPerBinge"], 0.0);
        assert_eq!(value["longestBingeSession"]["showTitle"], "");
        assert_eq!(value["longestBingeSession"]["date"], "");

        let value = serde_json::to_value(StreakStats::default()).unwrap();
        assert_eq!(value["streaksOver7Days"], 0);

        let value = serde_json::to_value(TimeToWatchStats::default()).unwrap();
        assert_eq!(value["backlogAging"]["over365Days"], 0);
    }

    #[test]
    fn test_zeroed_defaults_use_placeholder() {
        assert_eq!(VelocityStats::default().most_active_day, NOT_AVAILABLE);
        assert_eq!(SeasonalStats::default().peak_viewing_month, NOT_AVAILABLE);

        let value = serde_json::to_value(VelocityStats::default()).unwrap();
        assert_eq!(value["velocityTrend"], "stable");
    }
}
