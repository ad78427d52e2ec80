//! Analytics configuration
//!
//! Every threshold used by the analytics lives here with its documented
//! default. Configurations can be persisted and reloaded as JSON.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Default maximum gap between binge episodes (hours)
pub const DEFAULT_BINGE_MAX_GAP_HOURS: i64 = 24;

/// Default minimum episodes for a binge session
pub const DEFAULT_BINGE_MIN_EPISODES: u32 = 3;

/// Default velocity lookback window (days)
pub const DEFAULT_VELOCITY_LOOKBACK_DAYS: u32 = 30;

/// Largest accepted binge gap (100 years, in hours)
pub const MAX_BINGE_GAP_HOURS: i64 = 24 * 365 * 100;

/// Largest accepted velocity lookback (100 years, in days)
pub const MAX_VELOCITY_LOOKBACK_DAYS: u32 = 36_500;

/// Tunable thresholds for all analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Largest gap between consecutive episodes of one binge (hours, inclusive)
    pub binge_max_gap_hours: i64,
    /// Fewest episodes that make a binge session
    pub binge_min_episodes: u32,
    /// How many shows `topBingedShows` lists
    pub top_binged_limit: usize,
    /// Streaks at least this long count toward `streaksOver7Days`
    pub long_streak_days: u32,
    /// Velocity lookback window (days)
    pub velocity_lookback_days: u32,
    /// Fewest distinct active days before a trend is classified
    pub trend_min_active_days: usize,
    /// Percent change beyond which a trend is increasing or decreasing
    pub trend_threshold_pct: f64,
    /// How many shows `fastestCompletions` lists
    pub fastest_completions_limit: usize,
    /// Backlog aging thresholds (days, exclusive), ascending
    pub backlog_thresholds_days: [i64; 3],
    /// Idle days before a watching show is at risk
    pub at_risk_idle_days: i64,
    /// Idle days before a started show counts as abandoned
    pub abandoned_idle_days: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            binge_max_gap_hours: DEFAULT_BINGE_MAX_GAP_HOURS,
            binge_min_episodes: DEFAULT_BINGE_MIN_EPISODES,
            top_binged_limit: 5,
            long_streak_days: 7,
            velocity_lookback_days: DEFAULT_VELOCITY_LOOKBACK_DAYS,
            trend_min_active_days: 14,
            trend_threshold_pct: 10.0,
            fastest_completions_limit: 5,
            backlog_thresholds_days: [30, 90, 365],
            at_risk_idle_days: 30,
            abandoned_idle_days: 90,
        }
    }
}

impl AnalyticsConfig {
    /// Check the thresholds are usable
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !(0..=MAX_BINGE_GAP_HOURS).contains(&self.binge_max_gap_hours) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "binge_max_gap_hours must be between 0 and {MAX_BINGE_GAP_HOURS}, got {}",
                self.binge_max_gap_hours
            )));
        }
        if self.binge_min_episodes < 2 {
            return Err(AnalyticsError::InvalidConfig(
                "binge_min_episodes must be at least 2".to_string(),
            ));
        }
        if !(1..=MAX_VELOCITY_LOOKBACK_DAYS).contains(&self.velocity_lookback_days) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "velocity_lookback_days must be between 1 and {MAX_VELOCITY_LOOKBACK_DAYS}, got {}",
                self.velocity_lookback_days
            )));
        }
        if !self.trend_threshold_pct.is_finite() || self.trend_threshold_pct < 0.0 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "trend_threshold_pct must be a non-negative number, got {}",
                self.trend_threshold_pct
            )));
        }
        let [a, b, c] = self.backlog_thresholds_days;
        if a < 0 || a > b || b > c {
            return Err(AnalyticsError::InvalidConfig(
                "backlog_thresholds_days must be non-negative and ascending".to_string(),
            ));
        }
        if self.at_risk_idle_days < 0 || self.abandoned_idle_days < 0 {
            return Err(AnalyticsError::InvalidConfig(
                "idle thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalyticsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        serde_json::to_string_pretty(self).map_err(AnalyticsError::JsonError)
    }
}
