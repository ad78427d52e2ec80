//! Viewing velocity and trend analysis
//!
//! Computes throughput over the lookback window, the most active hour and
//! weekday, and a two-window trend signal.

use std::collections::HashSet;

use chrono::{NaiveDate, Weekday};

use crate::analytics::counts::OrderedCounts;
use crate::analytics::rounding::{round1, round2, safe_ratio};
use crate::config::AnalyticsConfig;
use crate::types::{VelocitySample, VelocityStats, VelocityTrend, NOT_AVAILABLE};

/// Analyzer for viewing velocity
pub struct VelocityTrendAnalyzer;

impl VelocityTrendAnalyzer {
    /// Compute velocity stats from samples ordered by date descending
    pub fn compute(samples: &[VelocitySample], config: &AnalyticsConfig) -> VelocityStats {
        if samples.is_empty() {
            return VelocityStats::default();
        }

        let active_days = distinct_days(samples);
        let average = episodes_per_active_day(samples);

        let by_hour: OrderedCounts<u32> = samples
            .iter()
            .map(|s| (s.hour, s.episode_count))
            .collect();
        let by_weekday: OrderedCounts<Weekday> = samples
            .iter()
            .map(|s| (s.weekday, s.episode_count))
            .collect();

        let most_active_hour = by_hour.first_max().map_or(0, |(hour, _)| *hour);
        let most_active_day = by_weekday
            .first_max()
            .map_or(NOT_AVAILABLE, |(day, _)| weekday_name(*day))
            .to_string();

        let change_pct = if active_days < config.trend_min_active_days {
            0.0
        } else {
            trend_change_pct(samples)
        };
        let velocity_trend = classify_trend(change_pct, config.trend_threshold_pct);

        VelocityStats {
            average_episodes_per_day: round1(average),
            episodes_per_week: round1(average * 7.0),
            episodes_per_month: (average * 30.0).round() as u32,
            most_active_hour,
            most_active_day,
            velocity_trend,
            trend_change_percent: round2(change_pct),
        }
    }
}

fn distinct_days(samples: &[VelocitySample]) -> usize {
    samples
        .iter()
        .map(|s| s.date)
        .collect::<HashSet<NaiveDate>>()
        .len()
}

fn episodes_per_active_day(samples: &[VelocitySample]) -> f64 {
    let episodes: u32 = samples.iter().map(|s| s.episode_count).sum();
    safe_ratio(episodes as f64, distinct_days(samples) as f64)
}

/// Percent change from the older half of the rows to the recent half
///
/// Rows are split at their midpoint index, not at a calendar boundary. The
/// first half of a date-descending list is the recent one. An older half
/// with no throughput yields 0.
fn trend_change_pct(samples: &[VelocitySample]) -> f64 {
    let (recent, older) = samples.split_at(samples.len() / 2);
    let recent_avg = episodes_per_active_day(recent);
    let older_avg = episodes_per_active_day(older);

    if older_avg == 0.0 {
        return 0.0;
    }
    (recent_avg - older_avg) / older_avg * 100.0
}

fn classify_trend(change_pct: f64, threshold_pct: f64) -> VelocityTrend {
    if change_pct > threshold_pct {
        VelocityTrend::Increasing
    } else if change_pct < -threshold_pct {
        VelocityTrend::Decreasing
    } else {
        VelocityTrend::Stable
    }
}

/// Full English weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
