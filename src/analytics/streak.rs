//! Day-streak tracking
//!
//! Merges consecutive active calendar days (UTC) into streaks.

use chrono::NaiveDate;

use crate::analytics::rounding::{round1, safe_ratio};
use crate::config::AnalyticsConfig;
use crate::types::{Streak, StreakStats};

/// Calculator for viewing streaks
pub struct StreakCalculator;

impl StreakCalculator {
    /// Merge distinct ascending active dates into streaks
    ///
    /// Two dates join the same streak only when they are exactly one
    /// calendar day apart. The final streak is always closed, even at
    /// length 1.
    pub fn streaks(active_dates: &[NaiveDate]) -> Vec<Streak> {
        let Some((&first, rest)) = active_dates.split_first() else {
            return Vec::new();
        };

        let mut streaks = Vec::new();
        let mut current = Streak {
            start_date: first,
            end_date: first,
            length_in_days: 1,
        };

        for &date in rest {
            if (date - current.end_date).num_days() == 1 {
                current.end_date = date;
                current.length_in_days += 1;
            } else {
                streaks.push(current);
                current = Streak {
                    start_date: date,
                    end_date: date,
                    length_in_days: 1,
                };
            }
        }
        streaks.push(current);

        streaks
    }

    /// Compute streak stats relative to `today`
    pub fn compute(
        active_dates: &[NaiveDate],
        today: NaiveDate,
        config: &AnalyticsConfig,
    ) -> StreakStats {
        let streaks = Self::streaks(active_dates);
        let Some(last) = streaks.last() else {
            return StreakStats::default();
        };

        let mut longest = &streaks[0];
        for streak in &streaks[1..] {
            if streak.length_in_days > longest.length_in_days {
                longest = streak;
            }
        }

        let days_since_end = (today - last.end_date).num_days();
        let current_streak = if days_since_end == 0 || days_since_end == 1 {
            last.length_in_days
        } else {
            0
        };

        let streaks_over_7_days = streaks
            .iter()
            .filter(|s| s.length_in_days >= config.long_streak_days)
            .count() as u32;

        let total_days: u32 = streaks.iter().map(|s| s.length_in_days).sum();
        let average_streak_length = round1(safe_ratio(total_days as f64, streaks.len() as f64));

        StreakStats {
            current_streak,
            longest_streak: longest.length_in_days,
            longest_streak_start: longest.start_date.format("%Y-%m-%d").to_string(),
            longest_streak_end: longest.end_date.format("%Y-%m-%d").to_string(),
            streaks_over_7_days,
            average_streak_length,
        }
    }
}
