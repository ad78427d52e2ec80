//! Time-to-watch and backlog aging
//!
//! Measures how long shows wait on the watchlist before they are started, how
//! long they take to finish once started, and how stale the unstarted backlog is.

use chrono::{DateTime, Duration, Utc};

use crate::analytics::rounding::{mean, round1};
use crate::config::AnalyticsConfig;
use crate::types::{BacklogAging, BacklogEntry, FastCompletion, TimeToWatchStats};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Analyzer for watch latency
pub struct TimeToWatchAnalyzer;

impl TimeToWatchAnalyzer {
    /// Compute latency and backlog stats relative to `now`
    pub fn compute(
        entries: &[BacklogEntry],
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> TimeToWatchStats {
        if entries.is_empty() {
            return TimeToWatchStats::default();
        }

        let days_to_start: Vec<f64> = entries
            .iter()
            .filter_map(days_to_start)
            .filter(|days| *days >= 0.0)
            .collect();

        let mut completions: Vec<(&BacklogEntry, f64)> = entries
            .iter()
            .filter_map(|entry| days_to_complete(entry).map(|days| (entry, days)))
            .filter(|(_, days)| *days > 0.0)
            .collect();

        let average_days_to_complete_show =
            round1(mean(&completions.iter().map(|(_, d)| *d).collect::<Vec<_>>()));

        completions.sort_by(|a, b| a.1.total_cmp(&b.1));
        let fastest_completions = completions
            .into_iter()
            .take(config.fastest_completions_limit)
            .map(|(entry, days)| FastCompletion {
                show_id: entry.show_id.clone(),
                show_title: entry.show_title.clone(),
                days_to_complete: round1(days),
            })
            .collect();

        TimeToWatchStats {
            average_days_to_start_show: round1(mean(&days_to_start)),
            average_days_to_complete_show,
            fastest_completions,
            backlog_aging: backlog_aging(entries, now, config.backlog_thresholds_days),
        }
    }
}

fn as_days(span: Duration) -> f64 {
    span.num_seconds() as f64 / SECONDS_PER_DAY
}

/// Days from watchlist add to first watch
pub fn days_to_start(entry: &BacklogEntry) -> Option<f64> {
    entry
        .first_watched_at
        .map(|first| as_days(first - entry.created_at))
}

/// Days from first watch to last watch
pub fn days_to_complete(entry: &BacklogEntry) -> Option<f64> {
    match (entry.first_watched_at, entry.last_watched_at) {
        (Some(first), Some(last)) => Some(as_days(last - first)),
        _ => None,
    }
}

/// Count unstarted shows older than each threshold
///
/// Thresholds are independent, so a show counts toward every one it exceeds.
fn backlog_aging(
    entries: &[BacklogEntry],
    now: DateTime<Utc>,
    thresholds: [i64; 3],
) -> BacklogAging {
    let ages: Vec<f64> = entries
        .iter()
        .filter(|entry| entry.first_watched_at.is_none())
        .map(|entry| as_days(now - entry.created_at))
        .collect();

    let older_than = |days: i64| ages.iter().filter(|age| **age > days as f64).count() as u32;

    BacklogAging {
        over_30_days: older_than(thresholds[0]),
        over_90_days: older_than(thresholds[1]),
        over_365_days: older_than(thresholds[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap()
    }

    fn entry(id: &str, added_days_ago: i64, first: Option<i64>, last: Option<i64>) -> BacklogEntry {
        let at = |days_ago: i64| now() - Duration::days(days_ago);
        BacklogEntry {
            show_id: id.to_string(),
            show_title: format!("Show {id}"),
            created_at: at(added_days_ago),
            first_watched_at: first.map(at),
            last_watched_at: last.map(at),
        }
    }

    #[test]
    fn test_empty_entries() {
        let stats = TimeToWatchAnalyzer::compute(&[], now(), &AnalyticsConfig::default());
        assert_eq!(stats, TimeToWatchStats::default());
        assert!(stats.fastest_completions.is_empty());
    }

    #[test]
    fn test_average_days_to_start() {
        let entries = vec![
            entry("a", 10, Some(8), Some(8)),
            entry("b", 20, Some(15), Some(1)),
            // watched before it was added; ignored
            entry("c", 5, Some(6), Some(6)),
        ];
        let stats = TimeToWatchAnalyzer::compute(&entries, now(), &AnalyticsConfig::default());

        // (2 + 5) / 2
        assert_eq!(stats.average_days_to_start_show, 3.5);
    }

    #[test]
    fn test_completion_requires_positive_span() {
        let entries = vec![
            entry("a", 30, Some(20), Some(20)),
            entry("b", 30, Some(20), Some(17)),
            entry("c", 30, Some(20), Some(10)),
        ];
        let stats = TimeToWatchAnalyzer::compute(&entries, now(), &AnalyticsConfig::default());

        // a has zero span and is skipped: (3 + 10) / 2
        assert_eq!(stats.average_days_to_complete_show, 6.5);
        let ids: Vec<&str> = stats
            .fastest_completions
            .iter()
            .map(|c| c.show_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_fastest_completions_limited_and_ascending() {
        let entries: Vec<BacklogEntry> = (1..=7)
            .rev()
            .map(|span| entry(&format!("s{span}"), 50, Some(40), Some(40 - span)))
            .collect();
        let stats = TimeToWatchAnalyzer::compute(&entries, now(), &AnalyticsConfig::default());

        let spans: Vec<f64> = stats
            .fastest_completions
            .iter()
            .map(|c| c.days_to_complete)
            .collect();
        assert_eq!(spans, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_backlog_aging_buckets_overlap() {
        let entries = vec![
            entry("fresh", 10, None, None),
            entry("month", 45, None, None),
            entry("quarter", 120, None, None),
            entry("ancient", 400, None, None),
            // started shows never count as backlog
            entry("started", 500, Some(2), Some(1)),
        ];
        let stats = TimeToWatchAnalyzer::compute(&entries, now(), &AnalyticsConfig::default());

        assert_eq!(
            stats.backlog_aging,
            BacklogAging {
                over_30_days: 3,
                over_90_days: 2,
                over_365_days: 1,
            }
        );
    }

    #[test]
    fn test_exactly_thirty_days_is_not_over() {
        let stats = TimeToWatchAnalyzer::compute(
            &[entry("edge", 30, None, None)],
            now(),
            &AnalyticsConfig::default(),
        );
        assert_eq!(stats.backlog_aging.over_30_days, 0);
    }

    #[test]
    fn test_fractional_days() {
        let mut e = entry("half", 10, None, None);
        e.first_watched_at = Some(e.created_at + Duration::hours(36));
        assert_eq!(days_to_start(&e), Some(1.5));
    }
}
