//! Abandonment risk scoring
//!
//! Flags in-progress shows that have stalled and computes the share of
//! started shows that were abandoned.

use chrono::{DateTime, Utc};

use crate::analytics::rounding::{round1, safe_ratio};
use crate::config::AnalyticsConfig;
use crate::types::{AbandonmentStats, RiskEntry, ShowProgress, WatchStatus};

/// Scorer for abandonment risk
pub struct AbandonmentRiskScorer;

impl AbandonmentRiskScorer {
    /// Score show progress relative to `now`
    pub fn compute(
        shows: &[ShowProgress],
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> AbandonmentStats {
        let mut shows_at_risk: Vec<RiskEntry> = shows
            .iter()
            .filter(|show| {
                show.status == WatchStatus::Watching && show.unwatched_aired_episodes > 0
            })
            .filter_map(|show| {
                let idle = idle_days(show, now)?;
                (idle >= config.at_risk_idle_days).then(|| RiskEntry {
                    show_id: show.show_id.clone(),
                    show_title: show.show_title.clone(),
                    days_since_last_watch: idle,
                    unwatched_aired_episodes: show.unwatched_aired_episodes,
                    status: show.status,
                })
            })
            .collect();
        shows_at_risk.sort_by(|a, b| b.days_since_last_watch.cmp(&a.days_since_last_watch));

        let started: Vec<&ShowProgress> = shows.iter().filter(|show| is_started(show)).collect();
        let abandoned = started
            .iter()
            .filter(|show| {
                show.status == WatchStatus::Watching
                    && idle_days(show, now).is_some_and(|idle| idle >= config.abandoned_idle_days)
            })
            .count() as u32;
        let started_shows = started.len() as u32;

        AbandonmentStats {
            shows_at_risk,
            started_shows,
            abandoned_shows: abandoned,
            abandonment_rate: round1(safe_ratio(abandoned as f64, started_shows as f64) * 100.0),
        }
    }
}

/// Whole days since the last watched episode
fn idle_days(show: &ShowProgress, now: DateTime<Utc>) -> Option<i64> {
    show.last_watched_at.map(|last| (now - last).num_days())
}

/// In progress or not yet marked, with at least one episode watched
fn is_started(show: &ShowProgress) -> bool {
    matches!(show.status, WatchStatus::Watching | WatchStatus::NotWatched)
        && show.watched_episode_count > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 9, 0, 0).unwrap()
    }

    fn show(
        id: &str,
        status: WatchStatus,
        idle: Option<i64>,
        watched: u32,
        unwatched: u32,
    ) -> ShowProgress {
        ShowProgress {
            show_id: id.to_string(),
            show_title: format!("Show {id}"),
            status,
            last_watched_at: idle.map(|days| now() - Duration::days(days)),
            watched_episode_count: watched,
            unwatched_aired_episodes: unwatched,
        }
    }

    #[test]
    fn test_idle_95_days_is_at_risk_and_abandoned() {
        let shows = vec![show("a", WatchStatus::Watching, Some(95), 4, 6)];
        let stats = AbandonmentRiskScorer::compute(&shows, now(), &AnalyticsConfig::default());

        assert_eq!(
            stats.shows_at_risk,
            vec![RiskEntry {
                show_id: "a".to_string(),
                show_title: "Show a".to_string(),
                days_since_last_watch: 95,
                unwatched_aired_episodes: 6,
                status: WatchStatus::Watching,
            }]
        );
        assert_eq!(stats.started_shows, 1);
        assert_eq!(stats.abandoned_shows, 1);
        assert_eq!(stats.abandonment_rate, 100.0);
    }

    #[test]
    fn test_risk_requires_unwatched_aired_episodes() {
        let shows = vec![show("caught-up", WatchStatus::Watching, Some(60), 10, 0)];
        let stats = AbandonmentRiskScorer::compute(&shows, now(), &AnalyticsConfig::default());
        assert!(stats.shows_at_risk.is_empty());
    }

    #[test]
    fn test_risk_threshold_is_inclusive() {
        let shows = vec![
            show("edge", WatchStatus::Watching, Some(30), 1, 1),
            show("recent", WatchStatus::Watching, Some(29), 1, 1),
        ];
        let stats = AbandonmentRiskScorer::compute(&shows, now(), &AnalyticsConfig::default());

        assert_eq!(stats.shows_at_risk.len(), 1);
        assert_eq!(stats.shows_at_risk[0].show_id, "edge");
    }

    #[test]
    fn test_risk_sorted_by_idle_desc() {
        let shows = vec![
            show("a", WatchStatus::Watching, Some(40), 1, 1),
            show("b", WatchStatus::Watching, Some(200), 1, 1),
            show("c", WatchStatus::Watching, Some(75), 1, 1),
        ];
        let stats = AbandonmentRiskScorer::compute(&shows, now(), &AnalyticsConfig::default());

        let ids: Vec<&str> = stats.shows_at_risk.iter().map(|r| r.show_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_abandonment_rate() {
        let shows = vec![
            show("abandoned", WatchStatus::Watching, Some(120), 3, 5),
            show("active", WatchStatus::Watching, Some(2), 3, 5),
            show("paused", WatchStatus::NotWatched, Some(300), 1, 9),
            // never started: not counted
            show("queued", WatchStatus::NotWatched, None, 0, 8),
            // finished: not counted
            show("done", WatchStatus::Completed, Some(400), 10, 0),
        ];
        let stats = AbandonmentRiskScorer::compute(&shows, now(), &AnalyticsConfig::default());

        assert_eq!(stats.started_shows, 3);
        assert_eq!(stats.abandoned_shows, 1);
        assert_eq!(stats.abandonment_rate, 33.3);
    }

    #[test]
    fn test_no_shows() {
        let stats = AbandonmentRiskScorer::compute(&[], now(), &AnalyticsConfig::default());
        assert_eq!(stats, AbandonmentStats::default());
        assert_eq!(stats.abandonment_rate, 0.0);
    }
}
