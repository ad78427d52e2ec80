//! Binge session detection
//!
//! Groups consecutive same-show episode completions into binge sessions and
//! summarizes them.

use chrono::Duration;

use crate::analytics::counts::OrderedCounts;
use crate::analytics::rounding::{round1, safe_ratio};
use crate::config::AnalyticsConfig;
use crate::types::{BingeSession, BingeStats, BingedShow, LongestBinge, WatchEvent};

/// Detector for binge sessions
pub struct BingeSessionDetector;

impl BingeSessionDetector {
    /// Scan events sorted by `(show_id, timestamp)` and return recorded sessions
    ///
    /// An event joins the open run when it belongs to the same show as the
    /// run's last event and follows it within `binge_max_gap_hours`. Runs
    /// shorter than `binge_min_episodes` are discarded. A gap too large to
    /// represent never splits a run.
    pub fn detect(events: &[WatchEvent], config: &AnalyticsConfig) -> Vec<BingeSession> {
        let max_gap = Duration::try_hours(config.binge_max_gap_hours);
        let mut sessions = Vec::new();
        let mut run: Vec<&WatchEvent> = Vec::new();

        for event in events.iter().filter(|e| e.show_id.is_some()) {
            let extends_run = run.last().is_some_and(|last| {
                last.show_id == event.show_id
                    && max_gap.map_or(true, |gap| event.timestamp - last.timestamp <= gap)
            });

            if !extends_run && !run.is_empty() {
                close_run(&run, config.binge_min_episodes, &mut sessions);
                run.clear();
            }
            run.push(event);
        }
        close_run(&run, config.binge_min_episodes, &mut sessions);

        sessions
    }

    /// Detect sessions and summarize them
    pub fn compute(events: &[WatchEvent], config: &AnalyticsConfig) -> BingeStats {
        let sessions = Self::detect(events, config);
        summarize(&sessions, config.top_binged_limit)
    }
}

fn close_run(run: &[&WatchEvent], min_episodes: u32, sessions: &mut Vec<BingeSession>) {
    if run.len() < min_episodes as usize {
        return;
    }
    let first = run[0];
    sessions.push(BingeSession {
        show_id: first.show_id.clone().unwrap_or_default(),
        show_title: first.show_title.clone(),
        episode_count: run.len() as u32,
        start_timestamp: first.timestamp,
    });
}

/// Summarize recorded sessions into binge stats
pub fn summarize(sessions: &[BingeSession], top_limit: usize) -> BingeStats {
    if sessions.is_empty() {
        return BingeStats::default();
    }

    let total_episodes: u32 = sessions.iter().map(|s| s.episode_count).sum();
    let average_episodes_per_binge =
        round1(safe_ratio(total_episodes as f64, sessions.len() as f64));

    // Strictly greater keeps the first session on ties
    let mut longest = &sessions[0];
    for session in &sessions[1..] {
        if session.episode_count > longest.episode_count {
            longest = session;
        }
    }

    let per_show: OrderedCounts<&str> = sessions
        .iter()
        .map(|s| (s.show_id.as_str(), 1))
        .collect();

    let top_binged_shows = per_show
        .ranked()
        .into_iter()
        .take(top_limit)
        .map(|(show_id, binge_count)| BingedShow {
            show_id: show_id.to_string(),
            show_title: sessions
                .iter()
                .find(|s| s.show_id == *show_id)
                .map(|s| s.show_title.clone())
                .unwrap_or_default(),
            binge_count,
        })
        .collect();

    BingeStats {
        binge_session_count: sessions.len() as u32,
        average_episodes_per_binge,
        longest_binge_session: LongestBinge {
            show_title: longest.show_title.clone(),
            episode_count: longest.episode_count,
            date: longest.start_timestamp.format("%Y-%m-%d").to_string(),
        },
        top_binged_shows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentType;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
    }

    fn episode(show: &str, n: u32, at: DateTime<Utc>) -> WatchEvent {
        WatchEvent {
            content_id: format!("{show}-ep{n}"),
            content_type: ContentType::Episode,
            show_id: Some(show.to_string()),
            show_title: format!("Show {show}"),
            timestamp: at,
            profile_id: "profile".to_string(),
        }
    }

    fn run_of(show: &str, count: u32, start: DateTime<Utc>, gap_hours: i64) -> Vec<WatchEvent> {
        (0..count)
            .map(|i| episode(show, i, start + Duration::hours(gap_hours * i as i64)))
            .collect()
    }

    #[test]
    fn test_four_episodes_two_hours_apart() {
        let events = run_of("a", 4, base(), 2);
        let sessions = BingeSessionDetector::detect(&events, &AnalyticsConfig::default());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].episode_count, 4);
        assert_eq!(sessions[0].start_timestamp, base());
    }

    #[test]
    fn test_two_episodes_thirty_hours_apart() {
        let events = run_of("a", 2, base(), 30);
        let stats = BingeSessionDetector::compute(&events, &AnalyticsConfig::default());
        assert_eq!(stats.binge_session_count, 0);
    }

    #[test]
    fn test_gap_of_exactly_24_hours_extends_session() {
        let events = run_of("a", 3, base(), 24);
        let sessions = BingeSessionDetector::detect(&events, &AnalyticsConfig::default());
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_identical_timestamps_form_one_session() {
        let events: Vec<WatchEvent> = (0..3).map(|n| episode("a", n, base())).collect();
        let sessions = BingeSessionDetector::detect(&events, &AnalyticsConfig::default());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].episode_count, 3);
        assert_eq!(sessions[0].start_timestamp, base());
    }

    #[test]
    fn test_unrepresentable_gap_does_not_panic() {
        let config = AnalyticsConfig {
            binge_max_gap_hours: i64::MAX,
            ..Default::default()
        };
        let events = run_of("a", 3, base(), 24 * 400);
        let stats = BingeSessionDetector::compute(&events, &config);
        assert_eq!(stats.binge_session_count, 1);
    }

    #[test]
    fn test_long_gap_splits_runs() {
        let mut events = run_of("a", 3, base(), 1);
        events.extend(run_of("a", 3, base() + Duration::days(5), 1));
        let sessions = BingeSessionDetector::detect(&events, &AnalyticsConfig::default());
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_show_change_closes_run() {
        let mut events = run_of("a", 2, base(), 1);
        events.extend(run_of("b", 3, base() + Duration::hours(2), 1));
        let sessions = BingeSessionDetector::detect(&events, &AnalyticsConfig::default());

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].show_id, "b");
    }

    #[test]
    fn test_empty_events_zeroed() {
        let stats = BingeSessionDetector::compute(&[], &AnalyticsConfig::default());
        assert_eq!(stats, BingeStats::default());
        assert_eq!(stats.longest_binge_session.show_title, "");
        assert_eq!(stats.longest_binge_session.episode_count, 0);
        assert_eq!(stats.longest_binge_session.date, "");
    }

    #[test]
    fn test_summary_average_and_longest_tie() {
        let mut events = run_of("a", 4, base(), 1);
        events.extend(run_of("b", 4, base() + Duration::days(1), 1));
        events.extend(run_of("c", 3, base() + Duration::days(2), 1));

        let stats = BingeSessionDetector::compute(&events, &AnalyticsConfig::default());

        assert_eq!(stats.binge_session_count, 3);
        // 11 episodes / 3 sessions
        assert_eq!(stats.average_episodes_per_binge, 3.7);
        assert_eq!(
            stats.longest_binge_session,
            LongestBinge {
                show_title: "Show a".to_string(),
                episode_count: 4,
                date: "2024-01-15".to_string(),
            }
        );
    }

    #[test]
    fn test_top_binged_shows_ranking() {
        let mut events = Vec::new();
        // show a: 1 session, show b: 2 sessions, show c: 1 session
        events.extend(run_of("a", 3, base(), 1));
        events.extend(run_of("b", 3, base(), 1));
        events.extend(run_of("b", 3, base() + Duration::days(3), 1));
        events.extend(run_of("c", 3, base(), 1));

        let stats = BingeSessionDetector::compute(&events, &AnalyticsConfig::default());
        let ranked: Vec<(&str, u32)> = stats
            .top_binged_shows
            .iter()
            .map(|s| (s.show_id.as_str(), s.binge_count))
            .collect();

        assert_eq!(ranked, vec![("b", 2), ("a", 1), ("c", 1)]);
        assert_eq!(stats.top_binged_shows[0].show_title, "Show b");
    }

    #[test]
    fn test_top_binged_shows_limited() {
        let mut events = Vec::new();
        for show in ["a", "b", "c", "d", "e", "f", "g"] {
            events.extend(run_of(show, 3, base(), 1));
        }
        let stats = BingeSessionDetector::compute(&events, &AnalyticsConfig::default());

        assert_eq!(stats.binge_session_count, 7);
        assert_eq!(stats.top_binged_shows.len(), 5);
        assert_eq!(stats.top_binged_shows[4].show_id, "e");
    }

    #[test]
    fn test_custom_min_episodes() {
        let config = AnalyticsConfig {
            binge_min_episodes: 5,
            ..Default::default()
        };
        let events = run_of("a", 4, base(), 1);
        assert!(BingeSessionDetector::detect(&events, &config).is_empty());
    }
}
