//! Watch history adapter
//!
//! Parses profile snapshots and derives each analytic's input rows from raw
//! watch events and the watchlist.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, Timelike, Utc, Weekday};

use crate::error::AnalyticsError;
use crate::types::{
    BacklogEntry, MonthlyCount, ProfileSnapshot, ShowProgress, VelocitySample, WatchEvent,
    WatchlistEntry,
};

/// Parse a profile snapshot JSON string
pub fn parse_snapshot(json: &str) -> Result<ProfileSnapshot, AnalyticsError> {
    serde_json::from_str(json)
        .map_err(|e| AnalyticsError::ParseError(format!("Failed to parse profile snapshot: {}", e)))
}

/// Episodes with a show, sorted by `(show_id, timestamp)`
pub fn binge_input(events: &[WatchEvent]) -> Vec<WatchEvent> {
    let mut episodes: Vec<WatchEvent> = events
        .iter()
        .filter(|e| e.is_episode() && e.show_id.is_some())
        .cloned()
        .collect();
    episodes.sort_by(|a, b| {
        a.show_id
            .cmp(&b.show_id)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    episodes
}

/// Distinct UTC dates with at least one episode completion, ascending
pub fn active_dates(events: &[WatchEvent]) -> Vec<NaiveDate> {
    events
        .iter()
        .filter(|e| e.is_episode())
        .map(|e| e.timestamp.date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Episode completions in `[now - lookback_days, now]` grouped by slot
///
/// Rows are ordered by date descending, then hour ascending. A lookback
/// reaching past the earliest representable instant covers all history.
pub fn velocity_samples(
    events: &[WatchEvent],
    now: DateTime<Utc>,
    lookback_days: u32,
) -> Vec<VelocitySample> {
    let window_start = window_start(now, lookback_days);

    let mut slots: BTreeMap<(NaiveDate, u32), (Weekday, u32, HashSet<&str>)> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.is_episode() && e.timestamp >= window_start && e.timestamp <= now)
    {
        let date = event.timestamp.date_naive();
        let slot = slots
            .entry((date, event.timestamp.hour()))
            .or_insert_with(|| (date.weekday(), 0, HashSet::new()));
        slot.1 += 1;
        if let Some(show_id) = event.show_id.as_deref() {
            slot.2.insert(show_id);
        }
    }

    let mut samples: Vec<VelocitySample> = slots
        .into_iter()
        .map(|((date, hour), (weekday, episode_count, shows))| VelocitySample {
            date,
            hour,
            weekday,
            episode_count,
            show_count: shows.len() as u32,
        })
        .collect();
    samples.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.hour.cmp(&b.hour)));
    samples
}

/// Earliest instant of a `days`-long window ending at `end`
pub(crate) fn window_start(end: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|span| end.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Completions (episodes and movies) per calendar month, ordered by month
pub fn monthly_counts(events: &[WatchEvent]) -> Vec<MonthlyCount> {
    let mut per_month: BTreeMap<u32, u32> = BTreeMap::new();
    for event in events {
        *per_month.entry(event.timestamp.month()).or_insert(0) += 1;
    }

    per_month
        .into_iter()
        .map(|(month, count)| MonthlyCount {
            month,
            month_name: month_name(month).to_string(),
            count,
        })
        .collect()
}

/// English month name for a month number (1-12)
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("Unknown", |m| m.name())
}

/// First and last episode completion per show
fn watch_bounds(events: &[WatchEvent]) -> HashMap<&str, (DateTime<Utc>, DateTime<Utc>)> {
    let mut bounds: HashMap<&str, (DateTime<Utc>, DateTime<Utc>)> = HashMap::new();
    for event in events.iter().filter(|e| e.is_episode()) {
        let Some(show_id) = event.show_id.as_deref() else {
            continue;
        };
        bounds
            .entry(show_id)
            .and_modify(|(first, last)| {
                *first = (*first).min(event.timestamp);
                *last = (*last).max(event.timestamp);
            })
            .or_insert((event.timestamp, event.timestamp));
    }
    bounds
}

/// One backlog entry per watchlist show, in watchlist order
pub fn backlog_entries(watchlist: &[WatchlistEntry], events: &[WatchEvent]) -> Vec<BacklogEntry> {
    let bounds = watch_bounds(events);
    watchlist
        .iter()
        .map(|show| {
            let watched = bounds.get(show.show_id.as_str());
            BacklogEntry {
                show_id: show.show_id.clone(),
                show_title: show.show_title.clone(),
                created_at: show.created_at,
                first_watched_at: watched.map(|(first, _)| *first),
                last_watched_at: watched.map(|(_, last)| *last),
            }
        })
        .collect()
}

/// One progress record per watchlist show, in watchlist order
pub fn show_progress(watchlist: &[WatchlistEntry], events: &[WatchEvent]) -> Vec<ShowProgress> {
    let bounds = watch_bounds(events);

    let mut watched_episodes: HashMap<&str, HashSet<&str>> = HashMap::new();
    for event in events.iter().filter(|e| e.is_episode()) {
        if let Some(show_id) = event.show_id.as_deref() {
            watched_episodes
                .entry(show_id)
                .or_default()
                .insert(event.content_id.as_str());
        }
    }

    watchlist
        .iter()
        .map(|show| {
            let watched_episode_count = watched_episodes
                .get(show.show_id.as_str())
                .map_or(0, |episodes| episodes.len() as u32);
            ShowProgress {
                show_id: show.show_id.clone(),
                show_title: show.show_title.clone(),
                status: show.status,
                last_watched_at: bounds.get(show.show_id.as_str()).map(|(_, last)| *last),
                watched_episode_count,
                unwatched_aired_episodes: show
                    .aired_episode_count
                    .saturating_sub(watched_episode_count),
            }
        })
        .collect()
}
