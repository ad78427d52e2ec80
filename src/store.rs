//! Watch event store interface
//!
//! The analytics never own persistence. They pull a snapshot through
//! [`WatchEventStore`]; whatever backs it (a database, a cache, a fixture)
//! lives outside this crate. [`InMemoryWatchStore`] serves snapshots already
//! held in memory.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::adapter::{parse_snapshot, window_start};
use crate::error::AnalyticsError;
use crate::types::{ContentType, ProfileSnapshot, WatchEvent, WatchlistEntry};

/// Filters applied when fetching watch events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchOptions {
    /// Only events within this many days before `reference_time`
    pub window_days: Option<u32>,
    /// Only events of this content type
    pub content_type: Option<ContentType>,
    /// End of the window; no window applies when unset
    pub reference_time: Option<DateTime<Utc>>,
}

impl FetchOptions {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn episodes() -> Self {
        Self {
            content_type: Some(ContentType::Episode),
            ..Self::default()
        }
    }

    pub fn window(mut self, days: u32, reference_time: DateTime<Utc>) -> Self {
        self.window_days = Some(days);
        self.reference_time = Some(reference_time);
        self
    }

    /// Whether an event passes these filters
    pub fn matches(&self, event: &WatchEvent) -> bool {
        if let Some(content_type) = self.content_type {
            if event.content_type != content_type {
                return false;
            }
        }
        if let (Some(days), Some(end)) = (self.window_days, self.reference_time) {
            if event.timestamp < window_start(end, days) || event.timestamp > end {
                return false;
            }
        }
        true
    }
}

/// Source of watch history snapshots
///
/// Implementations return events ordered by timestamp ascending and an empty
/// list, never an error, when a profile has no matching data. Store failures
/// surface as [`AnalyticsError::DataAccess`] and are passed through unchanged.
pub trait WatchEventStore {
    fn fetch_watch_events(
        &self,
        profile_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<WatchEvent>, AnalyticsError>;

    fn fetch_watchlist(&self, profile_id: &str) -> Result<Vec<WatchlistEntry>, AnalyticsError>;
}

impl<S: WatchEventStore + ?Sized> WatchEventStore for &S {
    fn fetch_watch_events(
        &self,
        profile_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<WatchEvent>, AnalyticsError> {
        (**self).fetch_watch_events(profile_id, options)
    }

    fn fetch_watchlist(&self, profile_id: &str) -> Result<Vec<WatchlistEntry>, AnalyticsError> {
        (**self).fetch_watchlist(profile_id)
    }
}

/// Store backed by in-memory profile snapshots
#[derive(Debug, Clone, Default)]
pub struct InMemoryWatchStore {
    profiles: HashMap<String, ProfileSnapshot>,
    strict: bool,
}

impl InMemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report unknown profiles as [`AnalyticsError::ProfileNotFound`]
    /// instead of returning empty data
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Add or replace a profile snapshot
    pub fn insert(&mut self, mut snapshot: ProfileSnapshot) {
        snapshot.events.sort_by_key(|e| e.timestamp);
        self.profiles.insert(snapshot.profile_id.clone(), snapshot);
    }

    /// Build a store holding one snapshot parsed from JSON
    pub fn from_snapshot_json(json: &str) -> Result<Self, AnalyticsError> {
        let mut store = Self::new();
        store.insert(parse_snapshot(json)?);
        Ok(store)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    fn profile(&self, profile_id: &str) -> Result<Option<&ProfileSnapshot>, AnalyticsError> {
        match self.profiles.get(profile_id) {
            Some(snapshot) => Ok(Some(snapshot)),
            None if self.strict => Err(AnalyticsError::ProfileNotFound(profile_id.to_string())),
            None => Ok(None),
        }
    }
}

impl WatchEventStore for InMemoryWatchStore {
    fn fetch_watch_events(
        &self,
        profile_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<WatchEvent>, AnalyticsError> {
        Ok(self
            .profile(profile_id)?
            .map(|snapshot| {
                snapshot
                    .events
                    .iter()
                    .filter(|e| options.matches(e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_watchlist(&self, profile_id: &str) -> Result<Vec<WatchlistEntry>, AnalyticsError> {
        Ok(self
            .profile(profile_id)?
            .map(|snapshot| snapshot.watchlist.clone())
            .unwrap_or_default())
    }
}
