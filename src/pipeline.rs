//! Insights pipeline orchestration
//!
//! This module provides the public API for watch analytics. It orchestrates
//! store fetch → adapter → analytic → encoder for one profile at a time.
//!
//! Every call works on a freshly fetched snapshot and keeps no state between
//! calls, so one processor can serve many profiles concurrently.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::adapter::{
    active_dates, backlog_entries, binge_input, monthly_counts, parse_snapshot, show_progress,
    velocity_samples,
};
use crate::analytics::{
    AbandonmentRiskScorer, BingeSessionDetector, SeasonalAggregator, StreakCalculator,
    TimeToWatchAnalyzer, VelocityTrendAnalyzer,
};
use crate::clock::{Clock, SystemClock};
use crate::config::AnalyticsConfig;
use crate::encoder::InsightsEncoder;
use crate::error::AnalyticsError;
use crate::store::{FetchOptions, WatchEventStore};
use crate::types::{
    AbandonmentStats, BingeStats, SeasonalStats, StreakStats, TimeToWatchStats, VelocityStats,
    ViewingInsights, WatchEvent, WatchlistEntry,
};

/// Compute insights for a profile snapshot JSON (stateless, one-shot).
///
/// # Arguments
/// * `snapshot_json` - Profile snapshot JSON (`profile_id`, `events`, `watchlist`)
/// * `clock` - Source of "now" for streaks, backlog aging and idle time
///
/// # Returns
/// Insights JSON payload string
///
/// # Example
/// ```ignore
/// let json = snapshot_to_insights(snapshot_json, &SystemClock)?;
/// ```
pub fn snapshot_to_insights(
    snapshot_json: &str,
    clock: &impl Clock,
) -> Result<String, AnalyticsError> {
    // Stage 1: Parse snapshot JSON
    let snapshot = parse_snapshot(snapshot_json)?;

    // Stage 2: Derive inputs and run every analytic
    let now = clock.now();
    let insights = compute_insights(
        &snapshot.events,
        &snapshot.watchlist,
        now,
        &AnalyticsConfig::default(),
    );

    // Stage 3: Encode to JSON
    InsightsEncoder::new().encode_to_json(&snapshot.profile_id, insights, now)
}

/// Run all six analytics over one in-memory snapshot
pub fn compute_insights(
    events: &[WatchEvent],
    watchlist: &[WatchlistEntry],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> ViewingInsights {
    ViewingInsights {
        binge: BingeSessionDetector::compute(&binge_input(events), config),
        streaks: StreakCalculator::compute(&active_dates(events), now.date_naive(), config),
        velocity: VelocityTrendAnalyzer::compute(
            &velocity_samples(events, now, config.velocity_lookback_days),
            config,
        ),
        seasonal: SeasonalAggregator::compute(&monthly_counts(events)),
        time_to_watch: TimeToWatchAnalyzer::compute(
            &backlog_entries(watchlist, events),
            now,
            config,
        ),
        abandonment: AbandonmentRiskScorer::compute(
            &show_progress(watchlist, events),
            now,
            config,
        ),
    }
}

/// Processor that fetches snapshots from a store and computes analytics.
///
/// The clock defaults to the system clock; tests pin it with
/// [`crate::clock::FixedClock`].
pub struct InsightsProcessor<S, C = SystemClock> {
    store: S,
    clock: C,
    config: AnalyticsConfig,
    encoder: InsightsEncoder,
}

impl<S: WatchEventStore> InsightsProcessor<S, SystemClock> {
    /// Create a processor with default thresholds and the system clock
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            config: AnalyticsConfig::default(),
            encoder: InsightsEncoder::new(),
        }
    }
}

impl<S: WatchEventStore, C: Clock> InsightsProcessor<S, C> {
    /// Replace the clock
    pub fn with_clock<C2: Clock>(self, clock: C2) -> InsightsProcessor<S, C2> {
        InsightsProcessor {
            store: self.store,
            clock,
            config: self.config,
            encoder: self.encoder,
        }
    }

    /// Replace the thresholds after validating them
    pub fn with_config(mut self, config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    fn events(
        &self,
        profile_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<WatchEvent>, AnalyticsError> {
        self.store
            .fetch_watch_events(profile_id, options)
            .inspect_err(|e| warn!(profile_id, error = %e, "Failed to fetch watch events"))
    }

    fn watchlist(&self, profile_id: &str) -> Result<Vec<WatchlistEntry>, AnalyticsError> {
        self.store
            .fetch_watchlist(profile_id)
            .inspect_err(|e| warn!(profile_id, error = %e, "Failed to fetch watchlist"))
    }

    pub fn compute_binge_stats(&self, profile_id: &str) -> Result<BingeStats, AnalyticsError> {
        let events = self.events(profile_id, &FetchOptions::episodes())?;
        let input = binge_input(&events);
        debug!(profile_id, episodes = input.len(), "Computing binge stats");
        Ok(BingeSessionDetector::compute(&input, &self.config))
    }

    pub fn compute_streak_stats(&self, profile_id: &str) -> Result<StreakStats, AnalyticsError> {
        let events = self.events(profile_id, &FetchOptions::episodes())?;
        let dates = active_dates(&events);
        debug!(profile_id, active_days = dates.len(), "Computing streak stats");
        Ok(StreakCalculator::compute(&dates, self.clock.today(), &self.config))
    }

    pub fn compute_velocity_stats(
        &self,
        profile_id: &str,
    ) -> Result<VelocityStats, AnalyticsError> {
        let now = self.clock.now();
        let lookback = self.config.velocity_lookback_days;
        let events = self.events(profile_id, &FetchOptions::episodes().window(lookback, now))?;
        let samples = velocity_samples(&events, now, lookback);
        debug!(profile_id, rows = samples.len(), lookback, "Computing velocity stats");
        Ok(VelocityTrendAnalyzer::compute(&samples, &self.config))
    }

    pub fn compute_seasonal_stats(
        &self,
        profile_id: &str,
    ) -> Result<SeasonalStats, AnalyticsError> {
        let events = self.events(profile_id, &FetchOptions::all())?;
        let rows = monthly_counts(&events);
        debug!(profile_id, months = rows.len(), "Computing seasonal stats");
        Ok(SeasonalAggregator::compute(&rows))
    }

    pub fn compute_time_to_watch_stats(
        &self,
        profile_id: &str,
    ) -> Result<TimeToWatchStats, AnalyticsError> {
        let watchlist = self.watchlist(profile_id)?;
        let events = self.events(profile_id, &FetchOptions::episodes())?;
        let entries = backlog_entries(&watchlist, &events);
        debug!(profile_id, shows = entries.len(), "Computing time-to-watch stats");
        Ok(TimeToWatchAnalyzer::compute(&entries, self.clock.now(), &self.config))
    }

    pub fn compute_abandonment_stats(
        &self,
        profile_id: &str,
    ) -> Result<AbandonmentStats, AnalyticsError> {
        let watchlist = self.watchlist(profile_id)?;
        let events = self.events(profile_id, &FetchOptions::episodes())?;
        let progress = show_progress(&watchlist, &events);
        debug!(profile_id, shows = progress.len(), "Computing abandonment stats");
        Ok(AbandonmentRiskScorer::compute(&progress, self.clock.now(), &self.config))
    }

    /// Compute all six analytics from a single fetch
    pub fn compute_all(&self, profile_id: &str) -> Result<ViewingInsights, AnalyticsError> {
        let events = self.events(profile_id, &FetchOptions::all())?;
        let watchlist = self.watchlist(profile_id)?;
        debug!(
            profile_id,
            events = events.len(),
            shows = watchlist.len(),
            "Computing viewing insights"
        );
        Ok(compute_insights(&events, &watchlist, self.clock.now(), &self.config))
    }

    /// Compute all analytics and return the encoded JSON payload
    pub fn process(&self, profile_id: &str) -> Result<String, AnalyticsError> {
        let insights = self.compute_all(profile_id)?;
        self.encoder.encode_to_json(profile_id, insights, self.clock.now())
    }
}
