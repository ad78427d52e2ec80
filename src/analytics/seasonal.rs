//! Seasonal distribution
//!
//! Buckets completion counts by calendar month and meteorological season.

use crate::analytics::counts::OrderedCounts;
use crate::types::{MonthlyCount, SeasonBreakdown, SeasonalStats, NOT_AVAILABLE};

/// Meteorological season of a calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Season for a month number (1-12); out-of-range months have none
    pub fn of_month(month: u32) -> Option<Self> {
        match month {
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            12 | 1 | 2 => Some(Season::Winter),
            _ => None,
        }
    }
}

/// Aggregator for seasonal viewing
pub struct SeasonalAggregator;

impl SeasonalAggregator {
    /// Compute seasonal stats from per-month rows
    pub fn compute(rows: &[MonthlyCount]) -> SeasonalStats {
        if rows.is_empty() {
            return SeasonalStats::default();
        }

        let monthly_breakdown: OrderedCounts<String> = rows
            .iter()
            .map(|row| (row.month_name.clone(), row.count))
            .collect();

        let seasonal_breakdown = rows.iter().fold(SeasonBreakdown::default(), |mut acc, row| {
            match Season::of_month(row.month) {
                Some(Season::Spring) => acc.spring += row.count,
                Some(Season::Summer) => acc.summer += row.count,
                Some(Season::Fall) => acc.fall += row.count,
                Some(Season::Winter) => acc.winter += row.count,
                None => {}
            }
            acc
        });

        // Scan the rows themselves so a repeated month name is judged per row
        let mut peak: Option<&MonthlyCount> = None;
        let mut slowest: Option<&MonthlyCount> = None;
        for row in rows {
            if peak.map_or(true, |p| row.count > p.count) {
                peak = Some(row);
            }
            if slowest.map_or(true, |s| row.count < s.count) {
                slowest = Some(row);
            }
        }

        SeasonalStats {
            monthly_breakdown,
            seasonal_breakdown,
            peak_viewing_month: peak.map_or(NOT_AVAILABLE, |r| r.month_name.as_str()).to_string(),
            slowest_viewing_month: slowest
                .map_or(NOT_AVAILABLE, |r| r.month_name.as_str())
                .to_string(),
        }
    }
}
