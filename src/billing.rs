//! Rolling 14-day billing intervals
//!
//! Billing intervals are anchored to a project's creation date rather than to
//! calendar months. Starting at the anchor, every interval covers 14 days;
//! the last one is clipped to the end boundary and flagged as partial. The
//! cadence never drifts: the next start is always the previous start plus 14
//! days, regardless of clipping.
//!
//! # Examples
//!
//! ```
//! use rankstat::billing::billing_intervals;
//! use rankstat::types::DailyDate;
//!
//! let anchor = DailyDate::from_ymd(2025, 1, 1).unwrap();
//! let boundary = DailyDate::from_ymd(2025, 1, 31).unwrap();
//!
//! let intervals = billing_intervals(anchor, boundary);
//! assert_eq!(intervals.len(), 3);
//! assert_eq!(intervals[2].key(), "2025-01-29 - 2025-01-31");
//! assert!(intervals[2].is_partial());
//! ```

use crate::aggregation_types::interval_key;
use crate::calendar::CalendarWindow;
use crate::types::DailyDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Length of a full billing interval in days
pub const INTERVAL_DAYS: i64 = 14;

/// One billing interval, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInterval {
    pub start_date: DailyDate,
    pub end_date: DailyDate,
    /// Human-readable `dd.mm – dd.mm`
    pub label: String,
    /// Whether the end was clipped to the generation boundary
    pub partial: bool,
}

impl BillingInterval {
    /// Build an interval, deriving its label
    pub fn new(start_date: DailyDate, end_date: DailyDate, partial: bool) -> Self {
        Self {
            label: format!("{} – {}", start_date.short_label(), end_date.short_label()),
            start_date,
            end_date,
            partial,
        }
    }

    /// Machine-readable `YYYY-MM-DD - YYYY-MM-DD` lookup key
    pub fn key(&self) -> String {
        interval_key(&self.start_date, &self.end_date)
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Number of days covered, counting both ends
    pub fn span_days(&self) -> i64 {
        self.start_date.days_until(&self.end_date) + 1
    }

    pub fn contains(&self, date: &DailyDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }

    /// Whether `[start, end]` intersects `[first, last]`
    pub fn overlaps(&self, first: &DailyDate, last: &DailyDate) -> bool {
        self.end_date >= *first && self.start_date <= *last
    }

    /// Every date of the interval
    pub fn dates(&self) -> impl Iterator<Item = DailyDate> {
        self.start_date.iter_through(self.end_date)
    }

    /// Part of the interval visible inside `window`
    ///
    /// Returns `(max(start, window.first), min(end, window.last))`, or `None`
    /// when the interval lies entirely outside the window.
    pub fn display_range(&self, window: &CalendarWindow) -> Option<(DailyDate, DailyDate)> {
        if !self.overlaps(&window.first(), &window.last()) {
            return None;
        }
        Some((
            self.start_date.max(window.first()),
            self.end_date.min(window.last()),
        ))
    }

    /// Dates of the interval that the window displays
    pub fn visible_dates(&self, window: &CalendarWindow) -> Vec<DailyDate> {
        self.display_range(window)
            .map(|(start, end)| start.iter_through(end).collect())
            .unwrap_or_default()
    }
}

/// Generate billing intervals from `anchor` up to `boundary`, inclusive
///
/// Intervals start at `anchor + 14 * i` for as long as the start does not
/// pass `boundary`. An interval whose natural end would pass the boundary is
/// clipped to it and marked partial. An anchor after the boundary yields no
/// intervals.
pub fn billing_intervals(anchor: DailyDate, boundary: DailyDate) -> Vec<BillingInterval> {
    let mut intervals = Vec::new();
    let mut start = anchor;

    while start <= boundary {
        let natural_end = start.checked_add_days(INTERVAL_DAYS - 1);
        let (end, partial) = match natural_end {
            Some(end) if end <= boundary => (end, false),
            _ => (boundary, true),
        };
        intervals.push(BillingInterval::new(start, end, partial));

        match start.checked_add_days(INTERVAL_DAYS) {
            Some(next) => start = next,
            None => break,
        }
    }

    debug!(
        "Generated {} billing intervals from {} to {}",
        intervals.len(),
        anchor,
        boundary
    );
    intervals
}

/// Billing intervals relevant to a calendar window
///
/// Generates from `anchor` through the window's last day and keeps the
/// intervals overlapping the window.
pub fn intervals_for_window(anchor: DailyDate, window: &CalendarWindow) -> Vec<BillingInterval> {
    crate::filters::IntervalFilter::for_window(window).apply(billing_intervals(anchor, window.last()))
}
