//! Filtering of billing intervals
//!
//! A month view shows only the billing intervals touching the displayed
//! month, not the full history since the anchor date. The server
//! additionally reports only intervals that have already ended.
//!
//! # Examples
//!
//! ```
//! use rankstat::billing::billing_intervals;
//! use rankstat::filters::IntervalFilter;
//! use rankstat::types::DailyDate;
//!
//! let anchor = DailyDate::from_ymd(2025, 1, 1).unwrap();
//! let until = DailyDate::from_ymd(2025, 3, 31).unwrap();
//!
//! let filter = IntervalFilter::new()
//!     .with_since(DailyDate::from_ymd(2025, 3, 1).unwrap())
//!     .with_until(until);
//! let march = filter.apply(billing_intervals(anchor, until));
//! assert_eq!(march.len(), 3);
//! ```

use crate::billing::BillingInterval;
use crate::calendar::CalendarWindow;
use crate::types::DailyDate;

/// Filter configuration for billing intervals
///
/// All criteria are optional and combine with AND.
#[derive(Debug, Default, Clone)]
pub struct IntervalFilter {
    /// Keep intervals ending on or after this date
    pub since_date: Option<DailyDate>,
    /// Keep intervals starting on or before this date
    pub until_date: Option<DailyDate>,
    /// Keep intervals that ended on or before this date
    pub completed_by: Option<DailyDate>,
}

impl IntervalFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter keeping intervals that overlap the window
    pub fn for_window(window: &CalendarWindow) -> Self {
        Self::new()
            .with_since(window.first())
            .with_until(window.last())
    }

    pub fn with_since(mut self, date: DailyDate) -> Self {
        self.since_date = Some(date);
        self
    }

    pub fn with_until(mut self, date: DailyDate) -> Self {
        self.until_date = Some(date);
        self
    }

    /// Keep only intervals whose end is not after `today`
    pub fn completed_only(mut self, today: DailyDate) -> Self {
        self.completed_by = Some(today);
        self
    }

    /// Check if an interval passes the filter
    pub fn matches(&self, interval: &BillingInterval) -> bool {
        if let Some(since) = &self.since_date
            && interval.end_date < *since
        {
            return false;
        }

        if let Some(until) = &self.until_date
            && interval.start_date > *until
        {
            return false;
        }

        if let Some(today) = &self.completed_by
            && interval.end_date > *today
        {
            return false;
        }

        true
    }

    /// Keep the matching intervals, preserving order
    pub fn apply(&self, intervals: Vec<BillingInterval>) -> Vec<BillingInterval> {
        intervals.into_iter().filter(|i| self.matches(i)).collect()
    }
}
