//! Interleaving of calendar dates with interval summaries
//!
//! Reports show one column (or tab) per date, and after the last date of
//! each billing interval a summary column for that interval. This module
//! builds that single ordered sequence.

use crate::billing::BillingInterval;
use crate::types::DailyDate;
use serde::Serialize;

/// One entry of the merged sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MergedEntry {
    Date {
        value: DailyDate,
    },
    Interval {
        /// Human-readable label of the interval
        value: String,
        interval: BillingInterval,
    },
}

impl MergedEntry {
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date { .. })
    }

    pub fn as_interval(&self) -> Option<&BillingInterval> {
        match self {
            Self::Interval { interval, .. } => Some(interval),
            Self::Date { .. } => None,
        }
    }
}

/// Merge `dates` with `intervals`
///
/// Each interval is placed right after the last date it covers; intervals
/// sharing an insertion point keep their relative order, and intervals that
/// cover none of the dates go after all dates. Every date and every interval
/// appears exactly once.
///
/// ```
/// use rankstat::billing::BillingInterval;
/// use rankstat::merge::{merge_dates_with_intervals, MergedEntry};
/// use rankstat::types::DailyDate;
///
/// let d = |day| DailyDate::from_ymd(2025, 1, day).unwrap();
/// let dates = [d(13), d(14), d(15)];
/// let intervals = [BillingInterval::new(d(1), d(14), false)];
///
/// let merged = merge_dates_with_intervals(&dates, &intervals);
/// assert_eq!(merged.len(), 4);
/// assert!(matches!(merged[2], MergedEntry::Interval { .. }));
/// ```
pub fn merge_dates_with_intervals(
    dates: &[DailyDate],
    intervals: &[BillingInterval],
) -> Vec<MergedEntry> {
    // Intervals to emit after each date index; unmatched ones go to the tail
    let mut after_date: Vec<Vec<&BillingInterval>> = vec![Vec::new(); dates.len()];
    let mut unmatched = Vec::new();

    for interval in intervals {
        match dates.iter().rposition(|d| interval.contains(d)) {
            Some(pos) => after_date[pos].push(interval),
            None => unmatched.push(interval),
        }
    }

    let mut merged = Vec::with_capacity(dates.len() + intervals.len());
    for (date, following) in dates.iter().zip(after_date) {
        merged.push(MergedEntry::Date { value: *date });
        merged.extend(following.into_iter().map(interval_entry));
    }
    merged.extend(unmatched.into_iter().map(interval_entry));
    merged
}

fn interval_entry(interval: &BillingInterval) -> MergedEntry {
    MergedEntry::Interval {
        value: interval.label.clone(),
        interval: interval.clone(),
    }
}
