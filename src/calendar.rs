//! Calendar windows for week and month views
//!
//! A [`CalendarWindow`] is the ordered run of dates a report displays. Week
//! windows are the seven days Monday through Sunday of an ISO week; month
//! windows cover every day of a calendar month. Both are relative to a
//! caller-supplied "today" shifted by an integer offset.
//!
//! # Examples
//!
//! ```
//! use rankstat::calendar::CalendarWindow;
//! use rankstat::types::DailyDate;
//!
//! // 2025-01-15 is a Wednesday
//! let today = DailyDate::from_ymd(2025, 1, 15).unwrap();
//!
//! let week = CalendarWindow::week(0, today);
//! assert_eq!(week.first().key(), "2025-01-13");
//! assert_eq!(week.last().key(), "2025-01-19");
//!
//! let previous_month = CalendarWindow::month(-1, today);
//! assert_eq!(previous_month.first().key(), "2024-12-01");
//! assert_eq!(previous_month.len(), 31);
//! ```

use crate::error::{RankstatError, Result};
use crate::types::{DailyDate, PeriodKind, PeriodSelector};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Ordered, gap-free, non-empty run of calendar dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarWindow {
    kind: PeriodKind,
    dates: Vec<DailyDate>,
}

impl CalendarWindow {
    /// Window for a period selector relative to `today`
    ///
    /// Returns `None` for [`PeriodKind::Custom`], which has no generation
    /// rule; use [`CalendarWindow::custom`] with an explicit range instead.
    pub fn for_selector(selector: PeriodSelector, today: DailyDate) -> Option<Self> {
        match selector.kind {
            PeriodKind::Week => Some(Self::week(selector.offset, today)),
            PeriodKind::Month => Some(Self::month(selector.offset, today)),
            PeriodKind::Custom => None,
        }
    }

    /// The ISO week containing `today` shifted by `offset` weeks
    ///
    /// Sunday counts as day 7 of its week, so the window always starts on
    /// the Monday on or before the shifted date.
    pub fn week(offset: i32, today: DailyDate) -> Self {
        let monday = today.inner().num_days_from_ce() as i64 - (today.weekday_number() as i64 - 1);
        let (min_monday, max_monday) = monday_bounds();
        let start = (monday + offset as i64 * 7).clamp(min_monday, max_monday);
        let first = NaiveDate::from_num_days_from_ce_opt(start as i32)
            .map(DailyDate::new)
            .expect("clamped monday is always within the calendar");

        Self {
            kind: PeriodKind::Week,
            dates: (0..7).map(|i| first.add_days(i)).collect(),
        }
    }

    /// The calendar month of `today` shifted by `offset` months
    ///
    /// Month arithmetic wraps across year boundaries in both directions.
    pub fn month(offset: i32, today: DailyDate) -> Self {
        let current = today.inner().year() as i64 * 12 + today.inner().month0() as i64;
        let min = NaiveDate::MIN.year() as i64 * 12;
        let max = NaiveDate::MAX.year() as i64 * 12 + 11;
        let target = (current + offset as i64).clamp(min, max);

        let year = target.div_euclid(12) as i32;
        let month = target.rem_euclid(12) as u32 + 1;
        let last_day = (28..=31)
            .rev()
            .find(|day| NaiveDate::from_ymd_opt(year, month, *day).is_some())
            .unwrap_or(28);

        Self {
            kind: PeriodKind::Month,
            dates: (1..=last_day)
                .filter_map(|day| DailyDate::from_ymd(year, month, day))
                .collect(),
        }
    }

    /// Window over an explicit inclusive range
    pub fn custom(start: DailyDate, end: DailyDate) -> Result<Self> {
        if start > end {
            return Err(RankstatError::InvalidDateRange {
                start: *start.inner(),
                end: *end.inner(),
            });
        }
        Ok(Self {
            kind: PeriodKind::Custom,
            dates: start.iter_through(end).collect(),
        })
    }

    /// Period kind this window was built for
    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// Dates in ascending order
    pub fn dates(&self) -> &[DailyDate] {
        &self.dates
    }

    pub fn first(&self) -> DailyDate {
        self.dates[0]
    }

    pub fn last(&self) -> DailyDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Never true for a constructed window
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, date: &DailyDate) -> bool {
        self.first() <= *date && *date <= self.last()
    }

    /// Canonical `YYYY-MM-DD` keys of every date
    pub fn keys(&self) -> Vec<String> {
        self.dates.iter().map(DailyDate::key).collect()
    }
}

/// First and last Monday (as days from CE) whose full week is representable
fn monday_bounds() -> (i64, i64) {
    let min = DailyDate::new(NaiveDate::MIN);
    let max = DailyDate::new(NaiveDate::MAX);

    let min_monday = min.inner().num_days_from_ce() as i64 + (8 - min.weekday_number() as i64) % 7;
    let last_start = max.inner().num_days_from_ce() as i64 - 6;
    let last_start_weekday = max.add_days(-6).weekday_number() as i64;
    let max_monday = last_start - (last_start_weekday - 1);

    (min_monday, max_monday)
}
