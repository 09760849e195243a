//! Full report assembly
//!
//! [`ReportBuilder`] runs the whole pipeline for one period: it resolves the
//! calendar window, picks the billing intervals shown next to it, merges both
//! into the column sequence, indexes the records and computes every
//! statistic the report displays.
//!
//! # Examples
//!
//! ```
//! use rankstat::report::ReportBuilder;
//! use rankstat::types::{DailyDate, PeriodSelector};
//!
//! let anchor = DailyDate::from_ymd(2025, 1, 1).unwrap();
//! let today = DailyDate::from_ymd(2025, 2, 10).unwrap();
//!
//! let report = ReportBuilder::new(anchor, today)
//!     .with_period(PeriodSelector::month(0))
//!     .build(Vec::new(), &[], Vec::new())
//!     .unwrap();
//!
//! assert_eq!(report.window.len(), 28);
//! assert_eq!(report.intervals.len(), 3);
//! assert_eq!(report.columns.len(), 31);
//! ```

use crate::aggregation::{
    CostAggregator, IntervalTotal, KeywordReport, ServerAggregates, band_summary,
    interval_totals, keywords_by_position,
};
use crate::aggregation_types::{BandSummary, DailyCost, KeywordIntervals, Totals};
use crate::billing::{BillingInterval, billing_intervals};
use crate::calendar::CalendarWindow;
use crate::error::{RankstatError, Result};
use crate::filters::IntervalFilter;
use crate::merge::{MergedEntry, merge_dates_with_intervals};
use crate::position_index::PositionIndex;
use crate::types::{CostMode, DailyDate, Keyword, PeriodKind, PeriodSelector, PositionRecord};
use serde::Serialize;
use tracing::{debug, info};

/// A billing interval as shown next to a calendar window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportInterval {
    #[serde(flatten)]
    pub interval: BillingInterval,
    /// First day of the interval inside the window
    pub display_start: DailyDate,
    /// Last day of the interval inside the window
    pub display_end: DailyDate,
}

impl ReportInterval {
    /// Pair `interval` with its visible part of `window`
    pub fn within(interval: &BillingInterval, window: &CalendarWindow) -> Option<Self> {
        let (display_start, display_end) = interval.display_range(window)?;
        Some(Self {
            interval: interval.clone(),
            display_start,
            display_end,
        })
    }
}

/// Everything needed to render one period report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub period: PeriodSelector,
    pub anchor: DailyDate,
    pub today: DailyDate,
    pub window: CalendarWindow,
    pub intervals: Vec<ReportInterval>,
    /// Dates interleaved with interval summary columns
    pub columns: Vec<MergedEntry>,
    /// Ordered by position on the summary date, unranked keywords last
    pub keywords: Vec<KeywordReport>,
    pub daily: Vec<DailyCost>,
    pub interval_totals: Vec<IntervalTotal>,
    /// Local window statistics summed over all keywords
    pub totals: Totals,
    /// Most recent displayed day up to today
    pub summary_date: DailyDate,
    /// Band counts on `summary_date`
    pub summary: BandSummary,
    #[serde(skip)]
    pub index: PositionIndex,
}

/// Builder for [`Report`]
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    anchor: DailyDate,
    today: DailyDate,
    period: PeriodSelector,
    custom_range: Option<(DailyDate, DailyDate)>,
    completed_only: bool,
    cost_mode: CostMode,
}

impl ReportBuilder {
    /// Report for the current month, anchored at `anchor`
    pub fn new(anchor: DailyDate, today: DailyDate) -> Self {
        Self {
            anchor,
            today,
            period: PeriodSelector::default(),
            custom_range: None,
            completed_only: false,
            cost_mode: CostMode::default(),
        }
    }

    pub fn with_period(mut self, period: PeriodSelector) -> Self {
        self.period = period;
        self
    }

    /// Use an explicit inclusive range; switches the period to custom
    pub fn with_custom_range(mut self, start: DailyDate, end: DailyDate) -> Self {
        self.period = PeriodSelector::new(PeriodKind::Custom, 0);
        self.custom_range = Some((start, end));
        self
    }

    /// Show only intervals that have already ended
    pub fn completed_only(mut self, completed_only: bool) -> Self {
        self.completed_only = completed_only;
        self
    }

    pub fn with_cost_mode(mut self, cost_mode: CostMode) -> Self {
        self.cost_mode = cost_mode;
        self
    }

    /// Calendar window of the configured period
    pub fn window(&self) -> Result<CalendarWindow> {
        if let Some(window) = CalendarWindow::for_selector(self.period, self.today) {
            return Ok(window);
        }
        match self.custom_range {
            Some((start, end)) => CalendarWindow::custom(start, end),
            None => Err(RankstatError::InvalidArgument(
                "a custom period needs an explicit start and end date".to_string(),
            )),
        }
    }

    /// Billing intervals displayed alongside `window`
    ///
    /// Week views show no intervals. Month and custom views show every
    /// interval overlapping the window.
    pub fn intervals(&self, window: &CalendarWindow) -> Vec<BillingInterval> {
        if window.kind() == PeriodKind::Week {
            return Vec::new();
        }

        let mut filter = IntervalFilter::for_window(window);
        if self.completed_only {
            filter = filter.completed_only(self.today);
        }
        filter.apply(billing_intervals(self.anchor, window.last()))
    }

    /// Run the pipeline over one input set
    pub fn build(
        &self,
        records: Vec<PositionRecord>,
        keywords: &[Keyword],
        server: Vec<KeywordIntervals>,
    ) -> Result<Report> {
        let window = self.window()?;
        let intervals = self.intervals(&window);
        let columns = merge_dates_with_intervals(window.dates(), &intervals);

        let mut index = PositionIndex::from_records(records);
        let derived = index.fill_trends();
        debug!("Derived trends for {} records", derived);

        let server = ServerAggregates::new(server);
        info!(
            "Building {} report over {} dates: {} records, {} keywords, {} server aggregates",
            window.kind(),
            window.len(),
            index.len(),
            keywords.len(),
            server.len()
        );

        let summary_date = self.summary_date(&window);
        let ordered: Vec<Keyword> = keywords_by_position(&index, keywords, &summary_date)
            .into_iter()
            .cloned()
            .collect();

        let aggregator = CostAggregator::with_mode(self.cost_mode);
        let keyword_reports =
            aggregator.aggregate_keywords(&index, &ordered, &window, &intervals, &server);
        let daily = aggregator.daily_totals(&index, keywords, window.dates());
        let totals = Totals::from_stats(keyword_reports.iter().map(|k| &k.window));
        let summary = band_summary(&index, keywords, &summary_date);
        let displayed = intervals
            .iter()
            .filter_map(|interval| ReportInterval::within(interval, &window))
            .collect();

        Ok(Report {
            period: self.period,
            anchor: self.anchor,
            today: self.today,
            interval_totals: interval_totals(&intervals, &keyword_reports),
            keywords: keyword_reports,
            window,
            intervals: displayed,
            columns,
            daily,
            totals,
            summary_date,
            summary,
            index,
        })
    }

    /// Latest displayed date not after today, or the window's first date
    fn summary_date(&self, window: &CalendarWindow) -> DailyDate {
        window
            .dates()
            .iter()
            .rev()
            .find(|d| **d <= self.today)
            .copied()
            .unwrap_or_else(|| window.first())
    }
}
