//! Aggregation module for summarizing position data
//!
//! This module turns indexed position records into the numbers a report
//! shows: per-day cost totals, per-keyword band statistics for every billing
//! interval and for the whole window, and the per-interval footer totals.
//!
//! Interval statistics are reconciled against aggregates computed by the
//! server. A server aggregate for a `(keyword, interval)` pair is
//! authoritative and used as is, even when every field is zero; only its
//! absence makes the locally computed statistics visible. The two are never
//! mixed field by field.
//!
//! # Examples
//!
//! ```
//! use rankstat::aggregation::CostAggregator;
//! use rankstat::billing::BillingInterval;
//! use rankstat::position_index::PositionIndex;
//! use rankstat::types::{CostMode, DailyDate, Keyword, KeywordId, KeywordPricing, PositionRecord};
//!
//! let day1 = DailyDate::from_ymd(2025, 1, 1).unwrap();
//! let day2 = day1.succ();
//! let record = |date, position, cost| PositionRecord {
//!     keyword_id: KeywordId::new("k"),
//!     checked_at: date,
//!     position: Some(position),
//!     cost: Some(cost),
//!     trend: None,
//! };
//! let index = PositionIndex::from_records(vec![record(day1, 2, 100.0), record(day2, 7, 30.0)]);
//! let keyword = Keyword::new("k", "bricks", KeywordPricing::default());
//!
//! let aggregator = CostAggregator::with_mode(CostMode::Auto);
//! let interval = BillingInterval::new(day1, day2, false);
//! let stats = aggregator.interval_stats(&index, &keyword, &interval);
//!
//! assert_eq!((stats.days_top3, stats.cost_top3), (1, 100.0));
//! assert_eq!((stats.days_top10, stats.cost_top10), (1, 30.0));
//! assert_eq!(stats.total_cost, 130.0);
//! ```

use crate::aggregation_types::{
    AggregatedStats, BandSummary, DailyCost, KeywordIntervals, ReconciledStats,
    ServerIntervalAggregate, StatsSource,
};
use crate::billing::BillingInterval;
use crate::calendar::CalendarWindow;
use crate::cost_calculator::CostCalculator;
use crate::position_index::PositionIndex;
use crate::types::{CostMode, DailyDate, Keyword, KeywordId, PositionBand};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Server aggregates indexed by keyword and interval key
#[derive(Debug, Clone, Default)]
pub struct ServerAggregates {
    by_keyword: HashMap<KeywordId, HashMap<String, ServerIntervalAggregate>>,
}

impl ServerAggregates {
    /// Index the per-keyword aggregate lists the server returns
    pub fn new(keywords: Vec<KeywordIntervals>) -> Self {
        keywords.into_iter().collect()
    }

    /// Aggregate for `keyword` over the interval with `key`
    pub fn get(&self, keyword: &KeywordId, key: &str) -> Option<&ServerIntervalAggregate> {
        self.by_keyword.get(keyword)?.get(key)
    }

    /// Number of `(keyword, interval)` aggregates
    pub fn len(&self) -> usize {
        self.by_keyword.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_keyword.values().all(HashMap::is_empty)
    }
}

impl FromIterator<KeywordIntervals> for ServerAggregates {
    fn from_iter<I: IntoIterator<Item = KeywordIntervals>>(iter: I) -> Self {
        let mut by_keyword: HashMap<KeywordId, HashMap<String, ServerIntervalAggregate>> =
            HashMap::new();
        for keyword in iter {
            let intervals = by_keyword.entry(keyword.keyword_id).or_default();
            for aggregate in keyword.intervals {
                intervals.insert(aggregate.key(), aggregate);
            }
        }
        Self { by_keyword }
    }
}

/// Reconciled statistics of one keyword over one billing interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    /// Machine key of the interval
    pub key: String,
    pub label: String,
    pub stats: ReconciledStats,
}

/// Everything the report shows for a single keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub keyword_id: KeywordId,
    pub keyword: String,
    /// Locally computed statistics over the whole window
    pub window: AggregatedStats,
    /// One entry per billing interval, in interval order
    pub intervals: Vec<IntervalStats>,
}

impl KeywordReport {
    /// Statistics for the interval with `key`
    pub fn interval(&self, key: &str) -> Option<&IntervalStats> {
        self.intervals.iter().find(|i| i.key == key)
    }
}

/// Statistics summed over all keywords for one billing interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalTotal {
    pub key: String,
    pub label: String,
    pub stats: AggregatedStats,
}

/// Main aggregation engine
#[derive(Debug, Clone, Copy, Default)]
pub struct CostAggregator {
    calculator: CostCalculator,
}

impl CostAggregator {
    /// Create a new CostAggregator
    pub fn new(calculator: CostCalculator) -> Self {
        Self { calculator }
    }

    pub fn with_mode(mode: CostMode) -> Self {
        Self::new(CostCalculator::new(mode))
    }

    /// Get the cost calculator
    pub fn calculator(&self) -> &CostCalculator {
        &self.calculator
    }

    /// Cost summed over every keyword checked on `date`
    ///
    /// Only keywords in `keywords` are counted; those without a record that
    /// day contribute nothing.
    pub fn daily_total(
        &self,
        index: &PositionIndex,
        keywords: &[Keyword],
        date: &DailyDate,
    ) -> DailyCost {
        let key = date.key();
        let mut total_cost = 0.0;
        let mut checked_keywords = 0;

        for keyword in keywords {
            if let Some(record) = index.get_by_key(&keyword.id, &key) {
                total_cost += self.calculator.record_cost(record, &keyword.pricing);
                checked_keywords += 1;
            }
        }

        DailyCost {
            date: *date,
            total_cost,
            checked_keywords,
        }
    }

    /// Per-day totals for each of `dates`, in the same order
    pub fn daily_totals(
        &self,
        index: &PositionIndex,
        keywords: &[Keyword],
        dates: &[DailyDate],
    ) -> Vec<DailyCost> {
        dates
            .iter()
            .map(|date| self.daily_total(index, keywords, date))
            .collect()
    }

    /// Band statistics of `keyword` over the given days
    ///
    /// Days without a record are skipped; a record without a position still
    /// contributes its cost to `total_cost`.
    pub fn keyword_stats(
        &self,
        index: &PositionIndex,
        keyword: &Keyword,
        dates: impl IntoIterator<Item = DailyDate>,
    ) -> AggregatedStats {
        let mut stats = AggregatedStats::default();
        for date in dates {
            if let Some(record) = index.get(&keyword.id, &date) {
                let cost = self.calculator.record_cost(record, &keyword.pricing);
                stats.add_day(record.band(), cost);
            }
        }
        stats
    }

    /// Local statistics over the full span of a billing interval
    pub fn interval_stats(
        &self,
        index: &PositionIndex,
        keyword: &Keyword,
        interval: &BillingInterval,
    ) -> AggregatedStats {
        self.keyword_stats(index, keyword, interval.dates())
    }

    /// Local statistics over every date of the window
    pub fn window_stats(
        &self,
        index: &PositionIndex,
        keyword: &Keyword,
        window: &CalendarWindow,
    ) -> AggregatedStats {
        self.keyword_stats(index, keyword, window.dates().iter().copied())
    }

    /// Statistics of `keyword` over `interval`, preferring the server's
    pub fn reconciled_interval(
        &self,
        index: &PositionIndex,
        keyword: &Keyword,
        interval: &BillingInterval,
        server: &ServerAggregates,
    ) -> IntervalStats {
        let key = interval.key();
        let server_stats = server.get(&keyword.id, &key);
        if server_stats.is_none() {
            debug!(
                "No server aggregate for {} over {}, using local statistics",
                keyword.id, key
            );
        }
        let local = self.interval_stats(index, keyword, interval);

        IntervalStats {
            stats: reconcile(local, server_stats),
            label: interval.label.clone(),
            key,
        }
    }

    /// Build the report of every keyword
    ///
    /// Keywords are processed in parallel; the result keeps the order of
    /// `keywords`.
    pub fn aggregate_keywords(
        &self,
        index: &PositionIndex,
        keywords: &[Keyword],
        window: &CalendarWindow,
        intervals: &[BillingInterval],
        server: &ServerAggregates,
    ) -> Vec<KeywordReport> {
        keywords
            .par_iter()
            .map(|keyword| KeywordReport {
                keyword_id: keyword.id.clone(),
                keyword: keyword.text.clone(),
                window: self.window_stats(index, keyword, window),
                intervals: intervals
                    .iter()
                    .map(|interval| self.reconciled_interval(index, keyword, interval, server))
                    .collect(),
            })
            .collect()
    }
}

/// Choose between a server aggregate and the local statistics
///
/// A present server aggregate wins outright, zero values included.
pub fn reconcile(
    local: AggregatedStats,
    server: Option<&ServerIntervalAggregate>,
) -> ReconciledStats {
    match server {
        Some(aggregate) => ReconciledStats {
            stats: AggregatedStats::from(aggregate),
            source: StatsSource::Server,
        },
        None => ReconciledStats {
            stats: local,
            source: StatsSource::Local,
        },
    }
}

/// Sum the reconciled statistics of all keywords per interval
pub fn interval_totals(
    intervals: &[BillingInterval],
    reports: &[KeywordReport],
) -> Vec<IntervalTotal> {
    intervals
        .iter()
        .map(|interval| {
            let key = interval.key();
            let mut stats = AggregatedStats::default();
            for report in reports {
                if let Some(entry) = report.interval(&key) {
                    stats += entry.stats.stats;
                }
            }
            IntervalTotal {
                key,
                label: interval.label.clone(),
                stats,
            }
        })
        .collect()
}

/// Order two positions for ranking
///
/// Ranked positions come first in ascending order; an absent position sorts
/// after every number. Two absent positions compare equal.
pub fn compare_positions(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by position, unranked items last in input order
pub fn sort_by_position<T>(items: &mut [T], position: impl Fn(&T) -> Option<u32>) {
    items.sort_by(|a, b| compare_positions(position(a), position(b)));
}

/// Keywords ordered by their position on `date`
pub fn keywords_by_position<'a>(
    index: &PositionIndex,
    keywords: &'a [Keyword],
    date: &DailyDate,
) -> Vec<&'a Keyword> {
    let mut ordered: Vec<&Keyword> = keywords.iter().collect();
    sort_by_position(&mut ordered, |k| index.position(&k.id, date));
    ordered
}

/// Count keywords per position band on `date`
pub fn band_summary(index: &PositionIndex, keywords: &[Keyword], date: &DailyDate) -> BandSummary {
    let mut summary = BandSummary {
        total_keywords: keywords.len(),
        ..BandSummary::default()
    };

    for keyword in keywords {
        match index.position(&keyword.id, date).and_then(PositionBand::of) {
            Some(PositionBand::Top3) => summary.top1to3 += 1,
            Some(PositionBand::Top5) => summary.top4to5 += 1,
            Some(PositionBand::Top10) => summary.top6to10 += 1,
            None => {}
        }
    }

    summary
}
