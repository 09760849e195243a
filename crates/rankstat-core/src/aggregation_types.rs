//! Aggregation data types for rankstat
//!
//! Pure data structures used for aggregated position summaries and for the
//! server-supplied interval aggregates they are reconciled against.

use crate::types::{DailyDate, KeywordId, PositionBand};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Machine-readable key of a date span, `YYYY-MM-DD - YYYY-MM-DD`
pub fn interval_key(start: &DailyDate, end: &DailyDate) -> String {
    format!("{} - {}", start.key(), end.key())
}

/// Per-keyword statistics over one interval
///
/// `days_top*` count days whose position fell into each band, `cost_top*`
/// sum the cost of those days. `total_cost` additionally includes costs of
/// days outside every band, so it equals the sum of the three band costs
/// only when no such costs exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub days_top3: u32,
    pub cost_top3: f64,
    pub days_top5: u32,
    pub cost_top5: f64,
    pub days_top10: u32,
    pub cost_top10: f64,
    pub total_cost: f64,
}

impl AggregatedStats {
    /// Account one checked day
    pub fn add_day(&mut self, band: Option<PositionBand>, cost: f64) {
        match band {
            Some(PositionBand::Top3) => {
                self.days_top3 += 1;
                self.cost_top3 += cost;
            }
            Some(PositionBand::Top5) => {
                self.days_top5 += 1;
                self.cost_top5 += cost;
            }
            Some(PositionBand::Top10) => {
                self.days_top10 += 1;
                self.cost_top10 += cost;
            }
            None => {}
        }
        self.total_cost += cost;
    }

    /// Days that fell into any band
    pub fn days_in_bands(&self) -> u32 {
        self.days_top3 + self.days_top5 + self.days_top10
    }

    /// Sum of the three band costs
    pub fn band_cost(&self) -> f64 {
        self.cost_top3 + self.cost_top5 + self.cost_top10
    }
}

impl AddAssign for AggregatedStats {
    fn add_assign(&mut self, other: Self) {
        self.days_top3 += other.days_top3;
        self.cost_top3 += other.cost_top3;
        self.days_top5 += other.days_top5;
        self.cost_top5 += other.cost_top5;
        self.days_top10 += other.days_top10;
        self.cost_top10 += other.cost_top10;
        self.total_cost += other.total_cost;
    }
}

/// Interval aggregate as computed by the server
///
/// Keyed by the ISO start/end pair of the full (unclipped) interval. The
/// display dates are the part of the interval visible in the requested
/// period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerIntervalAggregate {
    #[serde(alias = "startDate")]
    pub start_date: DailyDate,
    #[serde(alias = "endDate")]
    pub end_date: DailyDate,
    #[serde(default, alias = "displayStartDate")]
    pub display_start_date: Option<DailyDate>,
    #[serde(default, alias = "displayEndDate")]
    pub display_end_date: Option<DailyDate>,
    #[serde(default, alias = "sumCost")]
    pub sum_cost: f64,
    #[serde(default, alias = "daysTop3")]
    pub days_top3: u32,
    #[serde(default, alias = "costTop3")]
    pub cost_top3: f64,
    #[serde(default, alias = "daysTop5")]
    pub days_top5: u32,
    #[serde(default, alias = "costTop5")]
    pub cost_top5: f64,
    #[serde(default, alias = "daysTop10")]
    pub days_top10: u32,
    #[serde(default, alias = "costTop10")]
    pub cost_top10: f64,
}

impl ServerIntervalAggregate {
    /// Lookup key of the interval this aggregate belongs to
    pub fn key(&self) -> String {
        interval_key(&self.start_date, &self.end_date)
    }
}

impl From<&ServerIntervalAggregate> for AggregatedStats {
    fn from(server: &ServerIntervalAggregate) -> Self {
        Self {
            days_top3: server.days_top3,
            cost_top3: server.cost_top3,
            days_top5: server.days_top5,
            cost_top5: server.cost_top5,
            days_top10: server.days_top10,
            cost_top10: server.cost_top10,
            total_cost: server.sum_cost,
        }
    }
}

/// Server aggregates of one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordIntervals {
    #[serde(alias = "keywordId")]
    pub keyword_id: KeywordId,
    pub intervals: Vec<ServerIntervalAggregate>,
}

/// Where a displayed aggregate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    Server,
    Local,
}

/// Aggregate chosen for display together with its origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconciledStats {
    #[serde(flatten)]
    pub stats: AggregatedStats,
    pub source: StatsSource,
}

/// Cost summed over all keywords for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub date: DailyDate,
    pub total_cost: f64,
    /// Keywords with a record on this day
    pub checked_keywords: usize,
}

/// Keyword counts per band on one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSummary {
    pub top1to3: usize,
    pub top4to5: usize,
    pub top6to10: usize,
    pub total_keywords: usize,
}

/// Grand totals over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub stats: AggregatedStats,
}

impl Totals {
    pub fn from_stats<'a>(stats: impl IntoIterator<Item = &'a AggregatedStats>) -> Self {
        let mut totals = Self::default();
        for s in stats {
            totals.stats += *s;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_day_tracks_out_of_band_cost() {
        let mut stats = AggregatedStats::default();
        stats.add_day(Some(PositionBand::Top3), 100.0);
        stats.add_day(Some(PositionBand::Top10), 30.0);
        stats.add_day(None, 5.0);

        assert_eq!(stats.days_top3, 1);
        assert_eq!(stats.days_top10, 1);
        assert_eq!(stats.days_in_bands(), 2);
        assert_eq!(stats.band_cost(), 130.0);
        assert_eq!(stats.total_cost, 135.0);
    }

    #[test]
    fn test_server_aggregate_accepts_both_casings() {
        let snake = r#"{
            "start_date": "2025-01-01",
            "end_date": "2025-01-14",
            "display_start_date": "2025-01-01",
            "display_end_date": "2025-01-14",
            "sum_cost": 420.0,
            "days_top3": 3,
            "cost_top3": 100.0
        }"#;
        let camel = r#"{
            "startDate": "2025-01-01",
            "endDate": "2025-01-14",
            "sumCost": 420.0,
            "daysTop3": 3,
            "costTop3": 100.0
        }"#;
        let a: ServerIntervalAggregate = serde_json::from_str(snake).unwrap();
        let b: ServerIntervalAggregate = serde_json::from_str(camel).unwrap();
        assert_eq!(a.key(), "2025-01-01 - 2025-01-14");
        assert_eq!(a.key(), b.key());

        let stats = AggregatedStats::from(&a);
        assert_eq!(stats.total_cost, 420.0);
        assert_eq!(stats.days_top3, 3);
        assert_eq!(stats.days_top5, 0);
    }

    #[test]
    fn test_totals_from_stats() {
        let mut a = AggregatedStats::default();
        a.add_day(Some(PositionBand::Top5), 50.0);
        let mut b = AggregatedStats::default();
        b.add_day(Some(PositionBand::Top5), 50.0);
        b.add_day(Some(PositionBand::Top3), 80.0);

        let totals = Totals::from_stats([&a, &b]);
        assert_eq!(totals.stats.days_top5, 2);
        assert_eq!(totals.stats.total_cost, 180.0);
    }
}
