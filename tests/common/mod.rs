//! Common test utilities and helpers for rankstat tests
//!
//! This module provides builders for position records and keywords, plus
//! helpers for writing input files into temporary directories.

#![allow(dead_code)]

use rankstat::{
    aggregation_types::{KeywordIntervals, ServerIntervalAggregate},
    types::{DailyDate, Keyword, KeywordId, KeywordPricing, PositionRecord, Trend},
};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::fs;

/// Price tiers used by most tests
pub const TEST_PRICING: KeywordPricing = KeywordPricing {
    top1to3: 100.0,
    top4to5: 50.0,
    top6to10: 30.0,
};

/// Parse a `YYYY-MM-DD` date, panicking on bad input
pub fn date(s: &str) -> DailyDate {
    s.parse().expect("test dates are valid")
}

/// Builder for creating test PositionRecord instances
pub struct RecordBuilder {
    keyword_id: String,
    checked_at: DailyDate,
    position: Option<u32>,
    cost: Option<f64>,
    trend: Option<Trend>,
}

impl RecordBuilder {
    /// Create a new builder with default values
    pub fn new(keyword_id: &str, checked_at: &str) -> Self {
        Self {
            keyword_id: keyword_id.to_string(),
            checked_at: date(checked_at),
            position: None,
            cost: None,
            trend: None,
        }
    }

    pub fn position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn build(self) -> PositionRecord {
        PositionRecord {
            keyword_id: KeywordId::new(self.keyword_id),
            checked_at: self.checked_at,
            position: self.position,
            cost: self.cost,
            trend: self.trend,
        }
    }
}

/// Keyword priced with [`TEST_PRICING`]
pub fn keyword(id: &str) -> Keyword {
    Keyword::new(id, format!("keyword {id}"), TEST_PRICING)
}

/// Server aggregate with only the total cost set
pub fn server_aggregate(start: &str, end: &str, sum_cost: f64) -> ServerIntervalAggregate {
    ServerIntervalAggregate {
        start_date: date(start),
        end_date: date(end),
        display_start_date: None,
        display_end_date: None,
        sum_cost,
        days_top3: 0,
        cost_top3: 0.0,
        days_top5: 0,
        cost_top5: 0.0,
        days_top10: 0,
        cost_top10: 0.0,
    }
}

pub fn keyword_intervals(
    keyword_id: &str,
    intervals: Vec<ServerIntervalAggregate>,
) -> KeywordIntervals {
    KeywordIntervals {
        keyword_id: KeywordId::new(keyword_id),
        intervals,
    }
}

/// One record per day for `keyword_id`, positions cycling through `positions`
pub fn daily_records(keyword_id: &str, first: &str, last: &str, positions: &[u32]) -> Vec<PositionRecord> {
    date(first)
        .iter_through(date(last))
        .zip(positions.iter().cycle())
        .map(|(day, position)| PositionRecord {
            keyword_id: KeywordId::new(keyword_id),
            checked_at: day,
            position: Some(*position),
            cost: None,
            trend: None,
        })
        .collect()
}

/// Temporary directory holding report input files
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("temp dir can be created"),
        }
    }

    /// Write `content` to `name` inside the fixture directory
    pub async fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).await.expect("fixture file can be written");
        path
    }

    /// Serialize `value` as JSON into `name`
    pub async fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> PathBuf {
        let content = serde_json::to_string(value).expect("fixture serializes");
        self.write(name, &content).await
    }
}
