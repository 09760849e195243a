//! Core domain types for rankstat
//!
//! This module contains the fundamental types used throughout the rankstat
//! library: keyword identifiers, calendar dates, position records, keyword
//! price tiers, and period selectors.

use crate::error::RankstatError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strongly-typed keyword identifier
///
/// # Examples
/// ```
/// use rankstat_core::types::KeywordId;
///
/// let id = KeywordId::new("kw-42");
/// assert_eq!(id.as_str(), "kw-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeywordId(String);

impl KeywordId {
    /// Create a new KeywordId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeywordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for KeywordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calendar date without time of day
///
/// All date arithmetic returns a new value; a `DailyDate` is `Copy` and is
/// never mutated in place. The canonical key format is `YYYY-MM-DD`, so
/// lexicographic order of keys equals chronological order.
///
/// Deserialization accepts either a plain date or a timestamp whose first ten
/// characters are a date (`2025-01-01T09:30:00`), since upstream check times
/// carry a time component.
///
/// # Examples
/// ```
/// use rankstat_core::types::DailyDate;
///
/// let date: DailyDate = "2025-01-31".parse().unwrap();
/// assert_eq!(date.key(), "2025-01-31");
/// assert_eq!(date.succ().key(), "2025-02-01");
/// assert_eq!(date.short_label(), "31.01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Create a new DailyDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Create from year, month and day; `None` for impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }

    /// Canonical `YYYY-MM-DD` key
    pub fn key(&self) -> String {
        self.format("%Y-%m-%d")
    }

    /// Human-readable `dd.mm` label
    pub fn short_label(&self) -> String {
        self.format("%d.%m")
    }

    /// Date shifted by a (possibly negative) number of days
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }

    /// Date shifted by `days`, or `None` past the representable calendar
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Self)
    }

    /// The following day
    pub fn succ(&self) -> Self {
        self.add_days(1)
    }

    /// Signed number of days from `self` to `other`
    pub fn days_until(&self, other: &DailyDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// ISO weekday number, Monday = 1 through Sunday = 7
    pub fn weekday_number(&self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    /// Whether this date is a Monday
    pub fn is_monday(&self) -> bool {
        self.0.weekday() == Weekday::Mon
    }

    /// Every date from `self` through `end`, inclusive; empty when `end < self`
    pub fn iter_through(self, end: DailyDate) -> impl Iterator<Item = DailyDate> {
        self.0
            .iter_days()
            .take_while(move |d| *d <= end.0)
            .map(DailyDate)
    }
}

impl fmt::Display for DailyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DailyDate {
    type Err = RankstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let date_part = match s.get(..10) {
            Some(prefix) if s.len() == 10 => prefix,
            Some(prefix) if matches!(s.as_bytes().get(10), Some(b'T' | b' ')) => prefix,
            _ => return Err(RankstatError::InvalidDate(s.to_string())),
        };
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| RankstatError::InvalidDate(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for DailyDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Direction of a position change between two checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Derive the trend from the previous and the current position
    ///
    /// A lower position number is a better rank, so moving from 7 to 3 is `Up`.
    /// Without a previous check the trend is `Stable`; losing the ranking
    /// altogether is `Down`.
    ///
    /// ```
    /// use rankstat_core::types::Trend;
    ///
    /// assert_eq!(Trend::between(Some(7), Some(3)), Trend::Up);
    /// assert_eq!(Trend::between(Some(3), None), Trend::Down);
    /// assert_eq!(Trend::between(None, Some(5)), Trend::Stable);
    /// ```
    pub fn between(previous: Option<u32>, current: Option<u32>) -> Self {
        match (previous, current) {
            (None, _) => Self::Stable,
            (Some(_), None) => Self::Down,
            (Some(prev), Some(cur)) if cur < prev => Self::Up,
            (Some(prev), Some(cur)) if cur > prev => Self::Down,
            _ => Self::Stable,
        }
    }
}

/// Ranking band used to tier cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionBand {
    /// Positions 1 through 3
    Top3,
    /// Positions 4 and 5
    Top5,
    /// Positions 6 through 10
    Top10,
}

impl PositionBand {
    /// Classify a position; positions outside 1..=10 belong to no band
    pub fn of(position: u32) -> Option<Self> {
        match position {
            1..=3 => Some(Self::Top3),
            4..=5 => Some(Self::Top5),
            6..=10 => Some(Self::Top10),
            _ => None,
        }
    }
}

/// Price tiers of a keyword, one per position band
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordPricing {
    #[serde(rename = "price_top_1_3", alias = "priceTop1to3", default)]
    pub top1to3: f64,
    #[serde(rename = "price_top_4_5", alias = "priceTop4to5", default)]
    pub top4to5: f64,
    #[serde(rename = "price_top_6_10", alias = "priceTop6to10", default)]
    pub top6to10: f64,
}

impl KeywordPricing {
    /// Create pricing from the three tier prices
    pub fn new(top1to3: f64, top4to5: f64, top6to10: f64) -> Self {
        Self {
            top1to3,
            top4to5,
            top6to10,
        }
    }

    /// Price charged for one day in the given band
    pub fn price_for(&self, band: PositionBand) -> f64 {
        match band {
            PositionBand::Top3 => self.top1to3,
            PositionBand::Top5 => self.top4to5,
            PositionBand::Top10 => self.top6to10,
        }
    }
}

/// A tracked search keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: KeywordId,
    #[serde(rename = "keyword", alias = "text")]
    pub text: String,
    #[serde(flatten)]
    pub pricing: KeywordPricing,
}

impl Keyword {
    pub fn new(id: impl Into<String>, text: impl Into<String>, pricing: KeywordPricing) -> Self {
        Self {
            id: KeywordId::new(id),
            text: text.into(),
            pricing,
        }
    }
}

/// One keyword's rank check on one day
///
/// `position` is absent when the keyword was not found in the results, and
/// `cost` is absent when the upstream did not price the check. Both stay
/// distinguishable from an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(alias = "keywordId")]
    pub keyword_id: KeywordId,
    #[serde(alias = "checkedAt")]
    pub checked_at: DailyDate,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub trend: Option<Trend>,
}

impl PositionRecord {
    /// Band of this record's position, if any
    pub fn band(&self) -> Option<PositionBand> {
        self.position.and_then(PositionBand::of)
    }
}

/// Cost resolution mode
///
/// Determines whether a record's own cost or the keyword's price tier is used.
///
/// # Examples
/// ```
/// use rankstat_core::types::CostMode;
/// use std::str::FromStr;
///
/// let mode = CostMode::from_str("auto").unwrap();
/// assert_eq!(mode, CostMode::Auto);
/// assert_eq!(CostMode::Calculate.to_string(), "calculate");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostMode {
    /// Use the record's cost when present, otherwise the keyword's price tier
    #[default]
    Auto,
    /// Always price from the keyword's tiers
    Calculate,
    /// Always use the record's cost; an absent cost counts as zero
    Display,
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Calculate => write!(f, "calculate"),
            Self::Display => write!(f, "display"),
        }
    }
}

impl FromStr for CostMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "calculate" => Ok(Self::Calculate),
            "display" => Ok(Self::Display),
            _ => Err(format!("Invalid cost mode: {s}")),
        }
    }
}

/// Report granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    #[default]
    Month,
    /// Explicit start/end range supplied by the caller
    Custom,
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for PeriodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Invalid period: {s}")),
        }
    }
}

/// Period kind plus an offset from the current period
///
/// An offset of 0 is the current week or month, negative values go back in
/// time. No bound is enforced here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSelector {
    pub kind: PeriodKind,
    #[serde(default)]
    pub offset: i32,
}

impl PeriodSelector {
    pub fn new(kind: PeriodKind, offset: i32) -> Self {
        Self { kind, offset }
    }

    pub fn week(offset: i32) -> Self {
        Self::new(PeriodKind::Week, offset)
    }

    pub fn month(offset: i32) -> Self {
        Self::new(PeriodKind::Month, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DailyDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_daily_date_parse_variants() {
        assert_eq!(date("2025-03-09").key(), "2025-03-09");
        assert_eq!(date("2025-03-09T23:59:59").key(), "2025-03-09");
        assert_eq!(date("2025-03-09 08:00:00").key(), "2025-03-09");
        assert!("2025-3-9".parse::<DailyDate>().is_err());
        assert!("2025-03-091".parse::<DailyDate>().is_err());
        assert!("2025-02-30".parse::<DailyDate>().is_err());
    }

    #[test]
    fn test_daily_date_arithmetic_returns_new_values() {
        let d = date("2024-02-28");
        let next = d.succ();
        assert_eq!(d.key(), "2024-02-28");
        assert_eq!(next.key(), "2024-02-29");
        assert_eq!(d.add_days(-59).key(), "2023-12-31");
        assert_eq!(d.days_until(&date("2024-03-13")), 14);
    }

    #[test]
    fn test_weekday_number_sunday_is_seven() {
        // 2025-01-05 is a Sunday, 2025-01-06 a Monday
        assert_eq!(date("2025-01-05").weekday_number(), 7);
        assert_eq!(date("2025-01-06").weekday_number(), 1);
        assert!(date("2025-01-06").is_monday());
    }

    #[test]
    fn test_iter_through_inclusive() {
        let days: Vec<String> = date("2025-12-30")
            .iter_through(date("2026-01-02"))
            .map(|d| d.key())
            .collect();
        assert_eq!(days, ["2025-12-30", "2025-12-31", "2026-01-01", "2026-01-02"]);
        assert_eq!(date("2025-01-02").iter_through(date("2025-01-01")).count(), 0);
    }

    #[test]
    fn test_position_band_boundaries() {
        assert_eq!(PositionBand::of(0), None);
        assert_eq!(PositionBand::of(1), Some(PositionBand::Top3));
        assert_eq!(PositionBand::of(3), Some(PositionBand::Top3));
        assert_eq!(PositionBand::of(4), Some(PositionBand::Top5));
        assert_eq!(PositionBand::of(5), Some(PositionBand::Top5));
        assert_eq!(PositionBand::of(6), Some(PositionBand::Top10));
        assert_eq!(PositionBand::of(10), Some(PositionBand::Top10));
        assert_eq!(PositionBand::of(11), None);
    }

    #[test]
    fn test_trend_between() {
        assert_eq!(Trend::between(None, None), Trend::Stable);
        assert_eq!(Trend::between(Some(4), Some(4)), Trend::Stable);
        assert_eq!(Trend::between(Some(4), Some(9)), Trend::Down);
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{
            "keyword_id": "k1",
            "checked_at": "2025-01-15T06:12:00",
            "position": 4,
            "cost": 25.0,
            "trend": "up"
        }"#;
        let record: PositionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.keyword_id.as_str(), "k1");
        assert_eq!(record.checked_at.key(), "2025-01-15");
        assert_eq!(record.band(), Some(PositionBand::Top5));
        assert_eq!(record.trend, Some(Trend::Up));

        let sparse = r#"{"keyword_id": "k1", "checked_at": "2025-01-15"}"#;
        let record: PositionRecord = serde_json::from_str(sparse).unwrap();
        assert_eq!(record.position, None);
        assert_eq!(record.cost, None);
    }

    #[test]
    fn test_keyword_deserialization() {
        let json = r#"{
            "id": "k1",
            "keyword": "buy bricks",
            "price_top_1_3": 100.0,
            "price_top_4_5": 50.0,
            "price_top_6_10": 30.0
        }"#;
        let keyword: Keyword = serde_json::from_str(json).unwrap();
        assert_eq!(keyword.text, "buy bricks");
        assert_eq!(keyword.pricing.price_for(PositionBand::Top5), 50.0);
    }

    #[test]
    fn test_camel_case_field_names() {
        let record: PositionRecord = serde_json::from_str(
            r#"{"keywordId": "k7", "checkedAt": "2025-02-01", "position": 9}"#,
        )
        .unwrap();
        assert_eq!(record.keyword_id.as_str(), "k7");
        assert_eq!(record.checked_at.key(), "2025-02-01");
        assert_eq!(record.band(), Some(PositionBand::Top10));

        let keyword: Keyword = serde_json::from_str(
            r#"{
                "id": "k7",
                "text": "red bricks",
                "priceTop1to3": 90.0,
                "priceTop4to5": 45.0,
                "priceTop6to10": 20.0
            }"#,
        )
        .unwrap();
        assert_eq!(keyword.text, "red bricks");
        assert_eq!(keyword.pricing, KeywordPricing::new(90.0, 45.0, 20.0));
    }

    #[test]
    fn test_period_kind_from_str() {
        assert_eq!("WEEK".parse::<PeriodKind>().unwrap(), PeriodKind::Week);
        assert_eq!("custom".parse::<PeriodKind>().unwrap(), PeriodKind::Custom);
        assert!("yearly".parse::<PeriodKind>().is_err());
    }
}
