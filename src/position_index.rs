//! Two-level lookup of position records
//!
//! The index maps a keyword to its records keyed by canonical `YYYY-MM-DD`
//! date. Report cells are rendered by looking up one `(keyword, date)` pair
//! at a time, so both levels are maps rather than a flat list.

use crate::types::{DailyDate, KeywordId, PositionRecord, Trend};
use std::collections::{BTreeMap, HashMap};

/// Records of one keyword, keyed by date; iteration is chronological
pub type DateRecords = BTreeMap<String, PositionRecord>;

/// Index of position records by keyword and date
///
/// A later record for the same keyword and date replaces the earlier one.
/// A missing entry means no check was performed that day.
///
/// # Examples
///
/// ```
/// use rankstat::position_index::PositionIndex;
/// use rankstat::types::{DailyDate, KeywordId, PositionRecord};
///
/// let day = DailyDate::from_ymd(2025, 1, 2).unwrap();
/// let record = PositionRecord {
///     keyword_id: KeywordId::new("k1"),
///     checked_at: day,
///     position: Some(4),
///     cost: None,
///     trend: None,
/// };
///
/// let index = PositionIndex::from_records(vec![record]);
/// assert_eq!(index.get(&KeywordId::new("k1"), &day).unwrap().position, Some(4));
/// assert!(index.get(&KeywordId::new("k2"), &day).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    by_keyword: HashMap<KeywordId, DateRecords>,
    records: usize,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a flat list of records
    pub fn from_records(records: impl IntoIterator<Item = PositionRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, record: PositionRecord) -> Option<PositionRecord> {
        let replaced = self
            .by_keyword
            .entry(record.keyword_id.clone())
            .or_default()
            .insert(record.checked_at.key(), record);
        if replaced.is_none() {
            self.records += 1;
        }
        replaced
    }

    /// Record of `keyword` on `date`
    pub fn get(&self, keyword: &KeywordId, date: &DailyDate) -> Option<&PositionRecord> {
        self.get_by_key(keyword, &date.key())
    }

    /// Record of `keyword` under a canonical date key
    pub fn get_by_key(&self, keyword: &KeywordId, date_key: &str) -> Option<&PositionRecord> {
        self.by_keyword.get(keyword)?.get(date_key)
    }

    /// Position of `keyword` on `date`, if checked and ranked
    pub fn position(&self, keyword: &KeywordId, date: &DailyDate) -> Option<u32> {
        self.get(keyword, date).and_then(|r| r.position)
    }

    /// All records of one keyword in date order
    pub fn records_for(&self, keyword: &KeywordId) -> Option<&DateRecords> {
        self.by_keyword.get(keyword)
    }

    /// Records of `keyword` within `[first, last]`, in date order
    pub fn records_between<'a>(
        &'a self,
        keyword: &KeywordId,
        first: &DailyDate,
        last: &DailyDate,
    ) -> impl Iterator<Item = &'a PositionRecord> + 'a {
        let range = first.key()..=last.key();
        self.by_keyword
            .get(keyword)
            .into_iter()
            .flat_map(move |records| records.range(range.clone()).map(|(_, r)| r))
    }

    /// Derive the trend of every record that arrived without one
    ///
    /// The trend compares a record's position with the record of the
    /// previous calendar day. Without a check on that day the trend is
    /// stable. Returns the number of records filled.
    pub fn fill_trends(&mut self) -> usize {
        let mut filled = 0;
        for records in self.by_keyword.values_mut() {
            let mut previous: Option<(DailyDate, Option<u32>)> = None;
            for record in records.values_mut() {
                if record.trend.is_none() {
                    let previous_position = previous
                        .filter(|(date, _)| date.succ() == record.checked_at)
                        .and_then(|(_, position)| position);
                    record.trend = Some(Trend::between(previous_position, record.position));
                    filled += 1;
                }
                previous = Some((record.checked_at, record.position));
            }
        }
        filled
    }

    /// Keywords that have at least one record, sorted
    pub fn keyword_ids(&self) -> Vec<&KeywordId> {
        let mut ids: Vec<&KeywordId> = self.by_keyword.keys().collect();
        ids.sort();
        ids
    }

    /// Number of distinct `(keyword, date)` entries
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

impl FromIterator<PositionRecord> for PositionIndex {
    fn from_iter<I: IntoIterator<Item = PositionRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}
