//! Integration tests for the report pipeline

mod common;

use common::{RecordBuilder, date, daily_records, keyword, keyword_intervals, server_aggregate};
use rankstat::{
    aggregation::{CostAggregator, ServerAggregates, interval_totals, keywords_by_position},
    aggregation_types::StatsSource,
    billing::{BillingInterval, billing_intervals, intervals_for_window},
    calendar::CalendarWindow,
    filters::IntervalFilter,
    merge::{MergedEntry, merge_dates_with_intervals},
    position_index::PositionIndex,
    report::ReportBuilder,
    types::{CostMode, PeriodKind, PeriodSelector},
};

#[test]
fn test_march_view_shows_only_overlapping_intervals() {
    let window = CalendarWindow::month(0, date("2025-03-18"));
    let intervals = intervals_for_window(date("2025-01-01"), &window);

    let keys: Vec<String> = intervals.iter().map(BillingInterval::key).collect();
    assert_eq!(
        keys,
        [
            "2025-02-26 - 2025-03-11",
            "2025-03-12 - 2025-03-25",
            "2025-03-26 - 2025-03-31",
        ]
    );
    assert!(intervals[2].is_partial());

    // Display ranges are clipped to March
    let (start, end) = intervals[0].display_range(&window).unwrap();
    assert_eq!((start, end), (date("2025-03-01"), date("2025-03-11")));
}

#[test]
fn test_month_filter_matches_manual_filter() {
    let window = CalendarWindow::month(-1, date("2025-06-03"));
    let all = billing_intervals(date("2024-12-20"), window.last());
    let manual: Vec<BillingInterval> = all
        .iter()
        .filter(|i| i.end_date >= window.first() && i.start_date <= window.last())
        .cloned()
        .collect();

    assert_eq!(IntervalFilter::for_window(&window).apply(all), manual);
}

#[test]
fn test_merged_columns_follow_interval_ends() {
    let window = CalendarWindow::month(0, date("2025-01-10"));
    let intervals = intervals_for_window(date("2025-01-01"), &window);
    let columns = merge_dates_with_intervals(window.dates(), &intervals);

    assert_eq!(columns.len(), window.len() + intervals.len());
    for (position, column) in columns.iter().enumerate() {
        if let MergedEntry::Interval { interval, .. } = column {
            let MergedEntry::Date { value } = &columns[position - 1] else {
                panic!("interval column must follow a date column");
            };
            assert_eq!(*value, interval.end_date.min(window.last()));
        }
    }
}

#[test]
fn test_week_view_partial_data() {
    // 2025-01-15 is a Wednesday, only Monday through Wednesday were checked
    let records = daily_records("k1", "2025-01-13", "2025-01-15", &[1, 4, 12]);
    let report = ReportBuilder::new(date("2025-01-01"), date("2025-01-15"))
        .with_period(PeriodSelector::week(0))
        .build(records, &[keyword("k1")], Vec::new())
        .unwrap();

    assert_eq!(report.window.kind(), PeriodKind::Week);
    assert!(report.window.first().is_monday());
    assert_eq!(report.daily.len(), 7);
    assert_eq!(report.daily[0].total_cost, 100.0);
    assert_eq!(report.daily[1].total_cost, 50.0);
    assert_eq!(report.daily[2].total_cost, 0.0);
    assert_eq!(report.daily[2].checked_keywords, 1);
    assert_eq!(report.daily[3].checked_keywords, 0);

    let stats = report.keywords[0].window;
    assert_eq!(stats.days_top3, 1);
    assert_eq!(stats.days_top5, 1);
    assert_eq!(stats.days_in_bands(), 2);
    assert_eq!(stats.total_cost, 150.0);
}

#[test]
fn test_reconciliation_is_per_keyword_and_interval() {
    let mut records = daily_records("k1", "2025-01-01", "2025-01-28", &[2]);
    records.extend(daily_records("k2", "2025-01-01", "2025-01-28", &[6]));
    let index = PositionIndex::from_records(records);
    let keywords = [keyword("k1"), keyword("k2")];
    let window = CalendarWindow::custom(date("2025-01-01"), date("2025-01-28")).unwrap();
    let intervals = intervals_for_window(date("2025-01-01"), &window);
    let server = ServerAggregates::new(vec![
        keyword_intervals("k1", vec![server_aggregate("2025-01-15", "2025-01-28", 0.0)]),
        keyword_intervals("k2", vec![server_aggregate("2025-01-01", "2025-01-14", 5.0)]),
    ]);

    let reports =
        CostAggregator::default().aggregate_keywords(&index, &keywords, &window, &intervals, &server);

    let sources: Vec<Vec<StatsSource>> = reports
        .iter()
        .map(|r| r.intervals.iter().map(|i| i.stats.source).collect())
        .collect();
    assert_eq!(
        sources,
        [
            [StatsSource::Local, StatsSource::Server],
            [StatsSource::Server, StatsSource::Local],
        ]
    );

    // k1 first interval is local: 14 days in top 3 at 100 each
    assert_eq!(reports[0].intervals[0].stats.stats.days_top3, 14);
    assert_eq!(reports[0].intervals[0].stats.stats.total_cost, 1400.0);
    // k1 second interval is the zero server aggregate, kept as is
    assert_eq!(reports[0].intervals[1].stats.stats.total_cost, 0.0);

    let totals = interval_totals(&intervals, &reports);
    assert_eq!(totals[0].stats.total_cost, 1405.0);
    assert_eq!(totals[1].stats.total_cost, 420.0);
}

#[test]
fn test_cost_modes() {
    let records = vec![
        RecordBuilder::new("k1", "2025-01-01").position(2).cost(7.0).build(),
        RecordBuilder::new("k1", "2025-01-02").position(5).build(),
    ];
    let index = PositionIndex::from_records(records);
    let window = CalendarWindow::custom(date("2025-01-01"), date("2025-01-02")).unwrap();
    let kw = keyword("k1");

    let total = |mode| CostAggregator::with_mode(mode).window_stats(&index, &kw, &window).total_cost;
    assert_eq!(total(CostMode::Auto), 57.0);
    assert_eq!(total(CostMode::Calculate), 150.0);
    assert_eq!(total(CostMode::Display), 7.0);
}

#[test]
fn test_keyword_ordering_for_a_day() {
    let day = "2025-02-01";
    let index = PositionIndex::from_records(vec![
        RecordBuilder::new("a", day).build(),
        RecordBuilder::new("b", day).position(9).build(),
        RecordBuilder::new("c", day).position(1).build(),
    ]);
    let keywords = [keyword("a"), keyword("b"), keyword("c"), keyword("d")];

    let ordered: Vec<&str> = keywords_by_position(&index, &keywords, &date(day))
        .into_iter()
        .map(|k| k.id.as_str())
        .collect();
    assert_eq!(ordered, ["c", "b", "a", "d"]);
}
