//! Output formatting module for rankstat
//!
//! This module provides formatters for printing computed reports:
//! - Plain text for a quick look in the terminal
//! - JSON for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use rankstat::billing::billing_intervals;
//! use rankstat::output::get_formatter;
//! use rankstat::types::DailyDate;
//!
//! let intervals = billing_intervals(
//!     DailyDate::from_ymd(2025, 1, 1).unwrap(),
//!     DailyDate::from_ymd(2025, 1, 31).unwrap(),
//! );
//!
//! let text = get_formatter(false).format_intervals(&intervals);
//! assert!(text.contains("29.01 – 31.01 (partial)"));
//!
//! let json = get_formatter(true).format_intervals(&intervals);
//! assert!(json.contains("\"partial\": true"));
//! ```

use crate::aggregation_types::{AggregatedStats, StatsSource};
use crate::billing::BillingInterval;
use crate::calendar::CalendarWindow;
use crate::merge::MergedEntry;
use crate::report::Report;
use prettytable::{Cell, Row, Table, format, row};
use serde_json::json;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a complete report
    fn format_report(&self, report: &Report) -> String;

    /// Format a list of billing intervals
    fn format_intervals(&self, intervals: &[BillingInterval]) -> String;

    /// Format the dates of a calendar window
    fn format_window(&self, window: &CalendarWindow) -> String;
}

/// Plain text formatter for terminal output
///
/// Interval statistics computed locally, because the server sent no
/// aggregate for them, are marked with `*`.
pub struct TextFormatter;

impl TextFormatter {
    fn format_cost(cost: f64) -> String {
        format!("{cost:.2}")
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }

    fn stats_row(name: &str, period: &str, stats: &AggregatedStats, marker: &str) -> Row {
        row![
            name,
            period,
            r -> stats.days_top3,
            r -> Self::format_cost(stats.cost_top3),
            r -> stats.days_top5,
            r -> Self::format_cost(stats.cost_top5),
            r -> stats.days_top10,
            r -> Self::format_cost(stats.cost_top10),
            r -> format!("{}{}", Self::format_cost(stats.total_cost), marker)
        ]
    }

    fn keyword_table(report: &Report) -> Table {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Keyword",
            b -> "Period",
            b -> "TOP-3 Days",
            b -> "TOP-3 Cost",
            b -> "TOP-5 Days",
            b -> "TOP-5 Cost",
            b -> "TOP-10 Days",
            b -> "TOP-10 Cost",
            b -> "Total"
        ]);

        for keyword in &report.keywords {
            let name = format!("{} ({})", keyword.keyword, keyword.keyword_id);
            table.add_row(Self::stats_row(&name, "window", &keyword.window, ""));
            for interval in &keyword.intervals {
                let marker = match interval.stats.source {
                    StatsSource::Server => "",
                    StatsSource::Local => " *",
                };
                table.add_row(Self::stats_row(
                    "",
                    &interval.label,
                    &interval.stats.stats,
                    marker,
                ));
            }
        }

        table.add_row(Row::new(vec![Cell::new(""); 9]));
        table.add_row(Self::stats_row("Total", "window", &report.totals.stats, ""));
        table
    }

    /// Per-day costs with each interval total after its last visible day
    fn daily_table(report: &Report) -> Table {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "Date", b -> "Checked", b -> "Cost"]);

        let mut daily = report.daily.iter();
        for column in &report.columns {
            match column {
                MergedEntry::Date { value } => {
                    if let Some(day) = daily.next() {
                        table.add_row(row![
                            value,
                            r -> day.checked_keywords,
                            r -> Self::format_cost(day.total_cost)
                        ]);
                    }
                }
                MergedEntry::Interval { value, interval } => {
                    let key = interval.key();
                    if let Some(total) = report.interval_totals.iter().find(|t| t.key == key) {
                        table.add_row(row![
                            b -> format!("[{value}]"),
                            "",
                            br -> Self::format_cost(total.stats.total_cost)
                        ]);
                    }
                }
            }
        }
        table
    }

    fn interval_table(report: &Report) -> Table {
        let mut table = Self::new_table();
        table.set_titles(row![
            b -> "Interval",
            b -> "Shown",
            b -> "Days Shown",
            b -> "Days in TOP-10",
            b -> "Cost"
        ]);

        for (shown, total) in report.intervals.iter().zip(&report.interval_totals) {
            let partial = if shown.interval.is_partial() {
                " (partial)"
            } else {
                ""
            };
            table.add_row(row![
                format!("{}{}", total.label, partial),
                format!(
                    "{} – {}",
                    shown.display_start.short_label(),
                    shown.display_end.short_label()
                ),
                r -> shown.interval.visible_dates(&report.window).len(),
                r -> total.stats.days_in_bands(),
                r -> Self::format_cost(total.stats.total_cost)
            ]);
        }
        table
    }

    fn summary_table(report: &Report) -> Table {
        let mut table = Self::new_table();
        table.set_titles(row![b -> "TOP-3", b -> "TOP-5", b -> "TOP-10", b -> "Keywords"]);
        table.add_row(row![
            c -> report.summary.top1to3,
            c -> report.summary.top4to5,
            c -> report.summary.top6to10,
            c -> report.summary.total_keywords
        ]);
        table
    }
}

impl OutputFormatter for TextFormatter {
    fn format_report(&self, report: &Report) -> String {
        let mut output = format!(
            "{} report {} .. {} (anchor {}, today {})\n",
            report.period.kind,
            report.window.first(),
            report.window.last(),
            report.anchor,
            report.today
        );

        output.push_str(&Self::keyword_table(report).to_string());
        output.push('\n');
        output.push_str(&Self::daily_table(report).to_string());

        if !report.intervals.is_empty() {
            output.push('\n');
            output.push_str(&Self::interval_table(report).to_string());
        }

        output.push_str(&format!("\nPositions on {}\n", report.summary_date));
        output.push_str(&Self::summary_table(report).to_string());
        output
    }

    fn format_intervals(&self, intervals: &[BillingInterval]) -> String {
        intervals
            .iter()
            .map(|interval| {
                let partial = if interval.is_partial() {
                    " (partial)"
                } else {
                    ""
                };
                format!("{}  {}{}", interval.key(), interval.label, partial)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_window(&self, window: &CalendarWindow) -> String {
        window.keys().join("\n")
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> String {
        serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
    }

    fn format_intervals(&self, intervals: &[BillingInterval]) -> String {
        let output = json!({
            "intervals": intervals.iter().map(|i| json!({
                "key": i.key(),
                "start_date": i.start_date,
                "end_date": i.end_date,
                "label": i.label,
                "partial": i.is_partial(),
                "days": i.span_days(),
            })).collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }

    fn format_window(&self, window: &CalendarWindow) -> String {
        let output = json!({
            "period": window.kind(),
            "first": window.first(),
            "last": window.last(),
            "dates": window.keys(),
        });
        serde_json::to_string_pretty(&output).unwrap_or_default()
    }
}

/// Pick the formatter for the requested output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TextFormatter)
    }
}
