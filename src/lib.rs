//! rankstat - Calendar-aligned search position reports with rolling billing intervals
//!
//! This library provides functionality to:
//! - Build week and month calendar windows relative to a given day
//! - Generate rolling 14-day billing intervals anchored to a creation date
//! - Interleave calendar dates with interval summary columns
//! - Index position records by keyword and day
//! - Aggregate costs and position bands, reconciled against server aggregates
//! - Load inputs from JSON/JSONL files and format reports as text or JSON
//!
//! # Examples
//!
//! ```no_run
//! use rankstat::{data_loader::DataLoader, report::ReportBuilder, types::{DailyDate, PeriodSelector}};
//!
//! #[tokio::main]
//! async fn main() -> rankstat::Result<()> {
//!     let input = DataLoader::new("positions.json", "keywords.json").load().await?;
//!
//!     let anchor: DailyDate = "2025-01-01".parse()?;
//!     let today: DailyDate = "2025-02-14".parse()?;
//!     let report = ReportBuilder::new(anchor, today)
//!         .with_period(PeriodSelector::month(-1))
//!         .build(input.records, &input.keywords, input.aggregates)?;
//!
//!     println!("{} columns", report.columns.len());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod billing;
pub mod calendar;
pub mod cli;
pub mod data_loader;
pub mod filters;
pub mod merge;
pub mod output;
pub mod position_index;
pub mod report;

// Re-export the workspace crates under their familiar module paths
pub use rankstat_core::{aggregation_types, error, timezone, types};
pub use rankstat_pricing::cost_calculator;

// Re-export commonly used types
pub use error::{RankstatError, Result};
pub use types::{CostMode, DailyDate, Keyword, KeywordId, PeriodKind, PeriodSelector, PositionRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
