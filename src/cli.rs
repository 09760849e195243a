//! CLI interface for rankstat
//!
//! This module defines the command-line interface using clap:
//! `rankstat <command> [flags]`.
//!
//! # Example
//!
//! ```bash
//! # Report for the previous month, billing intervals anchored at project creation
//! rankstat report --positions positions.json --keywords keywords.json \
//!     --anchor 2025-01-01 --period month --offset -1
//!
//! # Same report, reconciled against server aggregates, as JSON
//! rankstat --json report --positions positions.jsonl --keywords keywords.json \
//!     --aggregates intervals.json --anchor 2025-01-01
//!
//! # List billing intervals up to a date
//! rankstat intervals --anchor 2025-01-01 --until 2025-03-31
//!
//! # Dates of next week
//! rankstat window --period week --offset 1
//! ```

use crate::error::{RankstatError, Result};
use crate::timezone::TimezoneConfig;
use crate::types::{CostMode, DailyDate, PeriodKind, PeriodSelector};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Calendar-aligned search position reports with rolling billing intervals
#[derive(Parser, Debug, Clone)]
#[command(name = "rankstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Cost calculation mode (auto, calculate, display)
    #[arg(long, default_value = "auto", global = true)]
    pub mode: CostMode,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Timezone used to determine today (e.g. "Europe/Moscow", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC to determine today (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<DailyDate>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The date all relative periods are computed from
    pub fn resolve_today(&self) -> Result<DailyDate> {
        if let Some(today) = self.today {
            return Ok(today);
        }
        let config = TimezoneConfig::from_cli(self.timezone.as_deref(), self.utc)?;
        let today = config.today();
        debug!("Resolved today as {} in {}", today, config.display_name());
        Ok(today)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a position and cost report for a period
    Report(ReportArgs),
    /// List billing intervals from an anchor date
    Intervals(IntervalsArgs),
    /// List the dates of a calendar window
    Window(WindowArgs),
}

/// Arguments for the report command
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Position records (JSON array, or JSONL with a .jsonl extension)
    #[arg(long)]
    pub positions: PathBuf,

    /// Keywords with their price tiers (JSON array)
    #[arg(long)]
    pub keywords: PathBuf,

    /// Server interval aggregates (JSON array)
    #[arg(long)]
    pub aggregates: Option<PathBuf>,

    /// First day of the first billing interval (YYYY-MM-DD)
    #[arg(long)]
    pub anchor: DailyDate,

    /// Period to report (week, month, custom)
    #[arg(long, default_value = "month")]
    pub period: PeriodKind,

    /// Periods relative to the current one (0 = current, -1 = previous)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i32,

    /// First day of a custom period
    #[arg(long, requires = "end")]
    pub start: Option<DailyDate>,

    /// Last day of a custom period
    #[arg(long, requires = "start")]
    pub end: Option<DailyDate>,

    /// Show only billing intervals that have already ended
    #[arg(long)]
    pub completed_only: bool,
}

impl ReportArgs {
    pub fn period_selector(&self) -> PeriodSelector {
        PeriodSelector::new(self.period, self.offset)
    }

    /// Explicit range of a custom period
    ///
    /// # Errors
    ///
    /// Returns an error when a custom period lacks `--start`/`--end`, or
    /// when a range is given for a week or month period.
    pub fn custom_range(&self) -> Result<Option<(DailyDate, DailyDate)>> {
        match (self.period, self.start, self.end) {
            (PeriodKind::Custom, Some(start), Some(end)) => Ok(Some((start, end))),
            (PeriodKind::Custom, _, _) => Err(RankstatError::InvalidArgument(
                "--period custom requires --start and --end".to_string(),
            )),
            (_, None, None) => Ok(None),
            (kind, _, _) => Err(RankstatError::InvalidArgument(format!(
                "--start/--end only apply to custom periods, not {kind}"
            ))),
        }
    }
}

/// Arguments for the intervals command
#[derive(Args, Debug, Clone)]
pub struct IntervalsArgs {
    /// First day of the first billing interval (YYYY-MM-DD)
    #[arg(long)]
    pub anchor: DailyDate,

    /// Last day to generate intervals for (defaults to today)
    #[arg(long)]
    pub until: Option<DailyDate>,
}

/// Arguments for the window command
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Window kind (week or month)
    #[arg(long, default_value = "month")]
    pub period: PeriodKind,

    /// Periods relative to the current one
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i32,
}

impl WindowArgs {
    /// Selector for a generated window
    ///
    /// # Errors
    ///
    /// Custom periods have no generation rule and are rejected.
    pub fn period_selector(&self) -> Result<PeriodSelector> {
        if self.period == PeriodKind::Custom {
            return Err(RankstatError::InvalidPeriod(
                "custom windows need an explicit range; use `report --start --end`".to_string(),
            ));
        }
        Ok(PeriodSelector::new(self.period, self.offset))
    }
}
