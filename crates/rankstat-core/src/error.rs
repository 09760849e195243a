//! Error types for rankstat
//!
//! The report engine itself is total: missing data degrades to "no data"
//! rather than failing. Errors only surface at the edges, when parsing
//! user input or loading record files.
//!
//! # Example
//!
//! ```
//! use rankstat_core::error::{RankstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to RankstatError
//!     let _file = std::fs::read_to_string("nonexistent.json")?;
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rankstat operations
#[derive(Error, Debug)]
pub enum RankstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Explicit date range whose start lies after its end
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested first day
        start: NaiveDate,
        /// Requested last day
        end: NaiveDate,
    },

    /// Unknown period kind
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Parse error with file context
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in rankstat
pub type Result<T> = std::result::Result<T, RankstatError>;
