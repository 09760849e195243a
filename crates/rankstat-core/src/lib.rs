//! Core types and utilities for rankstat
//!
//! This crate provides the foundational domain types, error handling,
//! timezone configuration, and aggregation data types shared by the
//! pricing crate and the report engine.

pub mod aggregation_types;
pub mod error;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{RankstatError, Result};
pub use types::{
    CostMode, DailyDate, Keyword, KeywordId, KeywordPricing, PeriodKind, PeriodSelector,
    PositionBand, PositionRecord, Trend,
};
