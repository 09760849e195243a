//! Position band pricing for rankstat
//!
//! This crate maps a checked position onto the keyword's price tier and
//! resolves the cost a single position record contributes to a report.

pub mod cost_calculator;

pub use cost_calculator::CostCalculator;
