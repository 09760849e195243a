//! Cost calculator for position records
//!
//! A keyword is billed per day according to the band its position falls in:
//! 1–3, 4–5 or 6–10. Positions outside the top ten, and days where the
//! keyword was not found at all, cost nothing.
//!
//! # Examples
//!
//! ```
//! use rankstat_core::types::{CostMode, KeywordPricing};
//! use rankstat_pricing::CostCalculator;
//!
//! let pricing = KeywordPricing::new(100.0, 50.0, 30.0);
//! assert_eq!(CostCalculator::calculate_from_pricing(Some(2), &pricing), 100.0);
//! assert_eq!(CostCalculator::calculate_from_pricing(Some(11), &pricing), 0.0);
//!
//! let calculator = CostCalculator::new(CostMode::Auto);
//! assert_eq!(calculator.mode(), CostMode::Auto);
//! ```

use rankstat_core::types::{CostMode, KeywordPricing, PositionBand, PositionRecord};
use tracing::debug;

/// Resolves record costs according to a [`CostMode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CostCalculator {
    mode: CostMode,
}

impl CostCalculator {
    /// Create a new CostCalculator
    pub fn new(mode: CostMode) -> Self {
        Self { mode }
    }

    /// The configured cost mode
    pub fn mode(&self) -> CostMode {
        self.mode
    }

    /// Price of one day at `position` under the given tiers
    ///
    /// This is a pure function of the position and the tiers.
    pub fn calculate_from_pricing(position: Option<u32>, pricing: &KeywordPricing) -> f64 {
        position
            .and_then(PositionBand::of)
            .map_or(0.0, |band| pricing.price_for(band))
    }

    /// Cost a record contributes, honouring the configured mode
    ///
    /// - `Auto`: the record's own cost when present, otherwise the price tier
    /// - `Calculate`: always the price tier
    /// - `Display`: always the record's own cost, zero when absent
    pub fn record_cost(&self, record: &PositionRecord, pricing: &KeywordPricing) -> f64 {
        match self.mode {
            CostMode::Auto => match record.cost {
                Some(cost) => cost,
                None => {
                    let cost = Self::calculate_from_pricing(record.position, pricing);
                    debug!(
                        "Priced {} on {} from tier: {:.2}",
                        record.keyword_id, record.checked_at, cost
                    );
                    cost
                }
            },
            CostMode::Calculate => Self::calculate_from_pricing(record.position, pricing),
            CostMode::Display => record.cost.unwrap_or(0.0),
        }
    }
}
