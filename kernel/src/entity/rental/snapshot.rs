use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{Cents, DurationUnit};

/// Prices copied from the tool when the rental was requested. Every later
/// cost calculation for the rental uses these, never the tool's live prices.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct PriceSnapshot {
    duration_unit: DurationUnit,
    daily_price: Cents,
    weekly_price: Cents,
    monthly_price: Cents,
    replacement_cost: Cents,
}

impl PriceSnapshot {
    pub fn new(
        duration_unit: DurationUnit,
        daily_price: Cents,
        weekly_price: Cents,
        monthly_price: Cents,
        replacement_cost: Cents,
    ) -> Self {
        Self {
            duration_unit,
            daily_price,
            weekly_price,
            monthly_price,
            replacement_cost,
        }
    }
}
