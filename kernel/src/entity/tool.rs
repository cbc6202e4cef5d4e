mod duration_unit;
mod id;
mod name;
mod status;

pub use self::{duration_unit::*, id::*, name::*, status::*};
use destructure::{Destructure, Mutation};
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{Cents, OrganizationId, PriceSnapshot, UserId};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure, Mutation)]
pub struct Tool {
    id: ToolId,
    org_id: OrganizationId,
    owner_id: UserId,
    name: ToolName,
    duration_unit: DurationUnit,
    daily_price: Cents,
    weekly_price: Cents,
    monthly_price: Cents,
    replacement_cost: Cents,
    status: ToolStatus,
}

impl Tool {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ToolId,
        org_id: OrganizationId,
        owner_id: UserId,
        name: ToolName,
        duration_unit: DurationUnit,
        daily_price: Cents,
        weekly_price: Cents,
        monthly_price: Cents,
        replacement_cost: Cents,
        status: ToolStatus,
    ) -> Self {
        Self {
            id,
            org_id,
            owner_id,
            name,
            duration_unit,
            daily_price,
            weekly_price,
            monthly_price,
            replacement_cost,
            status,
        }
    }

    /// Freezes the current price sheet for a new rental.
    pub fn price_snapshot(&self) -> PriceSnapshot {
        PriceSnapshot::new(
            self.duration_unit,
            self.daily_price,
            self.weekly_price,
            self.monthly_price,
            self.replacement_cost,
        )
    }

    pub fn is_available(&self) -> bool {
        self.status == ToolStatus::Available
    }
}
