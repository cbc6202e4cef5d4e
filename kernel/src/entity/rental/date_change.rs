use destructure::Destructure;
use serde::{Deserialize, Serialize};
use time::Date;
use vodca::References;

use crate::entity::{Cents, RejectionReason, RentalPeriod, RentalStatus, UserId};

/// A proposed new date range that has not been agreed yet. The committed
/// dates and cost on the rental stay untouched until it is accepted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct DateChangeRequest {
    period: RentalPeriod,
    total_cost: Cents,
    requested_by: UserId,
    prior_status: RentalStatus,
}

impl DateChangeRequest {
    pub fn new(
        period: RentalPeriod,
        total_cost: Cents,
        requested_by: UserId,
        prior_status: RentalStatus,
    ) -> Self {
        Self {
            period,
            total_cost,
            requested_by,
            prior_status,
        }
    }
}

/// The owner's answer to a rejected date change.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct CounterProposal {
    end_date: Date,
    total_cost: Cents,
    reason: Option<RejectionReason>,
}

impl CounterProposal {
    pub fn new(end_date: Date, total_cost: Cents, reason: Option<RejectionReason>) -> Self {
        Self {
            end_date,
            total_cost,
            reason,
        }
    }
}
