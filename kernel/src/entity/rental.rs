mod date_change;
mod filter;
mod id;
mod note;
mod operation;
mod period;
mod return_report;
mod snapshot;
mod status;
mod transition;

pub use self::{
    date_change::*, filter::*, id::*, note::*, operation::*, period::*, return_report::*,
    snapshot::*, status::*, transition::*,
};
use destructure::{Destructure, Mutation};
use time::Date;
use vodca::References;

use crate::entity::{Cents, CreatedAt, OrganizationId, ToolId, UpdatedAt, UserId, Version};

/// A time-boxed booking of a tool by a renter from its owner.
///
/// Fields only change through the guarded transitions in `transition.rs`;
/// `new` exists to rebuild a rental from storage.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Rental {
    id: RentalId,
    org_id: OrganizationId,
    tool_id: ToolId,
    renter_id: UserId,
    owner_id: UserId,
    period: RentalPeriod,
    last_agreed_end_date: Option<Date>,
    price: PriceSnapshot,
    total_cost: Cents,
    status: RentalStatus,
    completed_by: Option<UserId>,
    pickup_note: Option<PickupNote>,
    rejection_reason: Option<RejectionReason>,
    cancellation_reason: Option<CancellationReason>,
    return_report: Option<ReturnReport>,
    date_change: Option<DateChangeRequest>,
    counter_proposal: Option<CounterProposal>,
    version: Version<Rental>,
    created_at: CreatedAt<Rental>,
    updated_at: UpdatedAt<Rental>,
}

impl Rental {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RentalId,
        org_id: OrganizationId,
        tool_id: ToolId,
        renter_id: UserId,
        owner_id: UserId,
        period: RentalPeriod,
        last_agreed_end_date: Option<Date>,
        price: PriceSnapshot,
        total_cost: Cents,
        status: RentalStatus,
        completed_by: Option<UserId>,
        pickup_note: Option<PickupNote>,
        rejection_reason: Option<RejectionReason>,
        cancellation_reason: Option<CancellationReason>,
        return_report: Option<ReturnReport>,
        date_change: Option<DateChangeRequest>,
        counter_proposal: Option<CounterProposal>,
        version: Version<Rental>,
        created_at: CreatedAt<Rental>,
        updated_at: UpdatedAt<Rental>,
    ) -> Self {
        Self {
            id,
            org_id,
            tool_id,
            renter_id,
            owner_id,
            period,
            last_agreed_end_date,
            price,
            total_cost,
            status,
            completed_by,
            pickup_note,
            rejection_reason,
            cancellation_reason,
            return_report,
            date_change,
            counter_proposal,
            version,
            created_at,
            updated_at,
        }
    }

    pub fn is_party(&self, user_id: &UserId) -> bool {
        &self.renter_id == user_id || &self.owner_id == user_id
    }
}
