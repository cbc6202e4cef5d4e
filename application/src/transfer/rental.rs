use std::str::FromStr;

use error_stack::Report;
use kernel::prelude::entity::{
    paginate, DestructCounterProposal, DestructDateChangeRequest, DestructPriceSnapshot,
    DestructRental, DestructReturnReport, Rental, RentalFilter, RentalStatus,
};
use kernel::KernelError;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RentalDto {
    pub id: Uuid,
    pub org_id: Uuid,
    pub tool_id: Uuid,
    pub renter_id: Uuid,
    pub owner_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub last_agreed_end_date: Option<Date>,
    pub duration_unit: String,
    pub daily_price_cents: i64,
    pub weekly_price_cents: i64,
    pub monthly_price_cents: i64,
    pub replacement_cost_cents: i64,
    pub total_cost_cents: i64,
    pub status: String,
    pub completed_by: Option<Uuid>,
    pub pickup_note: Option<String>,
    pub rejection_reason: Option<String>,
    pub cancellation_reason: Option<String>,
    pub return_condition: Option<String>,
    pub surcharge_or_credit_cents: Option<i64>,
    pub notes: Option<String>,
    pub date_change: Option<DateChangeDto>,
    pub counter_proposal: Option<CounterProposalDto>,
    pub version: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct DateChangeDto {
    pub start_date: Date,
    pub end_date: Date,
    pub total_cost_cents: i64,
    pub requested_by: Uuid,
    pub prior_status: String,
}

#[derive(Debug, Clone)]
pub struct CounterProposalDto {
    pub end_date: Date,
    pub total_cost_cents: i64,
    pub reason: Option<String>,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
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
        } = value.into_destruct();
        let DestructPriceSnapshot {
            duration_unit,
            daily_price,
            weekly_price,
            monthly_price,
            replacement_cost,
        } = price.into_destruct();
        let (return_condition, surcharge_or_credit_cents, notes) = match return_report {
            Some(report) => {
                let DestructReturnReport {
                    condition,
                    surcharge_or_credit,
                    notes,
                } = report.into_destruct();
                (
                    Some(condition.into()),
                    Some(surcharge_or_credit.into()),
                    notes.map(Into::into),
                )
            }
            None => (None, None, None),
        };
        Self {
            id: id.into(),
            org_id: org_id.into(),
            tool_id: tool_id.into(),
            renter_id: renter_id.into(),
            owner_id: owner_id.into(),
            start_date: period.start(),
            end_date: period.end(),
            last_agreed_end_date,
            duration_unit: duration_unit.as_str().to_string(),
            daily_price_cents: daily_price.into(),
            weekly_price_cents: weekly_price.into(),
            monthly_price_cents: monthly_price.into(),
            replacement_cost_cents: replacement_cost.into(),
            total_cost_cents: total_cost.into(),
            status: status.as_str().to_string(),
            completed_by: completed_by.map(Into::into),
            pickup_note: pickup_note.map(Into::into),
            rejection_reason: rejection_reason.map(Into::into),
            cancellation_reason: cancellation_reason.map(Into::into),
            return_condition,
            surcharge_or_credit_cents,
            notes,
            date_change: date_change.map(|request| {
                let DestructDateChangeRequest {
                    period,
                    total_cost,
                    requested_by,
                    prior_status,
                } = request.into_destruct();
                DateChangeDto {
                    start_date: period.start(),
                    end_date: period.end(),
                    total_cost_cents: total_cost.into(),
                    requested_by: requested_by.into(),
                    prior_status: prior_status.as_str().to_string(),
                }
            }),
            counter_proposal: counter_proposal.map(|counter| {
                let DestructCounterProposal {
                    end_date,
                    total_cost,
                    reason,
                } = counter.into_destruct();
                CounterProposalDto {
                    end_date,
                    total_cost_cents: total_cost.into(),
                    reason: reason.map(Into::into),
                }
            }),
            version: *version.as_ref(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FinalizeRentalResultDto {
    pub rental: RentalDto,
    /// Other open requests for the same tool. They are left as they are.
    pub siblings: Vec<RentalDto>,
}

pub struct CreateRentalDto {
    pub actor: Uuid,
    pub tool_id: Uuid,
    pub start_date: String,
    pub end_date: String,
}

/// Transitions that need nothing but the caller and the rental.
pub struct RentalActionDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
}

pub struct ApproveRentalDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
    pub pickup_note: Option<String>,
}

pub struct RejectRentalDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
    pub reason: Option<String>,
}

pub struct CompleteRentalDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
    pub return_condition: String,
    pub surcharge_or_credit_cents: i64,
    pub notes: Option<String>,
}

pub struct CancelRentalDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
    pub reason: Option<String>,
}

pub struct ChangeRentalDatesDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
    pub new_start_date: String,
    pub new_end_date: String,
    pub old_start_date: String,
    pub old_end_date: String,
}

pub struct RejectDateChangeDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
    pub reason: Option<String>,
    pub counter_end_date: String,
}

pub struct GetRentalDto {
    pub actor: Uuid,
    pub rental_id: Uuid,
}

pub struct ListRentalsDto {
    pub actor: Uuid,
    pub statuses: Vec<String>,
    pub page: i32,
    pub page_size: i32,
}

pub struct ListToolRentalsDto {
    pub actor: Uuid,
    pub tool_id: Uuid,
    pub statuses: Vec<String>,
    pub page: i32,
    pub page_size: i32,
}

pub(crate) fn rental_filter(
    statuses: &[String],
    page: i32,
    page_size: i32,
) -> error_stack::Result<RentalFilter, KernelError> {
    let (limit, offset) = paginate(page, page_size)?;
    let statuses = statuses
        .iter()
        .map(|status| RentalStatus::from_str(status))
        .collect::<Result<Vec<_>, Report<KernelError>>>()?;
    Ok(RentalFilter::new(statuses, limit, offset))
}
