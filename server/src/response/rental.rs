use application::transfer::{
    CounterProposalDto, DateChangeDto, FinalizeRentalResultDto, RentalDto,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct DateChangeResponse {
    start_date: String,
    end_date: String,
    total_cost_cents: i64,
    requested_by: Uuid,
    prior_status: String,
}

impl From<DateChangeDto> for DateChangeResponse {
    fn from(value: DateChangeDto) -> Self {
        Self {
            start_date: value.start_date.to_string(),
            end_date: value.end_date.to_string(),
            total_cost_cents: value.total_cost_cents,
            requested_by: value.requested_by,
            prior_status: value.prior_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CounterProposalResponse {
    end_date: String,
    total_cost_cents: i64,
    reason: Option<String>,
}

impl From<CounterProposalDto> for CounterProposalResponse {
    fn from(value: CounterProposalDto) -> Self {
        Self {
            end_date: value.end_date.to_string(),
            total_cost_cents: value.total_cost_cents,
            reason: value.reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RentalResponse {
    id: Uuid,
    org_id: Uuid,
    tool_id: Uuid,
    renter_id: Uuid,
    owner_id: Uuid,
    start_date: String,
    end_date: String,
    last_agreed_end_date: Option<String>,
    duration_unit: String,
    daily_price_cents: i64,
    weekly_price_cents: i64,
    monthly_price_cents: i64,
    replacement_cost_cents: i64,
    total_cost_cents: i64,
    status: String,
    completed_by: Option<Uuid>,
    pickup_note: Option<String>,
    rejection_reason: Option<String>,
    cancellation_reason: Option<String>,
    return_condition: Option<String>,
    surcharge_or_credit_cents: Option<i64>,
    notes: Option<String>,
    date_change: Option<DateChangeResponse>,
    counter_proposal: Option<CounterProposalResponse>,
    version: i64,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<RentalDto> for RentalResponse {
    fn from(value: RentalDto) -> Self {
        Self {
            id: value.id,
            org_id: value.org_id,
            tool_id: value.tool_id,
            renter_id: value.renter_id,
            owner_id: value.owner_id,
            start_date: value.start_date.to_string(),
            end_date: value.end_date.to_string(),
            last_agreed_end_date: value.last_agreed_end_date.map(|date| date.to_string()),
            duration_unit: value.duration_unit,
            daily_price_cents: value.daily_price_cents,
            weekly_price_cents: value.weekly_price_cents,
            monthly_price_cents: value.monthly_price_cents,
            replacement_cost_cents: value.replacement_cost_cents,
            total_cost_cents: value.total_cost_cents,
            status: value.status,
            completed_by: value.completed_by,
            pickup_note: value.pickup_note,
            rejection_reason: value.rejection_reason,
            cancellation_reason: value.cancellation_reason,
            return_condition: value.return_condition,
            surcharge_or_credit_cents: value.surcharge_or_credit_cents,
            notes: value.notes,
            date_change: value.date_change.map(DateChangeResponse::from),
            counter_proposal: value.counter_proposal.map(CounterProposalResponse::from),
            version: value.version,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl IntoResponse for RentalResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRentalResponse(RentalResponse);

impl IntoResponse for CreatedRentalResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct FinalizedRentalResponse {
    rental: RentalResponse,
    siblings: Vec<RentalResponse>,
}

impl IntoResponse for FinalizedRentalResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct RentalPresenter;

impl Exhaust<RentalDto> for RentalPresenter {
    type To = RentalResponse;
    fn emit(&self, input: RentalDto) -> Self::To {
        RentalResponse::from(input)
    }
}

impl Exhaust<Vec<RentalDto>> for RentalPresenter {
    type To = Json<Vec<RentalResponse>>;
    fn emit(&self, input: Vec<RentalDto>) -> Self::To {
        Json(input.into_iter().map(RentalResponse::from).collect())
    }
}

impl Exhaust<FinalizeRentalResultDto> for RentalPresenter {
    type To = FinalizedRentalResponse;
    fn emit(&self, input: FinalizeRentalResultDto) -> Self::To {
        FinalizedRentalResponse {
            rental: RentalResponse::from(input.rental),
            siblings: input
                .siblings
                .into_iter()
                .map(RentalResponse::from)
                .collect(),
        }
    }
}

pub struct CreatedRentalPresenter;

impl Exhaust<RentalDto> for CreatedRentalPresenter {
    type To = CreatedRentalResponse;
    fn emit(&self, input: RentalDto) -> Self::To {
        CreatedRentalResponse(RentalResponse::from(input))
    }
}
