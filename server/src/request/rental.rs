use application::transfer::{
    ApproveRentalDto, CancelRentalDto, ChangeRentalDatesDto, CompleteRentalDto, CreateRentalDto,
    GetRentalDto, ListRentalsDto, ListToolRentalsDto, RejectDateChangeDto, RejectRentalDto,
    RentalActionDto,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;
use crate::request::{default_page_size, first_page, ActorId};

#[derive(Debug, Deserialize)]
pub struct CreateRentalRequest {
    tool_id: Uuid,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApproveRentalRequest {
    pickup_note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRentalRequest {
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRentalRequest {
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRentalRequest {
    return_condition: String,
    #[serde(default)]
    surcharge_or_credit_cents: i64,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeDatesRequest {
    new_start_date: String,
    new_end_date: String,
    old_start_date: String,
    old_end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectDatesRequest {
    reason: Option<String>,
    counter_end_date: String,
}

/// `?status=PENDING&status=APPROVED&page=1&page_size=20`
#[derive(Debug, Deserialize)]
pub struct ListRentalsQuery {
    #[serde(default)]
    status: Vec<String>,
    #[serde(default = "first_page")]
    page: i32,
    #[serde(default = "default_page_size")]
    page_size: i32,
}

#[derive(Debug)]
pub struct RentalAction {
    actor: ActorId,
    rental_id: Uuid,
}

impl RentalAction {
    pub fn new(actor: ActorId, rental_id: Uuid) -> Self {
        Self { actor, rental_id }
    }
}

#[derive(Debug)]
pub struct GetRentalRequest {
    actor: ActorId,
    rental_id: Uuid,
}

impl GetRentalRequest {
    pub fn new(actor: ActorId, rental_id: Uuid) -> Self {
        Self { actor, rental_id }
    }
}

pub struct RentalTransformer;

impl Intake<(ActorId, CreateRentalRequest)> for RentalTransformer {
    type To = CreateRentalDto;
    fn emit(&self, input: (ActorId, CreateRentalRequest)) -> Self::To {
        let (ActorId(actor), input) = input;
        CreateRentalDto {
            actor,
            tool_id: input.tool_id,
            start_date: input.start_date,
            end_date: input.end_date,
        }
    }
}

impl Intake<GetRentalRequest> for RentalTransformer {
    type To = GetRentalDto;
    fn emit(&self, input: GetRentalRequest) -> Self::To {
        GetRentalDto {
            actor: input.actor.0,
            rental_id: input.rental_id,
        }
    }
}

impl Intake<RentalAction> for RentalTransformer {
    type To = RentalActionDto;
    fn emit(&self, input: RentalAction) -> Self::To {
        RentalActionDto {
            actor: input.actor.0,
            rental_id: input.rental_id,
        }
    }
}

impl Intake<(RentalAction, ApproveRentalRequest)> for RentalTransformer {
    type To = ApproveRentalDto;
    fn emit(&self, input: (RentalAction, ApproveRentalRequest)) -> Self::To {
        let (action, input) = input;
        ApproveRentalDto {
            actor: action.actor.0,
            rental_id: action.rental_id,
            pickup_note: input.pickup_note,
        }
    }
}

impl Intake<(RentalAction, RejectRentalRequest)> for RentalTransformer {
    type To = RejectRentalDto;
    fn emit(&self, input: (RentalAction, RejectRentalRequest)) -> Self::To {
        let (action, input) = input;
        RejectRentalDto {
            actor: action.actor.0,
            rental_id: action.rental_id,
            reason: input.reason,
        }
    }
}

impl Intake<(RentalAction, CancelRentalRequest)> for RentalTransformer {
    type To = CancelRentalDto;
    fn emit(&self, input: (RentalAction, CancelRentalRequest)) -> Self::To {
        let (action, input) = input;
        CancelRentalDto {
            actor: action.actor.0,
            rental_id: action.rental_id,
            reason: input.reason,
        }
    }
}

impl Intake<(RentalAction, CompleteRentalRequest)> for RentalTransformer {
    type To = CompleteRentalDto;
    fn emit(&self, input: (RentalAction, CompleteRentalRequest)) -> Self::To {
        let (action, input) = input;
        CompleteRentalDto {
            actor: action.actor.0,
            rental_id: action.rental_id,
            return_condition: input.return_condition,
            surcharge_or_credit_cents: input.surcharge_or_credit_cents,
            notes: input.notes,
        }
    }
}

impl Intake<(RentalAction, ChangeDatesRequest)> for RentalTransformer {
    type To = ChangeRentalDatesDto;
    fn emit(&self, input: (RentalAction, ChangeDatesRequest)) -> Self::To {
        let (action, input) = input;
        ChangeRentalDatesDto {
            actor: action.actor.0,
            rental_id: action.rental_id,
            new_start_date: input.new_start_date,
            new_end_date: input.new_end_date,
            old_start_date: input.old_start_date,
            old_end_date: input.old_end_date,
        }
    }
}

impl Intake<(RentalAction, RejectDatesRequest)> for RentalTransformer {
    type To = RejectDateChangeDto;
    fn emit(&self, input: (RentalAction, RejectDatesRequest)) -> Self::To {
        let (action, input) = input;
        RejectDateChangeDto {
            actor: action.actor.0,
            rental_id: action.rental_id,
            reason: input.reason,
            counter_end_date: input.counter_end_date,
        }
    }
}

impl Intake<(ActorId, ListRentalsQuery)> for RentalTransformer {
    type To = ListRentalsDto;
    fn emit(&self, input: (ActorId, ListRentalsQuery)) -> Self::To {
        let (ActorId(actor), query) = input;
        ListRentalsDto {
            actor,
            statuses: query.status,
            page: query.page,
            page_size: query.page_size,
        }
    }
}

impl Intake<(ActorId, Uuid, ListRentalsQuery)> for RentalTransformer {
    type To = ListToolRentalsDto;
    fn emit(&self, input: (ActorId, Uuid, ListRentalsQuery)) -> Self::To {
        let (ActorId(actor), tool_id, query) = input;
        ListToolRentalsDto {
            actor,
            tool_id,
            statuses: query.status,
            page: query.page,
            page_size: query.page_size,
        }
    }
}
