use application::transfer::{GetBalanceDto, ListLedgerTransactionsDto};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;
use crate::request::{default_page_size, first_page, ActorId};

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(default = "first_page")]
    page: i32,
    #[serde(default = "default_page_size")]
    page_size: i32,
}

pub struct LedgerTransformer;

impl Intake<(ActorId, Uuid)> for LedgerTransformer {
    type To = GetBalanceDto;
    fn emit(&self, input: (ActorId, Uuid)) -> Self::To {
        let (ActorId(actor), org_id) = input;
        GetBalanceDto { actor, org_id }
    }
}

impl Intake<(ActorId, Uuid, ListTransactionsQuery)> for LedgerTransformer {
    type To = ListLedgerTransactionsDto;
    fn emit(&self, input: (ActorId, Uuid, ListTransactionsQuery)) -> Self::To {
        let (ActorId(actor), org_id, query) = input;
        ListLedgerTransactionsDto {
            actor,
            org_id,
            page: query.page,
            page_size: query.page_size,
        }
    }
}
