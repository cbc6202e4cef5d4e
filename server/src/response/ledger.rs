use application::transfer::{BalanceDto, LedgerTransactionDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    org_id: Uuid,
    user_id: Uuid,
    balance_cents: i64,
}

impl IntoResponse for BalanceResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct LedgerTransactionResponse {
    id: Uuid,
    org_id: Uuid,
    user_id: Uuid,
    amount_cents: i64,
    #[serde(rename = "type")]
    kind: String,
    related_rental_id: Option<Uuid>,
    description: String,
    charged_on: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

pub struct LedgerPresenter;

impl Exhaust<BalanceDto> for LedgerPresenter {
    type To = BalanceResponse;
    fn emit(&self, input: BalanceDto) -> Self::To {
        BalanceResponse {
            org_id: input.org_id,
            user_id: input.user_id,
            balance_cents: input.balance_cents,
        }
    }
}

impl Exhaust<Vec<LedgerTransactionDto>> for LedgerPresenter {
    type To = Json<Vec<LedgerTransactionResponse>>;
    fn emit(&self, input: Vec<LedgerTransactionDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(|transaction| LedgerTransactionResponse {
                id: transaction.id,
                org_id: transaction.org_id,
                user_id: transaction.user_id,
                amount_cents: transaction.amount_cents,
                kind: transaction.kind,
                related_rental_id: transaction.related_rental_id,
                description: transaction.description,
                charged_on: transaction.charged_on.to_string(),
                created_at: transaction.created_at,
            })
            .collect::<Vec<_>>();

        Json::from(result)
    }
}
