use kernel::prelude::entity::{DestructLedgerTransaction, LedgerTransaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LedgerTransactionDto {
    pub id: Uuid,
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub kind: String,
    pub related_rental_id: Option<Uuid>,
    pub description: String,
    pub charged_on: Date,
    pub created_at: OffsetDateTime,
}

impl From<LedgerTransaction> for LedgerTransactionDto {
    fn from(value: LedgerTransaction) -> Self {
        let DestructLedgerTransaction {
            id,
            org_id,
            user_id,
            amount,
            kind,
            related_rental_id,
            description,
            charged_on,
            created_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            org_id: org_id.into(),
            user_id: user_id.into(),
            amount_cents: amount.into(),
            kind: kind.as_str().to_string(),
            related_rental_id: related_rental_id.map(Into::into),
            description: description.into(),
            charged_on,
            created_at: created_at.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalanceDto {
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub balance_cents: i64,
}

pub struct GetBalanceDto {
    pub actor: Uuid,
    pub org_id: Uuid,
}

pub struct ListLedgerTransactionsDto {
    pub actor: Uuid,
    pub org_id: Uuid,
    pub page: i32,
    pub page_size: i32,
}
