use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{
    DependOnLedgerQuery, DependOnMembershipQuery, LedgerQuery, MembershipQuery,
};
use kernel::interface::update::{DependOnLedgerModifier, LedgerModifier};
use kernel::prelude::entity::{
    paginate, today, Cents, CreatedAt, LedgerDescription, LedgerTransaction, LedgerTransactionId,
    LedgerTransactionType, OrganizationId, RentalId, UserId,
};
use kernel::KernelError;

use crate::transfer::{BalanceDto, GetBalanceDto, LedgerTransactionDto, ListLedgerTransactionsDto};

/// Posting and balance reads inside a caller's unit of work. The balance is
/// always the sum of the ledger, never the cached membership column.
#[async_trait::async_trait]
pub trait LedgerAccount:
    'static + Sync + Send + DependOnLedgerQuery + DependOnLedgerModifier
{
    #[allow(clippy::too_many_arguments)]
    async fn post_transaction(
        &self,
        con: &mut <Self::DatabaseConnection as DatabaseConnection>::Transaction,
        org_id: &OrganizationId,
        user_id: &UserId,
        amount: Cents,
        kind: LedgerTransactionType,
        related_rental_id: Option<&RentalId>,
        description: &str,
    ) -> error_stack::Result<LedgerTransaction, KernelError> {
        let transaction = LedgerTransaction::new(
            LedgerTransactionId::new(Uuid::new_v4()),
            org_id.clone(),
            user_id.clone(),
            amount,
            kind,
            related_rental_id.cloned(),
            LedgerDescription::new(description),
            today(),
            CreatedAt::now(),
        );
        self.ledger_modifier().create(con, &transaction).await?;
        tracing::debug!(
            "Posted {kind} of {amount} to user {user_id} in org {org_id} ({})",
            transaction.id()
        );
        Ok(transaction)
    }

    async fn balance(
        &self,
        con: &mut <Self::DatabaseConnection as DatabaseConnection>::Transaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Cents, KernelError> {
        self.ledger_query().balance(con, org_id, user_id).await
    }
}

impl<T> LedgerAccount for T where T: DependOnLedgerQuery + DependOnLedgerModifier {}

#[async_trait::async_trait]
pub trait GetLedgerService:
    'static + Sync + Send + DependOnLedgerQuery + DependOnMembershipQuery
{
    async fn get_balance(&self, dto: GetBalanceDto) -> error_stack::Result<BalanceDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let org_id = OrganizationId::new(dto.org_id);
        let user_id = UserId::new(dto.actor);
        ensure_member(
            self.membership_query()
                .find(&mut connection, &org_id, &user_id)
                .await?
                .is_some(),
            &org_id,
            &user_id,
        )?;
        let balance = self
            .ledger_query()
            .balance(&mut connection, &org_id, &user_id)
            .await?;
        Ok(BalanceDto {
            org_id: org_id.into(),
            user_id: user_id.into(),
            balance_cents: balance.into(),
        })
    }

    async fn list_transactions(
        &self,
        dto: ListLedgerTransactionsDto,
    ) -> error_stack::Result<Vec<LedgerTransactionDto>, KernelError> {
        let (limit, offset) = paginate(dto.page, dto.page_size)?;
        let mut connection = self.database_connection().transact().await?;
        let org_id = OrganizationId::new(dto.org_id);
        let user_id = UserId::new(dto.actor);
        ensure_member(
            self.membership_query()
                .find(&mut connection, &org_id, &user_id)
                .await?
                .is_some(),
            &org_id,
            &user_id,
        )?;
        let transactions = self
            .ledger_query()
            .find_by_user(&mut connection, &org_id, &user_id, &limit, &offset)
            .await?;
        Ok(transactions
            .into_iter()
            .map(LedgerTransactionDto::from)
            .collect())
    }
}

impl<T> GetLedgerService for T where T: DependOnLedgerQuery + DependOnMembershipQuery {}

pub(crate) fn ensure_member(
    is_member: bool,
    org_id: &OrganizationId,
    user_id: &UserId,
) -> error_stack::Result<(), KernelError> {
    if is_member {
        Ok(())
    } else {
        Err(Report::new(KernelError::Unauthorized)
            .attach_printable(format!("User {user_id} is not a member of org {org_id}")))
    }
}
