use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{
    Cents, LedgerTransaction, OrganizationId, RentalId, SelectLimit, SelectOffset, UserId,
};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LedgerQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Sum of every posting for the member. Zero when there are none.
    async fn balance(
        &self,
        con: &mut Self::Transaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Cents, KernelError>;
    /// Newest first.
    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        org_id: &OrganizationId,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError>;
    /// Oldest first.
    async fn find_by_rental(
        &self,
        con: &mut Self::Transaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError>;
}

pub trait DependOnLedgerQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LedgerQuery: LedgerQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn ledger_query(&self) -> &Self::LedgerQuery;
}
