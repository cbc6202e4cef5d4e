use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::LedgerTransaction;
use crate::KernelError;

#[async_trait::async_trait]
pub trait LedgerModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Appends `transaction` and moves the member's cached balance by its
    /// amount, both inside `con`.
    async fn create(
        &self,
        con: &mut Self::Transaction,
        transaction: &LedgerTransaction,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLedgerModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LedgerModifier: LedgerModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn ledger_modifier(&self) -> &Self::LedgerModifier;
}
