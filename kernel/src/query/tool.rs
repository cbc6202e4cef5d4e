use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Tool, ToolId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ToolQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ToolId,
    ) -> error_stack::Result<Option<Tool>, KernelError>;
    /// Locks the tool row for the rest of `con`; competing lockers wait.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &ToolId,
    ) -> error_stack::Result<Option<Tool>, KernelError>;
}

pub trait DependOnToolQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ToolQuery: ToolQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn tool_query(&self) -> &Self::ToolQuery;
}
