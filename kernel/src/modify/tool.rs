use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{ToolId, ToolStatus};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ToolModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn update_status(
        &self,
        con: &mut Self::Transaction,
        tool_id: &ToolId,
        status: ToolStatus,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnToolModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type ToolModifier: ToolModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn tool_modifier(&self) -> &Self::ToolModifier;
}
