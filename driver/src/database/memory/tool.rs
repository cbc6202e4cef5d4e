use error_stack::Report;

use kernel::interface::query::ToolQuery;
use kernel::interface::update::ToolModifier;
use kernel::prelude::entity::{Tool, ToolId, ToolStatus};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryToolRepository;

#[async_trait::async_trait]
impl ToolQuery for MemoryToolRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ToolId,
    ) -> error_stack::Result<Option<Tool>, KernelError> {
        Ok(con.staged.tools.get(id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MemoryTransaction,
        id: &ToolId,
    ) -> error_stack::Result<Option<Tool>, KernelError> {
        self.find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl ToolModifier for MemoryToolRepository {
    type Transaction = MemoryTransaction;

    async fn update_status(
        &self,
        con: &mut MemoryTransaction,
        tool_id: &ToolId,
        status: ToolStatus,
    ) -> error_stack::Result<(), KernelError> {
        let tool = con.staged.tools.remove(tool_id).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("Tool {tool_id} does not exist"))
        })?;
        con.staged
            .tools
            .insert(tool_id.clone(), tool.reconstruct(|t| t.status = status));
        Ok(())
    }
}
