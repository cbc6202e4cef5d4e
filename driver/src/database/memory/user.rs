use kernel::interface::query::{MembershipQuery, UserQuery};
use kernel::prelude::entity::{Membership, OrganizationId, User, UserId};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.staged.users.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl MembershipQuery for MemoryUserRepository {
    type Transaction = MemoryTransaction;

    async fn find(
        &self,
        con: &mut MemoryTransaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Membership>, KernelError> {
        let key = (org_id.clone(), user_id.clone());
        Ok(con
            .staged
            .memberships
            .get(&key)
            .map(|balance| Membership::new(org_id.clone(), user_id.clone(), *balance)))
    }
}
