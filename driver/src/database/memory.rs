use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{
    Cents, LedgerTransaction, OrganizationId, Rental, RentalId, Tool, ToolId, User, UserId,
};
use kernel::KernelError;

pub use self::{ledger::*, rental::*, tool::*, user::*};

mod ledger;
mod rental;
mod tool;
mod user;

const LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-local store. Transactions are serialized: each one holds the whole
/// store until it commits or is dropped, so row locks come for free.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<Mutex<MemoryStore>>,
}

#[derive(Clone, Default)]
pub(in crate::database) struct MemoryStore {
    users: HashMap<UserId, User>,
    memberships: HashMap<(OrganizationId, UserId), Cents>,
    tools: HashMap<ToolId, Tool>,
    rentals: HashMap<RentalId, Rental>,
    ledger: Vec<LedgerTransaction>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        let mut store = self.store.lock().await;
        store.users.insert(user.id().clone(), user);
    }

    /// Seats `user_id` in `org_id` with a zero balance.
    pub async fn insert_membership(&self, org_id: OrganizationId, user_id: UserId) {
        let mut store = self.store.lock().await;
        store
            .memberships
            .entry((org_id, user_id))
            .or_insert(Cents::ZERO);
    }

    pub async fn insert_tool(&self, tool: Tool) {
        let mut store = self.store.lock().await;
        store.tools.insert(tool.id().clone(), tool);
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = tokio::time::timeout(LOCK_TIMEOUT, Arc::clone(&self.store).lock_owned())
            .await
            .map_err(|error| Report::new(error).change_context(KernelError::Timeout))?;
        let staged = guard.clone();
        Ok(MemoryTransaction { guard, staged })
    }
}

/// Works on a private copy of the store that replaces the shared one on commit.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryStore>,
    staged: MemoryStore,
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let MemoryTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::UserQuery;
    use kernel::prelude::entity::{User, UserEmail, UserId, UserName};
    use kernel::KernelError;

    use crate::database::memory::{MemoryDatabase, MemoryUserRepository};

    fn user() -> User {
        User::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("tester"),
            UserEmail::new("tester@example.com"),
        )
    }

    #[tokio::test]
    async fn dropped_transaction_leaves_no_trace() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let user = user();
        {
            let mut connection = db.transact().await?;
            connection.staged.users.insert(user.id().clone(), user.clone());
        }
        let mut connection = db.transact().await?;
        let found = MemoryUserRepository
            .find_by_id(&mut connection, user.id())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() -> error_stack::Result<(), KernelError> {
        let db = MemoryDatabase::new();
        let user = user();
        let mut connection = db.transact().await?;
        connection.staged.users.insert(user.id().clone(), user.clone());
        connection.commit().await?;

        let mut connection = db.transact().await?;
        let found = MemoryUserRepository
            .find_by_id(&mut connection, user.id())
            .await?;
        assert_eq!(found, Some(user));
        Ok(())
    }
}
