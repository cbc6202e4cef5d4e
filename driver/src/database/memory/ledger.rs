use error_stack::Report;

use kernel::interface::query::LedgerQuery;
use kernel::interface::update::LedgerModifier;
use kernel::prelude::entity::{
    Cents, LedgerTransaction, OrganizationId, RentalId, SelectLimit, SelectOffset, UserId,
};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryLedgerRepository;

#[async_trait::async_trait]
impl LedgerQuery for MemoryLedgerRepository {
    type Transaction = MemoryTransaction;

    async fn balance(
        &self,
        con: &mut MemoryTransaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Cents, KernelError> {
        Cents::checked_sum(
            con.staged
                .ledger
                .iter()
                .filter(|posting| posting.org_id() == org_id && posting.user_id() == user_id)
                .map(|posting| *posting.amount()),
        )
    }

    async fn find_by_user(
        &self,
        con: &mut MemoryTransaction,
        org_id: &OrganizationId,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
        // Postings are appended in order, so reversing yields newest first.
        Ok(con
            .staged
            .ledger
            .iter()
            .rev()
            .filter(|posting| posting.org_id() == org_id && posting.user_id() == user_id)
            .skip(usize::try_from(*offset.as_ref()).unwrap_or_default())
            .take(usize::try_from(*limit.as_ref()).unwrap_or_default())
            .cloned()
            .collect())
    }

    async fn find_by_rental(
        &self,
        con: &mut MemoryTransaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
        Ok(con
            .staged
            .ledger
            .iter()
            .filter(|posting| posting.related_rental_id().as_ref() == Some(rental_id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl LedgerModifier for MemoryLedgerRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        transaction: &LedgerTransaction,
    ) -> error_stack::Result<(), KernelError> {
        let key = (transaction.org_id().clone(), transaction.user_id().clone());
        let balance = con.staged.memberships.get_mut(&key).ok_or_else(|| {
            Report::new(KernelError::NotFound).attach_printable(format!(
                "User {} is not a member of org {}",
                transaction.user_id(),
                transaction.org_id()
            ))
        })?;
        *balance = balance.checked_add(*transaction.amount())?;
        con.staged.ledger.push(transaction.clone());
        Ok(())
    }
}
