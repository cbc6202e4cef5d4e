use error_stack::Report;
use time::Date;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{Rental, RentalFilter, RentalId, RentalStatus, ToolId, UserId};
use kernel::KernelError;

use crate::database::memory::MemoryTransaction;

pub struct MemoryRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for MemoryRentalRepository {
    type Transaction = MemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        Ok(con.staged.rentals.get(id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut MemoryTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        self.find_by_id(con, id).await
    }

    async fn find_by_renter(
        &self,
        con: &mut MemoryTransaction,
        renter_id: &UserId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        Ok(select(con, filter, |rental| rental.renter_id() == renter_id))
    }

    async fn find_by_owner(
        &self,
        con: &mut MemoryTransaction,
        owner_id: &UserId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        Ok(select(con, filter, |rental| rental.owner_id() == owner_id))
    }

    async fn find_by_tool(
        &self,
        con: &mut MemoryTransaction,
        tool_id: &ToolId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        Ok(select(con, filter, |rental| rental.tool_id() == tool_id))
    }

    async fn find_overdue(
        &self,
        con: &mut MemoryTransaction,
        today: Date,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let filter = RentalFilter::with_statuses([RentalStatus::Active]);
        Ok(select(con, &filter, |rental| rental.period().end() < today))
    }
}

#[async_trait::async_trait]
impl RentalModifier for MemoryRentalRepository {
    type Transaction = MemoryTransaction;

    async fn create(
        &self,
        con: &mut MemoryTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.rentals.contains_key(rental.id()) {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Rental {} already exists", rental.id())));
        }
        con.staged
            .rentals
            .insert(rental.id().clone(), rental.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MemoryTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con.staged.rentals.get(rental.id()).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("Rental {} does not exist", rental.id()))
        })?;
        if stored.version() != &rental.version().expected_previous() {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Rental {} changed since it was read",
                rental.id()
            )));
        }
        con.staged
            .rentals
            .insert(rental.id().clone(), rental.clone());
        Ok(())
    }
}

/// Newest first, then paged by `filter`.
fn select(
    con: &MemoryTransaction,
    filter: &RentalFilter,
    predicate: impl Fn(&Rental) -> bool,
) -> Vec<Rental> {
    let mut rentals = con
        .staged
        .rentals
        .values()
        .filter(|rental| filter.matches(rental.status()) && predicate(rental))
        .cloned()
        .collect::<Vec<_>>();
    rentals.sort_by(|a, b| b.created_at().as_ref().cmp(a.created_at().as_ref()));
    rentals
        .into_iter()
        .skip(usize::try_from(*filter.offset().as_ref()).unwrap_or_default())
        .take(usize::try_from(*filter.limit().as_ref()).unwrap_or_default())
        .collect()
}
