use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{
    DependOnMembershipQuery, DependOnRentalQuery, DependOnToolQuery, MembershipQuery, RentalQuery,
    ToolQuery,
};
use kernel::prelude::entity::{Rental, RentalId, Tool, ToolId, UserId};
use kernel::KernelError;

use crate::service::ledger::ensure_member;
use crate::transfer::{
    rental_filter, GetRentalDto, ListRentalsDto, ListToolRentalsDto, RentalDto,
};

#[async_trait::async_trait]
pub trait GetRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnToolQuery + DependOnMembershipQuery
{
    /// Parties always see their rental; anyone else must belong to its org.
    async fn get_rental(&self, dto: GetRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let actor = UserId::new(dto.actor);
        let id = RentalId::new(dto.rental_id);
        let rental = self
            .rental_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| rental_not_found(&id))?;
        if !rental.is_party(&actor) {
            let membership = self
                .membership_query()
                .find(&mut connection, rental.org_id(), &actor)
                .await?;
            ensure_member(membership.is_some(), rental.org_id(), &actor)?;
        }
        Ok(RentalDto::from(rental))
    }

    async fn list_my_rentals(
        &self,
        dto: ListRentalsDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let filter = rental_filter(&dto.statuses, dto.page, dto.page_size)?;
        let mut connection = self.database_connection().transact().await?;
        let rentals = self
            .rental_query()
            .find_by_renter(&mut connection, &UserId::new(dto.actor), &filter)
            .await?;
        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    async fn list_my_lendings(
        &self,
        dto: ListRentalsDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let filter = rental_filter(&dto.statuses, dto.page, dto.page_size)?;
        let mut connection = self.database_connection().transact().await?;
        let rentals = self
            .rental_query()
            .find_by_owner(&mut connection, &UserId::new(dto.actor), &filter)
            .await?;
        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    async fn list_tool_rentals(
        &self,
        dto: ListToolRentalsDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let filter = rental_filter(&dto.statuses, dto.page, dto.page_size)?;
        let mut connection = self.database_connection().transact().await?;
        let actor = UserId::new(dto.actor);
        let tool_id = ToolId::new(dto.tool_id);
        let tool = self
            .tool_query()
            .find_by_id(&mut connection, &tool_id)
            .await?
            .ok_or_else(|| tool_not_found(&tool_id))?;
        let membership = self
            .membership_query()
            .find(&mut connection, tool.org_id(), &actor)
            .await?;
        ensure_member(membership.is_some(), tool.org_id(), &actor)?;
        let rentals = self
            .rental_query()
            .find_by_tool(&mut connection, &tool_id, &filter)
            .await?;
        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }
}

impl<T> GetRentalService for T where
    T: DependOnRentalQuery + DependOnToolQuery + DependOnMembershipQuery
{
}

pub(crate) fn rental_not_found(id: &RentalId) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("Rental {id} does not exist"))
}

pub(crate) fn tool_not_found(id: &ToolId) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("Tool {id} does not exist"))
}

/// Loads and locks the rental for the rest of `con`.
pub(crate) async fn lock_rental<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    id: &RentalId,
) -> error_stack::Result<Rental, KernelError>
where
    T: DependOnRentalQuery + ?Sized,
{
    module
        .rental_query()
        .find_by_id_for_update(con, id)
        .await?
        .ok_or_else(|| rental_not_found(id))
}

/// Loads and locks the tool for the rest of `con`.
pub(crate) async fn lock_tool<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    id: &ToolId,
) -> error_stack::Result<Tool, KernelError>
where
    T: DependOnToolQuery + ?Sized,
{
    module
        .tool_query()
        .find_by_id_for_update(con, id)
        .await?
        .ok_or_else(|| tool_not_found(id))
}
