use time::Date;

use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Rental, RentalFilter, RentalId, ToolId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError>;
    /// Same as [`RentalQuery::find_by_id`] but holds the row until `con` ends.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError>;
    async fn find_by_renter(
        &self,
        con: &mut Self::Transaction,
        renter_id: &UserId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError>;
    async fn find_by_owner(
        &self,
        con: &mut Self::Transaction,
        owner_id: &UserId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError>;
    async fn find_by_tool(
        &self,
        con: &mut Self::Transaction,
        tool_id: &ToolId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError>;
    /// ACTIVE rentals whose end date is before `today`.
    async fn find_overdue(
        &self,
        con: &mut Self::Transaction,
        today: Date,
    ) -> error_stack::Result<Vec<Rental>, KernelError>;
}

pub trait DependOnRentalQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type RentalQuery: RentalQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn rental_query(&self) -> &Self::RentalQuery;
}
