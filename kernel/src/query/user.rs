use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Membership, OrganizationId, User, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError>;
}

pub trait DependOnUserQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type UserQuery: UserQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn user_query(&self) -> &Self::UserQuery;
}

#[async_trait::async_trait]
pub trait MembershipQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find(
        &self,
        con: &mut Self::Transaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Membership>, KernelError>;
}

pub trait DependOnMembershipQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type MembershipQuery: MembershipQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn membership_query(&self) -> &Self::MembershipQuery;
}
