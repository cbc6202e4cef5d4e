use std::ops::{Deref, DerefMut};

use error_stack::{Report, ResultExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{ledger::*, rental::*, tool::*, user::*};

mod ledger;
mod rental;
mod tool;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    /// Connects to `POSTGRES_URL` and brings the schema up to date.
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(&url)
            .await
            .convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to run migrations")?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

/// A database transaction. Dropping it without committing rolls it back.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: 'static> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            Error::PoolTimedOut => Report::from(error).change_context(KernelError::Timeout),
            Error::RowNotFound => Report::from(error).change_context(KernelError::NotFound),
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

#[cfg(test)]
pub(in crate::database) mod test_support {
    use uuid::Uuid;

    use kernel::prelude::entity::{OrganizationId, Tool, User, UserEmail, UserId, UserName};
    use kernel::KernelError;

    use super::tool::PgToolInternal;
    use super::user::PgUserInternal;
    use super::PostgresTransaction;

    /// Inserts a fresh user with a zero-balance seat in `org_id`.
    pub async fn insert_user(
        con: &mut PostgresTransaction,
        org_id: &OrganizationId,
    ) -> error_stack::Result<UserId, KernelError> {
        let id = Uuid::new_v4();
        let user = User::new(
            UserId::new(id),
            UserName::new(format!("user-{id}")),
            UserEmail::new(format!("{id}@example.com")),
        );
        PgUserInternal::create(con, &user, org_id).await?;
        Ok(UserId::new(id))
    }

    pub async fn insert_tool(
        con: &mut PostgresTransaction,
        tool: &Tool,
    ) -> error_stack::Result<(), KernelError> {
        PgToolInternal::create(con, tool).await
    }
}
