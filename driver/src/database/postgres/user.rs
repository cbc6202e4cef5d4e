use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{MembershipQuery, UserQuery};
use kernel::prelude::entity::{
    Cents, Membership, OrganizationId, User, UserEmail, UserId, UserName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl MembershipQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find(
        &self,
        con: &mut PostgresTransaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Membership>, KernelError> {
        PgUserInternal::find_membership(con, org_id, user_id).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User::new(
            UserId::new(value.id),
            UserName::new(value.name),
            UserEmail::new(value.email),
        )
    }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    org_id: Uuid,
    user_id: Uuid,
    balance_cents: i64,
}

impl From<MembershipRow> for Membership {
    fn from(value: MembershipRow) -> Self {
        Membership::new(
            OrganizationId::new(value.org_id),
            UserId::new(value.user_id),
            Cents::new(value.balance_cents),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        // language=postgresql
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn find_membership(
        con: &mut PgConnection,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Option<Membership>, KernelError> {
        // language=postgresql
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT org_id, user_id, balance_cents
            FROM user_orgs
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(org_id.as_ref())
        .bind(user_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Membership::from))
    }

    #[cfg(test)]
    pub(in crate::database) async fn create(
        con: &mut PgConnection,
        user: &User,
        org_id: &OrganizationId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.name().as_ref())
        .bind(user.email().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO user_orgs (org_id, user_id, balance_cents)
            VALUES ($1, $2, 0)
            "#,
        )
        .bind(org_id.as_ref())
        .bind(user.id().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{MembershipQuery, UserQuery};
    use kernel::prelude::entity::{Cents, OrganizationId, UserId};
    use kernel::KernelError;

    use crate::database::postgres::test_support::insert_user;
    use crate::database::postgres::{PostgresDatabase, PostgresUserRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_user_and_membership() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let org_id = OrganizationId::new(Uuid::new_v4());
        let id = insert_user(&mut connection, &org_id).await?;

        let user = PostgresUserRepository
            .find_by_id(&mut connection, &id)
            .await?;
        assert_eq!(user.as_ref().map(|user| user.id()), Some(&id));

        let membership = PostgresUserRepository
            .find(&mut connection, &org_id, &id)
            .await?;
        assert_eq!(
            membership.as_ref().map(|membership| membership.balance()),
            Some(&Cents::ZERO)
        );

        let stranger = PostgresUserRepository
            .find(&mut connection, &org_id, &UserId::new(Uuid::new_v4()))
            .await?;
        assert!(stranger.is_none());
        Ok(())
    }
}
