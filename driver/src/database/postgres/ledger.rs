use std::str::FromStr;

use error_stack::Report;
use sqlx::PgConnection;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::query::LedgerQuery;
use kernel::interface::update::LedgerModifier;
use kernel::prelude::entity::{
    Cents, CreatedAt, LedgerDescription, LedgerTransaction, LedgerTransactionId,
    LedgerTransactionType, OrganizationId, RentalId, SelectLimit, SelectOffset, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresLedgerRepository;

#[async_trait::async_trait]
impl LedgerQuery for PostgresLedgerRepository {
    type Transaction = PostgresTransaction;

    async fn balance(
        &self,
        con: &mut PostgresTransaction,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Cents, KernelError> {
        PgLedgerInternal::balance(con, org_id, user_id).await
    }

    async fn find_by_user(
        &self,
        con: &mut PostgresTransaction,
        org_id: &OrganizationId,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
        PgLedgerInternal::find_by_user(con, org_id, user_id, limit, offset).await
    }

    async fn find_by_rental(
        &self,
        con: &mut PostgresTransaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
        PgLedgerInternal::find_by_rental(con, rental_id).await
    }
}

#[async_trait::async_trait]
impl LedgerModifier for PostgresLedgerRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        transaction: &LedgerTransaction,
    ) -> error_stack::Result<(), KernelError> {
        PgLedgerInternal::create(con, transaction).await
    }
}

#[derive(sqlx::FromRow)]
struct LedgerRow {
    id: Uuid,
    org_id: Uuid,
    user_id: Uuid,
    amount_cents: i64,
    #[sqlx(rename = "type")]
    kind: String,
    related_rental_id: Option<Uuid>,
    description: String,
    charged_on: Date,
    created_at: OffsetDateTime,
}

impl TryFrom<LedgerRow> for LedgerTransaction {
    type Error = Report<KernelError>;

    fn try_from(value: LedgerRow) -> Result<Self, Self::Error> {
        Ok(LedgerTransaction::new(
            LedgerTransactionId::new(value.id),
            OrganizationId::new(value.org_id),
            UserId::new(value.user_id),
            Cents::new(value.amount_cents),
            LedgerTransactionType::from_str(&value.kind)?,
            value.related_rental_id.map(RentalId::new),
            LedgerDescription::new(value.description),
            value.charged_on,
            CreatedAt::new(value.created_at),
        ))
    }
}

fn into_transactions(rows: Vec<LedgerRow>) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
    rows.into_iter()
        .map(LedgerTransaction::try_from)
        .collect::<Result<Vec<_>, Report<KernelError>>>()
}

pub(in crate::database) struct PgLedgerInternal;

impl PgLedgerInternal {
    async fn balance(
        con: &mut PgConnection,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> error_stack::Result<Cents, KernelError> {
        // language=postgresql
        let sum = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)::BIGINT
            FROM ledger_transactions
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(org_id.as_ref())
        .bind(user_id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Cents::new(sum))
    }

    async fn find_by_user(
        con: &mut PgConnection,
        org_id: &OrganizationId,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
        // language=postgresql
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT id, org_id, user_id, amount_cents, type, related_rental_id, description,
                   charged_on, created_at
            FROM ledger_transactions
            WHERE org_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(org_id.as_ref())
        .bind(user_id.as_ref())
        .bind(i64::from(*limit.as_ref()))
        .bind(i64::from(*offset.as_ref()))
        .fetch_all(con)
        .await
        .convert_error()?;
        into_transactions(rows)
    }

    async fn find_by_rental(
        con: &mut PgConnection,
        rental_id: &RentalId,
    ) -> error_stack::Result<Vec<LedgerTransaction>, KernelError> {
        // language=postgresql
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT id, org_id, user_id, amount_cents, type, related_rental_id, description,
                   charged_on, created_at
            FROM ledger_transactions
            WHERE related_rental_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(rental_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_transactions(rows)
    }

    async fn create(
        con: &mut PgConnection,
        transaction: &LedgerTransaction,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let moved = sqlx::query(
            r#"
            UPDATE user_orgs
            SET balance_cents = balance_cents + $3
            WHERE org_id = $1 AND user_id = $2
            "#,
        )
        .bind(transaction.org_id().as_ref())
        .bind(transaction.user_id().as_ref())
        .bind(transaction.amount().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;
        if moved.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound).attach_printable(format!(
                "User {} is not a member of org {}",
                transaction.user_id(),
                transaction.org_id()
            )));
        }
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO ledger_transactions (id, org_id, user_id, amount_cents, type,
                                             related_rental_id, description, charged_on,
                                             created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(transaction.id().as_ref())
        .bind(transaction.org_id().as_ref())
        .bind(transaction.user_id().as_ref())
        .bind(transaction.amount().as_ref())
        .bind(transaction.kind().as_str())
        .bind(transaction.related_rental_id().as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(transaction.description().as_ref())
        .bind(transaction.charged_on())
        .bind(transaction.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{LedgerQuery, MembershipQuery};
    use kernel::interface::update::LedgerModifier;
    use kernel::prelude::entity::{
        Cents, CreatedAt, LedgerDescription, LedgerTransaction, LedgerTransactionId,
        LedgerTransactionType, OrganizationId, SelectLimit, SelectOffset, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::test_support::insert_user;
    use crate::database::postgres::{
        PostgresDatabase, PostgresLedgerRepository, PostgresUserRepository,
    };

    fn posting(org_id: &OrganizationId, user_id: &UserId, amount: i64) -> LedgerTransaction {
        LedgerTransaction::new(
            LedgerTransactionId::new(Uuid::new_v4()),
            org_id.clone(),
            user_id.clone(),
            Cents::new(amount),
            LedgerTransactionType::Adjustment,
            None,
            LedgerDescription::new("test"),
            date!(2024 - 05 - 01),
            CreatedAt::now(),
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn balance_is_the_sum_and_cache_follows() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let org_id = OrganizationId::new(Uuid::new_v4());
        let user_id = insert_user(&mut connection, &org_id).await?;

        for amount in [-8500, 2000, 150] {
            PostgresLedgerRepository
                .create(&mut connection, &posting(&org_id, &user_id, amount))
                .await?;
        }
        let balance = PostgresLedgerRepository
            .balance(&mut connection, &org_id, &user_id)
            .await?;
        assert_eq!(balance, Cents::new(-6350));

        let membership = PostgresUserRepository
            .find(&mut connection, &org_id, &user_id)
            .await?;
        assert_eq!(
            membership.as_ref().map(|membership| *membership.balance()),
            Some(balance)
        );

        let page = PostgresLedgerRepository
            .find_by_user(
                &mut connection,
                &org_id,
                &user_id,
                &SelectLimit::new(2),
                &SelectOffset::new(0),
            )
            .await?;
        assert_eq!(page.len(), 2);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn posting_for_a_stranger_fails() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let org_id = OrganizationId::new(Uuid::new_v4());
        let error = PostgresLedgerRepository
            .create(
                &mut connection,
                &posting(&org_id, &UserId::new(Uuid::new_v4()), 100),
            )
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);
        Ok(())
    }
}
