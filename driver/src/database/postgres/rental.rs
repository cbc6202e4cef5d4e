use std::str::FromStr;

use error_stack::Report;
use sqlx::PgConnection;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{
    CancellationReason, Cents, CounterProposal, CreatedAt, DateChangeRequest, DurationUnit,
    OrganizationId, PickupNote, PriceSnapshot, RejectionReason, Rental, RentalFilter, RentalId,
    RentalNotes, RentalPeriod, RentalStatus, ReturnCondition, ReturnReport, ToolId, UpdatedAt,
    UserId, Version,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for PostgresRentalRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_id(con, id, true).await
    }

    async fn find_by_renter(
        &self,
        con: &mut PostgresTransaction,
        renter_id: &UserId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by(con, Column::Renter, renter_id.as_ref(), filter).await
    }

    async fn find_by_owner(
        &self,
        con: &mut PostgresTransaction,
        owner_id: &UserId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by(con, Column::Owner, owner_id.as_ref(), filter).await
    }

    async fn find_by_tool(
        &self,
        con: &mut PostgresTransaction,
        tool_id: &ToolId,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by(con, Column::Tool, tool_id.as_ref(), filter).await
    }

    async fn find_overdue(
        &self,
        con: &mut PostgresTransaction,
        today: Date,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_overdue(con, today).await
    }
}

#[async_trait::async_trait]
impl RentalModifier for PostgresRentalRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::create(con, rental).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::update(con, rental).await
    }
}

const COLUMNS: &str = r#"
    id, org_id, tool_id, renter_id, owner_id, start_date, end_date, last_agreed_end_date,
    duration_unit, daily_price_cents, weekly_price_cents, monthly_price_cents,
    replacement_cost_cents, total_cost_cents, status, completed_by, pickup_note,
    rejection_reason, cancellation_reason, return_condition, surcharge_or_credit_cents, notes,
    proposed_start_date, proposed_end_date, proposed_total_cost_cents, proposed_by,
    status_before_change, counter_end_date, counter_total_cost_cents, counter_reason,
    version, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct RentalRow {
    id: Uuid,
    org_id: Uuid,
    tool_id: Uuid,
    renter_id: Uuid,
    owner_id: Uuid,
    start_date: Date,
    end_date: Date,
    last_agreed_end_date: Option<Date>,
    duration_unit: String,
    daily_price_cents: i64,
    weekly_price_cents: i64,
    monthly_price_cents: i64,
    replacement_cost_cents: i64,
    total_cost_cents: i64,
    status: String,
    completed_by: Option<Uuid>,
    pickup_note: Option<String>,
    rejection_reason: Option<String>,
    cancellation_reason: Option<String>,
    return_condition: Option<String>,
    surcharge_or_credit_cents: Option<i64>,
    notes: Option<String>,
    proposed_start_date: Option<Date>,
    proposed_end_date: Option<Date>,
    proposed_total_cost_cents: Option<i64>,
    proposed_by: Option<Uuid>,
    status_before_change: Option<String>,
    counter_end_date: Option<Date>,
    counter_total_cost_cents: Option<i64>,
    counter_reason: Option<String>,
    version: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<RentalRow> for Rental {
    type Error = Report<KernelError>;

    fn try_from(value: RentalRow) -> Result<Self, Self::Error> {
        let date_change = match (
            value.proposed_start_date,
            value.proposed_end_date,
            value.proposed_total_cost_cents,
            value.proposed_by,
            value.status_before_change,
        ) {
            (Some(start), Some(end), Some(cost), Some(by), Some(prior)) => {
                Some(DateChangeRequest::new(
                    RentalPeriod::new(start, end)?,
                    Cents::new(cost),
                    UserId::new(by),
                    RentalStatus::from_str(&prior)?,
                ))
            }
            _ => None,
        };
        let counter_proposal = match (value.counter_end_date, value.counter_total_cost_cents) {
            (Some(end), Some(cost)) => Some(CounterProposal::new(
                end,
                Cents::new(cost),
                value.counter_reason.map(RejectionReason::new),
            )),
            _ => None,
        };
        let return_report = value.return_condition.map(|condition| {
            ReturnReport::new(
                ReturnCondition::new(condition),
                Cents::new(value.surcharge_or_credit_cents.unwrap_or_default()),
                value.notes.map(RentalNotes::new),
            )
        });
        Ok(Rental::new(
            RentalId::new(value.id),
            OrganizationId::new(value.org_id),
            ToolId::new(value.tool_id),
            UserId::new(value.renter_id),
            UserId::new(value.owner_id),
            RentalPeriod::new(value.start_date, value.end_date)?,
            value.last_agreed_end_date,
            PriceSnapshot::new(
                DurationUnit::parse_lossy(Some(value.duration_unit.as_str())),
                Cents::new(value.daily_price_cents),
                Cents::new(value.weekly_price_cents),
                Cents::new(value.monthly_price_cents),
                Cents::new(value.replacement_cost_cents),
            ),
            Cents::new(value.total_cost_cents),
            RentalStatus::from_str(&value.status)?,
            value.completed_by.map(UserId::new),
            value.pickup_note.map(PickupNote::new),
            value.rejection_reason.map(RejectionReason::new),
            value.cancellation_reason.map(CancellationReason::new),
            return_report,
            date_change,
            counter_proposal,
            Version::new(value.version),
            CreatedAt::new(value.created_at),
            UpdatedAt::new(value.updated_at),
        ))
    }
}

#[derive(Debug, Clone, Copy)]
enum Column {
    Renter,
    Owner,
    Tool,
}

impl Column {
    fn name(&self) -> &'static str {
        match self {
            Column::Renter => "renter_id",
            Column::Owner => "owner_id",
            Column::Tool => "tool_id",
        }
    }
}

fn into_rentals(rows: Vec<RentalRow>) -> error_stack::Result<Vec<Rental>, KernelError> {
    rows.into_iter()
        .map(Rental::try_from)
        .collect::<Result<Vec<_>, Report<KernelError>>>()
}

pub(in crate::database) struct PgRentalInternal;

impl PgRentalInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &RentalId,
        lock: bool,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let lock = if lock { "FOR UPDATE" } else { "" };
        // language=postgresql
        let query = format!("SELECT {COLUMNS} FROM rentals WHERE id = $1 {lock}");
        let row = sqlx::query_as::<_, RentalRow>(&query)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Rental::try_from).transpose()
    }

    async fn find_by(
        con: &mut PgConnection,
        column: Column,
        id: &Uuid,
        filter: &RentalFilter,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let statuses = filter
            .statuses()
            .iter()
            .map(|status| status.as_str().to_string())
            .collect::<Vec<_>>();
        // language=postgresql
        let query = format!(
            r#"
            SELECT {COLUMNS}
            FROM rentals
            WHERE {} = $1 AND (cardinality($2::TEXT[]) = 0 OR status = ANY($2))
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "#,
            column.name()
        );
        let rows = sqlx::query_as::<_, RentalRow>(&query)
            .bind(id)
            .bind(statuses)
            .bind(i64::from(*filter.limit().as_ref()))
            .bind(i64::from(*filter.offset().as_ref()))
            .fetch_all(con)
            .await
            .convert_error()?;
        into_rentals(rows)
    }

    async fn find_overdue(
        con: &mut PgConnection,
        today: Date,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        // language=postgresql
        let query = format!(
            "SELECT {COLUMNS} FROM rentals WHERE status = 'ACTIVE' AND end_date < $1 ORDER BY end_date"
        );
        let rows = sqlx::query_as::<_, RentalRow>(&query)
            .bind(today)
            .fetch_all(con)
            .await
            .convert_error()?;
        into_rentals(rows)
    }

    async fn create(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let query = format!(
            r#"
            INSERT INTO rentals ({COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33)
            "#
        );
        bind_rental(sqlx::query(&query), rental)
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let query = r#"
            UPDATE rentals
            SET start_date = $6, end_date = $7, last_agreed_end_date = $8, total_cost_cents = $14,
                status = $15, completed_by = $16, pickup_note = $17, rejection_reason = $18,
                cancellation_reason = $19, return_condition = $20,
                surcharge_or_credit_cents = $21, notes = $22, proposed_start_date = $23,
                proposed_end_date = $24, proposed_total_cost_cents = $25, proposed_by = $26,
                status_before_change = $27, counter_end_date = $28,
                counter_total_cost_cents = $29, counter_reason = $30, version = $31,
                updated_at = $33
            WHERE id = $1 AND version = $34
            "#;
        let result = bind_rental(sqlx::query(query), rental)
            .bind(*rental.version().expected_previous().as_ref())
            .execute(con)
            .await
            .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "Rental {} was changed by someone else",
                rental.id()
            )));
        }
        Ok(())
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Binds every column of `rental` in [`COLUMNS`] order as `$1..$33`.
fn bind_rental<'q>(query: PgQuery<'q>, rental: &'q Rental) -> PgQuery<'q> {
    let price = rental.price();
    let report = rental.return_report().as_ref();
    let change = rental.date_change().as_ref();
    let counter = rental.counter_proposal().as_ref();
    query
        .bind(rental.id().as_ref())
        .bind(rental.org_id().as_ref())
        .bind(rental.tool_id().as_ref())
        .bind(rental.renter_id().as_ref())
        .bind(rental.owner_id().as_ref())
        .bind(rental.period().start())
        .bind(rental.period().end())
        .bind(*rental.last_agreed_end_date())
        .bind(price.duration_unit().as_str())
        .bind(price.daily_price().as_ref())
        .bind(price.weekly_price().as_ref())
        .bind(price.monthly_price().as_ref())
        .bind(price.replacement_cost().as_ref())
        .bind(rental.total_cost().as_ref())
        .bind(rental.status().as_str())
        .bind(rental.completed_by().as_ref().map(AsRef::<Uuid>::as_ref))
        .bind(rental.pickup_note().as_ref().map(AsRef::<String>::as_ref))
        .bind(rental.rejection_reason().as_ref().map(AsRef::<String>::as_ref))
        .bind(rental.cancellation_reason().as_ref().map(AsRef::<String>::as_ref))
        .bind(report.map(|report| report.condition().as_ref()))
        .bind(report.map(|report| *report.surcharge_or_credit().as_ref()))
        .bind(
            report
                .and_then(|report| report.notes().as_ref())
                .map(AsRef::<String>::as_ref),
        )
        .bind(change.map(|change| change.period().start()))
        .bind(change.map(|change| change.period().end()))
        .bind(change.map(|change| *change.total_cost().as_ref()))
        .bind(change.map(|change| change.requested_by().as_ref()))
        .bind(change.map(|change| change.prior_status().as_str()))
        .bind(counter.map(|counter| *counter.end_date()))
        .bind(counter.map(|counter| *counter.total_cost().as_ref()))
        .bind(
            counter
                .and_then(|counter| counter.reason().as_ref())
                .map(AsRef::<String>::as_ref),
        )
        .bind(rental.version().as_ref())
        .bind(rental.created_at().as_ref())
        .bind(rental.updated_at().as_ref())
}

#[cfg(test)]
mod test {
    use time::macros::date;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::RentalQuery;
    use kernel::interface::update::RentalModifier;
    use kernel::prelude::entity::{
        Cents, DurationUnit, OrganizationId, Rental, RentalFilter, RentalId, RentalPeriod,
        RentalStatus, Tool, ToolId, ToolName, ToolStatus,
    };
    use kernel::KernelError;

    use crate::database::postgres::test_support::{insert_tool, insert_user};
    use crate::database::postgres::{PostgresDatabase, PostgresRentalRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn rental_round_trip_and_stale_update() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;

        let org_id = OrganizationId::new(Uuid::new_v4());
        let owner = insert_user(&mut connection, &org_id).await?;
        let renter = insert_user(&mut connection, &org_id).await?;
        let tool = Tool::new(
            ToolId::new(Uuid::new_v4()),
            org_id.clone(),
            owner.clone(),
            ToolName::new("Ladder"),
            DurationUnit::Day,
            Cents::new(1000),
            Cents::new(4500),
            Cents::new(13500),
            Cents::new(20000),
            ToolStatus::Available,
        );
        insert_tool(&mut connection, &tool).await?;

        let period = RentalPeriod::new(date!(2024 - 05 - 01), date!(2024 - 05 - 12))?;
        let rental = Rental::request(RentalId::new(Uuid::new_v4()), &tool, renter.clone(), period)?;
        PostgresRentalRepository
            .create(&mut connection, &rental)
            .await?;

        let found = PostgresRentalRepository
            .find_by_id_for_update(&mut connection, rental.id())
            .await?;
        assert_eq!(found.as_ref().map(Rental::id), Some(rental.id()));
        assert_eq!(found.as_ref().map(Rental::total_cost), Some(&Cents::new(8500)));

        let mut approved = rental.clone();
        approved.approve(&owner, None)?;
        PostgresRentalRepository
            .update(&mut connection, &approved)
            .await?;

        let mut stale = rental.clone();
        stale.reject(&owner, None)?;
        let error = PostgresRentalRepository
            .update(&mut connection, &stale)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Concurrency);

        let pending = PostgresRentalRepository
            .find_by_tool(
                &mut connection,
                tool.id(),
                &RentalFilter::with_statuses([RentalStatus::Approved]),
            )
            .await?;
        assert_eq!(pending.len(), 1);
        let mine = PostgresRentalRepository
            .find_by_renter(&mut connection, &renter, &RentalFilter::default())
            .await?;
        assert_eq!(mine.len(), 1);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn missing_rental_is_none() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let found = PostgresRentalRepository
            .find_by_id(&mut connection, &RentalId::new(Uuid::new_v4()))
            .await?;
        assert!(found.is_none());
        Ok(())
    }
}
