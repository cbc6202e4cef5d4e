use std::str::FromStr;

use error_stack::Report;
use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::ToolQuery;
use kernel::interface::update::ToolModifier;
use kernel::prelude::entity::{
    Cents, DurationUnit, OrganizationId, Tool, ToolId, ToolName, ToolStatus, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresToolRepository;

#[async_trait::async_trait]
impl ToolQuery for PostgresToolRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ToolId,
    ) -> error_stack::Result<Option<Tool>, KernelError> {
        PgToolInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &ToolId,
    ) -> error_stack::Result<Option<Tool>, KernelError> {
        PgToolInternal::find_by_id(con, id, true).await
    }
}

#[async_trait::async_trait]
impl ToolModifier for PostgresToolRepository {
    type Transaction = PostgresTransaction;

    async fn update_status(
        &self,
        con: &mut PostgresTransaction,
        tool_id: &ToolId,
        status: ToolStatus,
    ) -> error_stack::Result<(), KernelError> {
        PgToolInternal::update_status(con, tool_id, status).await
    }
}

#[derive(sqlx::FromRow)]
struct ToolRow {
    id: Uuid,
    org_id: Uuid,
    owner_id: Uuid,
    name: String,
    duration_unit: String,
    daily_price_cents: i64,
    weekly_price_cents: i64,
    monthly_price_cents: i64,
    replacement_cost_cents: i64,
    status: String,
}

impl TryFrom<ToolRow> for Tool {
    type Error = Report<KernelError>;

    fn try_from(value: ToolRow) -> Result<Self, Self::Error> {
        Ok(Tool::new(
            ToolId::new(value.id),
            OrganizationId::new(value.org_id),
            UserId::new(value.owner_id),
            ToolName::new(value.name),
            DurationUnit::parse_lossy(Some(value.duration_unit.as_str())),
            Cents::new(value.daily_price_cents),
            Cents::new(value.weekly_price_cents),
            Cents::new(value.monthly_price_cents),
            Cents::new(value.replacement_cost_cents),
            ToolStatus::from_str(&value.status)?,
        ))
    }
}

pub(in crate::database) struct PgToolInternal;

impl PgToolInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ToolId,
        lock: bool,
    ) -> error_stack::Result<Option<Tool>, KernelError> {
        // language=postgresql
        let query = if lock {
            r#"
            SELECT id, org_id, owner_id, name, duration_unit, daily_price_cents,
                   weekly_price_cents, monthly_price_cents, replacement_cost_cents, status
            FROM tools
            WHERE id = $1
            FOR UPDATE
            "#
        } else {
            r#"
            SELECT id, org_id, owner_id, name, duration_unit, daily_price_cents,
                   weekly_price_cents, monthly_price_cents, replacement_cost_cents, status
            FROM tools
            WHERE id = $1
            "#
        };
        let row = sqlx::query_as::<_, ToolRow>(query)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        row.map(Tool::try_from).transpose()
    }

    async fn update_status(
        con: &mut PgConnection,
        id: &ToolId,
        status: ToolStatus,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE tools
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .bind(status.as_str())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Tool {id} does not exist")));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(in crate::database) async fn create(
        con: &mut PgConnection,
        tool: &Tool,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO tools (id, org_id, owner_id, name, duration_unit, daily_price_cents,
                               weekly_price_cents, monthly_price_cents, replacement_cost_cents,
                               status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(tool.id().as_ref())
        .bind(tool.org_id().as_ref())
        .bind(tool.owner_id().as_ref())
        .bind(tool.name().as_ref())
        .bind(tool.duration_unit().as_str())
        .bind(tool.daily_price().as_ref())
        .bind(tool.weekly_price().as_ref())
        .bind(tool.monthly_price().as_ref())
        .bind(tool.replacement_cost().as_ref())
        .bind(tool.status().as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
