use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::notify::{DependOnRentalNotifier, NotificationKind};
use kernel::interface::query::{
    DependOnRentalQuery, DependOnToolQuery, DependOnUserQuery, RentalQuery,
};
use kernel::interface::update::{
    DependOnRentalModifier, DependOnToolModifier, RentalModifier, ToolModifier,
};
use kernel::prelude::entity::{
    Cancellation, CancellationReason, Cents, LedgerTransactionType, RentalFilter, RentalId,
    RentalNotes, RentalStatus, ReturnCondition, ReturnReport, ToolStatus, UserId,
};
use kernel::KernelError;

use crate::service::ledger::LedgerAccount;
use crate::service::notify::{counterparty, notify};
use crate::service::rental::{lock_rental, lock_tool};
use crate::transfer::{
    CancelRentalDto, CompleteRentalDto, FinalizeRentalResultDto, RentalActionDto, RentalDto,
};

/// Transitions that move money or the tool: finalize, pickup, return and
/// cancellation. Each one locks the rental and, where the tool changes hands,
/// the tool row before touching anything.
#[async_trait::async_trait]
pub trait RentalFulfillmentService:
    'static
    + Sync
    + Send
    + DependOnRentalQuery
    + DependOnRentalModifier
    + DependOnToolQuery
    + DependOnToolModifier
    + DependOnUserQuery
    + DependOnRentalNotifier
    + LedgerAccount
{
    async fn finalize_rental_request(
        &self,
        dto: RentalActionDto,
    ) -> error_stack::Result<FinalizeRentalResultDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;
        let tool = lock_tool(self, &mut connection, rental.tool_id()).await?;

        let debit = rental.finalize(&actor, &tool)?;
        self.post_transaction(
            &mut connection,
            rental.org_id(),
            rental.renter_id(),
            debit.checked_neg()?,
            LedgerTransactionType::RentalDebit,
            Some(rental.id()),
            &format!("Rental of tool {}", rental.tool_id()),
        )
        .await?;
        self.tool_modifier()
            .update_status(&mut connection, tool.id(), ToolStatus::Rented)
            .await?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        let siblings = self
            .rental_query()
            .find_by_tool(
                &mut connection,
                rental.tool_id(),
                &RentalFilter::with_statuses([RentalStatus::Pending, RentalStatus::Approved]),
            )
            .await?
            .into_iter()
            .filter(|sibling| sibling.id() != rental.id())
            .map(RentalDto::from)
            .collect::<Vec<_>>();
        connection.commit().await?;

        tracing::info!(
            "Rental {} is now {}; {} other open request(s) for tool {}",
            rental.id(),
            rental.status(),
            siblings.len(),
            rental.tool_id()
        );
        notify(self, &rental, rental.owner_id(), NotificationKind::Finalized).await;
        Ok(FinalizeRentalResultDto {
            rental: RentalDto::from(rental),
            siblings,
        })
    }

    async fn activate_rental(
        &self,
        dto: RentalActionDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        rental.activate(&actor)?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(self, &rental, rental.renter_id(), NotificationKind::PickedUp).await;
        Ok(RentalDto::from(rental))
    }

    async fn complete_rental(
        &self,
        dto: CompleteRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let report = ReturnReport::new(
            ReturnCondition::new(dto.return_condition),
            Cents::new(dto.surcharge_or_credit_cents),
            dto.notes.map(RentalNotes::new),
        );
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        let settlement = rental.complete(&actor, report)?;
        let tool = lock_tool(self, &mut connection, rental.tool_id()).await?;
        self.post_transaction(
            &mut connection,
            rental.org_id(),
            rental.owner_id(),
            settlement.payout,
            LedgerTransactionType::LendingCredit,
            Some(rental.id()),
            &format!("Lending of tool {}", rental.tool_id()),
        )
        .await?;
        if !settlement.adjustment.is_zero() {
            self.post_transaction(
                &mut connection,
                rental.org_id(),
                rental.renter_id(),
                settlement.adjustment,
                LedgerTransactionType::Adjustment,
                Some(rental.id()),
                "Return surcharge or credit",
            )
            .await?;
        }
        self.tool_modifier()
            .update_status(&mut connection, tool.id(), ToolStatus::Available)
            .await?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(self, &rental, rental.renter_id(), NotificationKind::Completed).await;
        Ok(RentalDto::from(rental))
    }

    async fn cancel_rental(
        &self,
        dto: CancelRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        let cancellation = rental.cancel(&actor, dto.reason.map(CancellationReason::new))?;
        if let Cancellation::Refund(amount) = cancellation {
            let tool = lock_tool(self, &mut connection, rental.tool_id()).await?;
            self.post_transaction(
                &mut connection,
                rental.org_id(),
                rental.renter_id(),
                amount,
                LedgerTransactionType::Refund,
                Some(rental.id()),
                &format!("Refund for cancelled rental of tool {}", rental.tool_id()),
            )
            .await?;
            self.tool_modifier()
                .update_status(&mut connection, tool.id(), ToolStatus::Available)
                .await?;
        }
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(
            self,
            &rental,
            counterparty(&rental, &actor),
            NotificationKind::Cancelled,
        )
        .await;
        Ok(RentalDto::from(rental))
    }
}

impl<T> RentalFulfillmentService for T where
    T: DependOnRentalQuery
        + DependOnRentalModifier
        + DependOnToolQuery
        + DependOnToolModifier
        + DependOnUserQuery
        + DependOnRentalNotifier
        + LedgerAccount
{
}
