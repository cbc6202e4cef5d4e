use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::notify::{DependOnRentalNotifier, NotificationKind};
use kernel::interface::policy::DependOnBalancePolicy;
use kernel::interface::query::{
    DependOnMembershipQuery, DependOnRentalQuery, DependOnToolQuery, DependOnUserQuery,
    MembershipQuery, ToolQuery,
};
use kernel::interface::update::{DependOnRentalModifier, RentalModifier};
use kernel::prelude::entity::{
    PickupNote, RejectionReason, Rental, RentalId, RentalPeriod, ToolId, UserId,
};
use kernel::KernelError;

use crate::service::ledger::{ensure_member, LedgerAccount};
use crate::service::notify::notify;
use crate::service::rental::{lock_rental, tool_not_found};
use crate::transfer::{ApproveRentalDto, CreateRentalDto, RejectRentalDto, RentalDto};

/// Opening a rental and the owner's answer to it. No money moves here.
#[async_trait::async_trait]
pub trait RentalRequestService:
    'static
    + Sync
    + Send
    + DependOnRentalQuery
    + DependOnRentalModifier
    + DependOnToolQuery
    + DependOnMembershipQuery
    + DependOnUserQuery
    + DependOnRentalNotifier
    + DependOnBalancePolicy
    + LedgerAccount
{
    async fn create_rental_request(
        &self,
        dto: CreateRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let period = RentalPeriod::parse(&dto.start_date, &dto.end_date)?;
        let actor = UserId::new(dto.actor);
        let tool_id = ToolId::new(dto.tool_id);

        let mut connection = self.database_connection().transact().await?;
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

        let rental = Rental::request(RentalId::new(Uuid::new_v4()), &tool, actor, period)?;
        if self.balance_policy().min_allowed_balance().is_some() {
            let balance = self
                .balance(&mut connection, rental.org_id(), rental.renter_id())
                .await?;
            self.balance_policy()
                .check(balance, *rental.total_cost())?;
        }
        self.rental_modifier()
            .create(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!(
            "Rental {} requested for tool {} at {}",
            rental.id(),
            rental.tool_id(),
            rental.total_cost()
        );
        notify(self, &rental, rental.owner_id(), NotificationKind::Requested).await;
        Ok(RentalDto::from(rental))
    }

    async fn approve_rental_request(
        &self,
        dto: ApproveRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        rental.approve(&actor, dto.pickup_note.map(PickupNote::new))?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(self, &rental, rental.renter_id(), NotificationKind::Approved).await;
        Ok(RentalDto::from(rental))
    }

    async fn reject_rental_request(
        &self,
        dto: RejectRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        rental.reject(&actor, dto.reason.map(RejectionReason::new))?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(self, &rental, rental.renter_id(), NotificationKind::Rejected).await;
        Ok(RentalDto::from(rental))
    }
}

impl<T> RentalRequestService for T where
    T: DependOnRentalQuery
        + DependOnRentalModifier
        + DependOnToolQuery
        + DependOnMembershipQuery
        + DependOnUserQuery
        + DependOnRentalNotifier
        + DependOnBalancePolicy
        + LedgerAccount
{
}
