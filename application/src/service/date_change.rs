use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::notify::{DependOnRentalNotifier, NotificationKind};
use kernel::interface::query::{DependOnRentalQuery, DependOnUserQuery};
use kernel::interface::update::{DependOnRentalModifier, RentalModifier};
use kernel::prelude::entity::{
    today, Cents, LedgerTransactionType, RejectionReason, Rental, RentalId, RentalPeriod, UserId,
};
use kernel::prelude::pricing::parse_date;
use kernel::KernelError;

use crate::service::ledger::LedgerAccount;
use crate::service::notify::{counterparty, notify};
use crate::service::rental::lock_rental;
use crate::transfer::{ChangeRentalDatesDto, RejectDateChangeDto, RentalActionDto, RentalDto};

/// Renegotiation of the rental dates. A proposal never touches the agreed
/// dates or cost until it, or the owner's counter-proposal, is accepted.
#[async_trait::async_trait]
pub trait ReturnDateChangeService:
    'static
    + Sync
    + Send
    + DependOnRentalQuery
    + DependOnRentalModifier
    + DependOnUserQuery
    + DependOnRentalNotifier
    + LedgerAccount
{
    async fn change_rental_dates(
        &self,
        dto: ChangeRentalDatesDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let current = RentalPeriod::parse(&dto.old_start_date, &dto.old_end_date)?;
        let proposed = RentalPeriod::parse(&dto.new_start_date, &dto.new_end_date)?;
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        rental.request_date_change(&actor, current, proposed)?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(
            self,
            &rental,
            counterparty(&rental, &actor),
            NotificationKind::DatesProposed,
        )
        .await;
        Ok(RentalDto::from(rental))
    }

    async fn approve_return_date_change(
        &self,
        dto: RentalActionDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        let delta = rental.approve_date_change(&actor, today())?;
        post_cost_change(self, &mut connection, &rental, delta).await?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(
            self,
            &rental,
            rental.renter_id(),
            NotificationKind::DatesApproved,
        )
        .await;
        Ok(RentalDto::from(rental))
    }

    async fn reject_return_date_change(
        &self,
        dto: RejectDateChangeDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let counter_end_date = parse_date(&dto.counter_end_date)?;
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        rental.reject_date_change(
            &actor,
            dto.reason.map(RejectionReason::new),
            counter_end_date,
        )?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(
            self,
            &rental,
            rental.renter_id(),
            NotificationKind::DatesCountered,
        )
        .await;
        Ok(RentalDto::from(rental))
    }

    async fn acknowledge_return_date_rejection(
        &self,
        dto: RentalActionDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        let delta = rental.acknowledge_date_change_rejection(&actor, today())?;
        post_cost_change(self, &mut connection, &rental, delta).await?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(
            self,
            &rental,
            rental.owner_id(),
            NotificationKind::DatesSettled,
        )
        .await;
        Ok(RentalDto::from(rental))
    }

    async fn cancel_return_date_change(
        &self,
        dto: RentalActionDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let actor = UserId::new(dto.actor);
        let mut connection = self.database_connection().transact().await?;
        let mut rental = lock_rental(self, &mut connection, &RentalId::new(dto.rental_id)).await?;

        rental.cancel_date_change(&actor)?;
        self.rental_modifier()
            .update(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!("Rental {} is now {}", rental.id(), rental.status());
        notify(
            self,
            &rental,
            rental.owner_id(),
            NotificationKind::DatesWithdrawn,
        )
        .await;
        Ok(RentalDto::from(rental))
    }
}

impl<T> ReturnDateChangeService for T where
    T: DependOnRentalQuery
        + DependOnRentalModifier
        + DependOnUserQuery
        + DependOnRentalNotifier
        + LedgerAccount
{
}

/// Settles the difference between the old and new agreed cost with the
/// renter. Nothing is posted when the cost did not move.
async fn post_cost_change<T>(
    module: &T,
    con: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    rental: &Rental,
    delta: Cents,
) -> error_stack::Result<(), KernelError>
where
    T: LedgerAccount + ?Sized,
{
    if delta.is_zero() {
        return Ok(());
    }
    module
        .post_transaction(
            con,
            rental.org_id(),
            rental.renter_id(),
            delta.checked_neg()?,
            LedgerTransactionType::Adjustment,
            Some(rental.id()),
            &format!(
                "Date change to {} through {}",
                rental.period().start(),
                rental.period().end()
            ),
        )
        .await?;
    Ok(())
}
