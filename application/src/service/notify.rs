use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::notify::{
    DependOnRentalNotifier, NotificationKind, RentalNotification, RentalNotifier,
};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::prelude::entity::{Rental, UserId};
use kernel::KernelError;

/// Tells `recipient` about a committed transition. Runs in its own read-only
/// transaction; any failure is logged and dropped.
pub(crate) async fn notify<T>(
    module: &T,
    rental: &Rental,
    recipient: &UserId,
    kind: NotificationKind,
) where
    T: DependOnDatabaseConnection + DependOnUserQuery + DependOnRentalNotifier + ?Sized,
{
    let result: error_stack::Result<(), KernelError> = async {
        let mut connection = module.database_connection().transact().await?;
        let user = module
            .user_query()
            .find_by_id(&mut connection, recipient)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("User {recipient} does not exist"))
            })?;
        drop(connection);
        module
            .rental_notifier()
            .notify(RentalNotification::new(
                rental.id().clone(),
                *rental.status(),
                kind,
                user,
            ))
            .await
    }
    .await;
    if let Err(report) = result {
        tracing::warn!(
            "Failed to send {kind} notification for rental {} to {recipient}: {report:?}",
            rental.id()
        );
    }
}

/// The party on the other side of `actor`.
pub(crate) fn counterparty<'a>(rental: &'a Rental, actor: &UserId) -> &'a UserId {
    if rental.renter_id() == actor {
        rental.owner_id()
    } else {
        rental.renter_id()
    }
}
